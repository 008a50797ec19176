use crate::parse::{LOG_EXTENSION, parse_log_name};
use crate::templates::{INDEX_TEMPLATE, escape_html};
use std::io;
use std::path::Path;

/// Builds the index page for `log_dir`, listed fresh on every call.
///
/// A missing directory is an empty index, not an error; startup validation
/// of the configured directory is the CLI's job. Any other listing failure
/// propagates so the caller can answer 500 instead of an empty 200.
pub fn build_index(log_dir: &Path) -> io::Result<String> {
    let mut files = list_log_files(log_dir)?;
    files.sort_by(|a, b| b.cmp(a));

    let entries = if files.is_empty() {
        r#"<p class="empty">No session logs found.</p>"#.to_string()
    } else {
        files
            .iter()
            .map(|file| render_entry(file))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(INDEX_TEMPLATE.replace("{entries}", &entries))
}

fn list_log_files(log_dir: &Path) -> io::Result<Vec<String>> {
    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(error),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(LOG_EXTENSION) && !name.starts_with('.') {
            files.push(name);
        }
    }
    Ok(files)
}

fn render_entry(file: &str) -> String {
    let slug = file.strip_suffix(LOG_EXTENSION).unwrap_or(file);
    let meta = parse_log_name(slug);

    let mut label = match (&meta.date, &meta.session) {
        (Some(date), Some(session)) => {
            let date_time = match &meta.time {
                Some(time) => format!("{date} {time}"),
                None => date.clone(),
            };
            format!(
                "{} &mdash; {}",
                escape_html(&date_time),
                escape_html(session)
            )
        }
        _ => escape_html(&meta.raw),
    };

    if let Some(agent_type) = &meta.agent_type {
        let agent_id = meta.agent_id.as_deref().unwrap_or("");
        label.push_str(&format!(
            r#"<span class="subagent">{} {}</span>"#,
            escape_html(agent_type),
            escape_html(agent_id)
        ));
    }

    format!(
        concat!(
            "<div class=\"session\">\n",
            "  <span class=\"session-name\">{label}</span>\n",
            "  <span class=\"links\">\n",
            "    <a href=\"/{view}\">view</a>\n",
            "    <a href=\"/{raw}\">raw</a>\n",
            "  </span>\n",
            "</div>"
        ),
        label = label,
        view = escape_html(slug),
        raw = escape_html(file),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "# test\n").expect("write log file");
    }

    #[test]
    fn lists_logs_most_recent_first() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "2026-02-16-1856-abc12345.md");
        touch(dir.path(), "2026-02-16-1900-abc12345-subagent-Explore-dddd1111.md");
        touch(dir.path(), "2025-12-01-0930-older.md");

        let page = build_index(dir.path()).expect("index builds");
        let newest = page.find("19:00").expect("19:00 entry present");
        let mid = page.find("18:56").expect("18:56 entry present");
        let oldest = page.find("09:30").expect("09:30 entry present");
        assert!(newest < mid, "subagent entry sorts first");
        assert!(mid < oldest);
    }

    #[test]
    fn marks_subagent_entries() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "2026-02-16-1900-abc12345-subagent-Explore-dddd1111.md");

        let page = build_index(dir.path()).expect("index builds");
        assert!(page.contains(r#"<span class="subagent">Explore dddd1111</span>"#));
        assert!(page.contains("2026-02-16 19:00 &mdash; abc12345"));
    }

    #[test]
    fn links_view_and_raw_per_entry() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "2026-02-16-1856-abc12345.md");

        let page = build_index(dir.path()).expect("index builds");
        assert!(page.contains(r#"<a href="/2026-02-16-1856-abc12345">view</a>"#));
        assert!(page.contains(r#"<a href="/2026-02-16-1856-abc12345.md">raw</a>"#));
    }

    #[test]
    fn unparsable_names_display_verbatim() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "scratchpad.md");

        let page = build_index(dir.path()).expect("index builds");
        assert!(page.contains(r#"<span class="session-name">scratchpad</span>"#));
    }

    #[test]
    fn escapes_markup_in_filenames() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "x<script>.md");

        let page = build_index(dir.path()).expect("index builds");
        assert!(page.contains("x&lt;script&gt;"));
        assert!(!page.contains("<script>.md"));
    }

    #[test]
    fn skips_hidden_and_foreign_files() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), ".hidden.md");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "2026-01-01-0000-keepme.md");

        let page = build_index(dir.path()).expect("index builds");
        assert!(page.contains("keepme"));
        assert!(!page.contains("hidden"));
        assert!(!page.contains("notes.txt"));
    }

    #[test]
    fn empty_dir_renders_placeholder() {
        let dir = tempdir().expect("tempdir");
        let page = build_index(dir.path()).expect("index builds");
        assert!(page.contains("No session logs found."));
    }

    #[test]
    fn missing_dir_renders_placeholder() {
        let dir = tempdir().expect("tempdir");
        let gone = dir.path().join("never-created");
        let page = build_index(&gone).expect("index builds");
        assert!(page.contains("No session logs found."));
    }
}
