//! Static HTML shells for the index and the rendered-session page, plus the
//! escaping boundary every filename- or file-sourced value passes through.

/// Page shell for a single rendered session. The markdown source lands in a
/// hidden `<pre>` (escaped) and marked.js converts it in the browser.
pub const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/github-markdown-css@5/github-markdown-dark.min.css">
<script src="https://cdn.jsdelivr.net/npm/marked/marked.min.js"></script>
<style>
  body {
    background: #0d1117;
    color: #e6edf3;
    max-width: 960px;
    margin: 0 auto;
    padding: 2rem 1rem;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
  }
  .markdown-body {
    background: transparent;
  }
  .markdown-body pre {
    background: #161b22;
  }
  .markdown-body code {
    background: #161b22;
  }
  nav { margin-bottom: 1.5rem; }
  nav a { color: #58a6ff; text-decoration: none; }
  nav a:hover { text-decoration: underline; }
  #content { display: none; }
</style>
</head>
<body>
<nav><a href="/">&larr; All sessions</a></nav>
<div id="raw" class="markdown-body"></div>
<pre id="content">{content}</pre>
<script>
  const md = document.getElementById('content').textContent;
  document.getElementById('raw').innerHTML = marked.parse(md);
</script>
</body>
</html>
"#;

/// Index shell; `{entries}` receives the pre-rendered session rows.
pub const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Session Logs</title>
<style>
  body {
    background: #0d1117;
    color: #e6edf3;
    max-width: 960px;
    margin: 0 auto;
    padding: 2rem 1rem;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
  }
  h1 { border-bottom: 1px solid #30363d; padding-bottom: 0.5rem; }
  .session {
    padding: 0.75rem 0;
    border-bottom: 1px solid #21262d;
    display: flex;
    justify-content: space-between;
    align-items: center;
  }
  .session-name {
    font-family: monospace;
    font-size: 0.95rem;
  }
  a { color: #58a6ff; text-decoration: none; }
  a:hover { text-decoration: underline; }
  .links { font-size: 0.85rem; }
  .links a { margin-left: 1rem; }
  .subagent { opacity: 0.7; font-size: 0.85rem; margin-left: 0.5rem; }
  .empty { color: #8b949e; font-style: italic; }
</style>
</head>
<body>
<h1>Session Logs</h1>
{entries}
</body>
</html>
"#;

/// Escapes a value for embedding in HTML text or attribute position.
/// Filenames and file contents are untrusted; everything sourced from them
/// goes through here before touching a template.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders the session page with title and content escaped at the boundary.
pub fn render_page(title: &str, content: &str) -> String {
    PAGE_TEMPLATE
        .replace("{title}", &escape_html(title))
        .replace("{content}", &escape_html(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<b a="1">&'"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#x27;"
        );
        assert_eq!(escape_html("plain-name_01"), "plain-name_01");
    }

    #[test]
    fn page_embeds_escaped_title_and_content() {
        let page = render_page("a<b", "# Hi\n<script>alert(1)</script>");
        assert!(page.contains("<title>a&lt;b</title>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.contains("<script>alert(1)"));
        // The client-side renderer hookup stays intact.
        assert!(page.contains("marked.parse"));
    }
}
