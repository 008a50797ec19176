use once_cell::sync::Lazy;
use regex::Regex;

/// Extension the log directory is filtered on and routes resolve against.
pub const LOG_EXTENSION: &str = ".md";

/// Log name grammar: `YYYY-MM-DD[-HHMM]-<session>[-subagent-<type>-<id>]`.
/// HHMM is optional (older logs don't have it).
static LOG_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})-(?:(\d{4})-)?(\w+?)(?:-subagent-(.+)-(\w+))?$")
        .expect("log name pattern compiles")
});

/// Metadata decoded from a log filename (without extension).
///
/// Parsing is all-or-nothing: a name that doesn't match the grammar keeps
/// only `raw`, and callers fall back to displaying it verbatim. `time` and
/// the subagent fields are independently optional within a match.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LogName {
    pub raw: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub session: Option<String>,
    pub agent_type: Option<String>,
    pub agent_id: Option<String>,
}

pub fn parse_log_name(stem: &str) -> LogName {
    let Some(caps) = LOG_NAME_RE.captures(stem) else {
        return LogName {
            raw: stem.to_string(),
            ..LogName::default()
        };
    };

    let time = caps.get(2).map(|m| {
        let digits = m.as_str();
        format!("{}:{}", &digits[..2], &digits[2..])
    });

    LogName {
        raw: stem.to_string(),
        date: caps.get(1).map(|m| m.as_str().to_string()),
        time,
        session: caps.get(3).map(|m| m.as_str().to_string()),
        agent_type: caps.get(4).map(|m| m.as_str().to_string()),
        agent_id: caps.get(5).map(|m| m.as_str().to_string()),
    }
}
