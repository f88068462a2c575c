//! Console output: standard stream writers and the pretty renderer

use console::{style, StyledObject};
use std::io::{self, Write};

use crate::domain::models::{Level, LogRecord};
use crate::domain::ports::RecordWriter;

/// Writes lines to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutWriter;

impl RecordWriter for StdoutWriter {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")
    }
}

/// Writes lines to standard error
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrWriter;

impl RecordWriter for StderrWriter {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "{line}")
    }
}

/// Human-readable form of a record
///
/// `<logged> <LEVEL> <application> <detail>` where the detail is pretty
/// printed JSON with `id` and `result` folded in when present.
pub fn render_pretty(record: &LogRecord) -> String {
    let mut detail = match &record.detail {
        serde_json::Value::Object(map) => map.clone(),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("detail".to_string(), other.clone());
            map
        }
    };
    if let Some(id) = &record.id {
        detail.insert("id".to_string(), serde_json::Value::String(id.clone()));
    }
    if let Some(result) = &record.result {
        if let Ok(value) = serde_json::to_value(result) {
            detail.insert("result".to_string(), value);
        }
    }

    let body = serde_json::to_string_pretty(&detail).unwrap_or_default();
    format!(
        "{} {} {} {}",
        record.logged.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        level_style(record.level),
        record.application,
        body
    )
}

/// Styling is dropped automatically when the terminal has no color support
fn level_style(level: Level) -> StyledObject<&'static str> {
    let styled = style(level.as_str()).bold();
    match level {
        Level::Fatal | Level::Error => styled.red(),
        Level::Warn => styled.yellow(),
        Level::Start | Level::Stop => styled.green(),
        Level::Request | Level::Response | Level::ClientRequest | Level::ClientResponse => {
            styled.cyan()
        }
        Level::Info => styled,
        Level::Debug | Level::Trace => styled.dim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::OperationResult;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record() -> LogRecord {
        LogRecord {
            level: Level::Response,
            logged: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            application: "svc@1.0.0/b1".to_string(),
            detail: json!({ "message": "GET /" }),
            id: None,
            result: None,
        }
    }

    #[test]
    fn test_render_pretty_plain() {
        let text = console::strip_ansi_codes(&render_pretty(&record())).to_string();
        assert!(text.starts_with("2024-01-02T03:04:05.000Z RESPONSE svc@1.0.0/b1 {"));
        assert!(text.contains("\"message\": \"GET /\""));
        assert!(!text.contains("\"id\""));
        assert!(!text.contains("\"result\""));
    }

    #[test]
    fn test_render_pretty_folds_id_and_result() {
        let mut record = record();
        record.id = Some("req-1".to_string());
        record.result = Some(OperationResult::Success {
            value: json!(200),
            time: 12,
        });

        let text = console::strip_ansi_codes(&render_pretty(&record)).to_string();
        assert!(text.contains("\"id\": \"req-1\""));
        assert!(text.contains("\"value\": 200"));
        assert!(text.contains("\"time\": 12"));
    }

    #[test]
    fn test_render_pretty_wraps_non_object_detail() {
        let mut record = record();
        record.detail = json!([1, 2]);
        let text = console::strip_ansi_codes(&render_pretty(&record)).to_string();
        assert!(text.contains("\"detail\": ["));
    }
}
