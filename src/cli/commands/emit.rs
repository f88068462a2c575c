//! Implementation of the `levelog emit` command.

use clap::Args;
use serde_json::Value;

use crate::services::Logger;

/// Arguments of `levelog emit`
#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Level name or number
    #[arg(id = "emit_level", value_name = "LEVEL")]
    pub level: String,

    /// Values to log; each is parsed as JSON when possible, else taken as text
    pub args: Vec<String>,
}

/// Nothing is written when the level is unknown or below the threshold
pub fn execute(args: EmitArgs, logger: &Logger) {
    let values: Vec<Value> = args.args.iter().map(|raw| parse_arg(raw)).collect();
    logger.log_raw(args.level, values);
}

fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Level, LoggerConfig, LoggerOptions};
    use crate::infrastructure::logging::MemoryWriter;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_parse_arg() {
        assert_eq!(parse_arg("42"), json!(42));
        assert_eq!(parse_arg(r#"{"a":1}"#), json!({ "a": 1 }));
        assert_eq!(parse_arg("plain words"), json!("plain words"));
    }

    #[test]
    fn test_emit_single_object_argument() {
        let out = MemoryWriter::new();
        let logger = Logger::builder(LoggerConfig::resolve(
            &LoggerOptions::default().with_level("info"),
            None,
        ))
        .console(Arc::new(out.clone()), Arc::new(out.clone()))
        .build()
        .unwrap();

        execute(
            EmitArgs {
                level: "warn".to_string(),
                args: vec![r#"{"disk":"91%"}"#.to_string()],
            },
            &logger,
        );
        execute(
            EmitArgs {
                level: "debug".to_string(),
                args: vec!["hidden".to_string()],
            },
            &logger,
        );

        let records = out.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Warn);
        assert_eq!(records[0].detail, json!({ "disk": "91%" }));
    }
}
