use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::level::Level;

/// A single structured unit of log output
///
/// Serializes to one JSON object per line:
/// `{"level":"INFO","logged":"2024-05-01T12:00:00.000Z","application":"app@1.0.0/42","detail":{...}}`
/// with `id` and `result` present only for timed operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity, serialized by name
    pub level: Level,

    /// Creation time, ISO-8601 UTC with milliseconds
    #[serde(with = "iso_millis")]
    pub logged: DateTime<Utc>,

    /// `name@version/build` of the emitting application
    pub application: String,

    /// JSON-safe snapshot taken at format time
    pub detail: Value,

    /// Correlation id shared by the start and stop records of a timed operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Outcome on the stop record of a timed operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<OperationResult>,
}

impl LogRecord {
    /// Serialize to the canonical single-line JSON form
    pub fn to_json_line(&self) -> String {
        // Every field is already a plain JSON value, so this cannot fail in practice.
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"level":"{}","application":{},"detail":{{"message":"[Unserializable record: {}]"}}}}"#,
                self.level,
                Value::String(self.application.clone()),
                e.to_string().replace('"', "'")
            )
        })
    }
}

/// Outcome payload of a timed operation's stop record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationResult {
    /// The work produced `value` after `time` milliseconds
    Success { value: Value, time: u64 },
    /// The work failed with `error` after `time` milliseconds
    Failure { error: Value, time: u64 },
}

impl OperationResult {
    /// Elapsed milliseconds, rounded up
    pub const fn time(&self) -> u64 {
        match self {
            Self::Success { time, .. } | Self::Failure { time, .. } => *time,
        }
    }

    /// Whether the operation failed
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix
mod iso_millis {
    use super::{DateTime, Deserialize, Deserializer, SecondsFormat, Serializer, Utc};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
