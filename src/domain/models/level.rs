use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Severity level of a log record
///
/// Levels form a fixed, sparse table of twelve named tiers. The integer
/// severity is what filtering compares; the name is what appears in output.
///
/// # Examples
///
/// ```
/// use levelog::Level;
///
/// assert!(Level::Error > Level::Info);
/// assert_eq!(Level::Request.severity(), 600);
/// assert_eq!(Level::parse(" clientRequest "), Some(Level::ClientRequest));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Level {
    /// Most verbose level
    Trace = 100,
    /// Development diagnostics
    Debug = 200,
    /// Outbound request issued by this application
    ClientRequest = 300,
    /// Response received for an outbound request
    ClientResponse = 350,
    /// Normal operational messages
    Info = 400,
    /// Potentially problematic situations
    Warn = 500,
    /// Inbound request handled by this application
    Request = 600,
    /// Response produced for an inbound request
    Response = 650,
    /// Component or process stopped
    Stop = 700,
    /// Component or process started
    Start = 750,
    /// Failure conditions
    Error = 900,
    /// Unrecoverable failures
    Fatal = 1000,
}

impl Level {
    /// Every level, most severe first
    pub const ALL: [Self; 12] = [
        Self::Fatal,
        Self::Error,
        Self::Start,
        Self::Stop,
        Self::Response,
        Self::Request,
        Self::Warn,
        Self::Info,
        Self::ClientResponse,
        Self::ClientRequest,
        Self::Debug,
        Self::Trace,
    ];

    /// Integer severity used for threshold comparisons
    pub const fn severity(self) -> u16 {
        self as u16
    }

    /// Upper-case name as written to log output
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::ClientRequest => "CLIENTREQUEST",
            Self::ClientResponse => "CLIENTRESPONSE",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Request => "REQUEST",
            Self::Response => "RESPONSE",
            Self::Stop => "STOP",
            Self::Start => "START",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Look up a level by its integer severity
    ///
    /// Only the twelve table values resolve; anything else is `None`.
    pub fn from_severity(severity: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| i64::from(level.severity()) == severity)
    }

    /// Parse a level from text
    ///
    /// Input that is all ASCII digits after trimming is treated as a
    /// severity number. Anything else is a case-insensitive name lookup.
    /// Partial numbers such as `"100abc"` never resolve.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed.parse::<i64>().ok().and_then(Self::from_severity);
        }

        let upper = trimmed.to_ascii_uppercase();
        Self::ALL.into_iter().find(|level| level.as_str() == upper)
    }

    /// Reverse lookup that tolerates an unresolved level
    pub fn name_of(level: Option<Self>) -> Option<&'static str> {
        level.map(Self::as_str)
    }

    /// Threshold check
    ///
    /// An unresolved level never clears any threshold.
    pub fn is_at_least(level: Option<Self>, threshold: Self) -> bool {
        level.is_some_and(|level| level.severity() >= threshold.severity())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown log level: {s}"))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = LevelInput::deserialize(deserializer)?;
        input
            .resolve()
            .ok_or_else(|| serde::de::Error::custom(format!("unknown log level: {input}")))
    }
}

/// A level as supplied by a caller or a configuration source
///
/// Either a name (`"info"`, `"CLIENTREQUEST"`, `"600"`) or a number.
/// Resolution never fails loudly; unknown input simply resolves to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelInput {
    /// Numeric severity
    Severity(i64),
    /// Level name or numeric string
    Name(String),
}

impl LevelInput {
    /// Resolve against the level table
    pub fn resolve(&self) -> Option<Level> {
        match self {
            Self::Severity(n) => Level::from_severity(*n),
            Self::Name(name) => Level::parse(name),
        }
    }
}

impl fmt::Display for LevelInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Severity(n) => write!(f, "{n}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<Level> for LevelInput {
    fn from(level: Level) -> Self {
        Self::Severity(i64::from(level.severity()))
    }
}

impl From<&str> for LevelInput {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for LevelInput {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for LevelInput {
    fn from(severity: i64) -> Self {
        Self::Severity(severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        assert_eq!(Level::Fatal.severity(), 1000);
        assert_eq!(Level::Error.severity(), 900);
        assert_eq!(Level::Start.severity(), 750);
        assert_eq!(Level::Stop.severity(), 700);
        assert_eq!(Level::Response.severity(), 650);
        assert_eq!(Level::Request.severity(), 600);
        assert_eq!(Level::Warn.severity(), 500);
        assert_eq!(Level::Info.severity(), 400);
        assert_eq!(Level::ClientResponse.severity(), 350);
        assert_eq!(Level::ClientRequest.severity(), 300);
        assert_eq!(Level::Debug.severity(), 200);
        assert_eq!(Level::Trace.severity(), 100);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Level::parse("info"), Some(Level::Info));
        assert_eq!(Level::parse("  WARN\n"), Some(Level::Warn));
        assert_eq!(Level::parse("ClientResponse"), Some(Level::ClientResponse));
        assert_eq!(Level::parse("verbose"), None);
        assert_eq!(Level::parse(""), None);
        assert_eq!(Level::parse("   "), None);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(Level::parse("900"), Some(Level::Error));
        assert_eq!(Level::parse(" 100 "), Some(Level::Trace));
        assert_eq!(Level::parse("901"), None);
        assert_eq!(Level::parse("100abc"), None);
        assert_eq!(Level::parse("-100"), None);
        assert_eq!(Level::parse("1e3"), None);
        assert_eq!(Level::from_severity(650), Some(Level::Response));
        assert_eq!(Level::from_severity(0), None);
    }

    #[test]
    fn test_name_of() {
        assert_eq!(Level::name_of(Some(Level::Stop)), Some("STOP"));
        assert_eq!(Level::name_of(None), None);
        assert_eq!(Level::name_of(Level::parse("nope")), None);
    }

    #[test]
    fn test_is_at_least() {
        assert!(Level::is_at_least(Some(Level::Request), Level::Info));
        assert!(Level::is_at_least(Some(Level::Info), Level::Info));
        assert!(!Level::is_at_least(Some(Level::Debug), Level::Error));
        for threshold in Level::ALL {
            assert!(!Level::is_at_least(None, threshold));
        }
    }

    #[test]
    fn test_serde_forms() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), "\"WARN\"");
        let by_name: Level = serde_json::from_str("\"response\"").unwrap();
        let by_number: Level = serde_json::from_str("350").unwrap();
        assert_eq!(by_name, Level::Response);
        assert_eq!(by_number, Level::ClientResponse);
        assert!(serde_json::from_str::<Level>("\"loud\"").is_err());
    }

    #[test]
    fn test_level_input_resolution() {
        assert_eq!(LevelInput::from("debug").resolve(), Some(Level::Debug));
        assert_eq!(LevelInput::from(750).resolve(), Some(Level::Start));
        assert_eq!(LevelInput::from(751).resolve(), None);
        assert_eq!(LevelInput::from(Level::Fatal).resolve(), Some(Level::Fatal));
    }
}
