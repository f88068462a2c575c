//! Record construction and threshold filtering

use chrono::Utc;
use serde_json::{json, Value};

use super::sanitize::{safe_clone, strip_stack};
use crate::domain::models::{Level, LevelInput, LogRecord};

/// Builds records from a level and a list of arguments
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    application: String,
}

impl MessageFormatter {
    /// Formatter stamping every record with `application` (`name@version/build`)
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
        }
    }

    /// The `name@version/build` string written on each record
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Build a record, or `None` when nothing should be logged
    ///
    /// Returns `None` when `level` does not resolve, resolves below
    /// `threshold`, or when there are no arguments / a single null argument.
    pub fn format(
        &self,
        threshold: Level,
        level: impl Into<LevelInput>,
        args: &[Value],
    ) -> Option<LogRecord> {
        let level = level
            .into()
            .resolve()
            .filter(|level| Level::is_at_least(Some(*level), threshold))?;

        if matches!(args, [] | [Value::Null]) {
            return None;
        }

        Some(self.base_record(threshold, level, format_detail(args)))
    }

    /// Build a record without filtering
    ///
    /// Timed operations need timestamp and application fields even when
    /// no record at `level` would pass the threshold.
    pub fn base_record(&self, threshold: Level, level: Level, detail: Value) -> LogRecord {
        LogRecord {
            level,
            logged: Utc::now(),
            application: self.application.clone(),
            detail: sanitize(threshold, detail),
            id: None,
            result: None,
        }
    }
}

/// Stack traces are only kept at INFO verbosity or chattier
pub fn strips_stack(threshold: Level) -> bool {
    threshold > Level::Info
}

/// Apply the stack policy for `threshold` to an owned snapshot
pub fn sanitize(threshold: Level, mut value: Value) -> Value {
    if strips_stack(threshold) {
        strip_stack(&mut value);
    }
    value
}

/// Detail payload for a list of arguments
///
/// A single object or array is copied as-is; anything else is rendered
/// into `{ "message": ... }`.
pub fn format_detail(args: &[Value]) -> Value {
    match args {
        [single @ (Value::Object(_) | Value::Array(_))] => safe_clone(single),
        _ => json!({ "message": format_message(args) }),
    }
}

/// printf-style rendering
///
/// When the first argument is a string its `%s %d %i %f %j %o %O %%`
/// placeholders consume the following arguments. Leftover arguments are
/// appended, space separated. A lone string is returned untouched, `%%`
/// included.
pub fn format_message(args: &[Value]) -> String {
    let Some((first, rest)) = args.split_first() else {
        return String::new();
    };
    if let (Value::String(template), []) = (first, rest) {
        return template.clone();
    }
    let mut rest = rest.iter();
    let mut out = String::new();

    if let Value::String(template) = first {
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                Some(spec @ ('s' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O')) => match rest.next() {
                    Some(arg) => {
                        chars.next();
                        out.push_str(&render_placeholder(spec, arg));
                    }
                    // Unmatched placeholders stay literal
                    None => out.push('%'),
                },
                _ => out.push('%'),
            }
        }
    } else {
        out.push_str(&inspect(first));
    }

    for arg in rest {
        out.push(' ');
        out.push_str(&inspect(arg));
    }
    out
}

fn render_placeholder(spec: char, arg: &Value) -> String {
    match spec {
        's' => inspect(arg),
        'd' => to_number(arg).map_or_else(|| "NaN".to_string(), format_number),
        'i' => to_number(arg).map_or_else(|| "NaN".to_string(), |n| format_number(n.trunc())),
        'f' => to_number(arg).map_or_else(|| "NaN".to_string(), |n| n.to_string()),
        _ => serde_json::to_string(arg).unwrap_or_default(),
    }
}

/// Strings verbatim, everything else as compact JSON
fn inspect(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_number(arg: &Value) -> Option<f64> {
    match arg {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
