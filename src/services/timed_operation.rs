//! Start/stop records around a unit of async work
//!
//! A timed operation logs a start record as soon as it is invoked and a
//! stop record once the work settles. Both records share a correlation id;
//! the stop record carries the outcome and the elapsed milliseconds.
//! Logging never changes the outcome: values and errors are returned to
//! the caller untouched.

use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Display};
use std::future::{Future, IntoFuture};
use std::time::Instant;
use uuid::Uuid;

use super::formatter::{format_detail, sanitize};
use super::logger::Logger;
use super::sanitize::{error_payload, safe_clone};
use crate::domain::models::{Level, LogRecord, OperationResult};

/// A pair of levels for the start and successful stop records
///
/// Failures are always logged at ERROR.
#[derive(Clone)]
pub struct TimedOperation {
    logger: Logger,
    request_level: Level,
    response_level: Level,
}

impl TimedOperation {
    pub(crate) const fn new(logger: Logger, request_level: Level, response_level: Level) -> Self {
        Self {
            logger,
            request_level,
            response_level,
        }
    }

    /// Run `work` between a start and a stop record
    ///
    /// The start record is written and `work` is invoked before this
    /// returns; the returned future only awaits the work and writes the
    /// stop record. `label` becomes the record detail: an object or array
    /// is copied, anything else becomes `{ "message": .. }`. A string or
    /// numeric `id` on an object label is used as the correlation id.
    pub fn run<L, F, Fut, T, E>(&self, label: L, work: F) -> impl Future<Output = Result<T, E>>
    where
        L: Serialize,
        F: FnOnce() -> Fut,
        Fut: IntoFuture<Output = Result<T, E>>,
        T: Serialize,
        E: Display + Debug,
    {
        let threshold = self.logger.level();
        let detail = format_detail(&[safe_clone(&label)]);
        let id = correlation_id(&detail);

        // Built unconditionally so the stop record has its fields even
        // when the start record is filtered out.
        let mut base = self
            .logger
            .formatter()
            .base_record(threshold, Level::Fatal, detail);
        base.id = Some(id);

        if Level::is_at_least(Some(self.request_level), threshold) {
            self.logger.sink().emit(Some(&LogRecord {
                level: self.request_level,
                ..base.clone()
            }));
        }

        let started = Instant::now();
        let pending = work().into_future();
        let logger = self.logger.clone();
        let response_level = self.response_level;

        async move {
            let outcome = pending.await;
            let threshold = logger.level();

            match &outcome {
                Ok(value) => {
                    if Level::is_at_least(Some(response_level), threshold) {
                        let value = sanitize(threshold, safe_clone(value));
                        logger.sink().emit(Some(&LogRecord {
                            level: response_level,
                            result: Some(OperationResult::Success {
                                value,
                                time: elapsed_ms(started),
                            }),
                            ..base
                        }));
                    }
                }
                Err(error) => {
                    if Level::is_at_least(Some(Level::Error), threshold) {
                        let error = sanitize(threshold, error_payload(error));
                        logger.sink().emit(Some(&LogRecord {
                            level: Level::Error,
                            result: Some(OperationResult::Failure {
                                error,
                                time: elapsed_ms(started),
                            }),
                            ..base
                        }));
                    }
                }
            }

            outcome
        }
    }
}

/// `id` from the label when it is a string or number, otherwise a fresh UUID
fn correlation_id(detail: &Value) -> String {
    match detail.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

/// Whole milliseconds, rounded up
fn elapsed_ms(started: Instant) -> u64 {
    let millis = started.elapsed().as_secs_f64() * 1000.0;
    millis.ceil() as u64
}
