//! Implementation of the `levelog run` command.

use clap::Args;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::process::Command;

use crate::services::Logger;

/// Arguments of `levelog run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Label for the start/stop records (defaults to the command line)
    #[arg(long)]
    pub label: Option<String>,

    /// Log as an outbound call (CLIENTREQUEST / CLIENTRESPONSE)
    #[arg(long)]
    pub client: bool,

    /// Command and arguments, after `--`
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Failure of the timed child process
#[derive(Debug, Error)]
pub enum ProcessFailure {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {}", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Exit { program: String, code: Option<i32> },
}

impl ProcessFailure {
    /// Exit status to hand back to the shell
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Spawn { .. } => 127,
            Self::Exit { code, .. } => match code {
                Some(code) => *code,
                None => 1,
            },
        }
    }
}

/// Run the child and return the exit status to propagate
pub async fn execute(args: RunArgs, logger: &Logger) -> i32 {
    let label = args.label.unwrap_or_else(|| args.command.join(" "));
    let Some((program, rest)) = args.command.split_first() else {
        return 0;
    };
    let program = program.clone();
    let rest = rest.to_vec();

    let work = move || async move { run_child(program, rest).await };
    let outcome = if args.client {
        logger.time_client_request(label, work).await
    } else {
        logger.time_request(label, work).await
    };

    match outcome {
        Ok(_) => 0,
        Err(failure) => failure.exit_code(),
    }
}

async fn run_child(program: String, args: Vec<String>) -> Result<Value, ProcessFailure> {
    let status = Command::new(&program)
        .args(&args)
        .status()
        .await
        .map_err(|source| ProcessFailure::Spawn {
            program: program.clone(),
            source,
        })?;

    if status.success() {
        Ok(json!({ "status": 0 }))
    } else {
        Err(ProcessFailure::Exit {
            program,
            code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Level, LoggerConfig, LoggerOptions, OperationResult};
    use crate::infrastructure::logging::MemoryWriter;
    use std::sync::Arc;

    fn logger() -> (Logger, MemoryWriter) {
        let out = MemoryWriter::new();
        let logger = Logger::builder(LoggerConfig::resolve(
            &LoggerOptions::default().with_level("trace"),
            None,
        ))
        .console(Arc::new(out.clone()), Arc::new(out.clone()))
        .build()
        .unwrap();
        (logger, out)
    }

    #[test]
    fn test_exit_codes() {
        let spawn = ProcessFailure::Spawn {
            program: "x".to_string(),
            source: std::io::Error::other("missing"),
        };
        assert_eq!(spawn.exit_code(), 127);
        let exit = ProcessFailure::Exit {
            program: "x".to_string(),
            code: Some(3),
        };
        assert_eq!(exit.exit_code(), 3);
        assert_eq!(exit.to_string(), "x exited with status 3");
    }

    #[tokio::test]
    async fn test_missing_program_logs_error() {
        let (logger, out) = logger();
        let code = execute(
            RunArgs {
                label: Some("ghost".to_string()),
                client: true,
                command: vec!["levelog-test-no-such-program".to_string()],
            },
            &logger,
        )
        .await;

        assert_eq!(code, 127);
        let records = out.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::ClientRequest);
        assert_eq!(records[0].detail["message"], "ghost");
        assert_eq!(records[1].level, Level::Error);
        assert!(matches!(records[1].result, Some(OperationResult::Failure { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_child() {
        let (logger, out) = logger();
        let code = execute(
            RunArgs {
                label: None,
                client: false,
                command: vec!["true".to_string()],
            },
            &logger,
        )
        .await;

        assert_eq!(code, 0);
        let records = out.records();
        assert_eq!(records[0].level, Level::Request);
        assert_eq!(records[0].detail["message"], "true");
        assert_eq!(records[1].level, Level::Response);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_child_propagates_status() {
        let (logger, _out) = logger();
        let code = execute(
            RunArgs {
                label: None,
                client: false,
                command: vec!["sh".to_string(), "-c".to_string(), "exit 4".to_string()],
            },
            &logger,
        )
        .await;
        assert_eq!(code, 4);
    }
}
