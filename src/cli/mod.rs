//! Command-line interface for emitting records from scripts and timing
//! child processes.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::{AppInfo, LevelInput, LoggerOptions};

/// Top-level command line
#[derive(Parser, Debug)]
#[command(name = "levelog", version, about = "Leveled JSON logging from the command line")]
pub struct Cli {
    #[command(flatten)]
    pub logger: LoggerArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Logger options; anything left unset falls back to `LOG_*` variables
#[derive(Args, Debug, Default)]
pub struct LoggerArgs {
    /// Directory for the rolling log file
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Human-readable console output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Suppress console output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Minimum level (name or number)
    #[arg(long, short, global = true)]
    pub level: Option<String>,

    /// Application name (defaults to the nearest Cargo.toml)
    #[arg(long, global = true)]
    pub app_name: Option<String>,

    /// Application version
    #[arg(long, global = true)]
    pub app_version: Option<String>,

    /// Application build identifier
    #[arg(long, global = true)]
    pub app_build: Option<String>,
}

impl LoggerArgs {
    /// Explicit options; unset flags stay `None` so the environment applies
    pub fn to_options(&self) -> LoggerOptions {
        LoggerOptions {
            path: self.path.clone(),
            pretty: self.pretty.then_some(true),
            quiet: self.quiet.then_some(true),
            level: self.level.clone().map(LevelInput::Name),
            app: AppInfo {
                name: self.app_name.clone(),
                version: self.app_version.clone(),
                build: self.app_build.clone(),
            },
            ..LoggerOptions::default()
        }
    }
}

/// `levelog` subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit one record at the given level
    Emit(commands::emit::EmitArgs),

    /// Run a command between start and stop records
    Run(commands::run::RunArgs),
}

/// Print an error chain and exit with status 1
pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("Error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_emit_with_globals() {
        let cli = Cli::try_parse_from([
            "levelog", "emit", "warn", "disk at", "91", "--level", "info", "--quiet",
        ])
        .unwrap();

        assert!(cli.logger.quiet);
        assert_eq!(cli.logger.level.as_deref(), Some("info"));
        match cli.command {
            Commands::Emit(args) => {
                assert_eq!(args.level, "warn");
                assert_eq!(args.args, vec!["disk at", "91"]);
            }
            Commands::Run(_) => panic!("expected emit"),
        }
    }

    #[test]
    fn test_parse_run_with_trailing_command() {
        let cli = Cli::try_parse_from([
            "levelog", "--pretty", "run", "--label", "build", "--", "make", "-j4",
        ])
        .unwrap();

        assert!(cli.logger.pretty);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.label.as_deref(), Some("build"));
                assert_eq!(args.command, vec!["make", "-j4"]);
                assert!(!args.client);
            }
            Commands::Emit(_) => panic!("expected run"),
        }
    }

    #[test]
    fn test_unset_flags_leave_options_empty() {
        let options = LoggerArgs::default().to_options();
        assert_eq!(options, LoggerOptions::default());
    }
}
