//! Levelog CLI entry point.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use levelog::cli::{commands, Cli, Commands};
use levelog::Logger;

#[tokio::main]
async fn main() {
    // Diagnostics about the logger itself; records go through the sink
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let logger = match Logger::from_env(&cli.logger.to_options()).context("failed to configure logger") {
        Ok(logger) => logger,
        Err(err) => levelog::cli::handle_error(err),
    };

    let code = match cli.command {
        Commands::Emit(args) => {
            commands::emit::execute(args, &logger);
            0
        }
        Commands::Run(args) => commands::run::execute(args, &logger).await,
    };

    std::process::exit(code);
}
