mod cli;
mod config;
mod error;
mod export;
mod extract;
mod pipeline;
mod server;
mod source;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing - only show warnings by default, use RUST_LOG=info for more detail
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Convert {
            path,
            output,
            format,
        } => {
            cli::commands::convert::run(config_path, path, output, format)?;
        }
        Commands::Inspect { path } => {
            cli::commands::inspect::run(config_path, path)?;
        }
        Commands::Serve { port } => {
            cli::commands::serve::run(config_path, port).await?;
        }
        Commands::Init { force } => {
            cli::commands::init::run(config_path, force)?;
        }
    }

    Ok(())
}
