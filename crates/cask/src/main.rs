//! cask CLI entry point.

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cask::cli::{Cli, LogFormat};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    // Logs go to stderr so they never mix with command output
    let directive = if cli.debug { "cask=debug" } else { "cask=warn" };
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?));
    match cli.log_format {
        LogFormat::Text => subscriber
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    cli.execute().await
}
