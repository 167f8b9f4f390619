//! Relay CLI
//!
//! Command-line interface for running media tool jobs against the media API
//! and waiting for their results.

mod commands;
mod config;
mod params;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use relay_poller::PollerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Run media tool jobs and wait for their results", long_about = None)]
struct Cli {
    /// Media API URL
    #[arg(long, env = "RELAY_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries job output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_cli=info,relay_poller=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        poller: PollerConfig::from_env(),
    };

    handle_command(cli.command, &config).await
}
