//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod run;
mod status;

pub use run::RunArgs;

use anyhow::Result;
use clap::Subcommand;
use colored::{ColoredString, Colorize};
use relay_poller::PollerConfig;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start a tool job and wait for its result
    Run(RunArgs),
    /// Fetch the current status of a job once
    Status {
        /// Job ID returned by the start endpoint
        id: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run(args) => run::handle_run_command(args, config).await,
        Commands::Status { id } => status::handle_status_command(&id, config).await,
    }
}

/// Colorize a remote status token for display
fn colorize_token(token: Option<&str>, config: &PollerConfig) -> ColoredString {
    let text = token.unwrap_or("UNKNOWN");
    if config.is_success_state(token) {
        text.green()
    } else if config.is_failure_state(token) {
        text.red()
    } else {
        text.yellow()
    }
}

/// Print a JSON value, pretty when possible
fn print_json(value: &serde_json::Value) {
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        println!("{}", pretty);
    } else {
        println!("{:?}", value);
    }
}
