//! Run command handler
//!
//! Starts a tool job, reports every status change and prints the result.
//! Ctrl-C cancels the run before its next poll.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use relay_client::MediaClient;
use relay_core::domain::tool::Tool;
use relay_poller::{PollerConfig, TaskPoller};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use super::{colorize_token, print_json};
use crate::config::Config;
use crate::params::build_params;

/// Arguments of `relay run`
#[derive(Args)]
pub struct RunArgs {
    /// Tool to run (gif-maker, video-to-gif, resize, crop, optimize, add-text)
    pub tool: Tool,

    /// Tool parameter as KEY=VALUE, repeatable; values are read as JSON when possible
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Tool parameters as a JSON object
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,

    /// Maximum number of status polls
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Delay after the first unfinished poll, in milliseconds
    #[arg(long)]
    pub initial_delay_ms: Option<u64>,

    /// Amount added to the delay after each poll, in milliseconds
    #[arg(long)]
    pub delay_increment_ms: Option<u64>,

    /// Upper bound of the delay, in milliseconds
    #[arg(long)]
    pub max_delay_ms: Option<u64>,
}

impl RunArgs {
    /// Apply flag overrides on top of the environment configuration
    fn poller_config(&self, base: &PollerConfig) -> PollerConfig {
        let mut config = base.clone();
        if let Some(n) = self.max_attempts {
            config = config.with_max_attempts(n);
        }
        if let Some(ms) = self.initial_delay_ms {
            config = config.with_initial_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = self.delay_increment_ms {
            config = config.with_delay_increment(Duration::from_millis(ms));
        }
        if let Some(ms) = self.max_delay_ms {
            config = config.with_max_delay(Duration::from_millis(ms));
        }
        config
    }
}

/// Start a job and wait for it
pub async fn handle_run_command(args: RunArgs, config: &Config) -> Result<()> {
    let params = build_params(args.json.as_deref(), &args.params)?;
    let poller_config = args.poller_config(&config.poller);
    poller_config.validate()?;

    let client = MediaClient::new(&config.api_url);
    let poller: TaskPoller<Value> = TaskPoller::with_config(poller_config.clone());

    println!("{}", format!("Starting {} job...", args.tool).bold());

    let mut attempt = 0u32;
    let request = client
        .task_request(args.tool, params)
        .on_status(move |poll| {
            attempt += 1;
            println!(
                "  {} {} {}",
                "▸".cyan(),
                colorize_token(poll.token(), &poller_config),
                format!("(poll {})", attempt).dimmed()
            );
            Ok(())
        });

    let canceller = poller.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling job");
            canceller.cancel();
        }
    });

    let outcome = poller.run_task(request).await;
    interrupt.abort();

    match outcome {
        Ok(output) => {
            println!("{}", "✓ Job finished".green().bold());
            print_json(&output);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗ Job failed:".red().bold(), e.kind());
            Err(e.into())
        }
    }
}
