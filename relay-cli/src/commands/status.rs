//! Status command handler

use anyhow::Result;
use colored::Colorize;
use relay_client::MediaClient;
use relay_core::domain::handle::JobHandle;

use super::{colorize_token, print_json};
use crate::config::Config;

/// Fetch and display the status of a job
pub async fn handle_status_command(id: &str, config: &Config) -> Result<()> {
    let client = MediaClient::new(&config.api_url);
    let handle = parse_handle(id);

    let poll = match client.job_status(&handle).await {
        Ok(poll) => poll,
        Err(e) if e.is_not_found() => {
            println!("{}", format!("Job {} not found", handle).yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", "Job Status:".bold());
    println!("  ID:     {}", handle.to_string().cyan());
    println!("  State:  {}", colorize_token(poll.token(), &config.poller));

    if let Some(result) = &poll.result {
        println!("\n{}", "Result:".bold());
        print_json(result);
    }

    if poll.error.is_some() {
        println!("\n{}", "Error:".bold());
        println!("{}", poll.error_detail().red());
    }

    Ok(())
}

/// Numeric IDs are sent as numbers, everything else as text
fn parse_handle(id: &str) -> JobHandle {
    id.parse::<serde_json::Number>()
        .map(JobHandle::from)
        .unwrap_or_else(|_| JobHandle::from(id))
}
