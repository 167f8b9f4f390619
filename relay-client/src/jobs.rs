//! Job endpoints

use crate::MediaClient;
use crate::error::Result;
use relay_core::domain::handle::JobHandle;
use relay_core::domain::tool::Tool;
use relay_core::dto::task::{PollResult, StartResponse};
use serde_json::Value;
use tracing::debug;

impl MediaClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Start a job on one of the media tools
    ///
    /// # Arguments
    /// * `tool` - The tool to run
    /// * `params` - Tool parameters, sent as the JSON body
    ///
    /// # Returns
    /// The start response, carrying the job handle
    pub async fn start_job(&self, tool: Tool, params: &Value) -> Result<StartResponse> {
        let url = self.endpoint(["api", tool.path_segment()])?;
        debug!("Starting {} job", tool);
        let response = self.client.post(url).json(params).send().await?;

        self.handle_response(response).await
    }

    /// Fetch the current status of a job
    ///
    /// # Arguments
    /// * `handle` - The job handle returned by [`MediaClient::start_job`]
    ///
    /// # Returns
    /// The latest poll result
    pub async fn job_status(&self, handle: &JobHandle) -> Result<PollResult> {
        let id = handle.to_string();
        let url = self.endpoint(["api", "tasks", id.as_str()])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
