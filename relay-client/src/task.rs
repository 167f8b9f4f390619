//! Glue between the client and the task poller

use relay_core::domain::tool::Tool;
use relay_poller::TaskRequest;
use serde_json::Value;

use crate::MediaClient;

impl MediaClient {
    /// Build a task request that starts `tool` with `params` and polls the
    /// shared status endpoint
    ///
    /// Hooks such as `on_status` or `extract` can be chained on the returned
    /// request.
    pub fn task_request<T>(&self, tool: Tool, params: Value) -> TaskRequest<T> {
        let starter = self.clone();
        let poller = self.clone();

        TaskRequest::new()
            .start(move || {
                let client = starter.clone();
                let params = params.clone();
                async move { Ok::<_, anyhow::Error>(client.start_job(tool, &params).await?) }
            })
            .poll(move |handle| {
                let client = poller.clone();
                async move { Ok::<_, anyhow::Error>(client.job_status(&handle).await?) }
            })
    }
}
