//! Relay HTTP Client
//!
//! A small, typed client for the remote media API that performs the actual
//! GIF and video conversions.
//!
//! The API has two kinds of endpoints:
//! - one start endpoint per tool (`POST /api/{tool}`), returning a job handle
//! - a shared status endpoint (`GET /api/tasks/{id}`), returning a poll result
//!
//! [`MediaClient::task_request`] wires both into a [`relay_poller::TaskRequest`].
//!
//! # Example
//!
//! ```no_run
//! use relay_client::MediaClient;
//! use relay_core::domain::tool::Tool;
//! use relay_poller::TaskPoller;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = MediaClient::new("http://localhost:8000");
//!     let poller: TaskPoller<serde_json::Value> = TaskPoller::new();
//!
//!     let request = client.task_request(Tool::Resize, json!({ "width": 320 }));
//!     let output = poller.run_task(request).await?;
//!
//!     println!("Output: {}", output);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod task;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the media API
#[derive(Debug, Clone)]
pub struct MediaClient {
    /// Base URL of the media API (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl MediaClient {
    /// Create a new media API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the media API (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use relay_client::MediaClient;
    ///
    /// let client = MediaClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new media API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use relay_client::MediaClient;
    /// use reqwest::{Client, Url};
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = MediaClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the media API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL below the base URL
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// a segment never change the path or add a query.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
