//! Relay Task Poller
//!
//! Generic orchestration of "start a remote job, then poll it until it is done".
//!
//! A [`TaskPoller`] runs one [`TaskRequest`] at a time: it calls the request's
//! start callback, then polls the returned job handle with linear backoff until
//! the job reports success or failure, the attempt budget runs out, or the run is
//! cancelled. The poller's own state (status, result, error) is observable while
//! the run is in flight, which is what UI-style consumers render from.
//!
//! Architecture:
//! - Configuration: attempt budget, delays and status tokens ([`PollerConfig`])
//! - Backoff: the inter-attempt delay schedule ([`Backoff`])
//! - Sleeper: injectable timer so tests never wait on real time ([`Sleeper`])
//! - Request: the caller's callbacks ([`TaskRequest`])
//! - Poller: the state machine itself ([`TaskPoller`])
//!
//! # Example
//!
//! ```no_run
//! use relay_core::domain::handle::JobHandle;
//! use relay_core::dto::task::{PollResult, StartResponse};
//! use relay_poller::{TaskPoller, TaskRequest};
//!
//! # async fn example() -> Result<(), relay_poller::TaskError> {
//! let poller: TaskPoller<u64> = TaskPoller::new();
//!
//! let request = TaskRequest::new()
//!     .start(|| async { Ok(StartResponse::from(JobHandle::from("job-1"))) })
//!     .poll(|_handle| async { Ok(PollResult::with_state("SUCCESS").and_result(42)) });
//!
//! let value = poller.run_task(request).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod config;
pub mod error;
pub mod poller;
pub mod request;
pub mod sleeper;

pub use backoff::Backoff;
pub use config::PollerConfig;
pub use error::{ErrorKind, RunFailure, TaskError};
pub use poller::{PollerSnapshot, TaskPoller};
pub use request::TaskRequest;
pub use sleeper::{Sleeper, TokioSleeper};
