//! Task request
//!
//! The caller side of a run: how to start the remote job, how to poll it, and
//! optional hooks that override classification, result extraction and progress
//! reporting.

use relay_core::domain::handle::JobHandle;
use relay_core::dto::task::{PollResult, StartResponse};
use std::future::Future;
use std::pin::Pin;

/// Boxed, sendable future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub(crate) type StartFn = Box<dyn FnMut() -> BoxFuture<'static, anyhow::Result<StartResponse>> + Send>;
pub(crate) type PollFn =
    Box<dyn FnMut(JobHandle) -> BoxFuture<'static, anyhow::Result<PollResult>> + Send>;
pub(crate) type ExtractFn<T> = Box<dyn Fn(&PollResult) -> T + Send>;
pub(crate) type Predicate = Box<dyn Fn(&PollResult) -> bool + Send>;
pub(crate) type StatusFn = Box<dyn FnMut(&PollResult) -> anyhow::Result<()> + Send>;

/// Callbacks describing one remote job
///
/// `start` and `poll` are required; a request missing either fails with a
/// configuration error before anything is called.
///
/// # Example
/// ```
/// use relay_core::domain::handle::JobHandle;
/// use relay_core::dto::task::{PollResult, StartResponse};
/// use relay_poller::TaskRequest;
///
/// let request: TaskRequest<String> = TaskRequest::new()
///     .start(|| async { Ok(StartResponse::from(JobHandle::from(7))) })
///     .poll(|handle| async move {
///         Ok(PollResult::with_state("SUCCESS").and_result(format!("/out/{}.gif", handle)))
///     })
///     .on_status(|poll| {
///         println!("status: {:?}", poll.token());
///         Ok(())
///     });
/// assert!(request.is_complete());
/// ```
pub struct TaskRequest<T> {
    pub(crate) start: Option<StartFn>,
    pub(crate) poll: Option<PollFn>,
    pub(crate) extract: Option<ExtractFn<T>>,
    pub(crate) is_success: Option<Predicate>,
    pub(crate) is_failure: Option<Predicate>,
    pub(crate) on_status: Option<StatusFn>,
}

impl<T> TaskRequest<T> {
    /// Creates an empty request
    pub fn new() -> Self {
        Self {
            start: None,
            poll: None,
            extract: None,
            is_success: None,
            is_failure: None,
            on_status: None,
        }
    }

    /// Sets the call that starts the remote job
    pub fn start<F, Fut>(mut self, mut start: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<StartResponse>> + Send + 'static,
    {
        self.start = Some(Box::new(
            move || -> BoxFuture<'static, anyhow::Result<StartResponse>> { Box::pin(start()) },
        ));
        self
    }

    /// Sets the call that fetches the latest status of a job
    pub fn poll<F, Fut>(mut self, mut poll: F) -> Self
    where
        F: FnMut(JobHandle) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<PollResult>> + Send + 'static,
    {
        self.poll = Some(Box::new(
            move |handle| -> BoxFuture<'static, anyhow::Result<PollResult>> {
                Box::pin(poll(handle))
            },
        ));
        self
    }

    /// Maps the successful poll to the run's result
    ///
    /// Without it the `result` payload is deserialized into `T`.
    pub fn extract<F>(mut self, extract: F) -> Self
    where
        F: Fn(&PollResult) -> T + Send + 'static,
    {
        self.extract = Some(Box::new(extract));
        self
    }

    /// Replaces the default success rule
    pub fn success_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PollResult) -> bool + Send + 'static,
    {
        self.is_success = Some(Box::new(predicate));
        self
    }

    /// Replaces the default failure rule
    pub fn failure_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PollResult) -> bool + Send + 'static,
    {
        self.is_failure = Some(Box::new(predicate));
        self
    }

    /// Called with every raw poll result; an error ends the run
    pub fn on_status<F>(mut self, on_status: F) -> Self
    where
        F: FnMut(&PollResult) -> anyhow::Result<()> + Send + 'static,
    {
        self.on_status = Some(Box::new(on_status));
        self
    }

    /// Returns true when both `start` and `poll` are set
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.poll.is_some()
    }
}

impl<T> Default for TaskRequest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for TaskRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRequest")
            .field("start", &self.start.is_some())
            .field("poll", &self.poll.is_some())
            .field("extract", &self.extract.is_some())
            .field("is_success", &self.is_success.is_some())
            .field("is_failure", &self.is_failure.is_some())
            .field("on_status", &self.on_status.is_some())
            .finish()
    }
}
