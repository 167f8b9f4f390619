//! Task poller
//!
//! Drives one remote job at a time through start, polling with backoff, and
//! classification of every poll result. Each run gets its own run context
//! holding the cancellation and activity flags, so a reset or a new run never
//! sees flags left behind by an earlier one.

use relay_core::domain::status::PollerStatus;
use relay_core::dto::task::PollResult;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Notify, watch};
use tracing::{debug, info, warn};

use crate::backoff::Backoff;
use crate::config::PollerConfig;
use crate::error::{RunFailure, TaskError};
use crate::request::TaskRequest;
use crate::sleeper::{Sleeper, TokioSleeper};

/// Observable state of a poller
#[derive(Debug, Clone)]
pub struct PollerSnapshot<T> {
    pub status: PollerStatus,
    pub result: Option<T>,
    pub error: Option<RunFailure>,
    /// Poll calls made by the current run
    pub attempts: u32,
    /// Most recent raw poll result of the current run
    pub last_poll: Option<PollResult>,
}

impl<T> Default for PollerSnapshot<T> {
    fn default() -> Self {
        Self {
            status: PollerStatus::Idle,
            result: None,
            error: None,
            attempts: 0,
            last_poll: None,
        }
    }
}

/// Flags of a single run
#[derive(Debug)]
struct RunContext {
    cancelled: AtomicBool,
    active: AtomicBool,
    wake: Notify,
}

impl RunContext {
    fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            active: AtomicBool::new(true),
            wake: Notify::new(),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Cancels and detaches the run; it will not touch poller state again
    fn abandon(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.cancel();
    }
}

struct Inner<T> {
    config: PollerConfig,
    sleeper: Arc<dyn Sleeper>,
    snapshot: watch::Sender<PollerSnapshot<T>>,
    current: Mutex<Option<Arc<RunContext>>>,
}

/// Runs remote jobs to completion by polling them
///
/// A poller runs at most one task at a time. Clones share the same state, so
/// one clone can [`cancel`](TaskPoller::cancel) or observe a run another clone
/// is awaiting.
pub struct TaskPoller<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for TaskPoller<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> TaskPoller<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates a poller with the default configuration and the tokio timer
    pub fn new() -> Self {
        Self::with_config(PollerConfig::default())
    }

    pub fn with_config(config: PollerConfig) -> Self {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    /// Creates a poller waiting between attempts through `sleeper`
    pub fn with_sleeper(config: PollerConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        let (snapshot, _) = watch::channel(PollerSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                config,
                sleeper,
                snapshot,
                current: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }

    /// Runs a task until it succeeds, fails, times out or is cancelled
    ///
    /// The outcome is returned and also mirrored into the poller's state. Fails
    /// with [`TaskError::AlreadyRunning`] while another run is in flight, without
    /// touching that run. Dropping the returned future cancels the run.
    pub async fn run_task(&self, request: TaskRequest<T>) -> Result<T, TaskError> {
        let run = self.inner.begin()?;
        let mut guard = RunGuard {
            inner: self.inner.as_ref(),
            run: Arc::clone(&run),
            settled: false,
        };

        let outcome = self.inner.drive(&run, request).await;

        match &outcome {
            Ok(_) => info!("Task finished successfully"),
            Err(e) if run.is_active() => warn!("Task failed: {}", e),
            Err(e) => debug!("Detached task ended: {}", e),
        }

        guard.settle(&outcome);
        outcome
    }

    /// Requests cancellation of the in-flight run
    ///
    /// A pending wait ends at once. A poll already in flight completes, but
    /// its outcome is discarded and the run fails with
    /// [`TaskError::Cancelled`]. Does nothing when no run is active.
    pub fn cancel(&self) {
        if let Some(run) = lock(&self.inner.current).as_ref().filter(|r| r.is_active()) {
            info!("Cancellation requested");
            run.cancel();
        }
    }

    /// Returns the poller to `Idle`, clearing result and error
    ///
    /// An in-flight run is detached: it stops at its next checkpoint and never
    /// writes to the poller's state again.
    pub fn reset(&self) {
        let mut current = lock(&self.inner.current);
        if let Some(run) = current.take() {
            run.abandon();
        }
        self.inner.snapshot.send_replace(PollerSnapshot::default());
        debug!("Poller reset");
    }

    /// Tears the poller down for its owner
    ///
    /// The in-flight run is cancelled and detached, a pending wait between
    /// attempts is cut short, and no callback fires afterwards. State is left
    /// as it was.
    pub fn dispose(&self) {
        if let Some(run) = lock(&self.inner.current).take() {
            debug!("Disposing poller with an in-flight run");
            run.abandon();
        }
    }

    pub fn status(&self) -> PollerStatus {
        self.inner.snapshot.borrow().status
    }

    pub fn result(&self) -> Option<T> {
        self.inner.snapshot.borrow().result.clone()
    }

    pub fn error(&self) -> Option<RunFailure> {
        self.inner.snapshot.borrow().error.clone()
    }

    pub fn attempts(&self) -> u32 {
        self.inner.snapshot.borrow().attempts
    }

    /// Returns true while a run is in flight
    pub fn is_active(&self) -> bool {
        lock(&self.inner.current)
            .as_ref()
            .is_some_and(|run| run.is_active())
    }

    /// Copy of the whole observable state
    pub fn snapshot(&self) -> PollerSnapshot<T> {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PollerSnapshot<T>> {
        self.inner.snapshot.subscribe()
    }
}

impl<T> Default for TaskPoller<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Inner<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Installs a fresh run context and moves to `Processing`
    fn begin(&self) -> Result<Arc<RunContext>, TaskError> {
        let mut current = lock(&self.current);
        if current.as_ref().is_some_and(|run| run.is_active()) {
            return Err(TaskError::AlreadyRunning);
        }

        let run = Arc::new(RunContext::new());
        *current = Some(Arc::clone(&run));
        self.snapshot.send_replace(PollerSnapshot {
            status: PollerStatus::Processing,
            ..Default::default()
        });
        Ok(run)
    }

    async fn drive(&self, run: &RunContext, request: TaskRequest<T>) -> Result<T, TaskError> {
        let TaskRequest {
            start,
            poll,
            extract,
            is_success,
            is_failure,
            mut on_status,
        } = request;

        let mut start = start
            .ok_or_else(|| TaskError::Configuration("start callback is required".to_string()))?;
        let mut poll = poll
            .ok_or_else(|| TaskError::Configuration("poll callback is required".to_string()))?;

        let response = start().await.map_err(TaskError::Start)?;
        let handle = response.handle().ok_or(TaskError::MissingTaskId)?;
        info!(task_id = %handle, "Task started");

        let config = &self.config;
        let mut backoff = Backoff::from_config(config);

        for attempt in 0..config.max_attempts {
            if run.is_cancelled() {
                return Err(TaskError::Cancelled);
            }

            let result = poll(handle.clone()).await.map_err(TaskError::Poll)?;

            if !run.is_active() {
                return Err(TaskError::Cancelled);
            }

            debug!(
                task_id = %handle,
                attempt = attempt + 1,
                state = result.token().unwrap_or("<none>"),
                "Polled task"
            );

            self.record(run, |s| {
                s.attempts = attempt + 1;
                s.last_poll = Some(result.clone());
            });

            if let Some(on_status) = on_status.as_mut() {
                on_status(&result).map_err(TaskError::Status)?;
            }

            // A cancel that landed while the poll was in flight wins over its outcome
            if run.is_cancelled() {
                return Err(TaskError::Cancelled);
            }

            let succeeded = match &is_success {
                Some(predicate) => predicate(&result),
                None => config.is_success_state(result.token()) && result.has_payload(),
            };
            let failed = match &is_failure {
                Some(predicate) => predicate(&result),
                None => config.is_failure_state(result.token()),
            };

            if succeeded {
                return match &extract {
                    Some(extract) => Ok(extract(&result)),
                    None => decode_payload(&result),
                };
            }

            if failed {
                return Err(TaskError::Remote {
                    message: result.error_detail(),
                });
            }

            if attempt + 1 < config.max_attempts {
                let delay = backoff.advance();
                debug!(task_id = %handle, ?delay, "Waiting before next poll");
                tokio::select! {
                    _ = self.sleeper.sleep(delay) => {}
                    _ = run.wake.notified() => {}
                }

                if !run.is_active() {
                    return Err(TaskError::Cancelled);
                }
            }
        }

        Err(TaskError::TimedOut {
            attempts: config.max_attempts,
        })
    }

    /// Applies `update` to the state if `run` is still the attached run
    fn record(&self, run: &RunContext, update: impl FnOnce(&mut PollerSnapshot<T>)) {
        let current = lock(&self.current);
        if is_attached(&current, run) {
            self.snapshot.send_modify(update);
        }
    }
}

/// Settles the run when `run_task` returns or its future is dropped
struct RunGuard<'a, T> {
    inner: &'a Inner<T>,
    run: Arc<RunContext>,
    settled: bool,
}

impl<T: Clone> RunGuard<'_, T> {
    fn settle(&mut self, outcome: &Result<T, TaskError>) {
        self.settled = true;
        let current = lock(&self.inner.current);
        let attached = is_attached(&current, &self.run);
        self.run.active.store(false, Ordering::SeqCst);

        if !attached {
            return;
        }

        self.inner.snapshot.send_modify(|s| match outcome {
            Ok(value) => {
                s.status = PollerStatus::Success;
                s.result = Some(value.clone());
            }
            Err(e) => {
                s.status = PollerStatus::Failure;
                s.error = Some(RunFailure::from(e));
            }
        });
    }
}

impl<T> Drop for RunGuard<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let current = lock(&self.inner.current);
        let attached = is_attached(&current, &self.run);
        self.run.abandon();

        if attached {
            debug!("Task future dropped while in flight");
            self.inner.snapshot.send_modify(|s| {
                s.status = PollerStatus::Failure;
                s.error = Some(RunFailure::from(&TaskError::Cancelled));
            });
        }
    }
}

fn is_attached(current: &Option<Arc<RunContext>>, run: &RunContext) -> bool {
    run.is_active() && current.as_ref().is_some_and(|c| std::ptr::eq(Arc::as_ptr(c), run))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn decode_payload<T: DeserializeOwned>(result: &PollResult) -> Result<T, TaskError> {
    let payload = result.result.clone().unwrap_or(Value::Null);
    Ok(serde_json::from_value(payload)?)
}
