//! Per-task records and the pull-mode error polling state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::oneshot;

use crate::error::{CoordinationError, Result};
use crate::device::DeviceInfo;
use crate::task::CoordinatedTask;

/// Connection state of one task.
///
/// State transition:
///
/// ```text
///                Register           Heartbeat
///   DISCONNECTED -------> CONNECTED --------> ERROR (timeout)
///                              |   ReportError
///                              +--------------> ERROR
/// ```
///
/// When a task becomes `Error`, its status is propagated to the other
/// connected tasks in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Disconnected,
    Connected,
    Error,
}

/// Record kept for every declared task, created at service start.
pub struct TaskState {
    status: TaskStatus,
    error: Option<CoordinationError>,
    incarnation: u64,
    /// Monotonic micros of the last accepted heartbeat. Atomic so the
    /// staleness sweep can sample liveness without extra locking.
    last_heartbeat_us: AtomicU64,
    /// Heartbeats and error polls from a disconnected task are still accepted
    /// until this instant, covering the lag until the agent notices the
    /// disconnect.
    disconnect_grace_deadline_us: u64,
    device_info: DeviceInfo,
    ongoing_barriers: HashSet<String>,
}

impl TaskState {
    pub fn new() -> Self {
        Self {
            status: TaskStatus::Disconnected,
            error: None,
            incarnation: 0,
            last_heartbeat_us: AtomicU64::new(0),
            disconnect_grace_deadline_us: 0,
            device_info: DeviceInfo::default(),
            ongoing_barriers: HashSet::new(),
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn error(&self) -> Option<&CoordinationError> {
        self.error.as_ref()
    }

    pub fn incarnation(&self) -> u64 {
        self.incarnation
    }

    pub fn set_connected(&mut self, incarnation: u64, now_us: u64) {
        self.status = TaskStatus::Connected;
        self.error = None;
        self.incarnation = incarnation;
        self.last_heartbeat_us.store(now_us, Ordering::Relaxed);
    }

    pub fn disconnect(&mut self, grace_period_us: u64, now_us: u64) {
        self.disconnect_grace_deadline_us = now_us + grace_period_us;
        self.status = TaskStatus::Disconnected;
        self.error = None;
    }

    pub fn set_error(&mut self, error: CoordinationError) {
        if self.status == TaskStatus::Error {
            return;
        }
        self.status = TaskStatus::Error;
        self.error = Some(error);
    }

    /// Accepts a heartbeat, refreshing the liveness timestamp. A pending
    /// error is returned verbatim; an incarnation mismatch is an abort.
    pub fn record_heartbeat(&self, incarnation: u64, now_us: u64) -> Result<()> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if incarnation != self.incarnation {
            return Err(CoordinationError::aborted(format!(
                "incarnation mismatch: expecting {} but got {}. The remote task has likely \
                 restarted.",
                self.incarnation, incarnation
            )));
        }
        self.last_heartbeat_us.store(now_us, Ordering::Relaxed);
        Ok(())
    }

    pub fn time_since_last_heartbeat_ms(&self, now_us: u64) -> u64 {
        now_us.saturating_sub(self.last_heartbeat_us.load(Ordering::Relaxed)) / 1_000
    }

    pub fn is_disconnected_beyond_grace(&self, now_us: u64) -> bool {
        self.status == TaskStatus::Disconnected && now_us > self.disconnect_grace_deadline_us
    }

    pub fn join_barrier(&mut self, barrier_id: &str) {
        self.ongoing_barriers.insert(barrier_id.to_string());
    }

    pub fn exit_barrier(&mut self, barrier_id: &str) {
        self.ongoing_barriers.remove(barrier_id);
    }

    pub fn ongoing_barriers(&self) -> &HashSet<String> {
        &self.ongoing_barriers
    }

    pub fn collect_device_info(&mut self, devices: DeviceInfo) {
        self.device_info = devices;
    }

    /// Whether the task has contributed device info (i.e. has already called
    /// the wait-for-all-tasks operation).
    pub fn device_info_collected(&self) -> bool {
        !self.device_info.is_empty()
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }
}

impl Default for TaskState {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull-mode delivery state. The first error wins: it is handed to every
/// queued poller and latched for all future polls.
#[derive(Default)]
pub struct ErrorPollingState {
    responded: bool,
    error: Option<CoordinationError>,
    waiters: Vec<oneshot::Sender<CoordinationError>>,
    polling_task_names: HashSet<String>,
}

impl ErrorPollingState {
    pub fn responded(&self) -> bool {
        self.responded
    }

    /// The latched error; meaningful only once `responded` is true.
    pub fn error(&self) -> Option<&CoordinationError> {
        self.error.as_ref()
    }

    pub fn is_task_polling(&self, task_name: &str) -> bool {
        self.polling_task_names.contains(task_name)
    }

    /// Registers a poller. No-op once a response has been latched.
    pub fn add_task(&mut self, task: &CoordinatedTask, waiter: oneshot::Sender<CoordinationError>) {
        if self.responded {
            return;
        }
        self.polling_task_names.insert(task.to_string());
        self.waiters.push(waiter);
    }

    /// Latches the error and returns the queued waiters to fire. Idempotent:
    /// later calls return no waiters.
    #[must_use]
    pub fn set_error(&mut self, error: CoordinationError) -> Vec<oneshot::Sender<CoordinationError>> {
        if self.responded {
            return Vec::new();
        }
        self.responded = true;
        self.error = Some(error);
        std::mem::take(&mut self.waiters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_with_pending_error_returns_it_verbatim() {
        let mut state = TaskState::new();
        state.set_connected(7, 0);
        state.set_error(CoordinationError::unavailable("down"));

        let err = state.record_heartbeat(7, 100).unwrap_err();
        assert_eq!(err, CoordinationError::unavailable("down"));
    }

    #[test]
    fn heartbeat_incarnation_mismatch_is_aborted() {
        let mut state = TaskState::new();
        state.set_connected(7, 0);
        let err = state.record_heartbeat(8, 100).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::Aborted);
        // The stale liveness timestamp must not have been refreshed.
        assert_eq!(state.time_since_last_heartbeat_ms(5_000), 5);
    }

    #[test]
    fn set_error_keeps_first_error() {
        let mut state = TaskState::new();
        state.set_connected(7, 0);
        state.set_error(CoordinationError::unavailable("first"));
        state.set_error(CoordinationError::internal("second"));
        assert_eq!(state.error().unwrap().message(), "first");
    }

    #[test]
    fn disconnect_grace_period_expires() {
        let mut state = TaskState::new();
        state.set_connected(7, 0);
        state.disconnect(10_000_000, 1_000_000);
        assert!(!state.is_disconnected_beyond_grace(11_000_000));
        assert!(state.is_disconnected_beyond_grace(11_000_001));
    }

    #[test]
    fn error_polling_first_error_wins() {
        let mut polling = ErrorPollingState::default();
        let (tx, mut rx) = oneshot::channel();
        polling.add_task(&CoordinatedTask::new("worker", 0), tx);
        assert!(polling.is_task_polling("/job:worker/replica:0/task:0"));

        let waiters = polling.set_error(CoordinationError::unavailable("first"));
        assert_eq!(waiters.len(), 1);
        assert!(polling.responded());

        let waiters = polling.set_error(CoordinationError::unavailable("second"));
        assert!(waiters.is_empty());
        assert_eq!(polling.error().unwrap().message(), "first");

        // Registration after the response is a no-op.
        let (tx, _rx2) = oneshot::channel();
        polling.add_task(&CoordinatedTask::new("worker", 1), tx);
        assert!(!polling.is_task_polling("/job:worker/replica:0/task:1"));
        assert!(rx.try_recv().is_err());
    }
}
