//! The coordination service state machine.
//!
//! One instance tracks a fixed population of tasks declared in the service
//! configuration: their lifecycle and liveness, the barriers they rendezvous
//! on, cluster-wide error propagation, and a shared key-value store. Workers
//! reach it through a transport layer that maps requests onto the async
//! methods of [`CoordinationService`].

pub mod barrier;
pub mod state;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::Weak;
use std::time::Duration;

use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use crate::client::{ClientDirectory, ReportErrorToTaskRequest};
use crate::config::ServiceConfig;
use crate::device::DeviceInfo;
use crate::error::{CoordinationError, ErrorCode, Result};
use crate::kv::{KeyValueEntry, KeyValueGet, KeyValueStore};
use crate::task::CoordinatedTask;

use self::barrier::{validate_task_args, BarrierState, BarrierWaiter};
use self::state::{ErrorPollingState, TaskState, TaskStatus};

/// Timeout of the reserved device-propagation barrier.
const DEVICE_PROPAGATION_TIMEOUT: Duration = Duration::from_secs(60 * 60);
/// Deadline applied to outbound error reports.
const SERVICE_TO_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
/// Period of the staleness sweep.
const STALENESS_SWEEP_PERIOD: Duration = Duration::from_secs(1);
/// Above this many simultaneously ongoing barriers a warning is logged.
const ONGOING_BARRIERS_SOFT_LIMIT: usize = 20;
/// At most this many pending task names are embedded in a barrier-timeout
/// message.
const PENDING_TASK_LOG_LIMIT: usize = 20;
/// At most this many stragglers are named when logging connect progress.
const PENDING_STRAGGLER_LOG_LIMIT: usize = 3;
/// Job name used as the source of service-originated error reports.
const SERVICE_JOB_NAME: &str = "coordination_service";

/// Host-installed hook applied to the aggregated cluster devices.
pub type DeviceAggregationFn = Box<dyn Fn(DeviceInfo) -> DeviceInfo + Send + Sync>;

/// Snapshot of one task's state as reported to clients.
#[derive(Debug, Clone)]
pub struct TaskStateInfo {
    pub task: CoordinatedTask,
    pub status: TaskStatus,
    pub error: Option<CoordinationError>,
}

/// Everything guarded by the main state lock.
struct ClusterState {
    shutting_down: bool,
    tasks: BTreeMap<CoordinatedTask, TaskState>,
    barriers: HashMap<String, BarrierState>,
    ongoing_barriers: HashSet<String>,
    cluster_devices: DeviceInfo,
    error_polling: ErrorPollingState,
    post_aggregate_fn: Option<DeviceAggregationFn>,
}

/// Completions collected while the state lock is held and dispatched after it
/// is released, so no waiter is released and no outbound report is issued
/// under the lock.
#[derive(Default)]
struct Completions {
    barrier_waiters: Vec<(BarrierWaiter, Result<()>)>,
    service_errors: Vec<(CoordinatedTask, CoordinationError)>,
}

pub struct CoordinationService {
    heartbeat_timeout_ms: u64,
    shutdown_barrier_timeout: Duration,
    allow_new_incarnation_to_reconnect: bool,
    recoverable_jobs: HashSet<String>,
    service_incarnation: u64,
    device_propagation_barrier_id: String,
    shutdown_barrier_id: String,
    client_directory: Option<Arc<dyn ClientDirectory>>,
    epoch: Instant,
    state: Mutex<ClusterState>,
    kv: Mutex<KeyValueStore>,
    /// Latches to true on the first error poll and never resets.
    client_polling_for_error: AtomicBool,
    staleness_shutdown: watch::Sender<bool>,
    staleness_task: StdMutex<Option<JoinHandle<()>>>,
}

impl CoordinationService {
    /// Creates the service, pre-creating a record for every declared task,
    /// and starts the staleness checker. With a client directory the service
    /// runs in push mode; without one, tasks poll for errors.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: ServiceConfig,
        client_directory: Option<Arc<dyn ClientDirectory>>,
    ) -> Arc<Self> {
        let service_incarnation: u64 = rand::random();
        info!("initializing coordination service, incarnation {service_incarnation}");
        let mut tasks = BTreeMap::new();
        for job in &config.coordinated_jobs {
            for task_id in 0..job.num_tasks {
                tasks.insert(CoordinatedTask::new(&job.name, task_id), TaskState::new());
            }
        }
        let (staleness_shutdown, shutdown_rx) = watch::channel(false);
        let service = Arc::new(Self {
            heartbeat_timeout_ms: config.effective_heartbeat_timeout_ms(),
            shutdown_barrier_timeout: Duration::from_millis(config.shutdown_barrier_timeout_ms),
            allow_new_incarnation_to_reconnect: config.allow_new_incarnation_to_reconnect,
            recoverable_jobs: config.recoverable_jobs.iter().cloned().collect(),
            service_incarnation,
            device_propagation_barrier_id: format!("WaitForAllTasks::{service_incarnation}"),
            shutdown_barrier_id: format!("Shutdown::{service_incarnation}"),
            client_directory,
            epoch: Instant::now(),
            state: Mutex::new(ClusterState {
                shutting_down: false,
                tasks,
                barriers: HashMap::new(),
                ongoing_barriers: HashSet::new(),
                cluster_devices: DeviceInfo::default(),
                error_polling: ErrorPollingState::default(),
                post_aggregate_fn: None,
            }),
            kv: Mutex::new(KeyValueStore::default()),
            client_polling_for_error: AtomicBool::new(false),
            staleness_shutdown,
            staleness_task: StdMutex::new(None),
        });
        let staleness = tokio::spawn(Self::run_staleness_checks(
            Arc::downgrade(&service),
            shutdown_rx,
        ));
        *service
            .staleness_task
            .lock()
            .expect("staleness handle lock") = Some(staleness);
        service
    }

    pub fn service_incarnation(&self) -> u64 {
        self.service_incarnation
    }

    /// Installs a hook applied to the aggregate when device propagation
    /// completes.
    pub async fn set_device_aggregation_function(&self, post_aggregate_fn: DeviceAggregationFn) {
        self.state.lock().await.post_aggregate_fn = Some(post_aggregate_fn);
    }

    /// The aggregated cluster devices; empty until device propagation passes.
    pub async fn list_cluster_devices(&self) -> DeviceInfo {
        self.state.lock().await.cluster_devices.clone()
    }

    fn now_us(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }

    // ---- task lifecycle -------------------------------------------------

    /// Connects a task to the service under the given incarnation.
    pub async fn register_task(&self, task: &CoordinatedTask, incarnation: u64) -> Result<()> {
        let task_name = task.to_string();
        let register_error;
        let mut completions = Completions::default();
        {
            let mut state = self.state.lock().await;
            if state.shutting_down {
                return Err(CoordinationError::internal(format!(
                    "coordination service has stopped. RegisterTask from task {task_name} \
                     failed. This usually implies an earlier error that caused the coordination \
                     service to shut down before the workers disconnected gracefully. Check the \
                     task leader's logs for an earlier error to debug the root cause."
                )));
            }
            let now_us = self.now_us();
            let Some(record) = state.tasks.get_mut(task) else {
                // Unknown registrations are rejected without propagation.
                return Err(CoordinationError::invalid_argument(format!(
                    "unexpected task registered with task name {task_name}"
                )));
            };
            let may_connect = record.status() == TaskStatus::Disconnected
                || (self.allow_new_incarnation_to_reconnect
                    && record.error().is_some_and(|error| {
                        error.code() == ErrorCode::Unavailable && error.has_coordination_payload()
                    }));
            if may_connect {
                // First registration, a reset task, or a task that lost its
                // connection and is allowed to come back with a new
                // incarnation.
                record.set_connected(incarnation, now_us);
                info!("{task_name} has connected to coordination service, incarnation {incarnation}");
                log_connect_status_locked(&state);
                return Ok(());
            }
            if record.status() == TaskStatus::Connected {
                if record.incarnation() == incarnation {
                    // The agent retried after missing the first response; the
                    // refresh also restarts its heartbeat grace window.
                    record.set_connected(incarnation, now_us);
                    info!(
                        "{task_name} has connected to coordination service with the same \
                         incarnation again: {incarnation}"
                    );
                    log_connect_status_locked(&state);
                    return Ok(());
                }
                register_error = CoordinationError::aborted(format!(
                    "{task_name} unexpectedly tried to connect with a different incarnation. It \
                     has likely restarted."
                ))
                .with_source_task(task.clone());
            } else {
                register_error = CoordinationError::aborted(format!(
                    "{task_name} unexpectedly tried to connect while it is already in error. \
                     ResetTask must be called before a subsequent connect attempt."
                ))
                .with_source_task(task.clone());
            }
            error!("{register_error}");
            self.set_task_error_locked(&mut state, task, register_error.clone(), &mut completions);
        }
        self.dispatch(completions);
        self.propagate_error(task, false).await;
        Err(register_error)
    }

    /// Accepts a liveness heartbeat from a connected task.
    pub async fn record_heartbeat(&self, task: &CoordinatedTask, incarnation: u64) -> Result<()> {
        let task_name = task.to_string();
        let result = {
            let state = self.state.lock().await;
            if state.shutting_down {
                return Err(CoordinationError::internal(format!(
                    "coordination service has stopped. RecordHeartbeat from task {task_name} \
                     failed. This usually implies an earlier error that caused the coordination \
                     service to shut down before the workers disconnected gracefully. Check the \
                     task leader's logs for an earlier error to debug the root cause."
                )));
            }
            let Some(record) = state.tasks.get(task) else {
                return Err(CoordinationError::invalid_argument(format!(
                    "unexpected heartbeat request from task {task_name}. This usually implies a \
                     configuration error."
                )));
            };
            if let Some(pending_error) = record.error() {
                // A task with a pending error learns it here; this is not a
                // new failure and is not propagated again.
                return Err(pending_error.clone());
            }
            let now_us = self.now_us();
            if record.is_disconnected_beyond_grace(now_us) {
                return Err(CoordinationError::invalid_argument(format!(
                    "task {task_name} must be registered before sending heartbeat messages"
                )));
            }
            trace!("record heartbeat from task {task_name} at incarnation {incarnation}");
            record.record_heartbeat(incarnation, now_us)
        };
        match result {
            Ok(()) => Ok(()),
            Err(heartbeat_error) => {
                let heartbeat_error = heartbeat_error.with_source_task(task.clone());
                let mut completions = Completions::default();
                {
                    let mut state = self.state.lock().await;
                    self.set_task_error_locked(
                        &mut state,
                        task,
                        heartbeat_error.clone(),
                        &mut completions,
                    );
                }
                self.dispatch(completions);
                self.propagate_error(task, false).await;
                Err(heartbeat_error)
            }
        }
    }

    /// Moves a connected task to the error state with the task-supplied error
    /// and propagates it to the rest of the cluster.
    pub async fn report_task_error(
        &self,
        task: &CoordinatedTask,
        error: CoordinationError,
    ) -> Result<()> {
        let task_name = task.to_string();
        let mut completions = Completions::default();
        {
            let mut state = self.state.lock().await;
            if state.shutting_down {
                return Err(CoordinationError::internal(
                    "coordination service has stopped. ReportTaskError failed.",
                ));
            }
            let Some(record) = state.tasks.get(task) else {
                return Err(CoordinationError::invalid_argument(format!(
                    "unexpected request from task {task_name}"
                )));
            };
            if record.status() != TaskStatus::Connected {
                return Err(CoordinationError::failed_precondition(
                    "the task is not connected or already has an error",
                ));
            }
            let error = error.with_source_task(task.clone()).reported_by_task();
            self.set_task_error_locked(&mut state, task, error, &mut completions);
        }
        self.dispatch(completions);
        self.propagate_error(task, true).await;
        Ok(())
    }

    /// Disconnects a task so it may register again later. Fails every barrier
    /// the task was participating in.
    pub async fn reset_task(&self, task: &CoordinatedTask) -> Result<()> {
        let mut completions = Completions::default();
        let result = {
            let mut state = self.state.lock().await;
            self.disconnect_task_locked(&mut state, task, &mut completions)
        };
        self.dispatch(completions);
        result
    }

    /// Graceful shutdown of one task: either through the shutdown barrier
    /// (when configured with a timeout) or an individual disconnect.
    pub async fn shutdown_task(&self, task: &CoordinatedTask) -> Result<()> {
        debug!("task {task} invoked shutdown");
        if self.shutdown_barrier_timeout > Duration::ZERO {
            self.barrier(&self.shutdown_barrier_id, self.shutdown_barrier_timeout, task, &[])
                .await
        } else {
            let mut completions = Completions::default();
            let result = {
                let mut state = self.state.lock().await;
                if state.shutting_down {
                    Err(CoordinationError::internal(
                        "coordination service has stopped. ShutdownTask failed.",
                    ))
                } else {
                    self.disconnect_task_locked(&mut state, task, &mut completions)
                }
            };
            self.dispatch(completions);
            result
        }
    }

    /// Snapshots `(status, error)` for the given tasks.
    pub async fn task_states(&self, tasks: &[CoordinatedTask]) -> Vec<TaskStateInfo> {
        let state = self.state.lock().await;
        tasks
            .iter()
            .map(|task| {
                let (status, error) = match state.tasks.get(task) {
                    Some(record) => (record.status(), record.error().cloned()),
                    None => (
                        TaskStatus::Disconnected,
                        Some(CoordinationError::invalid_argument(format!(
                            "unexpected task: {task}"
                        ))),
                    ),
                };
                // Responses attribute the error to the queried task itself,
                // never as self-reported.
                let error = error.map(|error| {
                    CoordinationError::from_parts(error.code(), error.message())
                        .with_source_task(task.clone())
                });
                TaskStateInfo {
                    task: task.clone(),
                    status,
                    error,
                }
            })
            .collect()
    }

    /// Stores the task's device info on its first call, then joins the
    /// device-propagation barrier across the whole cluster.
    pub async fn wait_for_all_tasks(
        &self,
        task: &CoordinatedTask,
        devices: DeviceInfo,
    ) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            if state.shutting_down {
                return Err(CoordinationError::internal(
                    "coordination service has stopped. WaitForAllTasks failed.",
                ));
            }
            if let Some(record) = state.tasks.get_mut(task) {
                if !record.device_info_collected() {
                    record.collect_device_info(devices);
                }
            }
        }
        self.barrier(
            &self.device_propagation_barrier_id,
            DEVICE_PROPAGATION_TIMEOUT,
            task,
            &[],
        )
        .await
    }

    // ---- key-value store ------------------------------------------------

    pub async fn insert_key_value(
        &self,
        key: &str,
        value: &str,
        allow_overwrite: bool,
    ) -> Result<()> {
        debug!("InsertKeyValue {key}, allow_overwrite: {allow_overwrite}");
        self.kv.lock().await.insert(key, value, allow_overwrite)
    }

    /// Returns the value for `key`, waiting until a matching insert if the
    /// key is absent. Resolves with `Cancelled` if the service stops first.
    pub async fn get_key_value(&self, key: &str) -> Result<String> {
        debug!("GetKeyValue {key}");
        let get = self.kv.lock().await.get(key);
        match get {
            KeyValueGet::Ready(result) => result,
            KeyValueGet::Pending(waiter) => waiter.await.unwrap_or_else(|_| {
                Err(CoordinationError::cancelled(format!(
                    "coordination service is shutting down, cancelling GetKeyValue for key: {key}"
                )))
            }),
        }
    }

    pub async fn try_get_key_value(&self, key: &str) -> Result<String> {
        debug!("TryGetKeyValue {key}");
        self.kv.lock().await.try_get(key)
    }

    pub async fn get_key_value_dir(&self, directory_key: &str) -> Vec<KeyValueEntry> {
        debug!("GetKeyValueDir {directory_key}");
        self.kv.lock().await.dir(directory_key)
    }

    pub async fn delete_key_value(&self, key: &str) -> Result<()> {
        debug!("DeleteKeyValue {key}");
        self.kv.lock().await.delete(key);
        Ok(())
    }

    // ---- barriers -------------------------------------------------------

    /// Joins the named barrier and resolves when it passes, the deadline
    /// expires, it is cancelled, or a participant fails.
    pub async fn barrier(
        &self,
        barrier_id: &str,
        timeout: Duration,
        task: &CoordinatedTask,
        participating_tasks: &[CoordinatedTask],
    ) -> Result<()> {
        debug!("task {task} invoked barrier {barrier_id}");
        let mut completions = Completions::default();

        let among_participating =
            participating_tasks.is_empty() || participating_tasks.contains(task);
        if !among_participating {
            // Fail the barrier so tasks already waiting on it observe the
            // error; an already-passed barrier keeps its original result.
            let barrier_error = CoordinationError::invalid_argument(format!(
                "a non-participating task ({task}) called the barrier: {barrier_id}"
            ));
            {
                let mut state = self.state.lock().await;
                if state.shutting_down {
                    return Err(Self::stopped_barrier_error());
                }
                if !state.barriers.contains_key(barrier_id) {
                    state.barriers.insert(
                        barrier_id.to_string(),
                        BarrierState::new(task.clone(), HashMap::new(), 0),
                    );
                }
                if !state.barriers[barrier_id].passed {
                    self.pass_barrier_locked(
                        &mut state,
                        barrier_id,
                        Err(barrier_error.clone()),
                        &mut completions,
                    );
                }
            }
            self.dispatch(completions);
            return Err(barrier_error);
        }

        let waiter = {
            let mut state = self.state.lock().await;
            if state.shutting_down {
                return Err(Self::stopped_barrier_error());
            }
            if !state.barriers.contains_key(barrier_id) {
                if let Err(barrier_error) = self.create_barrier_locked(
                    &mut state,
                    barrier_id,
                    timeout,
                    task,
                    participating_tasks,
                    &mut completions,
                ) {
                    drop(state);
                    self.dispatch(completions);
                    return Err(barrier_error);
                }
            }

            let already_passed = {
                let barrier = &state.barriers[barrier_id];
                barrier.passed.then(|| barrier.result.clone())
            };
            if let Some(result) = already_passed {
                if barrier_id == self.shutdown_barrier_id {
                    // A late shutdown-barrier arrival is still disconnected;
                    // a failed disconnect supersedes the barrier result.
                    if let Err(disconnect_error) =
                        self.disconnect_task_locked(&mut state, task, &mut completions)
                    {
                        drop(state);
                        self.dispatch(completions);
                        return Err(disconnect_error);
                    }
                }
                drop(state);
                self.dispatch(completions);
                return result;
            }

            let cluster_size = state.tasks.len();
            let (tx, rx) = oneshot::channel();
            let barrier = state
                .barriers
                .get_mut(barrier_id)
                .expect("barrier record exists");
            barrier.waiters.push(tx);

            if !validate_task_args(participating_tasks, &barrier.tasks_at_barrier, cluster_size) {
                let barrier_error = CoordinationError::invalid_argument(format!(
                    "conflicting tasks specified for the same barrier: {barrier_id}"
                ));
                self.pass_barrier_locked(
                    &mut state,
                    barrier_id,
                    Err(barrier_error),
                    &mut completions,
                );
            } else {
                match barrier.tasks_at_barrier.get_mut(task) {
                    None => {
                        // A declared-cluster barrier called by a task outside
                        // the recorded participant set.
                        let barrier_error = CoordinationError::invalid_argument(format!(
                            "a non-participating task ({task}) called the barrier: {barrier_id}"
                        ));
                        self.pass_barrier_locked(
                            &mut state,
                            barrier_id,
                            Err(barrier_error),
                            &mut completions,
                        );
                    }
                    Some(at_barrier) if !*at_barrier => {
                        *at_barrier = true;
                        barrier.num_pending -= 1;
                        let num_pending = barrier.num_pending;
                        if num_pending == 0 {
                            self.pass_barrier_locked(
                                &mut state,
                                barrier_id,
                                Ok(()),
                                &mut completions,
                            );
                        }
                    }
                    // Repeated call from a task that already arrived.
                    Some(_) => {}
                }
            }
            rx
        };
        self.dispatch(completions);
        waiter
            .await
            .unwrap_or_else(|_| Err(CoordinationError::internal("coordination service has stopped")))
    }

    /// Cancels an un-passed barrier on behalf of `task`; every pending caller
    /// observes the cancellation.
    pub async fn cancel_barrier(&self, barrier_id: &str, task: &CoordinatedTask) -> Result<()> {
        let mut completions = Completions::default();
        {
            let mut state = self.state.lock().await;
            if state.shutting_down {
                return Err(CoordinationError::internal(
                    "coordination service has stopped. CancelBarrier failed.",
                ));
            }
            if !state.barriers.contains_key(barrier_id) {
                warn!("barrier {barrier_id} is cancelled before being created by task {task}");
                state.barriers.insert(
                    barrier_id.to_string(),
                    BarrierState::new(task.clone(), HashMap::new(), 0),
                );
            }
            let barrier = &state.barriers[barrier_id];
            if barrier.passed {
                let result_code = match &barrier.result {
                    Ok(()) => None,
                    Err(error) => Some(error.code()),
                };
                return Err(CoordinationError::failed_precondition(format!(
                    "barrier ({barrier_id}) has already been passed with status {result_code:?}"
                )));
            }
            let cancelled = CoordinationError::cancelled(format!(
                "barrier ({barrier_id}) is cancelled by task: {task}"
            ));
            self.pass_barrier_locked(&mut state, barrier_id, Err(cancelled), &mut completions);
        }
        self.dispatch(completions);
        debug!("barrier {barrier_id} is cancelled");
        Ok(())
    }

    // ---- error polling --------------------------------------------------

    /// Pull-mode error delivery: resolves with the first cluster error, or
    /// immediately with a rejection. Only valid without a client directory.
    pub async fn poll_for_error(&self, task: &CoordinatedTask) -> CoordinationError {
        let task_name = task.to_string();
        debug!("task {task_name} invoked PollForError");
        let waiter = {
            let mut state = self.state.lock().await;
            if state.shutting_down {
                return CoordinationError::internal(
                    "PollForError requested after coordination service has shut down.",
                );
            }
            if self.client_directory.is_some() {
                return CoordinationError::internal(
                    "should not use error polling from the service when there is a \
                     service-to-client connection.",
                );
            }
            self.client_polling_for_error.store(true, Ordering::Release);
            let Some(record) = state.tasks.get(task) else {
                return CoordinationError::invalid_argument(format!(
                    "unexpected task ({task_name}) that is not in the cluster polling for errors"
                ));
            };
            // Polls are accepted for a short grace period after a disconnect,
            // covering the lag until the agent stops its polling thread.
            if record.is_disconnected_beyond_grace(self.now_us()) {
                return CoordinationError::failed_precondition(format!(
                    "task ({task_name}) that has not been registered or has disconnected polling \
                     for errors"
                ));
            }
            if record.status() == TaskStatus::Error {
                let current = record
                    .error()
                    .map(|error| error.to_string())
                    .unwrap_or_default();
                return CoordinationError::failed_precondition(format!(
                    "task ({task_name}) that is already in error state polling for errors. \
                     Current error: {current}"
                ));
            }
            if state.error_polling.responded() {
                if let Some(error) = state.error_polling.error() {
                    return error.clone();
                }
            }
            let (tx, rx) = oneshot::channel();
            state.error_polling.add_task(task, tx);
            rx
        };
        waiter
            .await
            .unwrap_or_else(|_| CoordinationError::internal("coordination service has stopped"))
    }

    // ---- shutdown -------------------------------------------------------

    /// Stops the service: cancels pending key-value gets, fails every
    /// un-passed barrier, clears the task table, answers error polls with
    /// `Cancelled`, and joins the staleness checker.
    pub async fn stop(&self) {
        self.stop_internal(true).await;
    }

    async fn stop_internal(&self, join_staleness_task: bool) {
        self.kv.lock().await.cancel_pending();
        let mut completions = Completions::default();
        {
            let mut state = self.state.lock().await;
            state.shutting_down = true;
            let _ = self.staleness_shutdown.send(true);
            let unpassed: Vec<String> = state
                .barriers
                .iter()
                .filter(|(_, barrier)| !barrier.passed)
                .map(|(barrier_id, _)| barrier_id.clone())
                .collect();
            for barrier_id in unpassed {
                let barrier_error = CoordinationError::aborted(format!(
                    "barrier failed because service is shutting down. Barrier id: {barrier_id}"
                ));
                self.pass_barrier_locked(&mut state, &barrier_id, Err(barrier_error), &mut completions);
            }
            state.barriers.clear();
            // Task records must outlive the barrier clean-up above, which
            // still reads them while passing barriers.
            state.tasks.clear();
        }
        self.dispatch(completions);
        if self.client_polling_for_error.load(Ordering::Acquire) {
            self.send_error_polling_response(CoordinationError::cancelled(
                "coordination service is shutting down, cancelling PollForError",
            ))
            .await;
        }
        if join_staleness_task {
            let staleness = self
                .staleness_task
                .lock()
                .expect("staleness handle lock")
                .take();
            if let Some(staleness) = staleness {
                let _ = staleness.await;
            }
        }
    }

    // ---- internals ------------------------------------------------------

    fn stopped_barrier_error() -> CoordinationError {
        CoordinationError::internal(
            "barrier requested after coordination service has shut down.",
        )
    }

    fn dispatch(&self, completions: Completions) {
        for (waiter, result) in completions.barrier_waiters {
            let _ = waiter.send(result);
        }
        for (task, error) in completions.service_errors {
            self.report_service_error_to_task(task, error);
        }
    }

    /// Creates the record for a barrier referenced for the first time. On a
    /// validation failure the barrier is created already failed, so every
    /// later caller observes the same error.
    fn create_barrier_locked(
        &self,
        state: &mut ClusterState,
        barrier_id: &str,
        timeout: Duration,
        task: &CoordinatedTask,
        participating_tasks: &[CoordinatedTask],
        completions: &mut Completions,
    ) -> Result<()> {
        let mut tasks_at_barrier: HashMap<CoordinatedTask, bool> = HashMap::new();
        if participating_tasks.is_empty() {
            // No explicit participants: the barrier spans the whole cluster.
            for declared in state.tasks.keys() {
                tasks_at_barrier.insert(declared.clone(), false);
            }
        } else {
            for participant in participating_tasks {
                if !state.tasks.contains_key(participant) {
                    let barrier_error = CoordinationError::invalid_argument(format!(
                        "unexpected task ({participant}) that is not in the cluster called the \
                         barrier. Barrier id: {barrier_id}"
                    ));
                    state.barriers.insert(
                        barrier_id.to_string(),
                        BarrierState::new(task.clone(), tasks_at_barrier, 0),
                    );
                    self.pass_barrier_locked(
                        state,
                        barrier_id,
                        Err(barrier_error.clone()),
                        completions,
                    );
                    return Err(barrier_error);
                }
                tasks_at_barrier.insert(participant.clone(), false);
            }
        }

        let errored_participant = tasks_at_barrier
            .keys()
            .find(|participant| {
                state.tasks.get(*participant).map(TaskState::status) == Some(TaskStatus::Error)
            })
            .cloned();
        if let Some(participant) = errored_participant {
            let barrier_error = CoordinationError::internal(format!(
                "task ({participant}) is already in error before the barrier was called. Barrier \
                 id: {barrier_id}"
            ));
            state.barriers.insert(
                barrier_id.to_string(),
                BarrierState::new(task.clone(), tasks_at_barrier, 0),
            );
            self.pass_barrier_locked(state, barrier_id, Err(barrier_error.clone()), completions);
            return Err(barrier_error);
        }

        let deadline_us = self.now_us().saturating_add(timeout.as_micros() as u64);
        let participants: Vec<CoordinatedTask> = tasks_at_barrier.keys().cloned().collect();
        state.barriers.insert(
            barrier_id.to_string(),
            BarrierState::new(task.clone(), tasks_at_barrier, deadline_us),
        );
        state.ongoing_barriers.insert(barrier_id.to_string());
        let num_ongoing = state.ongoing_barriers.len();
        if num_ongoing > ONGOING_BARRIERS_SOFT_LIMIT {
            warn!("there is a high number of ongoing barriers in coordination service: {num_ongoing}");
        }
        for participant in participants {
            if let Some(record) = state.tasks.get_mut(&participant) {
                record.join_barrier(barrier_id);
            }
        }
        Ok(())
    }

    /// The single barrier completion site: finalizes the result, detaches the
    /// barrier from every participant, runs the reserved-id hooks, and queues
    /// the waiters for dispatch in registration order.
    fn pass_barrier_locked(
        &self,
        state: &mut ClusterState,
        barrier_id: &str,
        result: Result<()>,
        completions: &mut Completions,
    ) {
        let Some(mut barrier) = state.barriers.remove(barrier_id) else {
            return;
        };
        barrier.passed = true;
        barrier.result = result.clone();
        match &result {
            Ok(()) => debug!("barrier {barrier_id} has passed"),
            Err(barrier_error) => debug!("barrier {barrier_id} has passed with {barrier_error}"),
        }
        if barrier_id == self.device_propagation_barrier_id {
            self.aggregate_cluster_devices_locked(state);
        }
        for participant in barrier.tasks_at_barrier.keys() {
            if let Some(record) = state.tasks.get_mut(participant) {
                record.exit_barrier(barrier_id);
            }
        }
        if barrier_id == self.shutdown_barrier_id {
            self.run_shutdown_barrier_hook_locked(state, &barrier, completions);
        }
        barrier.tasks_at_barrier.clear();
        state.ongoing_barriers.remove(barrier_id);
        for waiter in barrier.waiters.drain(..) {
            completions.barrier_waiters.push((waiter, result.clone()));
        }
        state.barriers.insert(barrier_id.to_string(), barrier);
    }

    /// On shutdown-barrier completion: disconnect every task that reached the
    /// barrier, and report a synthetic error to stragglers when it failed.
    fn run_shutdown_barrier_hook_locked(
        &self,
        state: &mut ClusterState,
        barrier: &BarrierState,
        completions: &mut Completions,
    ) {
        match &barrier.result {
            Ok(()) => info!("shutdown barrier in coordination service has passed"),
            Err(barrier_error) => error!(
                "shutdown barrier in coordination service has failed: {barrier_error}. This \
                 suggests that the workers are out of sync. Either at least one worker is too \
                 fast in its execution or crashed early, or it is too slow or hanging. Check the \
                 logs for an earlier error to identify the root cause."
            ),
        }
        let straggler_error = barrier.result.as_ref().err().map(|barrier_error| {
            CoordinationError::internal(format!(
                "shutdown barrier has failed, but this task is not at the barrier yet. Barrier \
                 result: {}",
                barrier_error.message()
            ))
        });
        for (participant, at_barrier) in &barrier.tasks_at_barrier {
            if *at_barrier {
                if let Err(disconnect_error) =
                    self.disconnect_task_locked(state, participant, completions)
                {
                    error!("{disconnect_error}");
                }
            } else if let Some(straggler_error) = &straggler_error {
                completions
                    .service_errors
                    .push((participant.clone(), straggler_error.clone()));
            }
        }
    }

    fn disconnect_task_locked(
        &self,
        state: &mut ClusterState,
        task: &CoordinatedTask,
        completions: &mut Completions,
    ) -> Result<()> {
        let task_name = task.to_string();
        if state.shutting_down {
            return Err(CoordinationError::internal(format!(
                "coordination service has stopped. DisconnectTask failed for task {task_name}."
            )));
        }
        let Some(record) = state.tasks.get_mut(task) else {
            return Err(CoordinationError::invalid_argument(format!(
                "unexpected disconnect request with task name {task_name}"
            )));
        };
        if record.status() == TaskStatus::Disconnected {
            return Err(CoordinationError::failed_precondition(format!(
                "the task is already disconnected: {task_name}"
            )));
        }
        record.disconnect(self.heartbeat_timeout_ms * 1_000, self.now_us());
        let ongoing: Vec<String> = record.ongoing_barriers().iter().cloned().collect();
        for barrier_id in ongoing {
            let barrier_error = CoordinationError::internal(format!(
                "barrier failed because a task has disconnected. Barrier id: {barrier_id}, task: \
                 {task_name}"
            ));
            self.pass_barrier_locked(state, &barrier_id, Err(barrier_error), completions);
        }
        info!("{task_name} has disconnected from coordination service");
        Ok(())
    }

    /// Moves the task to the error state and fails every barrier it is in.
    /// The caller is responsible for propagating afterwards.
    fn set_task_error_locked(
        &self,
        state: &mut ClusterState,
        task: &CoordinatedTask,
        error: CoordinationError,
        completions: &mut Completions,
    ) {
        let task_name = task.to_string();
        let Some(record) = state.tasks.get_mut(task) else {
            return;
        };
        record.set_error(error.clone());
        let ongoing: Vec<String> = record.ongoing_barriers().iter().cloned().collect();
        for barrier_id in ongoing {
            let barrier_error = CoordinationError::internal(format!(
                "barrier failed because a task is in error. Barrier id: {barrier_id}, task: \
                 {task_name}, error: {}",
                error.message()
            ));
            self.pass_barrier_locked(state, &barrier_id, Err(barrier_error), completions);
        }
        error!("{task_name} has been set to ERROR in coordination service: {error}");
    }

    /// Concatenates per-task device info in task order and applies the
    /// host-installed hook, if any. Runs once, when device propagation
    /// passes.
    fn aggregate_cluster_devices_locked(&self, state: &mut ClusterState) {
        debug_assert!(state.cluster_devices.is_empty());
        let mut devices = DeviceInfo::default();
        for record in state.tasks.values() {
            devices.merge(record.device_info());
        }
        if let Some(post_aggregate) = &state.post_aggregate_fn {
            devices = post_aggregate(devices);
        }
        state.cluster_devices = devices;
    }

    /// Fans the source task's stored error out to every connected task (push
    /// mode), or routes it through error polling / service stop (pull mode).
    /// Waits for every outbound send to finish. Recoverable jobs propagate
    /// nothing.
    async fn propagate_error(&self, source_task: &CoordinatedTask, is_reported_by_task: bool) {
        debug!("propagating error from {source_task}");
        if self.recoverable_jobs.contains(&source_task.job_name) {
            return;
        }
        let (error, connected_tasks) = {
            let state = self.state.lock().await;
            let Some(error) = state
                .tasks
                .get(source_task)
                .and_then(|record| record.error().cloned())
            else {
                return;
            };
            let connected_tasks: Vec<CoordinatedTask> = state
                .tasks
                .iter()
                .filter(|(_, record)| record.status() == TaskStatus::Connected)
                .map(|(task, _)| task.clone())
                .collect();
            (error, connected_tasks)
        };
        if connected_tasks.is_empty() {
            return;
        }
        let Some(directory) = &self.client_directory else {
            self.send_error_polling_response_or_stop_service(error).await;
            return;
        };
        let mut request = ReportErrorToTaskRequest::from_error(&error, source_task.clone());
        request.is_reported_by_task = is_reported_by_task;
        let mut reports: JoinSet<()> = JoinSet::new();
        for task in connected_tasks {
            let client = directory.client(&task);
            let request = request.clone();
            reports.spawn(async move {
                let send =
                    tokio::time::timeout(SERVICE_TO_CLIENT_TIMEOUT, client.report_error_to_task(request))
                        .await;
                match send {
                    Ok(Ok(())) => {}
                    Ok(Err(report_error)) => {
                        error!("encountered another error while reporting to {task}: {report_error}")
                    }
                    Err(_) => error!("timed out reporting error to {task}"),
                }
            });
        }
        while reports.join_next().await.is_some() {}
    }

    /// One-way error report to a single task, used for shutdown-barrier
    /// stragglers. Without a client directory the error is only logged.
    fn report_service_error_to_task(
        &self,
        destination_task: CoordinatedTask,
        error: CoordinationError,
    ) {
        let Some(directory) = &self.client_directory else {
            error!("{error}");
            return;
        };
        let client = directory.client(&destination_task);
        let request = ReportErrorToTaskRequest {
            error_code: error.code(),
            error_message: error.message().to_string(),
            source_task: CoordinatedTask::new(SERVICE_JOB_NAME, 0),
            is_reported_by_task: false,
        };
        tokio::spawn(async move {
            let send =
                tokio::time::timeout(SERVICE_TO_CLIENT_TIMEOUT, client.report_error_to_task(request))
                    .await;
            match send {
                Ok(Ok(())) => {}
                Ok(Err(report_error)) => {
                    error!(
                        "encountered another error while reporting to {destination_task}: \
                         {report_error}"
                    )
                }
                Err(_) => error!("timed out reporting error to {destination_task}"),
            }
        });
    }

    /// Hands the error to every queued poller and latches it for future
    /// polls. Tasks that never polled are logged and skipped.
    async fn send_error_polling_response(&self, error: CoordinationError) {
        let (waiters, missing_tasks) = {
            let mut state = self.state.lock().await;
            if state.error_polling.responded() {
                return;
            }
            let missing_tasks: Vec<String> = state
                .tasks
                .keys()
                .map(ToString::to_string)
                .filter(|task_name| !state.error_polling.is_task_polling(task_name))
                .collect();
            (state.error_polling.set_error(error.clone()), missing_tasks)
        };
        if error.code() != ErrorCode::Cancelled {
            debug!("sending error as a response to all error polling requests: {error}");
        }
        for waiter in waiters {
            let _ = waiter.send(error.clone());
        }
        if !missing_tasks.is_empty() {
            error!(
                "the following {} tasks in the cluster have not sent a request to poll for \
                 error; the error will not be propagated to them: {}",
                missing_tasks.len(),
                missing_tasks.join(",")
            );
        }
    }

    /// Pull-mode fallback: deliver through error polling if any client ever
    /// polled, otherwise stop the whole service. Returns whether the service
    /// stopped.
    async fn send_error_polling_response_or_stop_service(
        &self,
        error: CoordinationError,
    ) -> bool {
        debug_assert!(self.client_directory.is_none());
        if self.client_polling_for_error.load(Ordering::Acquire) {
            error!("using error polling to propagate the following error to all tasks: {error}");
            self.send_error_polling_response(error).await;
            return false;
        }
        error!(
            "stopping coordination service as there is no service-to-client connection, but we \
             encountered an error: {error}"
        );
        self.stop_internal(false).await;
        true
    }

    // ---- staleness checker ----------------------------------------------

    async fn run_staleness_checks(service: Weak<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut sweep = tokio::time::interval(STALENESS_SWEEP_PERIOD);
        loop {
            tokio::select! {
                _ = sweep.tick() => {
                    if *shutdown.borrow() {
                        return;
                    }
                    let Some(service) = service.upgrade() else {
                        return;
                    };
                    service.check_heartbeat_timeout().await;
                    service.check_barrier_timeout().await;
                }
                _ = shutdown.changed() => return,
            }
        }
    }

    /// Fails every connected task whose heartbeat deadline has passed and
    /// routes the failures through the configured error channel.
    async fn check_heartbeat_timeout(&self) {
        let mut stale_tasks: Vec<CoordinatedTask> = Vec::new();
        let mut completions = Completions::default();
        {
            let mut state = self.state.lock().await;
            let now_us = self.now_us();
            let connected: Vec<CoordinatedTask> = state
                .tasks
                .iter()
                .filter(|(_, record)| record.status() == TaskStatus::Connected)
                .map(|(task, _)| task.clone())
                .collect();
            for task in connected {
                let is_stale = state
                    .tasks
                    .get(&task)
                    .map(|record| {
                        record.time_since_last_heartbeat_ms(now_us) > self.heartbeat_timeout_ms
                    })
                    .unwrap_or(false);
                trace!("checking staleness for {task}, stale: {is_stale}");
                if is_stale {
                    let heartbeat_error = CoordinationError::unavailable(format!(
                        "task {task} heartbeat timeout. This indicates that the remote task has \
                         failed, got preempted, or crashed unexpectedly. Check the task logs for \
                         an earlier error to debug further."
                    ))
                    .with_source_task(task.clone());
                    self.set_task_error_locked(&mut state, &task, heartbeat_error, &mut completions);
                    stale_tasks.push(task);
                }
            }
        }
        self.dispatch(completions);
        if stale_tasks.is_empty() {
            return;
        }
        if self.client_directory.is_none() {
            let task_names = stale_tasks
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            let heartbeat_error = CoordinationError::unavailable(format!(
                "the following tasks are unhealthy (stopped sending heartbeats):\n{task_names}\n\
                 Check the task logs for an earlier error to debug further."
            ));
            if self
                .send_error_polling_response_or_stop_service(heartbeat_error)
                .await
            {
                return;
            }
        } else {
            for task in &stale_tasks {
                self.propagate_error(task, false).await;
            }
        }
    }

    /// Fails every ongoing barrier whose deadline has passed.
    async fn check_barrier_timeout(&self) {
        let mut shutdown_barrier_message: Option<String> = None;
        let mut completions = Completions::default();
        {
            let mut state = self.state.lock().await;
            let now_us = self.now_us();
            let expired: Vec<String> = state
                .ongoing_barriers
                .iter()
                .filter(|barrier_id| {
                    state
                        .barriers
                        .get(*barrier_id)
                        .map(|barrier| now_us > barrier.deadline_us)
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
            for barrier_id in expired {
                let Some(barrier) = state.barriers.get(&barrier_id) else {
                    continue;
                };
                let mut pending_task_names = String::new();
                let mut pending_count = 0usize;
                for (task, at_barrier) in &barrier.tasks_at_barrier {
                    if *at_barrier {
                        continue;
                    }
                    pending_count += 1;
                    if pending_count < PENDING_TASK_LOG_LIMIT {
                        pending_task_names.push_str(&task.to_string());
                        pending_task_names.push('\n');
                    }
                }
                let arrived_count = barrier.tasks_at_barrier.len() - pending_count;
                let message = format!(
                    "barrier timed out. Id: {barrier_id}. This usually happens because a task \
                     triggered the barrier too early or too slowly. Please look at the task logs \
                     (both timed out and first task) to debug further.\nNumber of tasks that \
                     reached the barrier: {arrived_count}/{}.\nThe first task at the barrier: \
                     {}. Some timed out task names:\n{pending_task_names}",
                    barrier.tasks_at_barrier.len(),
                    barrier.initiating_task,
                );
                if barrier_id == self.shutdown_barrier_id {
                    shutdown_barrier_message = Some(message.clone());
                }
                self.pass_barrier_locked(
                    &mut state,
                    &barrier_id,
                    Err(CoordinationError::deadline_exceeded(message)),
                    &mut completions,
                );
            }
        }
        self.dispatch(completions);
        if self.client_directory.is_none() {
            if let Some(message) = shutdown_barrier_message {
                // The shutdown error cannot reach the agents through a
                // service-to-client connection.
                self.send_error_polling_response_or_stop_service(
                    CoordinationError::deadline_exceeded(format!(
                        "shutdown barrier timed out. Error: {message}"
                    )),
                )
                .await;
            }
        }
    }
}

/// Logs progress towards a fully connected cluster.
fn log_connect_status_locked(state: &ClusterState) {
    let num_tasks = state.tasks.len();
    let mut pending_tasks = 0usize;
    let mut stragglers: Vec<String> = Vec::new();
    for (task, record) in &state.tasks {
        if record.status() != TaskStatus::Connected {
            pending_tasks += 1;
            if stragglers.len() < PENDING_STRAGGLER_LOG_LIMIT {
                stragglers.push(task.to_string());
            }
        }
    }
    info!("waiting for {pending_tasks}/{num_tasks} tasks to connect");
    if !stragglers.is_empty() {
        info!("example stragglers:\n{}", stragglers.join("\n"));
    }
}
