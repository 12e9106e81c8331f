//! Barrier records.

use std::collections::HashMap;

use tokio::sync::oneshot;

use crate::error::{CoordinationError, Result};
use crate::task::CoordinatedTask;

pub type BarrierWaiter = oneshot::Sender<Result<()>>;

/// State of one named barrier, created lazily on first reference and kept
/// until service shutdown.
pub struct BarrierState {
    /// Once true, `result` is final and the record is read-only.
    pub passed: bool,
    /// Only valid once `passed` is true.
    pub result: Result<()>,
    pub deadline_us: u64,
    /// Count of participants that have not arrived yet.
    pub num_pending: usize,
    /// Participant set and per-participant arrival flag. The key set is
    /// immutable after creation.
    pub tasks_at_barrier: HashMap<CoordinatedTask, bool>,
    /// Waiters released, in registration order, when the barrier passes.
    pub waiters: Vec<BarrierWaiter>,
    /// The first task to invoke this barrier id.
    pub initiating_task: CoordinatedTask,
}

impl BarrierState {
    pub fn new(
        initiating_task: CoordinatedTask,
        tasks_at_barrier: HashMap<CoordinatedTask, bool>,
        deadline_us: u64,
    ) -> Self {
        let num_pending = tasks_at_barrier.values().filter(|arrived| !**arrived).count();
        Self {
            passed: false,
            result: Err(CoordinationError::internal("invalid barrier result")),
            deadline_us,
            num_pending,
            tasks_at_barrier,
            waiters: Vec::new(),
            initiating_task,
        }
    }
}

/// Checks that the participant list of a repeated barrier call is consistent
/// with the set recorded at creation. An empty list stands for the whole
/// cluster.
pub fn validate_task_args(
    tasks_args: &[CoordinatedTask],
    tasks_at_barrier: &HashMap<CoordinatedTask, bool>,
    cluster_size: usize,
) -> bool {
    if tasks_args.is_empty() {
        return tasks_at_barrier.len() == cluster_size;
    }
    if tasks_at_barrier.len() != tasks_args.len() {
        return false;
    }
    tasks_args
        .iter()
        .all(|task| tasks_at_barrier.contains_key(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant_map(tasks: &[CoordinatedTask]) -> HashMap<CoordinatedTask, bool> {
        tasks.iter().map(|task| (task.clone(), false)).collect()
    }

    #[test]
    fn empty_args_require_full_cluster() {
        let tasks = [
            CoordinatedTask::new("worker", 0),
            CoordinatedTask::new("worker", 1),
        ];
        let at_barrier = participant_map(&tasks);
        assert!(validate_task_args(&[], &at_barrier, 2));
        assert!(!validate_task_args(&[], &at_barrier, 3));
    }

    #[test]
    fn explicit_args_must_match_recorded_set() {
        let tasks = [
            CoordinatedTask::new("worker", 0),
            CoordinatedTask::new("worker", 1),
        ];
        let at_barrier = participant_map(&tasks);
        assert!(validate_task_args(&tasks, &at_barrier, 5));
        assert!(!validate_task_args(&tasks[..1], &at_barrier, 5));
        assert!(!validate_task_args(
            &[tasks[0].clone(), CoordinatedTask::new("worker", 2)],
            &at_barrier,
            5
        ));
    }

    #[test]
    fn new_counts_pending_participants() {
        let mut at_barrier = participant_map(&[
            CoordinatedTask::new("worker", 0),
            CoordinatedTask::new("worker", 1),
        ]);
        at_barrier.insert(CoordinatedTask::new("worker", 2), true);
        let barrier = BarrierState::new(CoordinatedTask::new("worker", 0), at_barrier, 0);
        assert_eq!(barrier.num_pending, 2);
        assert!(!barrier.passed);
    }
}
