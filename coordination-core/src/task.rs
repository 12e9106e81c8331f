//! Task identity types.
//!
//! A task is one worker process in the coordinated cluster, identified by its
//! job name and its index within the job. The canonical string form is
//! `"/job:<job>/replica:0/task:<id>"`; formatting and parsing round-trip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoordinationError;

/// Identity of one coordinated task.
///
/// Ordering is by `(job_name, task_id)`, which is also the order cluster-wide
/// device aggregation walks tasks in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoordinatedTask {
    pub job_name: String,
    pub task_id: u32,
}

impl CoordinatedTask {
    pub fn new(job_name: impl Into<String>, task_id: u32) -> Self {
        Self {
            job_name: job_name.into(),
            task_id,
        }
    }
}

impl fmt::Display for CoordinatedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/job:{}/replica:0/task:{}", self.job_name, self.task_id)
    }
}

impl FromStr for CoordinatedTask {
    type Err = CoordinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            CoordinationError::invalid_argument(format!("malformed task name: {s}"))
        };
        let rest = s.strip_prefix("/job:").ok_or_else(malformed)?;
        let (job_name, rest) = rest.split_once("/replica:").ok_or_else(malformed)?;
        let (replica, task_id) = rest.split_once("/task:").ok_or_else(malformed)?;
        if job_name.is_empty() {
            return Err(malformed());
        }
        let _replica: u32 = replica.parse().map_err(|_| malformed())?;
        let task_id: u32 = task_id.parse().map_err(|_| malformed())?;
        Ok(Self {
            job_name: job_name.to_string(),
            task_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_name_round_trips() {
        let task = CoordinatedTask::new("worker", 3);
        assert_eq!(task.to_string(), "/job:worker/replica:0/task:3");
        assert_eq!(task.to_string().parse::<CoordinatedTask>().unwrap(), task);
    }

    #[test]
    fn parse_rejects_malformed_names() {
        for name in [
            "",
            "worker",
            "/job:worker",
            "/job:/replica:0/task:1",
            "/job:worker/replica:0/task:",
            "/job:worker/replica:x/task:1",
        ] {
            assert!(name.parse::<CoordinatedTask>().is_err(), "accepted {name:?}");
        }
    }

    #[test]
    fn ordering_is_by_job_then_id() {
        let mut tasks = vec![
            CoordinatedTask::new("b", 0),
            CoordinatedTask::new("a", 10),
            CoordinatedTask::new("a", 2),
        ];
        tasks.sort();
        assert_eq!(
            tasks,
            vec![
                CoordinatedTask::new("a", 2),
                CoordinatedTask::new("a", 10),
                CoordinatedTask::new("b", 0),
            ]
        );
    }
}
