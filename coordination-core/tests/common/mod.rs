//! Shared helpers for the service integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use coordination_core::{
    ClientDirectory, CoordinatedTask, CoordinationClient, CoordinationService, JobSpec,
    ReportErrorToTaskRequest, Result, ServiceConfig,
};

/// Starts a push-mode service reporting through `directory`.
pub fn push_service(
    config: ServiceConfig,
    directory: &Arc<RecordingDirectory>,
) -> Arc<CoordinationService> {
    CoordinationService::new(config, Some(directory.clone() as Arc<dyn ClientDirectory>))
}

/// Starts a pull-mode service (no client directory).
pub fn pull_service(config: ServiceConfig) -> Arc<CoordinationService> {
    CoordinationService::new(config, None)
}

pub fn config(jobs: &[(&str, u32)]) -> ServiceConfig {
    ServiceConfig {
        coordinated_jobs: jobs
            .iter()
            .map(|(name, num_tasks)| JobSpec::new(*name, *num_tasks))
            .collect(),
        ..Default::default()
    }
}

pub fn task(job: &str, id: u32) -> CoordinatedTask {
    CoordinatedTask::new(job, id)
}

/// Lets spawned tasks and the staleness sweep run to their next suspension
/// point on the current-thread test runtime.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Advances the paused test clock, then lets woken tasks run.
pub async fn advance_and_settle(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}

/// Push-mode client directory that records every outbound error report.
#[derive(Default)]
pub struct RecordingDirectory {
    reports: Arc<Mutex<Vec<(CoordinatedTask, ReportErrorToTaskRequest)>>>,
}

impl RecordingDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reports(&self) -> Vec<(CoordinatedTask, ReportErrorToTaskRequest)> {
        self.reports.lock().unwrap().clone()
    }

    pub fn reports_to(&self, task: &CoordinatedTask) -> Vec<ReportErrorToTaskRequest> {
        self.reports()
            .into_iter()
            .filter(|(target, _)| target == task)
            .map(|(_, request)| request)
            .collect()
    }
}

struct RecordingClient {
    target: CoordinatedTask,
    reports: Arc<Mutex<Vec<(CoordinatedTask, ReportErrorToTaskRequest)>>>,
}

#[async_trait]
impl CoordinationClient for RecordingClient {
    async fn report_error_to_task(&self, request: ReportErrorToTaskRequest) -> Result<()> {
        self.reports
            .lock()
            .unwrap()
            .push((self.target.clone(), request));
        Ok(())
    }
}

impl ClientDirectory for RecordingDirectory {
    fn client(&self, task: &CoordinatedTask) -> Arc<dyn CoordinationClient> {
        Arc::new(RecordingClient {
            target: task.clone(),
            reports: Arc::clone(&self.reports),
        })
    }
}
