//! Outbound client interfaces.
//!
//! When the service is constructed with a [`ClientDirectory`] it runs in push
//! mode: task errors are delivered by calling each connected task's agent.
//! Without a directory the service runs in pull mode and tasks poll for
//! errors instead.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CoordinationError, ErrorCode, Result};
use crate::task::CoordinatedTask;

/// Error report delivered to a task's agent.
#[derive(Debug, Clone)]
pub struct ReportErrorToTaskRequest {
    pub error_code: ErrorCode,
    pub error_message: String,
    /// The task the error originated from. Service-originated errors use the
    /// job name `"coordination_service"`.
    pub source_task: CoordinatedTask,
    pub is_reported_by_task: bool,
}

impl ReportErrorToTaskRequest {
    pub fn from_error(error: &CoordinationError, source_task: CoordinatedTask) -> Self {
        Self {
            error_code: error.code(),
            error_message: error.message().to_string(),
            is_reported_by_task: error
                .payload()
                .map(|p| p.is_reported_error)
                .unwrap_or(false),
            source_task,
        }
    }
}

/// Outbound stub for one task's agent.
#[async_trait]
pub trait CoordinationClient: Send + Sync {
    /// Delivers an error report. The service applies a fixed deadline and
    /// only logs failures.
    async fn report_error_to_task(&self, request: ReportErrorToTaskRequest) -> Result<()>;
}

/// Resolves task identities to outbound stubs.
pub trait ClientDirectory: Send + Sync {
    fn client(&self, task: &CoordinatedTask) -> Arc<dyn CoordinationClient>;
}
