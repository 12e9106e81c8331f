//! Error types shared by the service and its clients.

use std::fmt;

use thiserror::Error;

use crate::task::CoordinatedTask;

/// Classification of a coordination error, mirroring the RPC status codes the
/// service surfaces to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    FailedPrecondition,
    AlreadyExists,
    NotFound,
    Unavailable,
    DeadlineExceeded,
    Aborted,
    Cancelled,
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidArgument => "invalid argument",
            Self::FailedPrecondition => "failed precondition",
            Self::AlreadyExists => "already exists",
            Self::NotFound => "not found",
            Self::Unavailable => "unavailable",
            Self::DeadlineExceeded => "deadline exceeded",
            Self::Aborted => "aborted",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Propagation metadata attached to errors that travel between tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinationErrorPayload {
    /// The task the error originated from, if attributable.
    pub source_task: Option<CoordinatedTask>,
    /// Whether the source task reported the error itself (as opposed to the
    /// service detecting it, e.g. through a missed heartbeat).
    pub is_reported_error: bool,
}

/// An error raised by the coordination service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct CoordinationError {
    code: ErrorCode,
    message: String,
    payload: Option<CoordinationErrorPayload>,
}

pub type Result<T, E = CoordinationError> = std::result::Result<T, E>;

impl CoordinationError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            payload: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FailedPrecondition, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyExists, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unavailable, message)
    }

    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeadlineExceeded, message)
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Aborted, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Cancelled, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    pub fn from_parts(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    /// Attributes the error to a task, attaching a coordination payload.
    pub fn with_source_task(mut self, source_task: CoordinatedTask) -> Self {
        let payload = self.payload.get_or_insert_with(Default::default);
        payload.source_task = Some(source_task);
        self
    }

    /// Marks the error as self-reported by its source task.
    pub fn reported_by_task(mut self) -> Self {
        let payload = self.payload.get_or_insert_with(Default::default);
        payload.is_reported_error = true;
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&CoordinationErrorPayload> {
        self.payload.as_ref()
    }

    /// Whether the error carries coordination propagation metadata. Used to
    /// tell service-tracked task failures apart from plain request errors.
    pub fn has_coordination_payload(&self) -> bool {
        self.payload.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_attached_on_attribution() {
        let err = CoordinationError::unavailable("heartbeat timeout");
        assert!(!err.has_coordination_payload());

        let task = CoordinatedTask::new("worker", 1);
        let err = err.with_source_task(task.clone());
        assert!(err.has_coordination_payload());
        assert_eq!(err.payload().unwrap().source_task.as_ref(), Some(&task));
        assert!(!err.payload().unwrap().is_reported_error);

        let err = err.reported_by_task();
        assert!(err.payload().unwrap().is_reported_error);
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = CoordinationError::aborted("task restarted");
        assert_eq!(err.to_string(), "aborted: task restarted");
    }
}
