//! Conversions between domain types and their protobuf counterparts.

use tonic::{Code, Status};

use coordination_core::{
    CoordinatedTask, CoordinationError, DeviceInfo, ErrorCode, KeyValueEntry, TaskStatus,
};

use crate::proto;

impl From<&CoordinatedTask> for proto::CoordinatedTask {
    fn from(task: &CoordinatedTask) -> Self {
        Self {
            job_name: task.job_name.clone(),
            task_id: task.task_id,
        }
    }
}

impl From<proto::CoordinatedTask> for CoordinatedTask {
    fn from(task: proto::CoordinatedTask) -> Self {
        CoordinatedTask::new(task.job_name, task.task_id)
    }
}

impl From<DeviceInfo> for proto::DeviceInfo {
    fn from(devices: DeviceInfo) -> Self {
        Self {
            devices: devices.devices,
        }
    }
}

impl From<proto::DeviceInfo> for DeviceInfo {
    fn from(devices: proto::DeviceInfo) -> Self {
        DeviceInfo::from(devices.devices)
    }
}

impl From<KeyValueEntry> for proto::KeyValueEntry {
    fn from(entry: KeyValueEntry) -> Self {
        Self {
            key: entry.key,
            value: entry.value,
        }
    }
}

impl From<TaskStatus> for proto::CoordinatedTaskState {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Disconnected => Self::Disconnected,
            TaskStatus::Connected => Self::Connected,
            TaskStatus::Error => Self::Error,
        }
    }
}

impl From<proto::CoordinatedTaskState> for TaskStatus {
    fn from(state: proto::CoordinatedTaskState) -> Self {
        match state {
            proto::CoordinatedTaskState::Unspecified => Self::Disconnected,
            proto::CoordinatedTaskState::Disconnected => Self::Disconnected,
            proto::CoordinatedTaskState::Connected => Self::Connected,
            proto::CoordinatedTaskState::Error => Self::Error,
        }
    }
}

/// Extracts a required task field from a request.
pub fn required_task(task: Option<proto::CoordinatedTask>) -> Result<CoordinatedTask, Status> {
    task.map(CoordinatedTask::from)
        .ok_or_else(|| Status::invalid_argument("task is required"))
}

pub fn tonic_code(code: ErrorCode) -> Code {
    match code {
        ErrorCode::InvalidArgument => Code::InvalidArgument,
        ErrorCode::FailedPrecondition => Code::FailedPrecondition,
        ErrorCode::AlreadyExists => Code::AlreadyExists,
        ErrorCode::NotFound => Code::NotFound,
        ErrorCode::Unavailable => Code::Unavailable,
        ErrorCode::DeadlineExceeded => Code::DeadlineExceeded,
        ErrorCode::Aborted => Code::Aborted,
        ErrorCode::Cancelled => Code::Cancelled,
        ErrorCode::Internal => Code::Internal,
    }
}

pub fn error_code_from_tonic(code: Code) -> ErrorCode {
    match code {
        Code::InvalidArgument => ErrorCode::InvalidArgument,
        Code::FailedPrecondition => ErrorCode::FailedPrecondition,
        Code::AlreadyExists => ErrorCode::AlreadyExists,
        Code::NotFound => ErrorCode::NotFound,
        Code::Unavailable => ErrorCode::Unavailable,
        Code::DeadlineExceeded => ErrorCode::DeadlineExceeded,
        Code::Aborted => ErrorCode::Aborted,
        Code::Cancelled => ErrorCode::Cancelled,
        _ => ErrorCode::Internal,
    }
}

pub fn status_from_error(error: CoordinationError) -> Status {
    Status::new(tonic_code(error.code()), error.message().to_string())
}

pub fn error_from_status(status: &Status) -> CoordinationError {
    CoordinationError::from_parts(error_code_from_tonic(status.code()), status.message())
}

/// Rebuilds an error from wire parts; `None` for the OK code.
pub fn error_from_parts(code: i32, message: &str) -> Option<CoordinationError> {
    if code == Code::Ok as i32 {
        return None;
    }
    Some(CoordinationError::from_parts(
        error_code_from_tonic(Code::from(code)),
        message,
    ))
}
