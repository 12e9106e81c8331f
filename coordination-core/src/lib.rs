//! Coordination service for distributed compute clusters.
//!
//! This crate implements the transport-free core of the service: cluster
//! membership with heartbeat-based liveness, named barriers with deadlines,
//! cluster-wide error propagation (service push or client pull), and a shared
//! hierarchical key-value store.
//!
//! The gRPC surface lives in the `coordinator` crate; embedders can also
//! drive [`CoordinationService`] directly and provide a [`ClientDirectory`]
//! for push-mode error delivery.

pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod kv;
pub mod service;
pub mod task;

pub use client::{ClientDirectory, CoordinationClient, ReportErrorToTaskRequest};
pub use config::{JobSpec, ServiceConfig, DEFAULT_HEARTBEAT_TIMEOUT_MS};
pub use device::DeviceInfo;
pub use error::{CoordinationError, CoordinationErrorPayload, ErrorCode, Result};
pub use kv::KeyValueEntry;
pub use service::state::TaskStatus;
pub use service::{CoordinationService, DeviceAggregationFn, TaskStateInfo};
pub use task::CoordinatedTask;
