//! gRPC surface for the cluster coordination service.
//!
//! The service implementation maps each RPC onto the async methods of
//! [`coordination_core::CoordinationService`]; the client wrapper gives
//! worker agents a typed view of the same surface.

pub mod proto {
    #![allow(clippy::all)]
    include!("proto/coordination.v1.rs");
}

pub mod client;
pub mod convert;
pub mod service;

pub use client::{ClientConfig, GrpcCoordinationClient};
pub use service::CoordinationServiceImpl;
