//! gRPC service implementation for the coordination service.

use std::sync::Arc;
use std::time::Duration;

use tonic::{Request, Response, Status};

use coordination_core::CoordinationService;

use crate::convert::{error_from_parts, required_task, status_from_error};
use crate::proto;
use crate::proto::coordination_service_server::CoordinationService as CoordinationServiceRpc;

pub struct CoordinationServiceImpl {
    service: Arc<CoordinationService>,
}

impl CoordinationServiceImpl {
    pub fn new(service: Arc<CoordinationService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl CoordinationServiceRpc for CoordinationServiceImpl {
    async fn register_task(
        &self,
        request: Request<proto::RegisterTaskRequest>,
    ) -> Result<Response<proto::RegisterTaskResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.task)?;
        self.service
            .register_task(&task, req.incarnation)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::RegisterTaskResponse {
            service_incarnation: self.service.service_incarnation(),
        }))
    }

    async fn heartbeat(
        &self,
        request: Request<proto::HeartbeatRequest>,
    ) -> Result<Response<proto::HeartbeatResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.task)?;
        self.service
            .record_heartbeat(&task, req.incarnation)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::HeartbeatResponse {}))
    }

    async fn wait_for_all_tasks(
        &self,
        request: Request<proto::WaitForAllTasksRequest>,
    ) -> Result<Response<proto::WaitForAllTasksResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.task)?;
        let devices = req.device_info.map(Into::into).unwrap_or_default();
        self.service
            .wait_for_all_tasks(&task, devices)
            .await
            .map_err(status_from_error)?;
        let cluster_devices = self.service.list_cluster_devices().await;
        Ok(Response::new(proto::WaitForAllTasksResponse {
            cluster_device_info: Some(cluster_devices.into()),
        }))
    }

    async fn shutdown_task(
        &self,
        request: Request<proto::ShutdownTaskRequest>,
    ) -> Result<Response<proto::ShutdownTaskResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.task)?;
        self.service
            .shutdown_task(&task)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::ShutdownTaskResponse {}))
    }

    async fn reset_task(
        &self,
        request: Request<proto::ResetTaskRequest>,
    ) -> Result<Response<proto::ResetTaskResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.task)?;
        self.service
            .reset_task(&task)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::ResetTaskResponse {}))
    }

    async fn report_task_error(
        &self,
        request: Request<proto::ReportTaskErrorRequest>,
    ) -> Result<Response<proto::ReportTaskErrorResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.task)?;
        let error = error_from_parts(req.error_code, &req.error_message)
            .ok_or_else(|| Status::invalid_argument("reported error must be non-OK"))?;
        self.service
            .report_task_error(&task, error)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::ReportTaskErrorResponse {}))
    }

    async fn get_task_state(
        &self,
        request: Request<proto::GetTaskStateRequest>,
    ) -> Result<Response<proto::GetTaskStateResponse>, Status> {
        let req = request.into_inner();
        let tasks: Vec<_> = req.tasks.into_iter().map(Into::into).collect();
        let states = self.service.task_states(&tasks).await;
        let task_states = states
            .into_iter()
            .map(|info| {
                let (error_code, error_message) = match &info.error {
                    Some(error) => (
                        crate::convert::tonic_code(error.code()) as i32,
                        error.message().to_string(),
                    ),
                    None => (tonic::Code::Ok as i32, String::new()),
                };
                proto::TaskStateInfo {
                    task: Some(proto::CoordinatedTask::from(&info.task)),
                    state: proto::CoordinatedTaskState::from(info.status) as i32,
                    error_code,
                    error_message,
                }
            })
            .collect();
        Ok(Response::new(proto::GetTaskStateResponse { task_states }))
    }

    async fn insert_key_value(
        &self,
        request: Request<proto::InsertKeyValueRequest>,
    ) -> Result<Response<proto::InsertKeyValueResponse>, Status> {
        let req = request.into_inner();
        let kv = req
            .kv
            .ok_or_else(|| Status::invalid_argument("kv entry is required"))?;
        self.service
            .insert_key_value(&kv.key, &kv.value, req.allow_overwrite)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::InsertKeyValueResponse {}))
    }

    async fn get_key_value(
        &self,
        request: Request<proto::GetKeyValueRequest>,
    ) -> Result<Response<proto::GetKeyValueResponse>, Status> {
        let req = request.into_inner();
        let value = self
            .service
            .get_key_value(&req.key)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::GetKeyValueResponse {
            kv: Some(proto::KeyValueEntry {
                key: req.key,
                value,
            }),
        }))
    }

    async fn try_get_key_value(
        &self,
        request: Request<proto::TryGetKeyValueRequest>,
    ) -> Result<Response<proto::TryGetKeyValueResponse>, Status> {
        let req = request.into_inner();
        let value = self
            .service
            .try_get_key_value(&req.key)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::TryGetKeyValueResponse {
            kv: Some(proto::KeyValueEntry {
                key: req.key,
                value,
            }),
        }))
    }

    async fn get_key_value_dir(
        &self,
        request: Request<proto::GetKeyValueDirRequest>,
    ) -> Result<Response<proto::GetKeyValueDirResponse>, Status> {
        let req = request.into_inner();
        let entries = self.service.get_key_value_dir(&req.directory_key).await;
        Ok(Response::new(proto::GetKeyValueDirResponse {
            kv: entries.into_iter().map(Into::into).collect(),
        }))
    }

    async fn delete_key_value(
        &self,
        request: Request<proto::DeleteKeyValueRequest>,
    ) -> Result<Response<proto::DeleteKeyValueResponse>, Status> {
        let req = request.into_inner();
        self.service
            .delete_key_value(&req.key)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::DeleteKeyValueResponse {}))
    }

    async fn barrier(
        &self,
        request: Request<proto::BarrierRequest>,
    ) -> Result<Response<proto::BarrierResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.source_task)?;
        let participating: Vec<_> = req.tasks.into_iter().map(Into::into).collect();
        self.service
            .barrier(
                &req.barrier_id,
                Duration::from_millis(req.barrier_timeout_ms),
                &task,
                &participating,
            )
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::BarrierResponse {}))
    }

    async fn cancel_barrier(
        &self,
        request: Request<proto::CancelBarrierRequest>,
    ) -> Result<Response<proto::CancelBarrierResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.source_task)?;
        self.service
            .cancel_barrier(&req.barrier_id, &task)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(proto::CancelBarrierResponse {}))
    }

    async fn poll_for_error(
        &self,
        request: Request<proto::PollForErrorRequest>,
    ) -> Result<Response<proto::PollForErrorResponse>, Status> {
        let req = request.into_inner();
        let task = required_task(req.source_task)?;
        // The poll always resolves with an error status: the propagated
        // cluster error, or an immediate rejection.
        let error = self.service.poll_for_error(&task).await;
        Err(status_from_error(error))
    }

    async fn list_cluster_devices(
        &self,
        _request: Request<proto::ListClusterDevicesRequest>,
    ) -> Result<Response<proto::ListClusterDevicesResponse>, Status> {
        let devices = self.service.list_cluster_devices().await;
        Ok(Response::new(proto::ListClusterDevicesResponse {
            device_info: Some(devices.into()),
        }))
    }

    async fn get_service_incarnation(
        &self,
        _request: Request<proto::GetServiceIncarnationRequest>,
    ) -> Result<Response<proto::GetServiceIncarnationResponse>, Status> {
        Ok(Response::new(proto::GetServiceIncarnationResponse {
            service_incarnation: self.service.service_incarnation(),
        }))
    }
}
