//! Typed gRPC client for worker agents.
//!
//! Wraps the generated stub with domain types and the connection handling a
//! worker needs: bounded connect retries with backoff, per-request deadlines
//! for unary calls, and deadline-free calls for the operations that park on
//! the service (blocking key-value gets, barriers, error polls).

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tonic::Request;

use coordination_core::{
    CoordinatedTask, CoordinationError, DeviceInfo, KeyValueEntry, Result, TaskStateInfo,
    TaskStatus,
};

use crate::convert::{error_from_parts, error_from_status};
use crate::proto;
use crate::proto::coordination_service_client::CoordinationServiceClient;

/// Client-side connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service address as `host:port`.
    pub address: String,
    pub connect_timeout: Duration,
    /// Deadline applied to unary requests.
    pub request_timeout: Duration,
    pub max_connect_attempts: u32,
    pub reconnect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:50051".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_connect_attempts: 5,
            reconnect_delay: Duration::from_millis(100),
        }
    }
}

/// One worker task's connection to the coordination service.
pub struct GrpcCoordinationClient {
    config: ClientConfig,
    client: CoordinationServiceClient<Channel>,
    task: CoordinatedTask,
    incarnation: u64,
}

impl GrpcCoordinationClient {
    /// Connects to the service on behalf of `task`. The incarnation is chosen
    /// by the caller at startup; changing it across registrations signals a
    /// restart.
    pub async fn connect(
        config: ClientConfig,
        task: CoordinatedTask,
        incarnation: u64,
    ) -> Result<Self> {
        let endpoint = Endpoint::from_shared(format!("http://{}", config.address))
            .map_err(|e| {
                CoordinationError::invalid_argument(format!("invalid service address: {e}"))
            })?
            .connect_timeout(config.connect_timeout);
        let channel = endpoint.connect().await.map_err(|e| {
            CoordinationError::unavailable(format!(
                "failed to connect to coordination service at {}: {e}",
                config.address
            ))
        })?;
        Ok(Self {
            config,
            client: CoordinationServiceClient::new(channel),
            task,
            incarnation,
        })
    }

    /// Connects with bounded retries and exponential backoff.
    pub async fn connect_with_retry(
        config: ClientConfig,
        task: CoordinatedTask,
        incarnation: u64,
    ) -> Result<Self> {
        let mut attempts = 0;
        let mut delay = config.reconnect_delay;
        loop {
            match Self::connect(config.clone(), task.clone(), incarnation).await {
                Ok(client) => return Ok(client),
                Err(e) => {
                    attempts += 1;
                    if attempts >= config.max_connect_attempts {
                        return Err(CoordinationError::unavailable(format!(
                            "failed to connect after {attempts} attempts: {e}"
                        )));
                    }
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, config.request_timeout);
                }
            }
        }
    }

    pub fn task(&self) -> &CoordinatedTask {
        &self.task
    }

    fn unary<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(self.config.request_timeout);
        request
    }

    /// Registers this task; returns the service incarnation.
    pub async fn register(&mut self) -> Result<u64> {
        let request = self.unary(proto::RegisterTaskRequest {
            task: Some((&self.task).into()),
            incarnation: self.incarnation,
        });
        let response = self
            .client
            .register_task(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(response.into_inner().service_incarnation)
    }

    pub async fn heartbeat(&mut self) -> Result<()> {
        let request = self.unary(proto::HeartbeatRequest {
            task: Some((&self.task).into()),
            incarnation: self.incarnation,
        });
        self.client
            .heartbeat(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(())
    }

    /// Contributes local device info and waits for the whole cluster; returns
    /// the aggregated devices.
    pub async fn wait_for_all_tasks(&mut self, devices: DeviceInfo) -> Result<DeviceInfo> {
        let request = Request::new(proto::WaitForAllTasksRequest {
            task: Some((&self.task).into()),
            device_info: Some(devices.into()),
        });
        let response = self
            .client
            .wait_for_all_tasks(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(response
            .into_inner()
            .cluster_device_info
            .map(Into::into)
            .unwrap_or_default())
    }

    /// Graceful shutdown; may park on the shutdown barrier.
    pub async fn shutdown(&mut self) -> Result<()> {
        let request = Request::new(proto::ShutdownTaskRequest {
            task: Some((&self.task).into()),
        });
        self.client
            .shutdown_task(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(())
    }

    pub async fn reset(&mut self) -> Result<()> {
        let request = self.unary(proto::ResetTaskRequest {
            task: Some((&self.task).into()),
        });
        self.client
            .reset_task(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(())
    }

    pub async fn report_error(&mut self, error: &CoordinationError) -> Result<()> {
        let request = self.unary(proto::ReportTaskErrorRequest {
            task: Some((&self.task).into()),
            error_code: crate::convert::tonic_code(error.code()) as i32,
            error_message: error.message().to_string(),
        });
        self.client
            .report_task_error(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(())
    }

    pub async fn task_states(&mut self, tasks: &[CoordinatedTask]) -> Result<Vec<TaskStateInfo>> {
        let request = self.unary(proto::GetTaskStateRequest {
            tasks: tasks.iter().map(Into::into).collect(),
        });
        let response = self
            .client
            .get_task_state(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(response
            .into_inner()
            .task_states
            .into_iter()
            .map(|info| {
                let status = proto::CoordinatedTaskState::try_from(info.state)
                    .unwrap_or(proto::CoordinatedTaskState::Unspecified);
                TaskStateInfo {
                    task: info.task.map(Into::into).unwrap_or_else(|| self.task.clone()),
                    status: TaskStatus::from(status),
                    error: error_from_parts(info.error_code, &info.error_message),
                }
            })
            .collect())
    }

    pub async fn insert_key_value(
        &mut self,
        key: &str,
        value: &str,
        allow_overwrite: bool,
    ) -> Result<()> {
        let request = self.unary(proto::InsertKeyValueRequest {
            kv: Some(proto::KeyValueEntry {
                key: key.to_string(),
                value: value.to_string(),
            }),
            allow_overwrite,
        });
        self.client
            .insert_key_value(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(())
    }

    /// Blocks until the key exists or the service shuts down.
    pub async fn get_key_value(&mut self, key: &str) -> Result<String> {
        let request = Request::new(proto::GetKeyValueRequest {
            key: key.to_string(),
        });
        let response = self
            .client
            .get_key_value(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(response
            .into_inner()
            .kv
            .map(|kv| kv.value)
            .unwrap_or_default())
    }

    pub async fn try_get_key_value(&mut self, key: &str) -> Result<String> {
        let request = self.unary(proto::TryGetKeyValueRequest {
            key: key.to_string(),
        });
        let response = self
            .client
            .try_get_key_value(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(response
            .into_inner()
            .kv
            .map(|kv| kv.value)
            .unwrap_or_default())
    }

    pub async fn get_key_value_dir(&mut self, directory_key: &str) -> Result<Vec<KeyValueEntry>> {
        let request = self.unary(proto::GetKeyValueDirRequest {
            directory_key: directory_key.to_string(),
        });
        let response = self
            .client
            .get_key_value_dir(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(response
            .into_inner()
            .kv
            .into_iter()
            .map(|kv| KeyValueEntry {
                key: kv.key,
                value: kv.value,
            })
            .collect())
    }

    pub async fn delete_key_value(&mut self, key: &str) -> Result<()> {
        let request = self.unary(proto::DeleteKeyValueRequest {
            key: key.to_string(),
        });
        self.client
            .delete_key_value(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(())
    }

    /// Joins the named barrier; resolves when it completes.
    pub async fn barrier(
        &mut self,
        barrier_id: &str,
        timeout: Duration,
        participating_tasks: &[CoordinatedTask],
    ) -> Result<()> {
        let request = Request::new(proto::BarrierRequest {
            barrier_id: barrier_id.to_string(),
            barrier_timeout_ms: timeout.as_millis() as u64,
            tasks: participating_tasks.iter().map(Into::into).collect(),
            source_task: Some((&self.task).into()),
        });
        self.client
            .barrier(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(())
    }

    pub async fn cancel_barrier(&mut self, barrier_id: &str) -> Result<()> {
        let request = self.unary(proto::CancelBarrierRequest {
            barrier_id: barrier_id.to_string(),
            source_task: Some((&self.task).into()),
        });
        self.client
            .cancel_barrier(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(())
    }

    /// Parks until the service reports a cluster error (pull mode). The
    /// returned error is the propagated error or an immediate rejection.
    pub async fn poll_for_error(&mut self) -> CoordinationError {
        let request = Request::new(proto::PollForErrorRequest {
            source_task: Some((&self.task).into()),
        });
        match self.client.poll_for_error(request).await {
            // The service always answers the poll with an error status.
            Ok(_) => CoordinationError::internal("error poll resolved without an error"),
            Err(status) => error_from_status(&status),
        }
    }

    pub async fn list_cluster_devices(&mut self) -> Result<DeviceInfo> {
        let request = self.unary(proto::ListClusterDevicesRequest {});
        let response = self
            .client
            .list_cluster_devices(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(response
            .into_inner()
            .device_info
            .map(Into::into)
            .unwrap_or_default())
    }

    pub async fn service_incarnation(&mut self) -> Result<u64> {
        let request = self.unary(proto::GetServiceIncarnationRequest {});
        let response = self
            .client
            .get_service_incarnation(request)
            .await
            .map_err(|status| error_from_status(&status))?;
        Ok(response.into_inner().service_incarnation)
    }
}
