//! Push and pull error propagation.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use coordination_core::{CoordinationError, ErrorCode, ServiceConfig, TaskStatus};

#[tokio::test(start_paused = true)]
async fn reported_error_is_pushed_to_connected_tasks() {
    let directory = RecordingDirectory::new();
    let service = push_service(config(&[("j", 3)]), &directory);
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    let task2 = task("j", 2);
    service.register_task(&task0, 1).await.unwrap();
    service.register_task(&task1, 2).await.unwrap();
    // task2 never registers and must not receive a report.

    service
        .report_task_error(&task1, CoordinationError::internal("gpu wedged"))
        .await
        .unwrap();
    settle().await;

    let states = service.task_states(&[task1.clone()]).await;
    assert_eq!(states[0].status, TaskStatus::Error);

    let reports = directory.reports_to(&task0);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].error_code, ErrorCode::Internal);
    assert_eq!(reports[0].error_message, "gpu wedged");
    assert_eq!(reports[0].source_task, task1);
    assert!(reports[0].is_reported_by_task);
    assert!(directory.reports_to(&task2).is_empty());
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn recoverable_job_errors_are_not_propagated() {
    let directory = RecordingDirectory::new();
    let service = push_service(
        ServiceConfig {
            recoverable_jobs: vec!["preemptible".into()],
            ..config(&[("j", 1), ("preemptible", 1)])
        },
        &directory,
    );
    let worker = task("j", 0);
    let preemptible = task("preemptible", 0);
    service.register_task(&worker, 1).await.unwrap();
    service.register_task(&preemptible, 2).await.unwrap();

    service
        .report_task_error(&preemptible, CoordinationError::internal("preempted"))
        .await
        .unwrap();
    settle().await;

    let states = service.task_states(&[preemptible.clone()]).await;
    assert_eq!(states[0].status, TaskStatus::Error);
    assert!(directory.reports().is_empty());
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn report_task_error_requires_a_connected_task() {
    let directory = RecordingDirectory::new();
    let service = push_service(config(&[("j", 1)]), &directory);
    let task0 = task("j", 0);

    let err = service
        .report_task_error(&task0, CoordinationError::internal("early"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::FailedPrecondition);

    let err = service
        .report_task_error(&task("ghost", 0), CoordinationError::internal("x"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn poll_resolves_with_the_first_cluster_error() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    service.register_task(&task0, 1).await.unwrap();
    service.register_task(&task1, 2).await.unwrap();

    let poll = {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        tokio::spawn(async move { service.poll_for_error(&task0).await })
    };
    settle().await;
    assert!(!poll.is_finished());

    service
        .report_task_error(&task1, CoordinationError::unavailable("link down"))
        .await
        .unwrap();

    let error = poll.await.unwrap();
    assert_eq!(error.code(), ErrorCode::Unavailable);
    assert_eq!(error.message(), "link down");
    let payload = error.payload().unwrap();
    assert_eq!(payload.source_task.as_ref(), Some(&task1));
    assert!(payload.is_reported_error);

    // The response is latched: later polls observe the same error, and a
    // poller already in error is turned away.
    let error = service.poll_for_error(&task0).await;
    assert_eq!(error.code(), ErrorCode::Unavailable);
    let error = service.poll_for_error(&task1).await;
    assert_eq!(error.code(), ErrorCode::FailedPrecondition);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn poll_is_rejected_in_push_mode() {
    let directory = RecordingDirectory::new();
    let service = push_service(config(&[("j", 1)]), &directory);
    let task0 = task("j", 0);
    service.register_task(&task0, 1).await.unwrap();

    let error = service.poll_for_error(&task0).await;
    assert_eq!(error.code(), ErrorCode::Internal);
    assert!(error.message().contains("error polling"));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn poll_from_unknown_or_disconnected_task_is_rejected() {
    let service = pull_service(config(&[("j", 1)]));

    let error = service.poll_for_error(&task("ghost", 0)).await;
    assert_eq!(error.code(), ErrorCode::InvalidArgument);

    advance_and_settle(Duration::from_millis(1)).await;
    let error = service.poll_for_error(&task("j", 0)).await;
    assert_eq!(error.code(), ErrorCode::FailedPrecondition);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn heartbeat_timeout_without_pollers_stops_the_service() {
    let service = pull_service(config(&[("j", 1)]));
    let task0 = task("j", 0);
    service.register_task(&task0, 1).await.unwrap();

    for _ in 0..12 {
        advance_and_settle(Duration::from_secs(1)).await;
    }

    let err = service.register_task(&task0, 2).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);
    assert!(err.message().contains("has stopped"));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn heartbeat_timeout_with_a_poller_delivers_the_aggregate_error() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    service.register_task(&task0, 1).await.unwrap();
    service.register_task(&task1, 2).await.unwrap();

    let poll = {
        let service = Arc::clone(&service);
        let task1 = task1.clone();
        tokio::spawn(async move { service.poll_for_error(&task1).await })
    };
    settle().await;

    // task1 keeps heartbeating; task0 goes silent and times out.
    for _ in 0..12 {
        advance_and_settle(Duration::from_secs(1)).await;
        let _ = service.record_heartbeat(&task1, 2).await;
    }

    let error = poll.await.unwrap();
    assert_eq!(error.code(), ErrorCode::Unavailable);
    assert!(error.message().contains("unhealthy"));
    assert!(error.message().contains("/job:j/replica:0/task:0"));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_pending_polls() {
    let service = pull_service(config(&[("j", 1)]));
    let task0 = task("j", 0);
    service.register_task(&task0, 1).await.unwrap();

    let poll = {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        tokio::spawn(async move { service.poll_for_error(&task0).await })
    };
    settle().await;

    service.stop().await;
    let error = poll.await.unwrap();
    assert_eq!(error.code(), ErrorCode::Cancelled);

    let error = service.poll_for_error(&task0).await;
    assert_eq!(error.code(), ErrorCode::Internal);
}
