//! Barrier rendezvous, cancellation, and the reserved barriers.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use coordination_core::{DeviceInfo, ErrorCode, ServiceConfig, TaskStatus};

#[tokio::test(start_paused = true)]
async fn barrier_passes_when_all_tasks_arrive() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);

    service.register_task(&task0, 7).await.unwrap();
    service.register_task(&task1, 9).await.unwrap();

    let (first, second) = tokio::join!(
        service.barrier("x", Duration::from_secs(1), &task0, &[]),
        service.barrier("x", Duration::from_secs(1), &task1, &[]),
    );
    first.unwrap();
    second.unwrap();

    // A call after the barrier passed returns the stored result.
    service
        .barrier("x", Duration::from_secs(1), &task0, &[])
        .await
        .unwrap();
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn barrier_times_out_naming_the_pending_task() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    service.register_task(&task0, 7).await.unwrap();

    let err = service
        .barrier("x", Duration::from_millis(500), &task0, &[])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DeadlineExceeded);
    assert!(err.message().contains("/job:j/replica:0/task:1"));
    assert!(err.message().contains("1/2"));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn cancelled_barrier_releases_every_pending_caller() {
    let service = pull_service(config(&[("j", 3)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    let task2 = task("j", 2);
    for (t, incarnation) in [(&task0, 1), (&task1, 2), (&task2, 3)] {
        service.register_task(t, incarnation).await.unwrap();
    }

    let first = {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        tokio::spawn(async move {
            service
                .barrier("s", Duration::from_secs(5), &task0, &[])
                .await
        })
    };
    let second = {
        let service = Arc::clone(&service);
        let task1 = task1.clone();
        tokio::spawn(async move {
            service
                .barrier("s", Duration::from_secs(5), &task1, &[])
                .await
        })
    };
    settle().await;

    service.cancel_barrier("s", &task0).await.unwrap();
    let first = first.await.unwrap().unwrap_err();
    let second = second.await.unwrap().unwrap_err();
    for err in [first, second] {
        assert_eq!(err.code(), ErrorCode::Cancelled);
        assert!(err.message().contains("/job:j/replica:0/task:0"));
    }

    // The cancellation is final for late arrivals too.
    let err = service
        .barrier("s", Duration::from_secs(5), &task2, &[])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Cancelled);

    let err = service.cancel_barrier("s", &task0).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::FailedPrecondition);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn repeated_calls_from_an_arrived_task_do_not_complete_the_barrier() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    service.register_task(&task0, 7).await.unwrap();
    service.register_task(&task1, 9).await.unwrap();

    let mut waiters = Vec::new();
    for _ in 0..2 {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        waiters.push(tokio::spawn(async move {
            service
                .barrier("b", Duration::from_secs(60), &task0, &[])
                .await
        }));
    }
    settle().await;
    assert!(waiters.iter().all(|waiter| !waiter.is_finished()));

    service
        .barrier("b", Duration::from_secs(60), &task1, &[])
        .await
        .unwrap();
    for waiter in waiters {
        waiter.await.unwrap().unwrap();
    }
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn conflicting_participant_sets_fail_the_barrier() {
    let service = pull_service(config(&[("j", 3)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    let task2 = task("j", 2);
    for (t, incarnation) in [(&task0, 1), (&task1, 2), (&task2, 3)] {
        service.register_task(t, incarnation).await.unwrap();
    }

    let first = {
        let service = Arc::clone(&service);
        let (task0, task1) = (task0.clone(), task1.clone());
        tokio::spawn(async move {
            let participants = [task0.clone(), task1];
            service
                .barrier("b", Duration::from_secs(60), &task0, &participants)
                .await
        })
    };
    settle().await;

    let participants = [task1.clone(), task2.clone()];
    let err = service
        .barrier("b", Duration::from_secs(60), &task1, &participants)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert!(err.message().contains("conflicting tasks"));

    let err = first.await.unwrap().unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn non_participating_caller_fails_the_barrier() {
    let service = pull_service(config(&[("j", 3)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    let task2 = task("j", 2);
    for (t, incarnation) in [(&task0, 1), (&task1, 2), (&task2, 3)] {
        service.register_task(t, incarnation).await.unwrap();
    }

    let participants = [task0.clone(), task1.clone()];
    let first = {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        let participants = participants.to_vec();
        tokio::spawn(async move {
            service
                .barrier("b", Duration::from_secs(60), &task0, &participants)
                .await
        })
    };
    settle().await;

    let err = service
        .barrier("b", Duration::from_secs(60), &task2, &participants)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert!(err.message().contains("/job:j/replica:0/task:2"));

    let err = first.await.unwrap().unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn barrier_with_undeclared_participant_fails_immediately() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    service.register_task(&task0, 7).await.unwrap();

    let participants = [task0.clone(), task("ghost", 5)];
    let err = service
        .barrier("b", Duration::from_secs(60), &task0, &participants)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert!(err.message().contains("/job:ghost/replica:0/task:5"));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn barrier_with_errored_participant_fails_immediately() {
    let directory = RecordingDirectory::new();
    let service = push_service(config(&[("j", 2)]), &directory);
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    service.register_task(&task0, 7).await.unwrap();
    service.register_task(&task1, 9).await.unwrap();
    service
        .report_task_error(
            &task1,
            coordination_core::CoordinationError::internal("oom"),
        )
        .await
        .unwrap();

    let err = service
        .barrier("b", Duration::from_secs(60), &task0, &[])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);
    assert!(err.message().contains("already in error"));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn disconnect_fails_the_barriers_the_task_was_in() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    service.register_task(&task0, 7).await.unwrap();
    service.register_task(&task1, 9).await.unwrap();

    let waiter = {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        tokio::spawn(async move {
            service
                .barrier("b", Duration::from_secs(3600), &task0, &[])
                .await
        })
    };
    settle().await;

    service.reset_task(&task1).await.unwrap();
    let err = waiter.await.unwrap().unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);
    assert!(err.message().contains("has disconnected"));
    assert!(err.message().contains("/job:j/replica:0/task:1"));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn device_propagation_aggregates_in_task_order() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    service.register_task(&task0, 7).await.unwrap();
    service.register_task(&task1, 9).await.unwrap();

    assert!(service.list_cluster_devices().await.is_empty());

    let first = {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        tokio::spawn(async move {
            service
                .wait_for_all_tasks(&task0, DeviceInfo::from(vec![b"gpu0".to_vec()]))
                .await
        })
    };
    settle().await;
    service
        .wait_for_all_tasks(&task1, DeviceInfo::from(vec![b"gpu1".to_vec()]))
        .await
        .unwrap();
    first.await.unwrap().unwrap();

    let devices = service.list_cluster_devices().await;
    assert_eq!(devices.devices, vec![b"gpu0".to_vec(), b"gpu1".to_vec()]);

    // A repeat call observes the stored result; the aggregate is immutable.
    service
        .wait_for_all_tasks(&task0, DeviceInfo::from(vec![b"other".to_vec()]))
        .await
        .unwrap();
    let devices = service.list_cluster_devices().await;
    assert_eq!(devices.devices, vec![b"gpu0".to_vec(), b"gpu1".to_vec()]);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn device_aggregation_hook_rewrites_the_aggregate() {
    let service = pull_service(config(&[("j", 1)]));
    let task0 = task("j", 0);
    service.register_task(&task0, 7).await.unwrap();
    service
        .set_device_aggregation_function(Box::new(|mut devices| {
            devices.devices.push(b"synthetic".to_vec());
            devices
        }))
        .await;

    service
        .wait_for_all_tasks(&task0, DeviceInfo::from(vec![b"gpu0".to_vec()]))
        .await
        .unwrap();
    let devices = service.list_cluster_devices().await;
    assert_eq!(devices.devices, vec![b"gpu0".to_vec(), b"synthetic".to_vec()]);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_barrier_disconnects_all_tasks() {
    let service = pull_service(ServiceConfig {
        shutdown_barrier_timeout_ms: 5_000,
        ..config(&[("j", 2)])
    });
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    service.register_task(&task0, 7).await.unwrap();
    service.register_task(&task1, 9).await.unwrap();

    let first = {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        tokio::spawn(async move { service.shutdown_task(&task0).await })
    };
    settle().await;
    service.shutdown_task(&task1).await.unwrap();
    first.await.unwrap().unwrap();

    let states = service.task_states(&[task0.clone(), task1.clone()]).await;
    assert!(states
        .iter()
        .all(|info| info.status == TaskStatus::Disconnected));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_barrier_timeout_reports_to_stragglers() {
    let directory = RecordingDirectory::new();
    let service = push_service(
        ServiceConfig {
            shutdown_barrier_timeout_ms: 1_000,
            ..config(&[("j", 2)])
        },
        &directory,
    );
    let task0 = task("j", 0);
    let task1 = task("j", 1);
    service.register_task(&task0, 7).await.unwrap();
    service.register_task(&task1, 9).await.unwrap();

    let err = service.shutdown_task(&task0).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DeadlineExceeded);
    settle().await;

    // The arrived task is disconnected; the straggler gets a synthetic
    // service-originated error.
    let states = service.task_states(&[task0.clone()]).await;
    assert_eq!(states[0].status, TaskStatus::Disconnected);
    let reports = directory.reports_to(&task1);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].error_code, ErrorCode::Internal);
    assert_eq!(reports[0].source_task.job_name, "coordination_service");
    assert!(reports[0].error_message.contains("shutdown barrier"));
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn individual_shutdown_without_barrier_timeout() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    service.register_task(&task0, 7).await.unwrap();

    service.shutdown_task(&task0).await.unwrap();
    let states = service.task_states(&[task0.clone()]).await;
    assert_eq!(states[0].status, TaskStatus::Disconnected);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_aborts_pending_barriers() {
    let service = pull_service(config(&[("j", 2)]));
    let task0 = task("j", 0);
    service.register_task(&task0, 7).await.unwrap();

    let waiter = {
        let service = Arc::clone(&service);
        let task0 = task0.clone();
        tokio::spawn(async move {
            service
                .barrier("b", Duration::from_secs(3600), &task0, &[])
                .await
        })
    };
    settle().await;

    service.stop().await;
    let err = waiter.await.unwrap().unwrap_err();
    assert_eq!(err.code(), ErrorCode::Aborted);
    assert!(err.message().contains("shutting down"));

    let err = service.register_task(&task0, 8).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);
    assert!(err.message().contains("has stopped"));
}
