//! Key-value store behavior through the service façade.

mod common;

use std::sync::Arc;

use common::*;
use coordination_core::{ErrorCode, KeyValueEntry};

#[tokio::test(start_paused = true)]
async fn keys_are_normalized_across_operations() {
    let service = pull_service(config(&[("j", 1)]));

    service.insert_key_value("/a//b", "1", false).await.unwrap();
    assert_eq!(service.try_get_key_value("a/b").await.unwrap(), "1");
    assert_eq!(
        service.get_key_value_dir("a").await,
        vec![KeyValueEntry {
            key: "a/b".into(),
            value: "1".into()
        }]
    );
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn insert_without_overwrite_fails_on_existing_key() {
    let service = pull_service(config(&[("j", 1)]));

    service.insert_key_value("k", "1", false).await.unwrap();
    let err = service.insert_key_value("k", "2", false).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    assert_eq!(service.try_get_key_value("k").await.unwrap(), "1");

    service.insert_key_value("k", "2", true).await.unwrap();
    assert_eq!(service.try_get_key_value("k").await.unwrap(), "2");
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn try_get_missing_key_is_not_found() {
    let service = pull_service(config(&[("j", 1)]));
    let err = service.try_get_key_value("missing").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn get_blocks_until_a_matching_insert() {
    let service = pull_service(config(&[("j", 1)]));

    let waiter = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.get_key_value("pending/key").await })
    };
    settle().await;
    assert!(!waiter.is_finished());

    service
        .insert_key_value("pending/key", "value", false)
        .await
        .unwrap();
    assert_eq!(waiter.await.unwrap().unwrap(), "value");
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn delete_sweeps_the_key_and_its_directory() {
    let service = pull_service(config(&[("j", 1)]));

    service.insert_key_value("a", "root", false).await.unwrap();
    service.insert_key_value("a/b", "1", false).await.unwrap();
    service.insert_key_value("a/c/d", "2", false).await.unwrap();
    service.insert_key_value("ab", "sibling", false).await.unwrap();

    service.delete_key_value("a").await.unwrap();
    assert!(service.try_get_key_value("a").await.is_err());
    assert!(service.try_get_key_value("a/b").await.is_err());
    assert!(service.try_get_key_value("a/c/d").await.is_err());
    assert_eq!(service.try_get_key_value("ab").await.unwrap(), "sibling");
    service.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_pending_gets() {
    let service = pull_service(config(&[("j", 1)]));

    let waiter = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.get_key_value("never").await })
    };
    settle().await;

    service.stop().await;
    let err = waiter.await.unwrap().unwrap_err();
    assert_eq!(err.code(), ErrorCode::Cancelled);

    // New gets after shutdown resolve immediately instead of parking.
    let err = service.get_key_value("never").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Cancelled);
}
