use keylock::{Acquisition, KeyLock, KeyLockError, LockConfig, LockRequest, ReleaseRequest};
use std::time::Duration;

async fn memory_lock() -> KeyLock {
    KeyLock::initialize(LockConfig::new()).await
}

#[tokio::test]
async fn test_acquire_returns_given_value() {
    let lock = memory_lock().await;

    let result = lock
        .acquire(LockRequest::new("job-1").value("owner-a").expires(2))
        .await
        .unwrap();

    assert_eq!(result.value(), Some("owner-a"));
    assert_eq!(result.status(), 200);
}

#[tokio::test]
async fn test_acquire_generates_value_when_missing() {
    let lock = memory_lock().await;

    let lease = lock
        .acquire(LockRequest::new("job-1"))
        .await
        .unwrap()
        .into_lease()
        .expect("lock should be granted");

    assert!(!lease.value.is_empty());
    assert_eq!(lease.key, "job-1");
    assert!(!lease.is_expired());
}

#[tokio::test]
async fn test_second_acquire_is_locked() {
    let lock = memory_lock().await;

    let first = lock.acquire(LockRequest::new("job-1").expires(2)).await.unwrap();
    assert!(first.is_acquired());

    let second = lock
        .acquire(LockRequest::new("job-1").value("intruder"))
        .await
        .unwrap();
    assert_eq!(second, Acquisition::Locked);
    assert_eq!(second.status(), 423);
}

#[tokio::test]
async fn test_distinct_keys_do_not_contend() {
    let lock = memory_lock().await;

    assert!(lock.acquire(LockRequest::new("a")).await.unwrap().is_acquired());
    assert!(lock.acquire(LockRequest::new("b")).await.unwrap().is_acquired());
}

#[tokio::test]
async fn test_acquire_without_key_is_a_caller_error() {
    let lock = memory_lock().await;

    let result = lock
        .acquire(LockRequest::default().value("owner-a").expires(2))
        .await;
    let err = result.unwrap_err();
    assert!(matches!(err, KeyLockError::KeyRequired { .. }));
    assert!(err.is_caller_error());

    let empty = lock.acquire(LockRequest::new("")).await;
    assert!(matches!(empty, Err(KeyLockError::KeyRequired { .. })));
}

#[tokio::test]
async fn test_lock_is_free_again_after_expiry() {
    let lock = memory_lock().await;

    let first = lock
        .acquire(LockRequest::new("job-1").expires(2))
        .await
        .unwrap();
    assert!(first.is_acquired());

    let contended = lock.acquire(LockRequest::new("job-1")).await.unwrap();
    assert_eq!(contended.status(), 423);

    tokio::time::sleep(Duration::from_millis(2200)).await;

    let again = lock
        .acquire(LockRequest::new("job-1").value("v2").expires(2))
        .await
        .unwrap();
    assert_eq!(again.value(), Some("v2"));

    let released = lock
        .release(ReleaseRequest::new("job-1").value("v2"))
        .await
        .unwrap();
    assert_eq!(released.status(), 200);
}

#[tokio::test]
async fn test_default_expiry_applies_for_bad_expires() {
    let config = LockConfig::new().with_default_expiry(Duration::from_millis(300));
    let lock = KeyLock::initialize(config).await;

    let lease = lock
        .acquire(LockRequest::new("job-1").expires(-5))
        .await
        .unwrap();
    assert!(lease.is_acquired());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let again = lock
        .acquire(LockRequest::new("job-1").expires_str("not-a-number"))
        .await
        .unwrap();
    assert!(again.is_acquired(), "default expiry should have elapsed");
}

#[tokio::test]
async fn test_reinitialize_replaces_previous_state() {
    let lock = memory_lock().await;
    lock.acquire(LockRequest::new("job-1")).await.unwrap();

    let lock = memory_lock().await;
    let result = lock.acquire(LockRequest::new("job-1")).await.unwrap();
    assert!(result.is_acquired());
}

#[tokio::test]
async fn test_very_long_expiry_is_accepted() {
    let lock = memory_lock().await;

    let first = lock
        .acquire(LockRequest::new("forever").expires(i64::MAX))
        .await
        .unwrap();
    assert!(first.is_acquired());

    let second = lock
        .acquire(LockRequest::new("forever-too").expires_in(Duration::MAX))
        .await
        .unwrap();
    assert!(second.is_acquired());

    let contended = lock.acquire(LockRequest::new("forever-too")).await.unwrap();
    assert_eq!(contended.status(), 423);
}
