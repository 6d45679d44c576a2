use keylock::{KeyLock, LockConfig, LockRequest, ReleaseRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_acquire_has_single_winner() {
    let lock = KeyLock::initialize(LockConfig::new()).await;
    let winners = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let lock = lock.clone();
            let winners = winners.clone();
            tokio::spawn(async move {
                let result = lock
                    .acquire(LockRequest::new("shared").value(format!("task-{}", i)))
                    .await
                    .unwrap();
                if result.is_acquired() {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(winners.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_acquire_release_cycles_never_overlap() {
    let lock = KeyLock::initialize(LockConfig::new()).await;
    let holders = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lock = lock.clone();
            let holders = holders.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let result = lock.acquire(LockRequest::new("cycle")).await.unwrap();
                    if let Some(lease) = result.into_lease() {
                        let inside = holders.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(inside, 0, "two holders inside the critical section");
                        tokio::task::yield_now().await;
                        holders.fetch_sub(1, Ordering::SeqCst);
                        lock.release(ReleaseRequest::from(&lease)).await.unwrap();
                    } else {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
}
