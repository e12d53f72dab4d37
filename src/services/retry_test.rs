use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::*;

#[tokio::test]
async fn succeeds_on_first_attempt() {
    let calls = AtomicU32::new(0);
    let result: Result<u32, &str> = with_retry(3, Duration::ZERO, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(7) }
    })
    .await;
    assert_eq!(result, Ok(7));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let calls = AtomicU32::new(0);
    let result: Result<u32, &str> = with_retry(3, Duration::ZERO, || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move { if n < 2 { Err("transient") } else { Ok(42) } }
    })
    .await;
    assert_eq!(result, Ok(42));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let calls = AtomicU32::new(0);
    let result: Result<u32, &str> = with_retry(3, Duration::ZERO, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err("down") }
    })
    .await;
    assert_eq!(result, Err("down"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn single_attempt_does_not_retry() {
    let calls = AtomicU32::new(0);
    let result: Result<u32, &str> = with_retry(1, Duration::ZERO, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err("down") }
    })
    .await;
    assert_eq!(result, Err("down"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
