//! Cancellable fetch
//!
//! Runs one outbound call on its own task and races it against the caller's
//! [`SearchContext`]. When the context wins, the task is aborted and awaited
//! until it has unwound, so no connection outlives the query. Dropping the
//! fetch itself also aborts the call.

use crate::error::FetchError;
use crate::search::SearchContext;
use std::future::Future;
use tokio_util::task::AbortOnDropHandle;
use tracing::{debug, warn};

/// Run `call` subordinate to `ctx`
pub async fn fetch<F, T>(ctx: &SearchContext, call: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>> + Send + 'static,
    T: Send + 'static,
{
    if let Some(reason) = ctx.err() {
        return Err(reason);
    }

    // Dropping the handle, e.g. when the caller's future is dropped, aborts the call.
    let mut handle = AbortOnDropHandle::new(tokio::spawn(call));

    tokio::select! {
        biased;
        joined = &mut handle => match joined {
            Ok(result) => result,
            Err(e) => Err(FetchError::Request(format!("fetch task failed: {}", e))),
        },
        reason = ctx.done() => {
            handle.abort();
            // Dropping the in-flight future closes its connection; wait for it.
            if let Err(e) = (&mut handle).await {
                if !e.is_cancelled() {
                    warn!("Aborted request failed while unwinding: {}", e);
                }
            }
            debug!("Aborted in-flight request: {}", reason);
            Err(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn never_completes(flag: Arc<AtomicBool>) -> impl Future<Output = Result<(), FetchError>> {
        async move {
            let _guard = DropFlag(flag);
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_completed_call_is_returned() {
        let ctx = SearchContext::background().child_with_timeout(Duration::from_secs(5));
        let value = fetch(&ctx, async { Ok::<_, FetchError>(42) }).await;
        assert_eq!(value, Ok(42));
    }

    #[tokio::test]
    async fn test_transport_error_is_returned_as_is() {
        let ctx = SearchContext::background().child_with_timeout(Duration::from_secs(5));
        let value = fetch(&ctx, async { Err::<(), _>(FetchError::Status(502)) }).await;
        assert_eq!(value, Err(FetchError::Status(502)));
    }

    #[tokio::test]
    async fn test_deadline_aborts_and_drains() {
        let dropped = Arc::new(AtomicBool::new(false));
        let ctx = SearchContext::background().child_with_timeout(Duration::from_millis(20));

        let start = Instant::now();
        let value = fetch(&ctx, never_completes(dropped.clone())).await;

        assert_eq!(value, Err(FetchError::DeadlineExceeded));
        assert!(dropped.load(Ordering::SeqCst), "aborted call must be unwound");
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_cancel_aborts_and_drains() {
        let dropped = Arc::new(AtomicBool::new(false));
        let ctx = SearchContext::background();

        let canceler = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceler.cancel();
        });

        let value = fetch(&ctx, never_completes(dropped.clone())).await;

        assert_eq!(value, Err(FetchError::Canceled));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dropped_fetch_aborts_call() {
        let dropped = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let ctx = SearchContext::background();

        let (flag, done) = (dropped.clone(), finished.clone());
        let call = async move {
            let _guard = DropFlag(flag);
            tokio::time::sleep(Duration::from_millis(300)).await;
            done.store(true, Ordering::SeqCst);
            Ok::<_, FetchError>(())
        };

        let outcome = tokio::time::timeout(Duration::from_millis(20), fetch(&ctx, call)).await;
        assert!(outcome.is_err(), "fetch should still be pending when dropped");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(dropped.load(Ordering::SeqCst), "call must unwind once the fetch is dropped");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!finished.load(Ordering::SeqCst), "call must not finish in the background");
    }

    #[tokio::test]
    async fn test_panicking_call_is_reported() {
        let ctx = SearchContext::background().child_with_timeout(Duration::from_secs(5));
        let value = fetch(&ctx, async {
            if true {
                panic!("adapter bug");
            }
            Ok::<_, FetchError>(())
        })
        .await;
        assert!(matches!(value, Err(FetchError::Request(ref m)) if m.contains("fetch task failed")));
    }

    #[tokio::test]
    async fn test_done_context_skips_call() {
        let called = Arc::new(AtomicBool::new(false));
        let ctx = SearchContext::background();
        ctx.cancel();

        let flag = called.clone();
        let value = fetch(&ctx, async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, FetchError>(())
        })
        .await;

        assert_eq!(value, Err(FetchError::Canceled));
        assert!(!called.load(Ordering::SeqCst));
    }
}
