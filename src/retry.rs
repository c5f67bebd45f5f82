//! Bounded retry with fixed delay and error classification.
//!
//! Wraps a single generation call. Transient errors trigger a fixed
//! `retry_delay` wait and a reattempt; fatal errors abort immediately
//! without consuming the budget and bubble unmodified. The sleep is
//! injectable so tests can assert retry timing without real waiting.

use crate::error::{Error, Result};
use crate::{log_debug, log_warn};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Substitutable delay source.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs an operation with bounded reattempts.
pub struct RetryController {
    max_retries: u32,
    retry_delay: Duration,
    cancel: CancellationToken,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryController {
    pub fn new(max_retries: u32, retry_delay: Duration, cancel: CancellationToken) -> Self {
        Self {
            max_retries,
            retry_delay,
            cancel,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the delay source. Used by tests to assert timing.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Run `op` until it succeeds, fails fatally, or the attempt budget is
    /// exhausted.
    ///
    /// Success on any attempt returns immediately and is never retried.
    /// Exhaustion returns [`Error::GenerationFailed`] carrying the last
    /// underlying error and the attempt count. Cancellation interrupts a
    /// mid-retry delay and surfaces [`Error::Cancelled`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempts: u32 = 0;
        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            attempts += 1;
            log_debug!("Generation attempt {}/{}", attempts, self.max_retries);

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    if attempts >= self.max_retries {
                        return Err(Error::GenerationFailed {
                            attempts,
                            source: Box::new(e),
                        });
                    }
                    log_warn!(
                        "Attempt {} failed ({}), retrying in {:?}",
                        attempts,
                        e,
                        self.retry_delay
                    );
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => return Err(Error::Cancelled),
                        () = self.sleeper.sleep(self.retry_delay) => {}
                    }
                }
                // Fatal errors bubble unmodified and consume no budget.
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().push(duration);
        }
    }

    /// Cancels the token instead of sleeping, then never completes.
    struct CancellingSleeper {
        cancel: CancellationToken,
    }

    #[async_trait]
    impl Sleeper for CancellingSleeper {
        async fn sleep(&self, _duration: Duration) {
            self.cancel.cancel();
            futures::future::pending::<()>().await;
        }
    }

    fn transient() -> Error {
        Error::TransientProvider {
            message: "503".to_string(),
        }
    }

    fn controller(max_retries: u32) -> (RetryController, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper {
            delays: Mutex::new(Vec::new()),
        });
        let controller =
            RetryController::new(max_retries, Duration::from_secs(2), CancellationToken::new())
                .with_sleeper(sleeper.clone());
        (controller, sleeper)
    }

    #[tokio::test]
    async fn test_retryable_errors_exhaust_budget() {
        let (controller, sleeper) = controller(3);
        let calls = AtomicU32::new(0);

        let err = controller
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(transient()) }
            })
            .await
            .expect_err("must exhaust");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            Error::GenerationFailed { attempts, source } => {
                assert_eq!(attempts, 3);
                assert_eq!(source.kind(), ErrorKind::TransientProvider);
            }
            other => panic!("expected GenerationFailed, got {other:?}"),
        }
        // Two delays between three attempts, all at the fixed interval.
        assert_eq!(
            *sleeper.delays.lock(),
            vec![Duration::from_secs(2), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_without_retry() {
        let (controller, sleeper) = controller(5);
        let calls = AtomicU32::new(0);

        let err = controller
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<(), _>(Error::ProviderAuth {
                        provider: "openai".to_string(),
                        message: "invalid key".to_string(),
                    })
                }
            })
            .await
            .expect_err("must fail");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(err.kind(), ErrorKind::ProviderAuth);
        assert!(sleeper.delays.lock().is_empty());
    }

    #[tokio::test]
    async fn test_success_after_transient_failures() {
        let (controller, sleeper) = controller(5);
        let calls = AtomicU32::new(0);

        let result = controller
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(transient())
                    } else {
                        Ok("generated".to_string())
                    }
                }
            })
            .await
            .expect("third attempt succeeds");

        assert_eq!(result, "generated");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.delays.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_immediate_success_never_sleeps() {
        let (controller, sleeper) = controller(3);
        let result = controller.run(|| async { Ok(42) }).await.expect("ok");
        assert_eq!(result, 42);
        assert!(sleeper.delays.lock().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_retry_delay() {
        let cancel = CancellationToken::new();
        let controller = RetryController::new(5, Duration::from_secs(30), cancel.clone())
            .with_sleeper(Arc::new(CancellingSleeper { cancel }));
        let calls = AtomicU32::new(0);

        let err = controller
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(transient()) }
            })
            .await
            .expect_err("cancelled");

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_runs_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let controller = RetryController::new(3, Duration::from_secs(1), cancel);
        let calls = AtomicU32::new(0);

        let err = controller
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await
            .expect_err("cancelled");

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
