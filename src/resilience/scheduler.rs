//! Bounded retry loop with backoff, deadline, and cancellation.
//!
//! # Responsibilities
//! - Drive an async operation until success, terminal failure, deadline
//!   exhaustion, or cancellation
//! - Apply exponential backoff with jitter between retryable failures
//!
//! # Design Decisions
//! - The operation classifies each failure as retryable or terminal;
//!   only retryable failures consume backoff
//! - Exhaustion reports the attempt count and the last retryable failure
//!   so the caller can pick the right timeout kind
//! - Cancellation is distinct from exhaustion and is checked both before
//!   each attempt and during the backoff sleep
//! - Uses tokio timers; tests run on the paused clock (no real delays)

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::resilience::backoff;
use crate::resilience::cancel::CancelToken;

/// Retry behaviour for one polling loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts, or unbounded-until-deadline when `None`.
    pub max_attempts: Option<u32>,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Growth factor applied per attempt.
    pub multiplier: f64,
    /// Ceiling on any single delay.
    pub max_delay: Duration,
    /// Fraction of the delay added as random jitter (0.0..=1.0).
    pub jitter: f64,
    /// Overall budget for the whole loop, attempts and sleeps included.
    pub deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            base_delay: Duration::from_secs(1),
            multiplier: 1.5,
            max_delay: Duration::from_secs(10),
            jitter: 0.1,
            deadline: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Copy of this policy with the overall deadline replaced.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Classification of a failed attempt, decided by the operation.
#[derive(Debug)]
pub enum AttemptError<E> {
    /// Transient; consumes backoff and continues the loop.
    Retryable(E),
    /// Aborts the loop immediately.
    Terminal(E),
}

/// Why a retry loop stopped without success.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The operation reported a terminal failure.
    Terminal(E),
    /// Attempts or deadline ran out. Carries the last retryable failure
    /// observed, if any.
    Exhausted { attempts: u32, last: Option<E> },
    /// The cancel token fired.
    Cancelled,
}

/// Run `op` under `policy` until it succeeds or the loop stops.
///
/// `op` receives the 1-based attempt number.
pub async fn execute<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError<E>>>,
{
    let deadline = tokio::time::Instant::now() + policy.deadline;
    let mut attempt: u32 = 0;
    let mut last: Option<E> = None;

    loop {
        attempt += 1;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            outcome = op(attempt) => outcome,
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(AttemptError::Terminal(e)) => return Err(RetryError::Terminal(e)),
            Err(AttemptError::Retryable(e)) => {
                tracing::debug!(attempt, error = %e, "attempt failed, retrying");
                last = Some(e);
            }
        }

        if let Some(max) = policy.max_attempts {
            if attempt >= max {
                return Err(RetryError::Exhausted { attempts: attempt, last });
            }
        }

        let delay = backoff::delay_after_attempt(attempt, policy);
        if tokio::time::Instant::now() + delay >= deadline {
            return Err(RetryError::Exhausted { attempts: attempt, last });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn no_jitter_policy() -> RetryPolicy {
        RetryPolicy {
            jitter: 0.0,
            ..RetryPolicy::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let policy = no_jitter_policy();
        let cancel = CancelToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<u32, RetryError<String>> = execute(&policy, &cancel, move |attempt| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 {
                    Err(AttemptError::Retryable("not ready".to_string()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_stops_immediately() {
        let policy = no_jitter_policy();
        let cancel = CancelToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), RetryError<String>> = execute(&policy, &cancel, move |_| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(AttemptError::Terminal("rejected".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Terminal(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exhaustion_follows_schedule() {
        // base 1s, x1.5, deadline 5s: sleeps of 1s, 1.5s, 2.25s fit;
        // the fourth delay would cross the deadline.
        let policy = no_jitter_policy().with_deadline(Duration::from_secs(5));
        let cancel = CancelToken::new();

        let start = tokio::time::Instant::now();
        let result: Result<(), RetryError<String>> = execute(&policy, &cancel, |_| async {
            Err(AttemptError::Retryable("not ready".to_string()))
        })
        .await;

        match result {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 4);
                assert_eq!(last.as_deref(), Some("not ready"));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_attempts_bound() {
        let policy = RetryPolicy {
            max_attempts: Some(2),
            ..no_jitter_policy()
        };
        let cancel = CancelToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), RetryError<String>> = execute(&policy, &cancel, move |_| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(AttemptError::Retryable("not ready".to_string()))
            }
        })
        .await;

        assert!(matches!(
            result,
            Err(RetryError::Exhausted { attempts: 2, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let policy = no_jitter_policy();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result: Result<(), RetryError<String>> = execute(&policy, &cancel, |_| async {
            Err(AttemptError::Retryable("not ready".to_string()))
        })
        .await;

        assert!(matches!(result, Err(RetryError::Cancelled)));
    }
}
