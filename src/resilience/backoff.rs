//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::resilience::scheduler::RetryPolicy;

/// Calculate the delay that follows `attempt` (1-based).
///
/// Delay grows as `base * multiplier^(attempt - 1)`, capped at the
/// policy ceiling, with up to `jitter` fraction of random spread added
/// to decorrelate pollers.
pub fn delay_after_attempt(attempt: u32, policy: &RetryPolicy) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let base_ms = policy.base_delay.as_millis() as f64;
    let factor = policy
        .multiplier
        .max(1.0)
        .powi(attempt.saturating_sub(1) as i32);
    let delay_ms = (base_ms * factor).min(policy.max_delay.as_millis() as f64);

    let jitter_ms = if policy.jitter > 0.0 {
        let spread = delay_ms * policy.jitter.clamp(0.0, 1.0);
        if spread >= 1.0 {
            rand::thread_rng().gen_range(0.0..spread)
        } else {
            0.0
        }
    } else {
        0.0
    };

    Duration::from_millis((delay_ms + jitter_ms) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(base_ms: u64, multiplier: f64, max_ms: u64, jitter: f64) -> RetryPolicy {
        RetryPolicy {
            max_attempts: None,
            base_delay: Duration::from_millis(base_ms),
            multiplier,
            max_delay: Duration::from_millis(max_ms),
            jitter,
            deadline: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_backoff_growth() {
        let p = policy(1000, 1.5, 10_000, 0.0);
        assert_eq!(delay_after_attempt(1, &p), Duration::from_millis(1000));
        assert_eq!(delay_after_attempt(2, &p), Duration::from_millis(1500));
        assert_eq!(delay_after_attempt(3, &p), Duration::from_millis(2250));
    }

    #[test]
    fn test_backoff_ceiling() {
        let p = policy(1000, 2.0, 4000, 0.0);
        assert_eq!(delay_after_attempt(10, &p), Duration::from_millis(4000));
    }

    #[test]
    fn test_jitter_bounds() {
        let p = policy(1000, 1.0, 1000, 0.1);
        for _ in 0..50 {
            let d = delay_after_attempt(1, &p).as_millis() as u64;
            assert!((1000..1100).contains(&d), "delay {} out of jitter range", d);
        }
    }
}
