//! Per-node retry policy: exponential backoff with jitter, gated by the
//! scheduler's retryable-error taxonomy.

use crate::error::SchedulerError;
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_interval: Duration,
    pub backoff_factor: f64,
    pub max_interval: Duration,
    pub jitter: bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            initial_interval: Duration::from_millis(500),
            backoff_factor: 2.0,
            max_interval: Duration::from_secs(30),
            jitter: true,
        }
    }

    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Delay before the next attempt (0-indexed: `attempt` is the
    /// number of attempts already made).
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let base = self.initial_interval.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_interval.as_secs_f64());
        let factor = if self.jitter { rand::thread_rng().gen_range(0.5..=1.5) } else { 1.0 };
        Duration::from_secs_f64(capped * factor)
    }

    /// Whether another attempt should be made, given how many have run
    /// and whether this particular error is even in the retryable set.
    pub fn should_retry(&self, attempt: usize, error: &SchedulerError) -> bool {
        error.is_retryable() && attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_retry_respects_both_attempt_budget_and_taxonomy() {
        let policy = RetryPolicy::new(2);
        let timeout = SchedulerError::NodeTimeout { node: "news".into() };
        let compiled = SchedulerError::GraphCompiled("bad graph".into());

        assert!(policy.should_retry(0, &timeout));
        assert!(policy.should_retry(1, &timeout));
        assert!(!policy.should_retry(2, &timeout));
        assert!(!policy.should_retry(0, &compiled));
    }

    #[test]
    fn delay_never_exceeds_the_configured_ceiling() {
        let policy = RetryPolicy::new(10).with_initial_interval(Duration::from_secs(1)).with_max_interval(Duration::from_secs(5));
        for attempt in 0..10 {
            assert!(policy.delay_for(attempt) <= Duration::from_secs_f64(5.0 * 1.5));
        }
    }
}
