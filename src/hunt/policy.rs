//! Delay policy between launch attempts.
//!
//! Capacity shortages and unknown failures wait the configured retry interval.
//! A 429 always waits the fixed provider cooldown instead, whatever the
//! interval is set to.

use std::time::Duration;

use crate::launch::ErrorClass;

/// Pause after the provider throttles us.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(120);

/// Retry interval used when nothing is configured.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// How long to wait before the next attempt, per error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait after capacity, service and transport failures.
    pub retry_interval: Duration,
    /// Wait after a rate limit response.
    pub rate_limit_cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_INTERVAL)
    }
}

impl RetryPolicy {
    pub fn new(retry_interval: Duration) -> Self {
        Self {
            retry_interval,
            rate_limit_cooldown: RATE_LIMIT_COOLDOWN,
        }
    }

    /// Delay before retrying after a failure of `class`.
    ///
    /// `None` means the failure is terminal and the hunt must stop.
    pub fn delay_for(&self, class: ErrorClass) -> Option<Duration> {
        if !class.is_retryable() {
            return None;
        }
        match class {
            ErrorClass::RateLimited => Some(self.rate_limit_cooldown),
            _ => Some(self.retry_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retry_interval, Duration::from_secs(60));
        assert_eq!(policy.rate_limit_cooldown, Duration::from_secs(120));
    }

    #[test]
    fn test_retry_interval_classes() {
        let policy = RetryPolicy::new(Duration::from_secs(15));
        for class in [
            ErrorClass::CapacityExhausted,
            ErrorClass::OtherServiceError,
            ErrorClass::TransportError,
        ] {
            assert_eq!(policy.delay_for(class), Some(Duration::from_secs(15)));
        }
    }

    #[test]
    fn test_rate_limit_ignores_retry_interval() {
        for secs in [1, 60, 600] {
            let policy = RetryPolicy::new(Duration::from_secs(secs));
            assert_eq!(policy.delay_for(ErrorClass::RateLimited), Some(Duration::from_secs(120)));
        }
    }

    #[test]
    fn test_client_config_error_is_terminal() {
        assert_eq!(RetryPolicy::default().delay_for(ErrorClass::ClientConfigError), None);
    }

    #[test]
    fn test_delay_follows_retryable() {
        let policy = RetryPolicy::default();
        for class in [
            ErrorClass::CapacityExhausted,
            ErrorClass::RateLimited,
            ErrorClass::OtherServiceError,
            ErrorClass::TransportError,
            ErrorClass::ClientConfigError,
        ] {
            assert_eq!(policy.delay_for(class).is_some(), class.is_retryable(), "{}", class);
        }
    }
}
