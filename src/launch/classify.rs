//! Classification of provider error responses into retry classes.
//!
//! Capacity shortages come back as a 500 whose message names the missing
//! capacity, throttling as a 429, and bad identifiers or credentials as
//! 400/401/404. Everything else is treated as a transient service error.

use std::fmt;

/// Message fragments the provider uses when the shape has no free capacity
const CAPACITY_MARKERS: [&str; 2] = ["out of capacity", "out of host capacity"];

/// Statuses that mean the request itself is wrong and waiting will not help
const CLIENT_CONFIG_STATUSES: [u16; 3] = [400, 401, 404];

/// Retry class of a failed launch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    CapacityExhausted,
    RateLimited,
    ClientConfigError,
    OtherServiceError,
    TransportError,
}

impl ErrorClass {
    /// Only client configuration errors stop the hunt
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorClass::ClientConfigError)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::CapacityExhausted => "capacity exhausted",
            ErrorClass::RateLimited => "rate limited",
            ErrorClass::ClientConfigError => "client configuration error",
            ErrorClass::OtherServiceError => "service error",
            ErrorClass::TransportError => "transport error",
        };
        f.write_str(name)
    }
}

/// Classify a provider error response by status code and message
pub fn classify(status: u16, message: &str) -> ErrorClass {
    if status == 429 {
        return ErrorClass::RateLimited;
    }
    if CLIENT_CONFIG_STATUSES.contains(&status) {
        return ErrorClass::ClientConfigError;
    }
    if status == 500 && is_capacity_message(message) {
        return ErrorClass::CapacityExhausted;
    }
    ErrorClass::OtherServiceError
}

fn is_capacity_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    CAPACITY_MARKERS.iter().any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_capacity() {
        assert_eq!(
            classify(500, "Out of capacity for shape VM.Standard.A1.Flex in availability domain AD-1"),
            ErrorClass::CapacityExhausted
        );
    }

    #[test]
    fn test_out_of_host_capacity() {
        assert_eq!(classify(500, "Out of host capacity."), ErrorClass::CapacityExhausted);
    }

    #[test]
    fn test_500_without_capacity_message() {
        assert_eq!(classify(500, "Internal server error"), ErrorClass::OtherServiceError);
    }

    #[test]
    fn test_capacity_message_needs_500() {
        assert_eq!(classify(503, "Out of capacity"), ErrorClass::OtherServiceError);
    }

    #[test]
    fn test_rate_limited() {
        assert_eq!(classify(429, "Too many requests"), ErrorClass::RateLimited);
        assert_eq!(classify(429, "Out of capacity"), ErrorClass::RateLimited);
    }

    #[test]
    fn test_client_config_errors() {
        for status in [400, 401, 404] {
            assert_eq!(classify(status, "whatever"), ErrorClass::ClientConfigError);
        }
    }

    #[test]
    fn test_other_client_statuses_keep_retrying() {
        assert_eq!(classify(403, "Forbidden"), ErrorClass::OtherServiceError);
        assert_eq!(classify(409, "Conflict"), ErrorClass::OtherServiceError);
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorClass::CapacityExhausted.is_retryable());
        assert!(ErrorClass::RateLimited.is_retryable());
        assert!(ErrorClass::OtherServiceError.is_retryable());
        assert!(ErrorClass::TransportError.is_retryable());
        assert!(!ErrorClass::ClientConfigError.is_retryable());
    }
}
