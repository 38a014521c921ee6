//! Error types for Reservator
//!
//! Centralized error handling using thiserror. Launch attempt failures have
//! their own type in [`crate::launch::LaunchError`] since the retry loop
//! classifies them instead of propagating them.

use thiserror::Error;

/// Errors raised while preparing to talk to the provider
#[derive(Debug, Error)]
pub enum ReservatorError {
    /// Missing or malformed configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Provider credentials or key material problem
    #[error("Auth error: {0}")]
    Auth(String),
}

/// Result type alias for Reservator operations
pub type Result<T> = std::result::Result<T, ReservatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = ReservatorError::Config("profile DEFAULT not found".to_string());
        assert_eq!(err.to_string(), "Config error: profile DEFAULT not found");
    }

    #[test]
    fn test_auth_error() {
        let err = ReservatorError::Auth("unsupported key format".to_string());
        assert_eq!(err.to_string(), "Auth error: unsupported key format");
    }
}
