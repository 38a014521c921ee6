//! Values exchanged with the Instance Launch Service

use thiserror::Error;

use super::classify::{ErrorClass, classify};

/// Shape requested when none is configured
pub const DEFAULT_SHAPE: &str = "VM.Standard.A1.Flex";

/// Everything needed to ask the provider for one instance.
///
/// Built once from configuration before the retry loop starts and never
/// mutated afterwards; every attempt sends the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub compartment_id: String,
    pub availability_domain: String,
    pub display_name: String,
    pub shape: String,
    pub ocpus: f32,
    pub memory_in_gbs: f32,
    pub image_id: String,
    pub subnet_id: String,
    pub assign_public_ip: bool,
    pub ssh_public_key: String,
}

/// Descriptor of an instance the provider confirmed as created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedInstance {
    pub id: String,
    pub lifecycle_state: String,
    pub display_name: String,
}

/// Why a single launch attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    /// The provider answered with a structured error
    #[error("API error {status} ({code}): {message}")]
    Service { status: u16, code: String, message: String },

    /// No structured response: network failure, undecodable body, ...
    #[error("Transport error: {0}")]
    Transport(String),
}

impl LaunchError {
    /// Shorthand for a provider error response
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        LaunchError::Service {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Retry class of this failure
    pub fn class(&self) -> ErrorClass {
        match self {
            LaunchError::Service { status, message, .. } => classify(*status, message),
            LaunchError::Transport(_) => ErrorClass::TransportError,
        }
    }

    /// HTTP status of the provider response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            LaunchError::Service { status, .. } => Some(*status),
            LaunchError::Transport(_) => None,
        }
    }
}

/// Result of one launch attempt: `Ok` is the created instance
pub type LaunchOutcome = Result<LaunchedInstance, LaunchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = LaunchError::service(500, "InternalError", "Out of host capacity.");
        assert_eq!(err.to_string(), "API error 500 (InternalError): Out of host capacity.");
    }

    #[test]
    fn test_service_error_class() {
        assert_eq!(
            LaunchError::service(500, "InternalError", "Out of capacity for shape VM.Standard.A1.Flex").class(),
            ErrorClass::CapacityExhausted
        );
        assert_eq!(
            LaunchError::service(429, "TooManyRequests", "Too many requests for the user").class(),
            ErrorClass::RateLimited
        );
        assert_eq!(
            LaunchError::service(404, "NotAuthorizedOrNotFound", "Authorization failed or requested resource not found").class(),
            ErrorClass::ClientConfigError
        );
    }

    #[test]
    fn test_transport_error_class() {
        let err = LaunchError::Transport("connection reset by peer".to_string());
        assert_eq!(err.class(), ErrorClass::TransportError);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(LaunchError::service(401, "NotAuthenticated", "bad signature").status(), Some(401));
    }
}
