//! Instance Launch Service seam
//!
//! This module provides:
//! - The immutable launch request and the created-instance descriptor
//! - LaunchError and its classification into retry classes
//! - LaunchService trait with a scripted MockLaunchService

pub mod classify;
pub mod service;
pub mod types;

pub use classify::{ErrorClass, classify};
pub use service::{LaunchService, MockLaunchService};
pub use types::{DEFAULT_SHAPE, LaunchError, LaunchOutcome, LaunchRequest, LaunchedInstance};
