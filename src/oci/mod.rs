//! Oracle Cloud Infrastructure provider
//!
//! This module provides:
//! - CLI profile loading and HTTP request signing
//! - Wire models for the LaunchInstance operation
//! - ComputeClient, the LaunchService used in production

pub mod auth;
pub mod client;
pub mod models;

pub use auth::{DEFAULT_PROFILE, OciProfile, RequestSigner, default_config_file};
pub use client::{ComputeClient, endpoint_for_region};
