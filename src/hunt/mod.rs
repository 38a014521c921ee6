//! Provisioning retry loop
//!
//! This module provides the core hunt logic, including:
//! - Hunter, the state machine that repeats launch attempts
//! - RetryPolicy for the per-class delay between attempts
//! - Sleeper seam with the tokio-backed and recording implementations

mod hunter;
mod policy;
mod sleeper;

pub use hunter::{HuntOutcome, Hunter};
pub use policy::{DEFAULT_RETRY_INTERVAL, RATE_LIMIT_COOLDOWN, RetryPolicy};
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
