//! Reservator - keeps trying to launch a capacity-constrained OCI instance
//!
//! Free-tier Ampere A1 capacity is scarce, so launches fail with "out of
//! capacity" until a slot frees up. Reservator retries the same launch request
//! until it succeeds, backing off on rate limits and stopping on requests the
//! provider will never accept.

pub mod error;
pub mod hunt;
pub mod launch;
pub mod oci;

pub use error::{ReservatorError, Result};
