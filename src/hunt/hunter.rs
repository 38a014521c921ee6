//! The provisioning retry loop.
//!
//! The Hunter sends the same launch request over and over until the provider
//! either creates the instance or rejects the request as misconfigured.

use std::sync::Arc;

use log::{error, info, warn};

use super::policy::RetryPolicy;
use super::sleeper::Sleeper;
use crate::launch::{ErrorClass, LaunchError, LaunchRequest, LaunchService, LaunchedInstance};

/// Terminal state of a hunt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuntOutcome {
    /// The provider created the instance
    Created { instance: LaunchedInstance, attempts: u64 },
    /// A client configuration error stopped the hunt
    Stopped { error: LaunchError, attempts: u64 },
}

impl HuntOutcome {
    /// Number of launch calls made
    pub fn attempts(&self) -> u64 {
        match self {
            HuntOutcome::Created { attempts, .. } | HuntOutcome::Stopped { attempts, .. } => *attempts,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, HuntOutcome::Created { .. })
    }
}

/// Drives launch attempts to success or to a terminal stop.
///
/// Each attempt:
/// 1. Calls the launch service with the unchanged request
/// 2. Logs the attempt number and outcome
/// 3. On a retryable failure: sleeps per the retry policy and tries again
/// 4. On success or a client configuration error: returns without sleeping
pub struct Hunter<L, S>
where
    L: LaunchService,
    S: Sleeper,
{
    /// Provider launch call
    launcher: Arc<L>,
    /// Pause between attempts
    sleeper: S,
    /// Delays per error class
    policy: RetryPolicy,
}

impl<L, S> Hunter<L, S>
where
    L: LaunchService,
    S: Sleeper,
{
    pub fn new(launcher: Arc<L>, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            launcher,
            sleeper,
            policy,
        }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Hunt until the instance exists or the request is rejected for good.
    ///
    /// There is no attempt limit; only success or a client configuration
    /// error ends the loop.
    pub async fn run(&self, request: &LaunchRequest) -> HuntOutcome {
        info!(
            "Starting the hunt for {} ({} OCPUs, {} GB) in {}...",
            request.shape, request.ocpus, request.memory_in_gbs, request.availability_domain
        );

        let mut attempt: u64 = 1;
        loop {
            info!("Attempt #{}...", attempt);

            let error = match self.launcher.launch(request).await {
                Ok(instance) => {
                    log_created(&instance);
                    return HuntOutcome::Created {
                        instance,
                        attempts: attempt,
                    };
                }
                Err(error) => error,
            };

            let class = error.class();
            let delay = match (class, self.policy.delay_for(class)) {
                (_, None) => {
                    error!(
                        "Critical error on attempt #{}: {}. Check your config. Stopping.",
                        attempt, error
                    );
                    return HuntOutcome::Stopped {
                        error,
                        attempts: attempt,
                    };
                }
                (ErrorClass::CapacityExhausted, Some(delay)) => {
                    warn!(
                        "Out of capacity on attempt #{}. Next attempt in {}s...",
                        attempt,
                        delay.as_secs()
                    );
                    delay
                }
                (ErrorClass::RateLimited, Some(delay)) => {
                    warn!("Rate limited on attempt #{}. Waiting {}s...", attempt, delay.as_secs());
                    delay
                }
                (ErrorClass::OtherServiceError, Some(delay)) => {
                    error!("{} on attempt #{}. Next attempt in {}s...", error, attempt, delay.as_secs());
                    delay
                }
                (_, Some(delay)) => {
                    error!(
                        "Unexpected error on attempt #{}: {}. Next attempt in {}s...",
                        attempt,
                        error,
                        delay.as_secs()
                    );
                    delay
                }
            };

            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

fn log_created(instance: &LaunchedInstance) {
    info!("SUCCESS! Instance created!");
    info!("   ID:     {}", instance.id);
    info!("   State:  {}", instance.lifecycle_state);
    info!("   Name:   {}", instance.display_name);
    info!("Check the OCI console for the public IP address, it is assigned asynchronously");
}
