//! Launch service trait and a scripted mock

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{LaunchError, LaunchOutcome, LaunchRequest};

/// Something that can try to create a compute instance.
///
/// Returns the created instance or a failure the retry loop can classify.
#[async_trait]
pub trait LaunchService: Send + Sync {
    async fn launch(&self, request: &LaunchRequest) -> LaunchOutcome;
}

/// Launch service that replays scripted outcomes in order.
///
/// Every request it receives is recorded. Once the script runs dry each
/// further call fails with a transport error.
#[derive(Debug, Default)]
pub struct MockLaunchService {
    outcomes: Mutex<VecDeque<LaunchOutcome>>,
    requests: Mutex<Vec<LaunchRequest>>,
}

impl MockLaunchService {
    pub fn new(outcomes: Vec<LaunchOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of launch calls made so far
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Copies of every request received, in call order
    pub fn requests(&self) -> Vec<LaunchRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LaunchService for MockLaunchService {
    async fn launch(&self, request: &LaunchRequest) -> LaunchOutcome {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut outcomes| outcomes.pop_front())
            .unwrap_or_else(|| Err(LaunchError::Transport("mock launch service exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::LaunchedInstance;

    fn request() -> LaunchRequest {
        LaunchRequest {
            compartment_id: "ocid1.compartment.oc1..aaa".to_string(),
            availability_domain: "Uocm:EU-FRANKFURT-1-AD-1".to_string(),
            display_name: "ampere-free".to_string(),
            shape: "VM.Standard.A1.Flex".to_string(),
            ocpus: 4.0,
            memory_in_gbs: 24.0,
            image_id: "ocid1.image.oc1..bbb".to_string(),
            subnet_id: "ocid1.subnet.oc1..ccc".to_string(),
            assign_public_ip: true,
            ssh_public_key: "ssh-ed25519 AAAA test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let instance = LaunchedInstance {
            id: "ocid1.instance.test.1".to_string(),
            lifecycle_state: "PROVISIONING".to_string(),
            display_name: "ampere-free".to_string(),
        };
        let mock = MockLaunchService::new(vec![
            Err(LaunchError::service(429, "TooManyRequests", "slow down")),
            Ok(instance.clone()),
        ]);

        assert_eq!(mock.launch(&request()).await.unwrap_err().status(), Some(429));
        assert_eq!(mock.launch(&request()).await.unwrap(), instance);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_mock_exhausted_is_transport_error() {
        let mock = MockLaunchService::new(vec![]);
        let err = mock.launch(&request()).await.unwrap_err();
        assert!(matches!(err, LaunchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let mock = MockLaunchService::new(vec![]);
        let _ = mock.launch(&request()).await;
        assert_eq!(mock.requests(), vec![request()]);
    }
}
