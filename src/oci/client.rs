//! Compute API client implementing the launch service

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};

use super::auth::{OciProfile, RequestSigner, http_date};
use super::models::{Instance, LaunchInstanceDetails, ServiceErrorBody};
use crate::error::{ReservatorError, Result};
use crate::launch::{LaunchError, LaunchOutcome, LaunchRequest, LaunchService};

/// Path of the LaunchInstance operation
const LAUNCH_INSTANCE_PATH: &str = "/20160918/instances/";

/// Public Core Services endpoint of a region
pub fn endpoint_for_region(region: &str) -> String {
    format!("https://iaas.{}.oraclecloud.com", region)
}

/// Signed client for the Core Services compute API
#[derive(Debug)]
pub struct ComputeClient {
    client: Client,
    launch_url: Url,
    host: String,
    signer: RequestSigner,
}

impl ComputeClient {
    /// Create a client talking to `endpoint` (scheme and authority, no path)
    pub fn new(endpoint: &str, signer: RequestSigner) -> Result<Self> {
        let launch_url = Url::parse(&format!("{}{}", endpoint.trim_end_matches('/'), LAUNCH_INSTANCE_PATH))
            .map_err(|e| ReservatorError::Config(format!("invalid endpoint {}: {}", endpoint, e)))?;

        let host = match (launch_url.host_str(), launch_url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(ReservatorError::Config(format!("endpoint {} has no host", endpoint))),
        };

        // No request timeout: a launch call either answers or fails at the transport.
        let client = Client::builder()
            .build()
            .map_err(|e| ReservatorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            launch_url,
            host,
            signer,
        })
    }

    /// Create a client for a CLI profile, using its region's endpoint unless overridden
    pub fn from_profile(profile: &OciProfile, endpoint: Option<&str>) -> Result<Self> {
        let signer = RequestSigner::from_profile(profile)?;
        let endpoint = endpoint
            .map(str::to_string)
            .unwrap_or_else(|| endpoint_for_region(&profile.region));
        Self::new(&endpoint, signer)
    }

    pub fn launch_url(&self) -> &Url {
        &self.launch_url
    }

    async fn launch_instance(&self, details: &LaunchInstanceDetails) -> LaunchOutcome {
        let body = serde_json::to_vec(details)
            .map_err(|e| LaunchError::Transport(format!("Failed to encode request: {}", e)))?;
        let signed = self
            .signer
            .sign_post(&self.host, self.launch_url.path(), &body, &http_date());

        let response = self
            .client
            .post(self.launch_url.clone())
            .header("date", &signed.date)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .header("x-content-sha256", &signed.content_sha256)
            .header("authorization", &signed.authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| LaunchError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if let Some(request_id) = response.headers().get("opc-request-id").and_then(|h| h.to_str().ok()) {
            debug!("LaunchInstance answered {} (opc-request-id {})", status, request_id);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<ServiceErrorBody>(&text) {
                Ok(body) => (body.code, body.message),
                Err(_) => (status.canonical_reason().unwrap_or("Unknown").to_string(), text),
            };
            return Err(LaunchError::Service {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let instance: Instance = response
            .json()
            .await
            .map_err(|e| LaunchError::Transport(format!("Failed to parse response: {}", e)))?;
        Ok(instance.into())
    }
}

#[async_trait]
impl LaunchService for ComputeClient {
    async fn launch(&self, request: &LaunchRequest) -> LaunchOutcome {
        self.launch_instance(&LaunchInstanceDetails::from(request)).await
    }
}
