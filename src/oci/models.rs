//! Wire models for the Core Services compute API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::launch::{LaunchRequest, LaunchedInstance};

/// Metadata key the image's cloud-init reads authorized SSH keys from
pub const SSH_AUTHORIZED_KEYS: &str = "ssh_authorized_keys";

/// Body of `POST /20160918/instances/`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceDetails {
    pub compartment_id: String,
    pub availability_domain: String,
    pub display_name: String,
    pub shape: String,
    pub shape_config: LaunchInstanceShapeConfigDetails,
    pub source_details: InstanceSourceViaImageDetails,
    pub create_vnic_details: CreateVnicDetails,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceShapeConfigDetails {
    pub ocpus: f32,
    #[serde(rename = "memoryInGBs")]
    pub memory_in_gbs: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSourceViaImageDetails {
    pub source_type: String,
    pub image_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnicDetails {
    pub subnet_id: String,
    pub assign_public_ip: bool,
}

impl From<&LaunchRequest> for LaunchInstanceDetails {
    fn from(request: &LaunchRequest) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(SSH_AUTHORIZED_KEYS.to_string(), request.ssh_public_key.clone());

        Self {
            compartment_id: request.compartment_id.clone(),
            availability_domain: request.availability_domain.clone(),
            display_name: request.display_name.clone(),
            shape: request.shape.clone(),
            shape_config: LaunchInstanceShapeConfigDetails {
                ocpus: request.ocpus,
                memory_in_gbs: request.memory_in_gbs,
            },
            source_details: InstanceSourceViaImageDetails {
                source_type: "image".to_string(),
                image_id: request.image_id.clone(),
            },
            create_vnic_details: CreateVnicDetails {
                subnet_id: request.subnet_id.clone(),
                assign_public_ip: request.assign_public_ip,
            },
            metadata,
        }
    }
}

/// The subset of the Instance resource we report
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    pub lifecycle_state: String,
    #[serde(default)]
    pub display_name: String,
}

impl From<Instance> for LaunchedInstance {
    fn from(instance: Instance) -> Self {
        Self {
            id: instance.id,
            lifecycle_state: instance.lifecycle_state,
            display_name: instance.display_name,
        }
    }
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
