use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use reservator::hunt::RetryPolicy;
use reservator::launch::{DEFAULT_SHAPE, LaunchRequest};
use reservator::oci::DEFAULT_PROFILE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub instance: InstanceConfig,
    pub retry: RetryConfig,
    pub oci: OciConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub compartment_id: String,
    pub availability_domain: String,
    pub subnet_id: String,
    pub image_id: String,
    pub ssh_public_key: String,
    pub display_name: String,
    pub shape: String,
    pub ocpus: f32,
    pub memory_in_gbs: f32,
    pub assign_public_ip: bool,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            compartment_id: String::new(),
            availability_domain: String::new(),
            subnet_id: String::new(),
            image_id: String::new(),
            ssh_public_key: String::new(),
            display_name: "ampere-free".to_string(),
            shape: DEFAULT_SHAPE.to_string(),
            ocpus: 4.0,
            memory_in_gbs: 24.0,
            assign_public_ip: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub interval_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OciConfig {
    pub config_file: Option<PathBuf>,
    pub profile: String,
    pub endpoint: Option<String>,
}

impl Default for OciConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            profile: DEFAULT_PROFILE.to_string(),
            endpoint: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults and environment");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Override values from environment variables.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let instance = &mut self.instance;
        let strings = [
            ("COMPARTMENT_ID", &mut instance.compartment_id),
            ("AVAILABILITY_DOMAIN", &mut instance.availability_domain),
            ("SUBNET_ID", &mut instance.subnet_id),
            ("IMAGE_ID", &mut instance.image_id),
            ("SSH_PUBLIC_KEY", &mut instance.ssh_public_key),
            ("INSTANCE_NAME", &mut instance.display_name),
            ("SHAPE", &mut instance.shape),
        ];
        for (key, field) in strings {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }

        if let Some(raw) = lookup("OCPUS") {
            instance.ocpus = parse_env("OCPUS", &raw)?;
        }
        if let Some(raw) = lookup("MEMORY_GB") {
            instance.memory_in_gbs = parse_env("MEMORY_GB", &raw)?;
        }
        if let Some(raw) = lookup("ASSIGN_PUBLIC_IP") {
            instance.assign_public_ip = parse_bool("ASSIGN_PUBLIC_IP", &raw)?;
        }
        if let Some(raw) = lookup("RETRY_INTERVAL") {
            self.retry.interval_secs = parse_env("RETRY_INTERVAL", &raw)?;
        }

        if let Some(path) = lookup("OCI_CONFIG_FILE") {
            self.oci.config_file = Some(PathBuf::from(path));
        }
        if let Some(profile) = lookup("OCI_CONFIG_PROFILE") {
            self.oci.profile = profile;
        }
        if let Some(endpoint) = lookup("OCI_ENDPOINT") {
            self.oci.endpoint = Some(endpoint);
        }

        Ok(())
    }

    /// Identifiers still empty after loading; the provider will reject the launch
    pub fn missing_identifiers(&self) -> Vec<&'static str> {
        let instance = &self.instance;
        [
            ("COMPARTMENT_ID", &instance.compartment_id),
            ("AVAILABILITY_DOMAIN", &instance.availability_domain),
            ("SUBNET_ID", &instance.subnet_id),
            ("IMAGE_ID", &instance.image_id),
            ("SSH_PUBLIC_KEY", &instance.ssh_public_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect()
    }

    /// The one launch request sent on every attempt
    pub fn launch_request(&self) -> LaunchRequest {
        for key in self.missing_identifiers() {
            log::warn!("{} is not set; the provider will reject the launch", key);
        }

        let instance = &self.instance;
        LaunchRequest {
            compartment_id: instance.compartment_id.clone(),
            availability_domain: instance.availability_domain.clone(),
            display_name: instance.display_name.clone(),
            shape: instance.shape.clone(),
            ocpus: instance.ocpus,
            memory_in_gbs: instance.memory_in_gbs,
            image_id: instance.image_id.clone(),
            subnet_id: instance.subnet_id.clone(),
            assign_public_ip: instance.assign_public_ip,
            ssh_public_key: instance.ssh_public_key.clone(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(Duration::from_secs(self.retry.interval_secs))
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| eyre!("{} has invalid value {:?}: {}", key, raw, e))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(eyre!("{} has invalid value {:?}: expected true or false", key, raw)),
    }
}
