//! API key authentication for the OCI REST API.
//!
//! Credentials come from the standard CLI configuration file (`~/.oci/config`).
//! Requests are signed with the draft-cavage HTTP signature scheme OCI uses:
//! RSA-SHA256 over a fixed list of headers, with the body hash carried in
//! `x-content-sha256`.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use configparser::ini::Ini;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};

use crate::error::{ReservatorError, Result};

/// Profile read when none is requested
pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// Headers covered by the signature of a request with a body, in signing order
const SIGNED_HEADERS: &str = "date (request-target) host content-length content-type x-content-sha256";

const CONTENT_TYPE: &str = "application/json";

/// Location of the OCI CLI configuration file
pub fn default_config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".oci")
        .join("config")
}

/// One profile of the OCI CLI configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciProfile {
    pub user: String,
    pub fingerprint: String,
    pub tenancy: String,
    pub region: String,
    pub key_file: PathBuf,
}

impl OciProfile {
    /// Read `profile` from the configuration file at `path`
    pub fn load(path: &Path, profile: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReservatorError::Config(format!("cannot read OCI config {}: {}", path.display(), e))
        })?;
        Self::parse(&content, profile)
    }

    /// Parse `profile` out of configuration file contents.
    ///
    /// Keys missing from a named profile fall back to the DEFAULT profile.
    pub fn parse(content: &str, profile: &str) -> Result<Self> {
        let mut ini = Ini::new_cs();
        ini.read(content.to_string())
            .map_err(|e| ReservatorError::Config(format!("invalid OCI config: {}", e)))?;

        let has_profile = ini.sections().iter().any(|s| s == profile);
        if !has_profile {
            return Err(ReservatorError::Config(format!("profile {} not found in OCI config", profile)));
        }

        let value = |key: &str| -> Result<String> {
            ini.get(profile, key)
                .or_else(|| ini.get(DEFAULT_PROFILE, key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ReservatorError::Config(format!("profile {} is missing '{}'", profile, key)))
        };

        Ok(Self {
            user: value("user")?,
            fingerprint: value("fingerprint")?,
            tenancy: value("tenancy")?,
            region: value("region")?,
            key_file: expand_home(&value("key_file")?),
        })
    }

    /// `keyId` the provider expects in the Authorization header
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Header values produced by signing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub date: String,
    pub content_length: String,
    pub content_sha256: String,
    pub authorization: String,
}

/// Signs requests with an API private key
pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl RequestSigner {
    /// Build a signer from a PEM private key (PKCS#8 or PKCS#1)
    pub fn new(key_id: impl Into<String>, private_key_pem: &str) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(private_key_pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(private_key_pem))
            .map_err(|e| ReservatorError::Auth(format!("unsupported private key: {}", e)))?;

        Ok(Self {
            key_id: key_id.into(),
            signing_key: SigningKey::<Sha256>::new(private_key),
        })
    }

    /// Build a signer from the key file a profile points at
    pub fn from_profile(profile: &OciProfile) -> Result<Self> {
        let pem = fs::read_to_string(&profile.key_file).map_err(|e| {
            ReservatorError::Auth(format!("cannot read key file {}: {}", profile.key_file.display(), e))
        })?;
        Self::new(profile.key_id(), &pem)
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Sign a JSON POST to `path` on `host`
    pub fn sign_post(&self, host: &str, path: &str, body: &[u8], date: &str) -> SignedHeaders {
        let content_sha256 = STANDARD.encode(Sha256::digest(body));
        let content_length = body.len().to_string();
        let signing_string = signing_string(date, "post", path, host, &content_length, &content_sha256);

        let signature = self.signing_key.sign(signing_string.as_bytes());
        let authorization = format!(
            "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{}\",signature=\"{}\"",
            self.key_id,
            SIGNED_HEADERS,
            STANDARD.encode(signature.to_bytes())
        );

        SignedHeaders {
            date: date.to_string(),
            content_length,
            content_sha256,
            authorization,
        }
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner").field("key_id", &self.key_id).finish()
    }
}

/// Current time in the RFC 7231 format the `date` header needs
pub fn http_date() -> String {
    chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn signing_string(
    date: &str,
    method: &str,
    path: &str,
    host: &str,
    content_length: &str,
    content_sha256: &str,
) -> String {
    [
        format!("date: {}", date),
        format!("(request-target): {} {}", method, path),
        format!("host: {}", host),
        format!("content-length: {}", content_length),
        format!("content-type: {}", CONTENT_TYPE),
        format!("x-content-sha256: {}", content_sha256),
    ]
    .join("\n")
}
