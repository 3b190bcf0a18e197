//! Firebase service-account credential resolution
//!
//! Deployed environments pass the whole service-account document as a
//! single-line string in `FIREBASE_CRED_JSON`; local development points
//! `FIREBASE_CRED_PATH` at the downloaded file. The inline JSON wins.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::env::EnvSource;
use crate::application::errors::{CredentialError, CredentialOrigin};

pub const FIREBASE_CRED_JSON: &str = "FIREBASE_CRED_JSON";
pub const FIREBASE_CRED_PATH: &str = "FIREBASE_CRED_PATH";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Where the credential document is read from
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Json(String),
    Path(PathBuf),
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Json(json) => f
                .debug_tuple("Json")
                .field(&format_args!("<{} bytes>", json.len()))
                .finish(),
            CredentialSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

impl CredentialSource {
    /// Pick the credential source from the environment.
    pub fn from_source(env: &impl EnvSource) -> Result<Self, CredentialError> {
        if let Some(json) = env.get(FIREBASE_CRED_JSON) {
            return Ok(Self::Json(json));
        }
        if let Some(path) = env.get(FIREBASE_CRED_PATH) {
            return Ok(Self::Path(PathBuf::from(path)));
        }
        Err(CredentialError::Missing)
    }

    pub fn origin(&self) -> CredentialOrigin {
        match self {
            CredentialSource::Json(_) => CredentialOrigin::EnvJson,
            CredentialSource::Path(path) => CredentialOrigin::File(path.clone()),
        }
    }

    /// Load and validate the service-account document.
    ///
    /// The `Json` variant never touches the filesystem.
    pub fn resolve(&self) -> Result<ServiceAccountKey, CredentialError> {
        match self {
            CredentialSource::Json(json) => {
                tracing::debug!("Resolving Firebase credentials from {}", FIREBASE_CRED_JSON);
                ServiceAccountKey::parse(json, CredentialOrigin::EnvJson)
            }
            CredentialSource::Path(path) => {
                tracing::debug!("Resolving Firebase credentials from {}", path.display());
                let content = read_credential_file(path)?;
                ServiceAccountKey::parse(&content, CredentialOrigin::File(path.clone()))
            }
        }
    }
}

fn read_credential_file(path: &Path) -> Result<String, CredentialError> {
    if !path.is_file() {
        return Err(CredentialError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| CredentialError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Deserialize)]
struct RawServiceAccount {
    #[serde(rename = "type")]
    kind: Option<String>,
    project_id: Option<String>,
    private_key_id: Option<String>,
    private_key: Option<String>,
    client_email: Option<String>,
    client_id: Option<String>,
    token_uri: Option<String>,
}

/// A validated Firebase service-account key
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key_id: Option<String>,
    pub client_id: Option<String>,
    pub token_uri: String,
    private_key: String,
    origin: CredentialOrigin,
}

impl ServiceAccountKey {
    /// Parse a service-account JSON document.
    pub fn parse(content: &str, origin: CredentialOrigin) -> Result<Self, CredentialError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| CredentialError::InvalidJson {
                origin: origin.clone(),
                reason: e.to_string(),
            })?;

        if !value.is_object() {
            return Err(CredentialError::InvalidJson {
                origin,
                reason: "expected a JSON object".to_string(),
            });
        }

        let raw: RawServiceAccount =
            serde_json::from_value(value).map_err(|e| CredentialError::InvalidServiceAccount {
                origin: origin.clone(),
                reason: e.to_string(),
            })?;

        let invalid = |reason: String| CredentialError::InvalidServiceAccount {
            origin: origin.clone(),
            reason,
        };

        match raw.kind.as_deref() {
            Some("service_account") => {}
            Some(other) => {
                return Err(invalid(format!(
                    "expected type \"service_account\", got \"{}\"",
                    other
                )))
            }
            None => return Err(invalid("missing field \"type\"".to_string())),
        }

        let required = |value: Option<String>, name: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| invalid(format!("missing field \"{}\"", name)))
        };

        let project_id = required(raw.project_id, "project_id")?;
        let client_email = required(raw.client_email, "client_email")?;
        let private_key = required(raw.private_key, "private_key")?;

        Ok(Self {
            project_id,
            client_email,
            private_key_id: raw.private_key_id,
            client_id: raw.client_id,
            token_uri: raw
                .token_uri
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            private_key,
            origin,
        })
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn origin(&self) -> &CredentialOrigin {
        &self.origin
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("client_id", &self.client_id)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"<redacted>")
            .field("origin", &self.origin)
            .finish()
    }
}
