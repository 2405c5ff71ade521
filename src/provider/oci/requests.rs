//! OCI Vault REST API request structures
//!
//! Bodies sent to the vault management API (`20180608`). Optional fields are
//! skipped when absent so that updates stay sparse: the service leaves any
//! field it does not receive untouched.

use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::Serialize;
use zeroize::Zeroizing;

use super::responses::DefinedTags;

/// Secret payload, base64-encoded
///
/// API Reference: https://docs.oracle.com/en-us/iaas/api/#/en/secretmgmt/20180608/datatypes/SecretContentDetails
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretContentDetails {
    pub content_type: String,
    content: Zeroizing<String>,
}

impl SecretContentDetails {
    /// Encode `value` for transport
    pub fn new(value: &str, content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            content: Zeroizing::new(general_purpose::STANDARD.encode(value.as_bytes())),
        }
    }

    /// Base64 form of the payload as it goes over the wire
    pub fn encoded_content(&self) -> &str {
        &self.content
    }
}

impl fmt::Debug for SecretContentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretContentDetails")
            .field("content_type", &self.content_type)
            .field("content", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /20180608/secrets`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretDetails {
    pub compartment_id: String,
    pub vault_id: String,
    pub secret_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    pub secret_content: SecretContentDetails,
}

/// Body of `PUT /20180608/secrets/{secretId}`
///
/// Carries either a metadata patch or new content (which creates a new
/// secret version).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecretDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_content: Option<SecretContentDetails>,
}

impl UpdateSecretDetails {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.freeform_tags.is_none()
            && self.defined_tags.is_none()
            && self.secret_content.is_none()
    }
}

/// Body of `POST /20180608/secrets/{secretId}/actions/scheduleDeletion`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSecretDeletionDetails {
    /// Absent means the service applies its default window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_deletion: Option<DateTime<Utc>>,
}

/// Filters for `GET /20180608/secrets`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSecretsQuery {
    pub compartment_id: String,
    pub vault_id: String,
    pub name: Option<String>,
}
