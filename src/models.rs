//! # Tool Output Records
//!
//! The stable response schema returned by every tool.
//!
//! Each record derives both `Serialize` and `JsonSchema`, so the output schema
//! advertised in `tools/list` is generated from the exact type the tool
//! returns. Optional fields are omitted from the JSON when absent.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

/// Status reported by every mutating tool on success
pub const STATUS_SUCCESS: &str = "success";

/// Secret metadata as stored in the vault
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct SecretMetadata {
    /// The OCID of the secret
    pub id: String,
    /// The current lifecycle state of the secret
    pub lifecycle_state: String,
    /// The OCID of the vault that holds the secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<String>,
    /// The OCID of the compartment that holds the secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compartment_id: Option<String>,
    /// The user-friendly name of the secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A brief description of the secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of versions, when the service reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_version_count: Option<u64>,
    /// The version number of the current secret version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version_number: Option<u64>,
    /// When the secret was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
    /// When the current secret version was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_current_version: Option<DateTime<Utc>>,
    /// When the secret is scheduled to be deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_deletion: Option<DateTime<Utc>>,
    /// Rotation configuration, passed through as returned by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_config: Option<Map<String, Value>>,
    /// Free-form tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    /// Defined tags, keyed by namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<BTreeMap<String, Map<String, Value>>>,
}

/// One version of a secret
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct SecretVersion {
    /// The version number of the secret version
    pub version_number: u64,
    /// When the secret version was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
    /// When the secret version is scheduled to be deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_deletion: Option<DateTime<Utc>>,
    /// The lifecycle state of the secret version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<String>,
    /// Stage labels attached to the version (e.g. `CURRENT`, `PENDING`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<String>>,
}

/// A secret with its full version list
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Secret {
    pub metadata: SecretMetadata,
    /// Versions in the order the service listed them
    pub versions: Vec<SecretVersion>,
}

/// Metadata of a secret bundle. Never carries the secret content.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SecretValue {
    pub secret_id: String,
    pub version_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
    /// Encoding of the bundle content as reported by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Whether the bundle carried content
    pub has_content: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CreateSecretResult {
    pub status: String,
    pub message: String,
    pub secret_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compartment_id: Option<String>,
    pub lifecycle_state: String,
    /// Content type the secret value was stored with
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CreateSecretVersionResult {
    pub status: String,
    pub message: String,
    pub secret_id: String,
    /// Version number of the version now holding `CURRENT`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_number: Option<u64>,
    pub lifecycle_state: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct UpdateSecretMetadataResult {
    pub status: String,
    pub message: String,
    pub secret_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<BTreeMap<String, Map<String, Value>>>,
    pub lifecycle_state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DeleteSecretResult {
    pub status: String,
    pub message: String,
    pub secret_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lifecycle_state: String,
    /// When the service will delete the secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_deletion: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ConfigureVaultResult {
    pub status: String,
    pub message: String,
    pub vault_id: String,
    pub compartment_id: String,
}

/// Current default vault configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct VaultConfig {
    /// Default vault OCID (null when not configured)
    pub vault_id: Option<String>,
    /// Default compartment OCID (null when not configured)
    pub compartment_id: Option<String>,
    /// True when both defaults are set
    pub configured: bool,
}

/// Object wrapper for list-shaped tool results
///
/// Structured tool output must be a JSON object, so lists are returned as
/// `{"result": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ListResult<T> {
    pub result: Vec<T>,
}

impl<T> From<Vec<T>> for ListResult<T> {
    fn from(result: Vec<T>) -> Self {
        Self { result }
    }
}
