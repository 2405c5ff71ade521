//! OCI Vault REST API response structures
//!
//! These structs mirror the JSON bodies returned by the vault management API
//! (`20180608`) and the secret retrieval API (`20190301`). Fields the service
//! always returns for an existing resource are non-optional, so a successful
//! response missing one of them fails deserialization instead of silently
//! mapping to an absent value.
//!
//! API Reference: https://docs.oracle.com/en-us/iaas/api/#/en/secretmgmt/20180608/
//! API Reference: https://docs.oracle.com/en-us/iaas/api/#/en/secretretrieval/20190301/

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Namespace → (key → value) tag mapping
pub type DefinedTags = BTreeMap<String, Map<String, Value>>;

/// Item of `GET /20180608/secrets`
///
/// API Reference: https://docs.oracle.com/en-us/iaas/api/#/en/secretmgmt/20180608/SecretSummary/
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretSummary {
    pub id: String,
    pub lifecycle_state: String,
    #[serde(default)]
    pub vault_id: Option<String>,
    #[serde(default)]
    pub compartment_id: Option<String>,
    #[serde(default)]
    pub secret_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_of_current_version: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_of_deletion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rotation_config: Option<Map<String, Value>>,
    #[serde(default)]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub defined_tags: Option<DefinedTags>,
}

/// Body of `GET`, `POST` and `PUT` on `/20180608/secrets[/{secretId}]`
///
/// API Reference: https://docs.oracle.com/en-us/iaas/api/#/en/secretmgmt/20180608/Secret/
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretDetails {
    pub id: String,
    pub lifecycle_state: String,
    #[serde(default)]
    pub vault_id: Option<String>,
    #[serde(default)]
    pub compartment_id: Option<String>,
    #[serde(default)]
    pub secret_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub key_id: Option<String>,
    /// Version number of the `CURRENT` version
    #[serde(default)]
    pub current_version_number: Option<u64>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_of_current_version: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_of_deletion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rotation_config: Option<Map<String, Value>>,
    #[serde(default)]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub defined_tags: Option<DefinedTags>,
}

/// Item of `GET /20190301/secretbundles/{secretId}/versions`
///
/// API Reference: https://docs.oracle.com/en-us/iaas/api/#/en/secretretrieval/20190301/SecretBundleVersionSummary/
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBundleVersionSummary {
    pub version_number: u64,
    #[serde(default)]
    pub secret_id: Option<String>,
    #[serde(default)]
    pub version_name: Option<String>,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_of_deletion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stages: Option<Vec<String>>,
}

/// Body of `GET /20190301/secretbundles/{secretId}`
///
/// API Reference: https://docs.oracle.com/en-us/iaas/api/#/en/secretretrieval/20190301/SecretBundle/
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBundle {
    pub secret_id: String,
    pub version_number: u64,
    #[serde(default)]
    pub version_name: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stages: Option<Vec<String>>,
    #[serde(default)]
    pub secret_bundle_content: Option<SecretBundleContent>,
}

/// Bundle payload descriptor
///
/// The `content` field is consumed without being stored: only its presence
/// is recorded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBundleContent {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, rename = "content", deserialize_with = "presence")]
    pub has_content: bool,
}

fn presence<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let content = Option::<IgnoredAny>::deserialize(deserializer)?;
    Ok(content.is_some())
}

/// Error body returned with any non-2xx status
///
/// API Reference: https://docs.oracle.com/en-us/iaas/Content/API/References/apierrors.htm
#[derive(Debug, Clone, Deserialize)]
pub struct OciErrorBody {
    pub code: String,
    pub message: String,
}
