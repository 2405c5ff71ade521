//! Tool input arguments
//!
//! Each struct is both the deserialization target for `tools/call`
//! arguments and the source of the tool's advertised `inputSchema`.
//! Unknown fields are rejected.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use zeroize::Zeroizing;

/// String that is wiped on drop and never printed
#[derive(Clone, Default, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SensitiveString(#[schemars(with = "String")] Zeroizing<String>);

impl SensitiveString {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SensitiveString {
    fn from(value: &str) -> Self {
        Self(Zeroizing::new(value.to_string()))
    }
}

impl fmt::Debug for SensitiveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListSecretsArgs {
    /// The OCID of the vault. If not provided, uses the configured default vault.
    #[serde(default)]
    pub vault_id: Option<String>,
    /// The OCID of the compartment. If not provided, uses the configured default compartment.
    #[serde(default)]
    pub compartment_id: Option<String>,
    /// Maximum number of secrets to return
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchSecretsArgs {
    /// Secret name to search for
    pub name: String,
    /// The OCID of the vault. If not provided, uses the configured default vault.
    #[serde(default)]
    pub vault_id: Option<String>,
    /// The OCID of the compartment. If not provided, uses the configured default compartment.
    #[serde(default)]
    pub compartment_id: Option<String>,
    /// Maximum number of secrets to return
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SecretIdArgs {
    /// The OCID of the secret
    pub secret_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListSecretVersionsArgs {
    /// The OCID of the secret
    pub secret_id: String,
    /// Maximum number of versions to return
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetSecretValueArgs {
    /// The OCID of the secret
    pub secret_id: String,
    /// The version number of the secret. If not specified, returns the current version.
    #[serde(default)]
    pub version_number: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConfigureVaultArgs {
    /// The OCID of the vault to use as default
    pub vault_id: String,
    /// The OCID of the compartment to use as default
    pub compartment_id: String,
}

#[allow(
    clippy::empty_structs_with_brackets,
    reason = "Deserializes from an empty JSON object and advertises an object schema"
)]
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateSecretArgs {
    /// The name of the secret
    pub name: String,
    /// The secret value/content
    pub secret_value: SensitiveString,
    /// A description of the secret
    #[serde(default)]
    pub description: Option<String>,
    /// The content type of the secret (e.g., 'application/json', 'text/plain'). Defaults to 'application/octet-stream'.
    #[serde(default)]
    pub content_type: Option<String>,
    /// The OCID of the vault. If not provided, uses the configured default vault.
    #[serde(default)]
    pub vault_id: Option<String>,
    /// The OCID of the compartment. If not provided, uses the configured default compartment.
    #[serde(default)]
    pub compartment_id: Option<String>,
    /// The OCID of the master encryption key. If not provided, uses OCI_VAULT_KEY_ID.
    #[serde(default)]
    pub key_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateSecretArgs {
    /// The OCID of the secret to update
    pub secret_id: String,
    /// The new secret value/content
    pub secret_value: SensitiveString,
    /// The content type of the secret (e.g., 'application/json', 'text/plain'). Defaults to 'application/octet-stream'.
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateSecretMetadataArgs {
    /// The OCID of the secret to update
    pub secret_id: String,
    /// The new description of the secret
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form tags as a key-value dictionary (e.g., {"environment": "prod", "team": "platform"})
    #[serde(default)]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    /// Defined tags as a nested dictionary (e.g., {"namespace": {"key": "value"}})
    #[serde(default)]
    pub defined_tags: Option<BTreeMap<String, Map<String, Value>>>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DeleteSecretArgs {
    /// The OCID of the secret to delete
    pub secret_id: String,
    /// Number of days to wait before deletion (7-30). If omitted the service default applies.
    #[serde(default)]
    #[schemars(range(min = 7, max = 30))]
    pub time_of_deletion_in_days: Option<u32>,
}
