//! Common test utilities
//!
//! Shared rustls setup for tests that reach a mock HTTP server, and an
//! in-memory vault that records every client construction and remote call.

#![allow(dead_code, reason = "Each test binary uses a different subset of helpers")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use oci_vault_mcp_server::provider::oci::requests::{
    CreateSecretDetails, ListSecretsQuery, ScheduleSecretDeletionDetails, SecretContentDetails,
    UpdateSecretDetails,
};
use oci_vault_mcp_server::provider::oci::responses::{
    SecretBundle, SecretBundleVersionSummary, SecretDetails, SecretSummary,
};
use oci_vault_mcp_server::provider::{ClientFactory, Page, SecretsApi, VaultsApi};
use oci_vault_mcp_server::{VaultDefaults, VaultError, VaultService};

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` to ensure it's only called once across all tests.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

pub const VAULT_ID: &str = "ocid1.vault.oc1.iad.test";
pub const COMPARTMENT_ID: &str = "ocid1.compartment.oc1..test";
pub const SECRET_ID: &str = "ocid1.vaultsecret.oc1.iad.test";

/// One remote call as the fake saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSecrets {
        vault_id: String,
        compartment_id: String,
        name: Option<String>,
        page: Option<String>,
        limit: Option<u32>,
    },
    GetSecret(String),
    CreateSecret {
        vault_id: String,
        compartment_id: String,
        secret_name: String,
        key_id: Option<String>,
        content_type: String,
        encoded_content: String,
    },
    UpdateSecret {
        secret_id: String,
        description: Option<String>,
    },
    ScheduleDeletion {
        secret_id: String,
        time_of_deletion: Option<DateTime<Utc>>,
    },
    ListVersions {
        secret_id: String,
        page: Option<String>,
        limit: Option<u32>,
    },
    GetBundle {
        secret_id: String,
        version_number: Option<u64>,
    },
    CreateVersion {
        secret_id: String,
        content_type: String,
        encoded_content: String,
    },
}

/// In-memory vault serving JSON fixtures in fixed-size pages
#[derive(Debug)]
pub struct FakeVault {
    pub secrets: Vec<Value>,
    pub versions: Vec<Value>,
    pub secret: Value,
    pub bundle: Value,
    pub page_size: usize,
    /// Serve full pages even when a smaller limit hint is passed
    pub ignore_limit_hint: bool,
    /// Answer every call with this remote error
    pub fail_with: Option<(u16, &'static str)>,
    calls: Mutex<Vec<Call>>,
    constructions: AtomicUsize,
}

impl Default for FakeVault {
    fn default() -> Self {
        Self {
            secrets: Vec::new(),
            versions: Vec::new(),
            secret: secret_details_json(),
            bundle: secret_bundle_json(),
            page_size: 2,
            ignore_limit_hint: false,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
            constructions: AtomicUsize::new(0),
        }
    }
}

impl FakeVault {
    pub fn with_secrets(count: usize) -> Self {
        Self {
            secrets: (0..count).map(secret_summary_json).collect(),
            ..Self::default()
        }
    }

    pub fn with_versions(count: u64) -> Self {
        Self {
            versions: (1..=count).map(version_summary_json).collect(),
            ..Self::default()
        }
    }

    /// Serve full pages regardless of the limit hint
    pub fn ignoring_limit_hint(mut self) -> Self {
        self.ignore_limit_hint = true;
        self
    }

    /// Fail every call with the given remote status and code
    pub fn failing_with(mut self, status: u16, code: &'static str) -> Self {
        self.fail_with = Some((status, code));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) -> Result<(), VaultError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with {
            Some((status, code)) => Err(VaultError::RemoteService {
                status,
                code: code.to_string(),
                message: format!("fake failure: {code}"),
                opc_request_id: Some("fake-request-id".to_string()),
            }),
            None => Ok(()),
        }
    }

    fn page<T: DeserializeOwned>(
        &self,
        items: &[Value],
        page: Option<&str>,
        limit: Option<u32>,
    ) -> Page<T> {
        let start: usize = page.map_or(0, |p| p.parse().unwrap());
        let mut size = self.page_size;
        if let (false, Some(limit)) = (self.ignore_limit_hint, limit) {
            size = size.min(limit as usize);
        }
        let end = (start + size).min(items.len());
        Page {
            items: items[start..end]
                .iter()
                .map(|v| serde_json::from_value(v.clone()).unwrap())
                .collect(),
            next_page: (end < items.len()).then(|| end.to_string()),
        }
    }

    fn details(&self) -> SecretDetails {
        serde_json::from_value(self.secret.clone()).unwrap()
    }
}

/// Service over a fresh fake, with the given defaults
pub fn service(
    vault: &Arc<FakeVault>,
    vault_id: Option<&str>,
    compartment_id: Option<&str>,
) -> VaultService {
    service_with_key(vault, vault_id, compartment_id, None)
}

pub fn service_with_key(
    vault: &Arc<FakeVault>,
    vault_id: Option<&str>,
    compartment_id: Option<&str>,
    key_id: Option<&str>,
) -> VaultService {
    let defaults = Arc::new(VaultDefaults::new(
        vault_id.map(str::to_string),
        compartment_id.map(str::to_string),
    ));
    VaultService::new(
        Arc::new(FakeFactory {
            vault: Arc::clone(vault),
        }),
        defaults,
        key_id.map(str::to_string),
    )
}

#[derive(Debug)]
pub struct FakeFactory {
    pub vault: Arc<FakeVault>,
}

impl ClientFactory for FakeFactory {
    fn vaults_client(&self) -> Result<Box<dyn VaultsApi>, VaultError> {
        self.vault.constructions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeClient {
            vault: Arc::clone(&self.vault),
        }))
    }

    fn secrets_client(&self) -> Result<Box<dyn SecretsApi>, VaultError> {
        self.vault.constructions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeClient {
            vault: Arc::clone(&self.vault),
        }))
    }
}

#[derive(Debug)]
struct FakeClient {
    vault: Arc<FakeVault>,
}

#[async_trait]
impl VaultsApi for FakeClient {
    async fn list_secrets(
        &self,
        query: &ListSecretsQuery,
        page: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Page<SecretSummary>, VaultError> {
        self.vault.record(Call::ListSecrets {
            vault_id: query.vault_id.clone(),
            compartment_id: query.compartment_id.clone(),
            name: query.name.clone(),
            page: page.map(str::to_string),
            limit,
        })?;
        Ok(self.vault.page(&self.vault.secrets, page, limit))
    }

    async fn get_secret(&self, secret_id: &str) -> Result<SecretDetails, VaultError> {
        self.vault.record(Call::GetSecret(secret_id.to_string()))?;
        Ok(self.vault.details())
    }

    async fn create_secret(
        &self,
        details: &CreateSecretDetails,
    ) -> Result<SecretDetails, VaultError> {
        self.vault.record(Call::CreateSecret {
            vault_id: details.vault_id.clone(),
            compartment_id: details.compartment_id.clone(),
            secret_name: details.secret_name.clone(),
            key_id: details.key_id.clone(),
            content_type: details.secret_content.content_type.clone(),
            encoded_content: details.secret_content.encoded_content().to_string(),
        })?;
        Ok(self.vault.details())
    }

    async fn update_secret(
        &self,
        secret_id: &str,
        details: &UpdateSecretDetails,
    ) -> Result<SecretDetails, VaultError> {
        self.vault.record(Call::UpdateSecret {
            secret_id: secret_id.to_string(),
            description: details.description.clone(),
        })?;
        Ok(self.vault.details())
    }

    async fn schedule_secret_deletion(
        &self,
        secret_id: &str,
        details: &ScheduleSecretDeletionDetails,
    ) -> Result<(), VaultError> {
        self.vault.record(Call::ScheduleDeletion {
            secret_id: secret_id.to_string(),
            time_of_deletion: details.time_of_deletion,
        })
    }
}

#[async_trait]
impl SecretsApi for FakeClient {
    async fn list_secret_versions(
        &self,
        secret_id: &str,
        page: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Page<SecretBundleVersionSummary>, VaultError> {
        self.vault.record(Call::ListVersions {
            secret_id: secret_id.to_string(),
            page: page.map(str::to_string),
            limit,
        })?;
        Ok(self.vault.page(&self.vault.versions, page, limit))
    }

    async fn get_secret_bundle(
        &self,
        secret_id: &str,
        version_number: Option<u64>,
    ) -> Result<SecretBundle, VaultError> {
        self.vault.record(Call::GetBundle {
            secret_id: secret_id.to_string(),
            version_number,
        })?;
        Ok(serde_json::from_value(self.vault.bundle.clone()).unwrap())
    }

    async fn create_secret_version(
        &self,
        secret_id: &str,
        content: SecretContentDetails,
    ) -> Result<SecretDetails, VaultError> {
        self.vault.record(Call::CreateVersion {
            secret_id: secret_id.to_string(),
            content_type: content.content_type.clone(),
            encoded_content: content.encoded_content().to_string(),
        })?;
        Ok(self.vault.details())
    }
}

pub fn secret_summary_json(index: usize) -> Value {
    json!({
        "id": format!("ocid1.vaultsecret.oc1.iad.secret{index}"),
        "secretName": format!("secret-{index}"),
        "vaultId": VAULT_ID,
        "compartmentId": COMPARTMENT_ID,
        "lifecycleState": "ACTIVE",
        "timeCreated": "2024-01-01T00:00:00Z"
    })
}

pub fn version_summary_json(version_number: u64) -> Value {
    let stages = if version_number == 1 {
        json!(["CURRENT", "LATEST"])
    } else {
        json!(["PREVIOUS"])
    };
    json!({
        "secretId": SECRET_ID,
        "versionNumber": version_number,
        "stages": stages,
        "timeCreated": "2024-01-01T00:00:00Z"
    })
}

pub fn secret_details_json() -> Value {
    json!({
        "id": SECRET_ID,
        "secretName": "db-password",
        "vaultId": VAULT_ID,
        "compartmentId": COMPARTMENT_ID,
        "description": "database password",
        "lifecycleState": "ACTIVE",
        "currentVersionNumber": 3,
        "timeCreated": "2024-01-01T00:00:00Z",
        "timeOfCurrentVersion": "2024-02-01T00:00:00Z",
        "freeformTags": { "team": "platform" }
    })
}

/// Bundle whose content is base64 of "hunter2"
pub fn secret_bundle_json() -> Value {
    json!({
        "secretId": SECRET_ID,
        "versionNumber": 3,
        "versionName": "v3",
        "stages": ["CURRENT"],
        "timeCreated": "2024-02-01T00:00:00Z",
        "secretBundleContent": {
            "contentType": "BASE64",
            "content": "aHVudGVyMg=="
        }
    })
}
