//! # Provider Modules
//!
//! Seams between the tool operations and the remote vault service.
//!
//! The service is reached through two handles:
//! - `VaultsApi` for secret lifecycle, metadata and listing
//! - `SecretsApi` for version listing, bundle retrieval and new versions
//!
//! Both are produced by a `ClientFactory`, which operations call once per
//! invocation.

use async_trait::async_trait;

use crate::error::VaultError;
use oci::requests::{
    CreateSecretDetails, ListSecretsQuery, ScheduleSecretDeletionDetails, SecretContentDetails,
    UpdateSecretDetails,
};
use oci::responses::{SecretBundle, SecretBundleVersionSummary, SecretDetails, SecretSummary};

/// One page of a paginated listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` on the last page
    pub next_page: Option<String>,
}

/// Vault management handle
#[async_trait]
pub trait VaultsApi: Send + Sync {
    /// List one page of secrets. `limit` is a hint; the service may ignore it.
    async fn list_secrets(
        &self,
        query: &ListSecretsQuery,
        page: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Page<SecretSummary>, VaultError>;

    async fn get_secret(&self, secret_id: &str) -> Result<SecretDetails, VaultError>;

    async fn create_secret(&self, details: &CreateSecretDetails)
        -> Result<SecretDetails, VaultError>;

    async fn update_secret(
        &self,
        secret_id: &str,
        details: &UpdateSecretDetails,
    ) -> Result<SecretDetails, VaultError>;

    /// Schedule deletion. The service answers without a body.
    async fn schedule_secret_deletion(
        &self,
        secret_id: &str,
        details: &ScheduleSecretDeletionDetails,
    ) -> Result<(), VaultError>;
}

/// Secret data handle
#[async_trait]
pub trait SecretsApi: Send + Sync {
    async fn list_secret_versions(
        &self,
        secret_id: &str,
        page: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Page<SecretBundleVersionSummary>, VaultError>;

    /// Fetch a bundle; `None` selects the `CURRENT` version
    async fn get_secret_bundle(
        &self,
        secret_id: &str,
        version_number: Option<u64>,
    ) -> Result<SecretBundle, VaultError>;

    /// Store new content as the `CURRENT` version. Prior versions are kept.
    async fn create_secret_version(
        &self,
        secret_id: &str,
        content: SecretContentDetails,
    ) -> Result<SecretDetails, VaultError>;
}

/// Builds authenticated handles from ambient credential material
///
/// Implementations re-read credentials on every call.
pub trait ClientFactory: Send + Sync {
    fn vaults_client(&self) -> Result<Box<dyn VaultsApi>, VaultError>;

    fn secrets_client(&self) -> Result<Box<dyn SecretsApi>, VaultError>;
}

pub mod oci;
