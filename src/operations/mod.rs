//! # Operations
//!
//! One async method per tool. Every method validates its arguments and
//! resolves the effective vault scope before a client is built, so bad input
//! never reaches the remote service.
//!
//! Errors are returned unchanged; logging and metrics for failures happen
//! once, in the registry dispatch.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use crate::constants::{DEFAULT_CONTENT_TYPE, MAX_DELETION_WINDOW_DAYS, MIN_DELETION_WINDOW_DAYS};
use crate::error::VaultError;
use crate::mapper;
use crate::models::{
    ConfigureVaultResult, CreateSecretResult, CreateSecretVersionResult, DeleteSecretResult,
    Secret, SecretMetadata, SecretValue, SecretVersion, UpdateSecretMetadataResult, VaultConfig,
    STATUS_SUCCESS,
};
use crate::provider::oci::requests::{
    CreateSecretDetails, ListSecretsQuery, ScheduleSecretDeletionDetails, SecretContentDetails,
    UpdateSecretDetails,
};
use crate::provider::{ClientFactory, SecretsApi, VaultsApi};
use crate::state::{non_empty, VaultDefaults};

pub mod args;
pub mod pagination;

use args::{
    ConfigureVaultArgs, CreateSecretArgs, DeleteSecretArgs, GetSecretValueArgs,
    ListSecretVersionsArgs, ListSecretsArgs, SearchSecretsArgs, SecretIdArgs, UpdateSecretArgs,
    UpdateSecretMetadataArgs,
};
pub use pagination::drain_pages;

/// Tool operations over one client factory and one set of vault defaults
pub struct VaultService {
    factory: Arc<dyn ClientFactory>,
    defaults: Arc<VaultDefaults>,
    default_key_id: Option<String>,
}

impl std::fmt::Debug for VaultService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultService")
            .field("defaults", &self.defaults)
            .field("default_key_id", &self.default_key_id)
            .finish_non_exhaustive()
    }
}

impl VaultService {
    pub fn new(
        factory: Arc<dyn ClientFactory>,
        defaults: Arc<VaultDefaults>,
        default_key_id: Option<String>,
    ) -> Self {
        Self {
            factory,
            defaults,
            default_key_id: default_key_id.filter(|k| !k.is_empty()),
        }
    }

    pub async fn list_secrets(
        &self,
        args: ListSecretsArgs,
    ) -> Result<Vec<SecretMetadata>, VaultError> {
        validate_limit(args.limit)?;
        let scope = self
            .defaults
            .resolve(args.vault_id.as_deref(), args.compartment_id.as_deref())?;
        let query = ListSecretsQuery {
            compartment_id: scope.compartment_id,
            vault_id: scope.vault_id,
            name: None,
        };

        let secrets = self.drain_secrets(&query, args.limit).await?;
        info!(count = secrets.len(), "Listed secrets");
        Ok(secrets)
    }

    pub async fn search_secrets(
        &self,
        args: SearchSecretsArgs,
    ) -> Result<Vec<SecretMetadata>, VaultError> {
        validate_limit(args.limit)?;
        require("name", &args.name)?;
        let scope = self
            .defaults
            .resolve(args.vault_id.as_deref(), args.compartment_id.as_deref())?;
        let query = ListSecretsQuery {
            compartment_id: scope.compartment_id,
            vault_id: scope.vault_id,
            name: Some(args.name),
        };

        let secrets = self.drain_secrets(&query, args.limit).await?;
        info!(count = secrets.len(), name = ?query.name, "Searched secrets");
        Ok(secrets)
    }

    async fn drain_secrets(
        &self,
        query: &ListSecretsQuery,
        limit: Option<u32>,
    ) -> Result<Vec<SecretMetadata>, VaultError> {
        let client = self.factory.vaults_client()?;
        let client: &dyn VaultsApi = client.as_ref();
        let summaries = drain_pages(limit, |cursor, hint| async move {
            client.list_secrets(query, cursor.as_deref(), hint).await
        })
        .await?;
        Ok(summaries
            .into_iter()
            .map(mapper::secret_metadata_from_summary)
            .collect())
    }

    pub async fn get_secret_metadata(
        &self,
        args: SecretIdArgs,
    ) -> Result<SecretMetadata, VaultError> {
        require_id("secret_id", &args.secret_id)?;
        let client = self.factory.vaults_client()?;
        let details = client.get_secret(&args.secret_id).await?;
        info!(secret_id = %args.secret_id, "Retrieved secret metadata");
        Ok(mapper::secret_metadata_from_details(details))
    }

    pub async fn list_secret_versions(
        &self,
        args: ListSecretVersionsArgs,
    ) -> Result<Vec<SecretVersion>, VaultError> {
        validate_limit(args.limit)?;
        require_id("secret_id", &args.secret_id)?;
        let client = self.factory.secrets_client()?;
        let versions = drain_versions(client.as_ref(), &args.secret_id, args.limit).await?;
        info!(secret_id = %args.secret_id, count = versions.len(), "Listed secret versions");
        Ok(versions)
    }

    pub async fn get_secret_value(&self, args: GetSecretValueArgs) -> Result<SecretValue, VaultError> {
        require_id("secret_id", &args.secret_id)?;
        let client = self.factory.secrets_client()?;
        let bundle = client
            .get_secret_bundle(&args.secret_id, args.version_number)
            .await?;
        info!(secret_id = %args.secret_id, version_number = bundle.version_number, "Retrieved secret bundle");
        Ok(mapper::secret_value(bundle))
    }

    /// Metadata plus every version. The two reads are not coordinated.
    pub async fn get_secret(&self, args: SecretIdArgs) -> Result<Secret, VaultError> {
        require_id("secret_id", &args.secret_id)?;
        let vaults = self.factory.vaults_client()?;
        let metadata = mapper::secret_metadata_from_details(vaults.get_secret(&args.secret_id).await?);

        let secrets = self.factory.secrets_client()?;
        let versions = drain_versions(secrets.as_ref(), &args.secret_id, None).await?;

        info!(secret_id = %args.secret_id, versions = versions.len(), "Retrieved secret");
        Ok(Secret { metadata, versions })
    }

    #[allow(
        clippy::unused_async,
        reason = "Every tool handler shares the async calling convention of the registry"
    )]
    pub async fn configure_vault(
        &self,
        args: ConfigureVaultArgs,
    ) -> Result<ConfigureVaultResult, VaultError> {
        require_id("vault_id", &args.vault_id)?;
        require_id("compartment_id", &args.compartment_id)?;
        self.defaults
            .set(args.vault_id.clone(), args.compartment_id.clone());
        Ok(ConfigureVaultResult {
            status: STATUS_SUCCESS.to_string(),
            message: "Vault configuration updated".to_string(),
            vault_id: args.vault_id,
            compartment_id: args.compartment_id,
        })
    }

    #[allow(
        clippy::unused_async,
        reason = "Every tool handler shares the async calling convention of the registry"
    )]
    pub async fn get_vault_config(&self) -> Result<VaultConfig, VaultError> {
        let (vault_id, compartment_id) = self.defaults.get();
        let configured = non_empty(vault_id.as_deref()).is_some()
            && non_empty(compartment_id.as_deref()).is_some();
        Ok(VaultConfig {
            vault_id,
            compartment_id,
            configured,
        })
    }

    pub async fn create_secret(
        &self,
        args: CreateSecretArgs,
    ) -> Result<CreateSecretResult, VaultError> {
        require("name", &args.name)?;
        let scope = self
            .defaults
            .resolve(args.vault_id.as_deref(), args.compartment_id.as_deref())?;
        let content_type = effective_content_type(args.content_type);
        let details = CreateSecretDetails {
            compartment_id: scope.compartment_id,
            vault_id: scope.vault_id,
            secret_name: args.name.clone(),
            description: args.description,
            key_id: args
                .key_id
                .filter(|k| !k.is_empty())
                .or_else(|| self.default_key_id.clone()),
            secret_content: SecretContentDetails::new(args.secret_value.expose(), &content_type),
        };

        let client = self.factory.vaults_client()?;
        let secret = client.create_secret(&details).await?;
        info!(name = %args.name, secret_id = %secret.id, "Created secret");

        Ok(CreateSecretResult {
            status: STATUS_SUCCESS.to_string(),
            message: format!("Secret '{}' created successfully", args.name),
            secret_id: secret.id,
            name: secret.secret_name,
            vault_id: secret.vault_id,
            compartment_id: secret.compartment_id,
            lifecycle_state: secret.lifecycle_state,
            content_type,
            time_created: secret.time_created,
        })
    }

    /// Store a new version; earlier versions stay in the vault
    pub async fn update_secret(
        &self,
        args: UpdateSecretArgs,
    ) -> Result<CreateSecretVersionResult, VaultError> {
        require_id("secret_id", &args.secret_id)?;
        let content_type = effective_content_type(args.content_type);
        let content = SecretContentDetails::new(args.secret_value.expose(), &content_type);

        let client = self.factory.secrets_client()?;
        let secret = client
            .create_secret_version(&args.secret_id, content)
            .await?;
        info!(
            secret_id = %args.secret_id,
            version_number = ?secret.current_version_number,
            "Created secret version"
        );

        Ok(CreateSecretVersionResult {
            status: STATUS_SUCCESS.to_string(),
            message: "Secret version created successfully".to_string(),
            secret_id: args.secret_id,
            version_number: secret.current_version_number,
            lifecycle_state: secret.lifecycle_state,
            content_type,
            time_created: secret.time_of_current_version,
            stages: None,
        })
    }

    pub async fn update_secret_metadata(
        &self,
        args: UpdateSecretMetadataArgs,
    ) -> Result<UpdateSecretMetadataResult, VaultError> {
        require_id("secret_id", &args.secret_id)?;
        let details = UpdateSecretDetails {
            description: args.description,
            freeform_tags: args.freeform_tags,
            defined_tags: args.defined_tags,
            secret_content: None,
        };
        if details.is_empty() {
            return Err(VaultError::validation(
                "at least one of description, freeform_tags or defined_tags must be provided",
            ));
        }

        let client = self.factory.vaults_client()?;
        let secret = client.update_secret(&args.secret_id, &details).await?;
        info!(secret_id = %args.secret_id, "Updated secret metadata");

        Ok(UpdateSecretMetadataResult {
            status: STATUS_SUCCESS.to_string(),
            message: "Secret metadata updated successfully".to_string(),
            secret_id: secret.id,
            name: secret.secret_name,
            description: secret.description,
            freeform_tags: secret.freeform_tags,
            defined_tags: secret.defined_tags,
            lifecycle_state: secret.lifecycle_state,
        })
    }

    /// Schedule deletion, then read the secret back for the result
    pub async fn delete_secret(
        &self,
        args: DeleteSecretArgs,
    ) -> Result<DeleteSecretResult, VaultError> {
        require_id("secret_id", &args.secret_id)?;
        let details = ScheduleSecretDeletionDetails {
            time_of_deletion: deletion_time(args.time_of_deletion_in_days)?,
        };

        let client = self.factory.vaults_client()?;
        client
            .schedule_secret_deletion(&args.secret_id, &details)
            .await?;
        let secret = client.get_secret(&args.secret_id).await?;
        info!(
            secret_id = %args.secret_id,
            time_of_deletion = ?secret.time_of_deletion,
            "Scheduled secret deletion"
        );

        Ok(DeleteSecretResult {
            status: STATUS_SUCCESS.to_string(),
            message: "Secret scheduled for deletion".to_string(),
            secret_id: secret.id,
            name: secret.secret_name,
            lifecycle_state: secret.lifecycle_state,
            time_of_deletion: secret.time_of_deletion,
        })
    }
}

async fn drain_versions(
    client: &dyn SecretsApi,
    secret_id: &str,
    limit: Option<u32>,
) -> Result<Vec<SecretVersion>, VaultError> {
    let versions = drain_pages(limit, |cursor, hint| async move {
        client
            .list_secret_versions(secret_id, cursor.as_deref(), hint)
            .await
    })
    .await?;
    Ok(versions.into_iter().map(mapper::secret_version).collect())
}

fn validate_limit(limit: Option<u32>) -> Result<(), VaultError> {
    match limit {
        Some(0) => Err(VaultError::validation("limit must be at least 1")),
        _ => Ok(()),
    }
}

fn require(parameter: &str, value: &str) -> Result<(), VaultError> {
    if value.trim().is_empty() {
        Err(VaultError::validation(format!("{parameter} must not be empty")))
    } else {
        Ok(())
    }
}

/// Identifiers must fit in a single URL path segment
fn require_id(parameter: &str, value: &str) -> Result<(), VaultError> {
    require(parameter, value)?;
    if value.contains(['/', '?', '#', '%', '\\']) || matches!(value.trim(), "." | "..") {
        return Err(VaultError::validation(format!(
            "{parameter} is not a valid OCID: {value}"
        )));
    }
    Ok(())
}

fn effective_content_type(content_type: Option<String>) -> String {
    content_type
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// Absolute deletion time for a window in days; `None` keeps the service default
fn deletion_time(days: Option<u32>) -> Result<Option<chrono::DateTime<Utc>>, VaultError> {
    let Some(days) = days else {
        return Ok(None);
    };
    if !(MIN_DELETION_WINDOW_DAYS..=MAX_DELETION_WINDOW_DAYS).contains(&days) {
        return Err(VaultError::validation(format!(
            "time_of_deletion_in_days must be between {MIN_DELETION_WINDOW_DAYS} and {MAX_DELETION_WINDOW_DAYS}, got {days}"
        )));
    }
    Ok(Some(Utc::now() + Duration::days(i64::from(days))))
}
