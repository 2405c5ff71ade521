//! Vault management client (`vaults.<region>.oci.oraclecloud.com/20180608`)

use async_trait::async_trait;
use reqwest::Method;

use super::client::OciHttpClient;
use super::requests::{
    CreateSecretDetails, ListSecretsQuery, ScheduleSecretDeletionDetails, UpdateSecretDetails,
};
use super::responses::{SecretDetails, SecretSummary};
use crate::error::VaultError;
use crate::provider::{Page, VaultsApi};

#[derive(Debug)]
pub struct OciVaultsClient {
    client: OciHttpClient,
}

impl OciVaultsClient {
    pub(crate) fn new(client: OciHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VaultsApi for OciVaultsClient {
    async fn list_secrets(
        &self,
        query: &ListSecretsQuery,
        page: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Page<SecretSummary>, VaultError> {
        let mut params = vec![
            ("compartmentId", query.compartment_id.clone()),
            ("vaultId", query.vault_id.clone()),
        ];
        if let Some(name) = &query.name {
            params.push(("name", name.clone()));
        }
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = page {
            params.push(("page", page.to_string()));
        }

        let response = self
            .client
            .get_json::<Vec<SecretSummary>>(&["secrets"], &params, "ListSecrets")
            .await?;
        Ok(Page {
            items: response.body,
            next_page: response.next_page,
        })
    }

    async fn get_secret(&self, secret_id: &str) -> Result<SecretDetails, VaultError> {
        let response = self
            .client
            .get_json(&["secrets", secret_id], &[], "GetSecret")
            .await?;
        Ok(response.body)
    }

    async fn create_secret(
        &self,
        details: &CreateSecretDetails,
    ) -> Result<SecretDetails, VaultError> {
        let response = self
            .client
            .send_json(Method::POST, &["secrets"], &[], Some(details), "CreateSecret")
            .await?;
        Ok(response.body)
    }

    async fn update_secret(
        &self,
        secret_id: &str,
        details: &UpdateSecretDetails,
    ) -> Result<SecretDetails, VaultError> {
        let response = self
            .client
            .send_json(
                Method::PUT,
                &["secrets", secret_id],
                &[],
                Some(details),
                "UpdateSecret",
            )
            .await?;
        Ok(response.body)
    }

    async fn schedule_secret_deletion(
        &self,
        secret_id: &str,
        details: &ScheduleSecretDeletionDetails,
    ) -> Result<(), VaultError> {
        self.client
            .send(
                Method::POST,
                &["secrets", secret_id, "actions", "scheduleDeletion"],
                &[],
                Some(details),
                "ScheduleSecretDeletion",
            )
            .await?;
        Ok(())
    }
}
