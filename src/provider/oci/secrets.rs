//! Secret data client (`secrets.vaults.<region>.oci.oraclecloud.com/20190301`)
//!
//! New versions are created by sending content to the vault management
//! endpoint, so this client carries a handle to both endpoints.

use async_trait::async_trait;
use reqwest::Method;

use super::client::OciHttpClient;
use super::requests::{SecretContentDetails, UpdateSecretDetails};
use super::responses::{SecretBundle, SecretBundleVersionSummary, SecretDetails};
use crate::error::VaultError;
use crate::provider::{Page, SecretsApi};

#[derive(Debug)]
pub struct OciSecretsClient {
    secrets: OciHttpClient,
    vaults: OciHttpClient,
}

impl OciSecretsClient {
    pub(crate) fn new(secrets: OciHttpClient, vaults: OciHttpClient) -> Self {
        Self { secrets, vaults }
    }
}

#[async_trait]
impl SecretsApi for OciSecretsClient {
    async fn list_secret_versions(
        &self,
        secret_id: &str,
        page: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Page<SecretBundleVersionSummary>, VaultError> {
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = page {
            params.push(("page", page.to_string()));
        }

        let response = self
            .secrets
            .get_json::<Vec<SecretBundleVersionSummary>>(
                &["secretbundles", secret_id, "versions"],
                &params,
                "ListSecretBundleVersions",
            )
            .await?;
        Ok(Page {
            items: response.body,
            next_page: response.next_page,
        })
    }

    async fn get_secret_bundle(
        &self,
        secret_id: &str,
        version_number: Option<u64>,
    ) -> Result<SecretBundle, VaultError> {
        let params: Vec<(&str, String)> = version_number
            .map(|n| ("versionNumber", n.to_string()))
            .into_iter()
            .collect();
        let response = self
            .secrets
            .get_json(
                &["secretbundles", secret_id],
                &params,
                "GetSecretBundle",
            )
            .await?;
        Ok(response.body)
    }

    async fn create_secret_version(
        &self,
        secret_id: &str,
        content: SecretContentDetails,
    ) -> Result<SecretDetails, VaultError> {
        let details = UpdateSecretDetails {
            secret_content: Some(content),
            ..Default::default()
        };
        let response = self
            .vaults
            .send_json(
                Method::PUT,
                &["secrets", secret_id],
                &[],
                Some(&details),
                "CreateSecretVersion",
            )
            .await?;
        Ok(response.body)
    }
}
