//! # OCI Vault Provider
//!
//! REST implementation of the provider traits against OCI Vault.
//!
//! Uses reqwest (rustls) for HTTP and OCI HTTP signatures for authentication.
//! Credentials are read from the OCI CLI config file each time a client is
//! built, so a refreshed session token is picked up without a restart.
//!
//! References:
//! - [Vault management API](https://docs.oracle.com/en-us/iaas/api/#/en/secretmgmt/20180608/)
//! - [Secret retrieval API](https://docs.oracle.com/en-us/iaas/api/#/en/secretretrieval/20190301/)

use reqwest::Client;
use tracing::debug;

use crate::constants::{SECRETS_API_VERSION, VAULTS_API_VERSION};
use crate::error::VaultError;
use crate::provider::{ClientFactory, SecretsApi, VaultsApi};
use auth::{CredentialSource, OciProfile, RequestSigner};
use client::OciHttpClient;
use secrets::OciSecretsClient;
use vaults::OciVaultsClient;

pub mod auth;
mod client;
pub mod requests;
pub mod responses;
pub mod secrets;
pub mod vaults;

/// Endpoint overrides; `None` derives the public endpoint from the region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOverrides {
    pub vaults: Option<String>,
    pub secrets: Option<String>,
}

pub fn vaults_endpoint(region: &str) -> String {
    format!("https://vaults.{region}.oci.oraclecloud.com")
}

pub fn secrets_endpoint(region: &str) -> String {
    format!("https://secrets.vaults.{region}.oci.oraclecloud.com")
}

/// Builds signed OCI clients from the OCI CLI config file
#[derive(Debug, Clone)]
pub struct OciClientFactory {
    source: CredentialSource,
    endpoints: EndpointOverrides,
}

impl OciClientFactory {
    pub fn new(source: CredentialSource, endpoints: EndpointOverrides) -> Self {
        Self { source, endpoints }
    }

    /// Load credentials and return (signer, region)
    fn credentials(&self) -> Result<(RequestSigner, String), VaultError> {
        let profile = OciProfile::load(&self.source)?;
        let signer = RequestSigner::from_profile(&profile)?;
        debug!(
            profile = %self.source.profile,
            region = %profile.region,
            "Built OCI request signer"
        );
        Ok((signer, profile.region))
    }

    fn vaults_http(&self, http: Client, signer: RequestSigner, region: &str) -> OciHttpClient {
        let base_url = self
            .endpoints
            .vaults
            .clone()
            .unwrap_or_else(|| vaults_endpoint(region));
        OciHttpClient::new(http, signer, &base_url, VAULTS_API_VERSION, "vaults")
    }
}

impl ClientFactory for OciClientFactory {
    fn vaults_client(&self) -> Result<Box<dyn VaultsApi>, VaultError> {
        let (signer, region) = self.credentials()?;
        let http = Client::builder().build()?;
        Ok(Box::new(OciVaultsClient::new(
            self.vaults_http(http, signer, &region),
        )))
    }

    fn secrets_client(&self) -> Result<Box<dyn SecretsApi>, VaultError> {
        let (signer, region) = self.credentials()?;
        let http = Client::builder().build()?;
        let secrets_url = self
            .endpoints
            .secrets
            .clone()
            .unwrap_or_else(|| secrets_endpoint(&region));
        let secrets = OciHttpClient::new(
            http.clone(),
            signer.clone(),
            &secrets_url,
            SECRETS_API_VERSION,
            "secrets",
        );
        let vaults = self.vaults_http(http, signer, &region);
        Ok(Box::new(OciSecretsClient::new(secrets, vaults)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_public_endpoints_follow_region() {
        assert_eq!(
            vaults_endpoint("eu-frankfurt-1"),
            "https://vaults.eu-frankfurt-1.oci.oraclecloud.com"
        );
        assert_eq!(
            secrets_endpoint("eu-frankfurt-1"),
            "https://secrets.vaults.eu-frankfurt-1.oci.oraclecloud.com"
        );
    }

    #[test]
    fn test_missing_config_file_fails_with_credential_error() {
        let factory = OciClientFactory::new(
            CredentialSource {
                config_file: PathBuf::from("/nonexistent/.oci/config"),
                profile: "DEFAULT".to_string(),
            },
            EndpointOverrides::default(),
        );
        assert_eq!(factory.vaults_client().err().unwrap().kind(), "credential");
        assert_eq!(factory.secrets_client().err().unwrap().kind(), "credential");
    }
}
