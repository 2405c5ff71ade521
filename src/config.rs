//! # Server Configuration
//!
//! Process configuration read once at startup from the environment (after
//! `.env` has been loaded). CLI flags override individual fields in `main`.
//!
//! | Variable | Field |
//! |---|---|
//! | `OCI_VAULT_ID`, `OCI_COMPARTMENT_ID` | initial vault defaults |
//! | `OCI_VAULT_KEY_ID` | default master key for new secrets |
//! | `OCI_CONFIG_FILE`, `OCI_CONFIG_PROFILE` | credential source |
//! | `OCI_VAULT_ENDPOINT`, `OCI_SECRETS_ENDPOINT` | endpoint overrides |
//! | `ORACLE_MCP_HOST`, `ORACLE_MCP_PORT` | HTTP listener (both required) |
//! | `LOG_LEVEL`, `LOG_FORMAT` | logging |

use anyhow::{anyhow, Context, Result};

use crate::constants::{DEFAULT_OCI_CONFIG_FILE, DEFAULT_OCI_PROFILE};
use crate::observability::logging::LogFormat;

const DEFAULT_LOG_LEVEL: &str = "info";

/// How the server talks to its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http { host: String, port: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub vault_id: Option<String>,
    pub compartment_id: Option<String>,
    pub key_id: Option<String>,
    pub oci_config_file: String,
    pub oci_profile: String,
    pub vault_endpoint: Option<String>,
    pub secrets_endpoint: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = env_var_opt(&lookup, "ORACLE_MCP_PORT")
            .map(|v| {
                v.parse::<u16>()
                    .with_context(|| format!("ORACLE_MCP_PORT must be a port number, got '{v}'"))
            })
            .transpose()?;
        let log_format = env_var_opt(&lookup, "LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>().map_err(|e| anyhow!(e)))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            vault_id: env_var_opt(&lookup, "OCI_VAULT_ID"),
            compartment_id: env_var_opt(&lookup, "OCI_COMPARTMENT_ID"),
            key_id: env_var_opt(&lookup, "OCI_VAULT_KEY_ID"),
            oci_config_file: env_var_or_default_str(
                &lookup,
                "OCI_CONFIG_FILE",
                DEFAULT_OCI_CONFIG_FILE,
            ),
            oci_profile: env_var_or_default_str(&lookup, "OCI_CONFIG_PROFILE", DEFAULT_OCI_PROFILE),
            vault_endpoint: env_var_opt(&lookup, "OCI_VAULT_ENDPOINT"),
            secrets_endpoint: env_var_opt(&lookup, "OCI_SECRETS_ENDPOINT"),
            host: env_var_opt(&lookup, "ORACLE_MCP_HOST"),
            port,
            log_level: env_var_or_default_str(&lookup, "LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format,
        })
    }

    /// HTTP when both host and port are set, stdio otherwise
    pub fn transport(&self) -> Transport {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => Transport::Http {
                host: host.clone(),
                port,
            },
            _ => Transport::Stdio,
        }
    }
}

/// Read a variable, treating empty values as unset
fn env_var_opt(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Read a variable as string or return default
fn env_var_or_default_str(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    env_var_opt(lookup, key).unwrap_or_else(|| default.to_string())
}
