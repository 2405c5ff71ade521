//! # OCI Vault MCP Server
//!
//! An MCP server that lets agents manage secrets in Oracle Cloud
//! Infrastructure Vault.
//!
//! ## Overview
//!
//! 1. **Configuration** - `.env`, then the environment, then CLI flags
//! 2. **Credentials** - OCI CLI config file and profile (API key or session token)
//! 3. **Transport** - stdio by default, HTTP when both host and port are set
//!
//! Secret values are accepted for writes but never returned by any tool.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use oci_vault_mcp_server::config::{ServerConfig, Transport};
use oci_vault_mcp_server::constants::SERVER_NAME;
use oci_vault_mcp_server::mcp::http::{start_server, ServerState};
use oci_vault_mcp_server::mcp::{handler, stdio, McpServer};
use oci_vault_mcp_server::observability::{logging, metrics};
use oci_vault_mcp_server::provider::oci::auth::CredentialSource;
use oci_vault_mcp_server::provider::oci::{EndpointOverrides, OciClientFactory};
use oci_vault_mcp_server::{VaultDefaults, VaultService};

/// OCI Vault secrets management over the Model Context Protocol
#[derive(Parser, Debug)]
#[command(name = SERVER_NAME, version = handler::version_string(), long_about = None)]
struct Cli {
    /// HTTP listen address (requires --port, overrides ORACLE_MCP_HOST)
    #[arg(long)]
    host: Option<String>,

    /// HTTP listen port (requires --host, overrides ORACLE_MCP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// OCI config profile (overrides OCI_CONFIG_PROFILE)
    #[arg(long)]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if cli.host.is_some() {
        config.host = cli.host;
    }
    if cli.port.is_some() {
        config.port = cli.port;
    }
    if let Some(profile) = cli.profile {
        config.oci_profile = profile;
    }

    logging::init_logging(&config.log_level, config.log_format)?;

    // Configure rustls crypto provider before any client is built
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    metrics::register_metrics().context("Failed to register metrics")?;

    info!(
        version = handler::version_string(),
        build_time = env!("BUILD_DATETIME"),
        profile = %config.oci_profile,
        "Starting {SERVER_NAME}"
    );

    let factory = OciClientFactory::new(
        CredentialSource {
            config_file: PathBuf::from(&config.oci_config_file),
            profile: config.oci_profile.clone(),
        },
        EndpointOverrides {
            vaults: config.vault_endpoint.clone(),
            secrets: config.secrets_endpoint.clone(),
        },
    );
    let defaults = Arc::new(VaultDefaults::new(
        config.vault_id.clone(),
        config.compartment_id.clone(),
    ));
    let service = Arc::new(VaultService::new(
        Arc::new(factory),
        defaults,
        config.key_id.clone(),
    ));
    let server = McpServer::new(service);

    match config.transport() {
        Transport::Stdio => stdio::serve_stdio(&server)
            .await
            .context("stdio transport failed"),
        Transport::Http { host, port } => {
            let state = Arc::new(ServerState::new(server));
            start_server(&host, port, state)
                .await
                .with_context(|| format!("HTTP transport failed on {host}:{port}"))
        }
    }
}
