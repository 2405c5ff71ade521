//! # Constants
//!
//! Shared constants used throughout the server.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Name reported in `serverInfo` and used as the `user-agent` product token
pub const SERVER_NAME: &str = "oci-vault-mcp-server";

/// Content type used for secret content when the caller does not supply one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Shortest deletion window the vault service accepts (days)
pub const MIN_DELETION_WINDOW_DAYS: u32 = 7;

/// Longest deletion window the vault service accepts (days)
pub const MAX_DELETION_WINDOW_DAYS: u32 = 30;

/// MCP protocol versions this server speaks, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Default OCI config file location (`~` is expanded against `$HOME`)
pub const DEFAULT_OCI_CONFIG_FILE: &str = "~/.oci/config";

/// Default OCI config profile
pub const DEFAULT_OCI_PROFILE: &str = "DEFAULT";

/// API version prefix of the vault management endpoint
pub const VAULTS_API_VERSION: &str = "20180608";

/// API version prefix of the secret retrieval endpoint
pub const SECRETS_API_VERSION: &str = "20190301";

/// Response header carrying the pagination cursor
pub const NEXT_PAGE_HEADER: &str = "opc-next-page";

/// Request/response header carrying the request correlation id
pub const REQUEST_ID_HEADER: &str = "opc-request-id";

/// Path the HTTP transport serves JSON-RPC on
pub const MCP_HTTP_PATH: &str = "/mcp";
