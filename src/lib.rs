//! OCI Vault MCP Server Library
//!
//! Exposes Oracle Cloud Infrastructure Vault secret management as Model
//! Context Protocol tools. The binary in `main.rs` wires these modules to a
//! transport; tests drive them directly.

pub mod config;
pub mod constants;
pub mod error;
pub mod mapper;
pub mod mcp;
pub mod models;
pub mod observability;
pub mod operations;
pub mod provider;
pub mod state;

pub use error::VaultError;
pub use operations::VaultService;
pub use state::VaultDefaults;
