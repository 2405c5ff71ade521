//! # MCP
//!
//! Model Context Protocol surface: JSON-RPC framing, the tool registry and
//! the two transports (stdio and HTTP).

pub mod handler;
pub mod http;
pub mod protocol;
pub mod registry;
pub mod stdio;

pub use handler::McpServer;
