//! # Errors
//!
//! Error taxonomy shared by every tool operation.
//!
//! Operations return `Result<T, VaultError>`. The registry dispatch logs and
//! counts each error once, then hands it back unchanged so the transport can
//! surface it as a failed tool call.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    /// A required identifier is absent after falling back to configured defaults
    #[error("{parameter} is required. {hint}")]
    MissingParameter {
        parameter: &'static str,
        hint: &'static str,
    },

    /// An argument is outside its declared bounds or has the wrong shape
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Signing material could not be loaded or is no longer valid
    #[error("credential error: {0}")]
    Credential(String),

    /// The remote service answered with a non-success status
    #[error("OCI API error: {message} (status: {status}, code: {code}, opc-request-id: {})", .opc_request_id.as_deref().unwrap_or("-"))]
    RemoteService {
        status: u16,
        code: String,
        message: String,
        opc_request_id: Option<String>,
    },

    /// The request never produced an HTTP response
    #[error("failed to reach OCI endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response did not match the expected wire schema
    #[error("malformed response from {operation}: {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },
}

impl VaultError {
    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "missing_parameter",
            Self::Validation(_) => "validation",
            Self::Credential(_) => "credential",
            Self::RemoteService { .. } => "remote_service",
            Self::Transport(_) => "transport",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }
}
