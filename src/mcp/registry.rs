//! # Tool Registry
//!
//! Tool definitions advertised by `tools/list` and the single dispatch entry
//! point used by `tools/call`.
//!
//! `dispatch` is the only place tool calls are logged and counted: it opens
//! the `mcp.tool` span, records call count and duration, and logs each
//! failure once with its error kind before returning it unchanged.

use std::future::Future;
use std::time::Instant;

use schemars::{schema_for, Schema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info_span, Instrument};

use crate::error::VaultError;
use crate::models::{
    ConfigureVaultResult, CreateSecretResult, CreateSecretVersionResult, DeleteSecretResult,
    ListResult, Secret, SecretMetadata, SecretValue, SecretVersion, UpdateSecretMetadataResult,
    VaultConfig,
};
use crate::observability::metrics;
use crate::operations::args::{
    ConfigureVaultArgs, CreateSecretArgs, DeleteSecretArgs, GetSecretValueArgs,
    ListSecretVersionsArgs, ListSecretsArgs, NoArgs, SearchSecretsArgs, SecretIdArgs,
    UpdateSecretArgs, UpdateSecretMetadataArgs,
};
use crate::operations::VaultService;

/// A single MCP tool definition
#[derive(Debug, Clone)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub output_schema: Value,
}

impl ToolDef {
    fn new(
        name: &'static str,
        description: &'static str,
        input_schema: Schema,
        output_schema: Schema,
    ) -> Self {
        Self {
            name,
            description,
            input_schema: input_schema.to_value(),
            output_schema: output_schema.to_value(),
        }
    }

    /// `tools/list` entry
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema,
            "outputSchema": self.output_schema,
        })
    }
}

/// Every tool this server exposes
pub fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "list_secrets",
            "Lists all secrets in the specified vault and compartment",
            schema_for!(ListSecretsArgs),
            schema_for!(ListResult<SecretMetadata>),
        ),
        ToolDef::new(
            "search_secrets",
            "Searches for secrets by name in the specified vault and compartment",
            schema_for!(SearchSecretsArgs),
            schema_for!(ListResult<SecretMetadata>),
        ),
        ToolDef::new(
            "get_secret_metadata",
            "Gets the metadata of a secret",
            schema_for!(SecretIdArgs),
            schema_for!(SecretMetadata),
        ),
        ToolDef::new(
            "list_secret_versions",
            "Lists all versions of a secret",
            schema_for!(ListSecretVersionsArgs),
            schema_for!(ListResult<SecretVersion>),
        ),
        ToolDef::new(
            "get_secret_value",
            "Gets the secret bundle metadata for a specific version. The secret content itself is never returned.",
            schema_for!(GetSecretValueArgs),
            schema_for!(SecretValue),
        ),
        ToolDef::new(
            "get_secret",
            "Gets a secret with its metadata and all of its versions",
            schema_for!(SecretIdArgs),
            schema_for!(Secret),
        ),
        ToolDef::new(
            "configure_vault",
            "Sets the default vault and compartment used when a tool call does not name them",
            schema_for!(ConfigureVaultArgs),
            schema_for!(ConfigureVaultResult),
        ),
        ToolDef::new(
            "get_vault_config",
            "Gets the current default vault and compartment",
            schema_for!(NoArgs),
            schema_for!(VaultConfig),
        ),
        ToolDef::new(
            "create_secret",
            "Creates a new secret in the vault",
            schema_for!(CreateSecretArgs),
            schema_for!(CreateSecretResult),
        ),
        ToolDef::new(
            "update_secret",
            "Creates a new version of an existing secret. Previous versions are kept.",
            schema_for!(UpdateSecretArgs),
            schema_for!(CreateSecretVersionResult),
        ),
        ToolDef::new(
            "update_secret_metadata",
            "Updates the description or tags of a secret without creating a new version",
            schema_for!(UpdateSecretMetadataArgs),
            schema_for!(UpdateSecretMetadataResult),
        ),
        ToolDef::new(
            "delete_secret",
            "Schedules a secret for deletion after a waiting period of 7 to 30 days",
            schema_for!(DeleteSecretArgs),
            schema_for!(DeleteSecretResult),
        ),
    ]
}

/// Run one tool call. Returns `None` when `name` is not a known tool.
pub async fn dispatch(
    service: &VaultService,
    name: &str,
    arguments: Value,
) -> Option<Result<Value, VaultError>> {
    let span = info_span!("mcp.tool", tool = name);
    async move {
        let start = Instant::now();
        let Some(result) = call_tool(service, name, arguments).await else {
            return None;
        };

        metrics::increment_tool_calls(name);
        metrics::observe_tool_call_duration(name, start.elapsed().as_secs_f64());
        if let Err(e) = &result {
            error!(tool = name, kind = e.kind(), error = %e, "Tool call failed");
            metrics::increment_tool_call_errors(name, e.kind());
        }
        Some(result)
    }
    .instrument(span)
    .await
}

async fn call_tool(
    service: &VaultService,
    name: &str,
    arguments: Value,
) -> Option<Result<Value, VaultError>> {
    let result = match name {
        "list_secrets" => {
            invoke(arguments, |args: ListSecretsArgs| async move {
                service.list_secrets(args).await.map(ListResult::from)
            })
            .await
        }
        "search_secrets" => {
            invoke(arguments, |args: SearchSecretsArgs| async move {
                service.search_secrets(args).await.map(ListResult::from)
            })
            .await
        }
        "get_secret_metadata" => invoke(arguments, |args| service.get_secret_metadata(args)).await,
        "list_secret_versions" => {
            invoke(arguments, |args: ListSecretVersionsArgs| async move {
                service.list_secret_versions(args).await.map(ListResult::from)
            })
            .await
        }
        "get_secret_value" => invoke(arguments, |args| service.get_secret_value(args)).await,
        "get_secret" => invoke(arguments, |args| service.get_secret(args)).await,
        "configure_vault" => invoke(arguments, |args| service.configure_vault(args)).await,
        "get_vault_config" => {
            invoke(arguments, |_: NoArgs| service.get_vault_config()).await
        }
        "create_secret" => invoke(arguments, |args| service.create_secret(args)).await,
        "update_secret" => invoke(arguments, |args| service.update_secret(args)).await,
        "update_secret_metadata" => {
            invoke(arguments, |args| service.update_secret_metadata(args)).await
        }
        "delete_secret" => invoke(arguments, |args| service.delete_secret(args)).await,
        _ => return None,
    };
    Some(result)
}

/// Decode arguments, run the operation, encode its result
async fn invoke<A, T, F, Fut>(arguments: Value, operation: F) -> Result<Value, VaultError>
where
    A: DeserializeOwned,
    T: Serialize,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<T, VaultError>>,
{
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    let args: A = serde_json::from_value(arguments)
        .map_err(|e| VaultError::validation(format!("invalid arguments: {e}")))?;
    let output = operation(args).await?;
    serde_json::to_value(output).map_err(|e| VaultError::MalformedResponse {
        operation: "tool result",
        message: e.to_string(),
    })
}
