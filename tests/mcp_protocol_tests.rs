//! MCP protocol tests
//!
//! Drive the JSON-RPC surface end to end through both transports with an
//! in-memory vault behind it.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::{service, FakeVault, COMPARTMENT_ID, SECRET_ID, VAULT_ID};
use oci_vault_mcp_server::mcp::http::{router, ServerState};
use oci_vault_mcp_server::mcp::stdio::serve_lines;
use oci_vault_mcp_server::mcp::McpServer;
use serde_json::{json, Value};
use tower::ServiceExt;

fn server(vault: &Arc<FakeVault>) -> McpServer {
    McpServer::new(Arc::new(service(
        vault,
        Some(VAULT_ID),
        Some(COMPARTMENT_ID),
    )))
}

async fn call(server: &McpServer, message: Value) -> Value {
    let response = server
        .handle_message(&message.to_string())
        .await
        .expect("expected a response");
    serde_json::to_value(response).unwrap()
}

#[tokio::test]
async fn test_initialize_negotiates_protocol_version() {
    let server = server(&Arc::new(FakeVault::default()));

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2025-03-26", "capabilities": {} }
        }),
    )
    .await;
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(response["result"]["serverInfo"]["name"], "oci-vault-mcp-server");

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "initialize",
            "params": { "protocolVersion": "2023-01-01" }
        }),
    )
    .await;
    assert_eq!(response["result"]["protocolVersion"], "2025-06-18");
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let server = server(&Arc::new(FakeVault::default()));
    let response = server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_ping_and_unknown_method() {
    let server = server(&Arc::new(FakeVault::default()));

    let response = call(&server, json!({"jsonrpc": "2.0", "id": "p", "method": "ping"})).await;
    assert_eq!(response["result"], json!({}));

    let response = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"}),
    )
    .await;
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["id"], 7);
}

#[tokio::test]
async fn test_parse_error_has_null_id() {
    let server = server(&Arc::new(FakeVault::default()));
    let response = server.handle_message("{not json").await.unwrap();
    let response = serde_json::to_value(response).unwrap();
    assert_eq!(response["error"]["code"], -32700);
    assert!(response["id"].is_null());
}

#[tokio::test]
async fn test_tools_list_advertises_every_tool_with_schemas() {
    let server = server(&Arc::new(FakeVault::default()));
    let response = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    )
    .await;

    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in [
        "list_secrets",
        "search_secrets",
        "get_secret_metadata",
        "list_secret_versions",
        "get_secret_value",
        "get_secret",
        "configure_vault",
        "get_vault_config",
        "create_secret",
        "update_secret",
        "update_secret_metadata",
        "delete_secret",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }

    let create = tools.iter().find(|t| t["name"] == "create_secret").unwrap();
    let required = create["inputSchema"]["required"].as_array().unwrap();
    assert!(required.contains(&json!("name")));
    assert!(required.contains(&json!("secret_value")));
    assert!(create["outputSchema"]["properties"]["secret_id"].is_object());
}

#[tokio::test]
async fn test_tools_call_success_carries_structured_content() {
    let vault = Arc::new(FakeVault::with_secrets(3));
    let server = server(&vault);

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "list_secrets", "arguments": { "limit": 2 } }
        }),
    )
    .await;

    let result = &response["result"];
    assert_eq!(result["isError"], false);
    assert_eq!(result["structuredContent"]["result"].as_array().unwrap().len(), 2);
    let text: Value =
        serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(text, result["structuredContent"]);
}

#[tokio::test]
async fn test_tools_call_failure_is_a_tool_error_not_a_protocol_error() {
    let vault = Arc::new(FakeVault::default());
    let server = server(&vault);

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {
                "name": "delete_secret",
                "arguments": { "secret_id": SECRET_ID, "time_of_deletion_in_days": 3 }
            }
        }),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], true);
    assert!(response["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("time_of_deletion_in_days"));
    assert!(vault.calls().is_empty());
}

#[tokio::test]
async fn test_tools_call_rejects_unknown_arguments() {
    let vault = Arc::new(FakeVault::default());
    let server = server(&vault);

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "get_secret", "arguments": { "secret_id": SECRET_ID, "extra": 1 } }
        }),
    )
    .await;
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(vault.constructions(), 0);
}

#[tokio::test]
async fn test_tools_call_unknown_tool_and_missing_name() {
    let server = server(&Arc::new(FakeVault::default()));

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": { "name": "read_plaintext" }
        }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);

    let response = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": {}}),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_get_vault_config_accepts_missing_arguments() {
    let server = server(&Arc::new(FakeVault::default()));
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "tools/call",
            "params": { "name": "get_vault_config" }
        }),
    )
    .await;
    let config = &response["result"]["structuredContent"];
    assert_eq!(config["vault_id"], VAULT_ID);
    assert_eq!(config["configured"], true);
}

#[tokio::test]
async fn test_stdio_transport_answers_line_by_line() {
    let server = server(&Arc::new(FakeVault::default()));
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        "\n",
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );
    let mut output: Vec<u8> = Vec::new();

    serve_lines(&server, input.as_bytes(), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[1]["id"], 2);
}

#[tokio::test]
async fn test_stdio_transport_survives_invalid_utf8() {
    let server = server(&Arc::new(FakeVault::default()));
    let mut input: Vec<u8> = b"\xff\xfe{\"jsonrpc\"}\n".to_vec();
    input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
    input.push(b'\n');
    let mut output: Vec<u8> = Vec::new();

    serve_lines(&server, input.as_slice(), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"]["code"], -32700);
    assert!(lines[0]["id"].is_null());
    assert_eq!(lines[1]["id"], 1);
    assert_eq!(lines[1]["result"], json!({}));
}

#[tokio::test]
async fn test_http_transport_routes() {
    let state = Arc::new(ServerState::new(server(&Arc::new(FakeVault::default()))));
    let app = router(Arc::clone(&state));

    let response = app
        .clone()
        .oneshot(
            Request::post("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["result"], json!({}));

    let response = app
        .clone()
        .oneshot(
            Request::post("/mcp")
                .body(Body::from(
                    r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .clone()
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    state.is_ready.store(true, Ordering::Relaxed);
    let response = app
        .clone()
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
