//! # Metrics
//!
//! Prometheus metrics for monitoring the MCP server.
//!
//! ## Metrics Exposed
//!
//! - `oci_vault_mcp_tool_calls_total` - Total number of tool calls, by tool
//! - `oci_vault_mcp_tool_call_errors_total` - Total number of failed tool calls, by tool and error kind
//! - `oci_vault_mcp_tool_call_duration_seconds` - Duration of tool calls, by tool
//! - `oci_vault_mcp_remote_requests_total` - Total number of requests sent to OCI, by endpoint and method

use anyhow::Result;
use prometheus::{HistogramVec, IntCounterVec, Registry};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static TOOL_CALLS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "oci_vault_mcp_tool_calls_total",
            "Total number of tool calls",
        ),
        &["tool"],
    )
    .expect("Failed to create TOOL_CALLS_TOTAL metric - this should never happen")
});

static TOOL_CALL_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "oci_vault_mcp_tool_call_errors_total",
            "Total number of failed tool calls",
        ),
        &["tool", "kind"],
    )
    .expect("Failed to create TOOL_CALL_ERRORS_TOTAL metric - this should never happen")
});

static TOOL_CALL_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "oci_vault_mcp_tool_call_duration_seconds",
            "Duration of tool calls in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["tool"],
    )
    .expect("Failed to create TOOL_CALL_DURATION metric - this should never happen")
});

static REMOTE_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "oci_vault_mcp_remote_requests_total",
            "Total number of requests sent to OCI endpoints",
        ),
        &["endpoint", "method"],
    )
    .expect("Failed to create REMOTE_REQUESTS_TOTAL metric - this should never happen")
});

/// Register all collectors with the shared registry. Safe to call more than once.
pub fn register_metrics() -> Result<()> {
    register(Box::new(TOOL_CALLS_TOTAL.clone()))?;
    register(Box::new(TOOL_CALL_ERRORS_TOTAL.clone()))?;
    register(Box::new(TOOL_CALL_DURATION.clone()))?;
    register(Box::new(REMOTE_REQUESTS_TOTAL.clone()))?;
    Ok(())
}

fn register(collector: Box<dyn prometheus::core::Collector>) -> Result<()> {
    match REGISTRY.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub fn increment_tool_calls(tool: &str) {
    TOOL_CALLS_TOTAL.with_label_values(&[tool]).inc();
}

pub fn increment_tool_call_errors(tool: &str, kind: &str) {
    TOOL_CALL_ERRORS_TOTAL.with_label_values(&[tool, kind]).inc();
}

pub fn observe_tool_call_duration(tool: &str, duration: f64) {
    TOOL_CALL_DURATION.with_label_values(&[tool]).observe(duration);
}

pub fn increment_remote_requests(endpoint: &str, method: &str) {
    REMOTE_REQUESTS_TOTAL
        .with_label_values(&[endpoint, method])
        .inc();
}
