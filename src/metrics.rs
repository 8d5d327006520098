// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the netcup DNS reconciler.
//!
//! All metrics use the namespace prefix `netcup_dns_` and live in
//! [`METRICS_REGISTRY`]. The library only records them; exposing the registry
//! is left to the embedding application via [`gather_metrics`].
//!
//! # Metrics Categories
//!
//! - **Operation Metrics** - Reconciler operations and their outcomes
//! - **Backend Metrics** - Individual API calls by action and status
//! - **Session Metrics** - Best-effort logout failures
//!
//! # Example
//!
//! ```rust,no_run
//! use netcup_dns::metrics::{gather_metrics, record_operation_success};
//!
//! record_operation_success("create", std::time::Duration::from_millis(420));
//! println!("{}", gather_metrics().unwrap());
//! ```

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

/// Namespace prefix for all metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "netcup_dns";

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Operation Metrics
// ============================================================================

/// Total number of reconciler operations by operation and status
///
/// Labels:
/// - `operation`: `create`, `read`, `update`, `delete`
/// - `status`: `success`, `error`
pub static OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_operations_total"),
        "Total number of reconciler operations by operation and status",
    );
    let counter = CounterVec::new(opts, &["operation", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciler operations in seconds
///
/// Labels:
/// - `operation`: `create`, `read`, `update`, `delete`
pub static OPERATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_operation_duration_seconds"),
        "Duration of reconciler operations in seconds by operation",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Total number of errors by operation and reason
///
/// Labels:
/// - `operation`: reconciler operation
/// - `reason`: [`crate::dns_errors::DnsError::status_reason`]
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of errors by operation and reason",
    );
    let counter = CounterVec::new(opts, &["operation", "reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Backend Metrics
// ============================================================================

/// Total number of backend API calls by action and response status
///
/// Labels:
/// - `action`: backend action, or `transport` for calls that got no response
/// - `status`: backend `status` field (`success`, `error`, ...)
pub static BACKEND_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_backend_requests_total"),
        "Total number of backend API calls by action and status",
    );
    let counter = CounterVec::new(opts, &["action", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Session Metrics
// ============================================================================

/// Total number of logouts that failed and were ignored
pub static LOGOUT_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        format!("{METRICS_NAMESPACE}_logout_failures_total"),
        "Total number of failed best-effort logouts",
    )
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful operation
///
/// # Arguments
/// * `operation` - The reconciler operation
/// * `duration` - Duration of the operation
pub fn record_operation_success(operation: &str, duration: Duration) {
    record_operation(operation, "success", duration);
}

/// Record a failed operation
///
/// # Arguments
/// * `operation` - The reconciler operation
/// * `reason` - Error reason code
/// * `duration` - Duration of the operation before failure
pub fn record_operation_error(operation: &str, reason: &str, duration: Duration) {
    record_operation(operation, "error", duration);
    ERRORS_TOTAL
        .with_label_values(&[operation, reason])
        .inc();
}

/// Record an operation outcome with an explicit status label
pub fn record_operation(operation: &str, status: &str, duration: Duration) {
    OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
    OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

/// Record one backend API call
pub fn record_backend_request(action: &str, status: &str) {
    BACKEND_REQUESTS_TOTAL
        .with_label_values(&[action, status])
        .inc();
}

/// Record a logout failure that was ignored
pub fn record_logout_failure() {
    LOGOUT_FAILURES_TOTAL.inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
