// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the ingress controller core.
//!
//! This module provides metrics collection with the namespace prefix
//! `ingress_controller_`.
//!
//! # Metrics Categories
//!
//! - **Selection Metrics** - Track class and ownership decisions
//! - **Translation Metrics** - Track denied locations, merge failures and duration
//!
//! # Example
//!
//! ```rust,no_run
//! use ingress_core::metrics::{gather_metrics, record_class_decision};
//!
//! record_class_decision(true);
//! let text = gather_metrics().unwrap();
//! ```

use crate::constants::METRICS_NAMESPACE;
use prometheus::{
    Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Selection Metrics
// ============================================================================

/// Total number of ingress class decisions
///
/// Labels:
/// - `result`: `accepted` or `ignored`
pub static CLASS_DECISIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_class_decisions_total"),
        "Total number of ingress class decisions by result",
    );
    let counter = CounterVec::new(opts, &["result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of ownership decisions
///
/// Labels:
/// - `result`: `owned` or `not_owned`
pub static OWNERSHIP_DECISIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_ownership_decisions_total"),
        "Total number of ingress ownership decisions by result",
    );
    let counter = CounterVec::new(opts, &["result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Translation Metrics
// ============================================================================

/// Total number of locations built in the denied state
pub static DENIED_LOCATIONS_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let counter = Counter::with_opts(Opts::new(
        format!("{METRICS_NAMESPACE}_denied_locations_total"),
        "Total number of locations denied by their annotations",
    ))
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of annotation values that could not be merged into a location
///
/// Labels:
/// - `field`: Location field name from the extracted annotation map
/// - `kind`: `unknown_field` or `type_mismatch`
pub static MERGE_FAILURES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_annotation_merge_failures_total"),
        "Total number of annotation values skipped while merging locations",
    );
    let counter = CounterVec::new(opts, &["field", "kind"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of one ingress translation in seconds
///
/// Labels:
/// - `result`: `translated`, `skipped` or `error`
pub static TRANSLATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_translation_duration_seconds"),
        "Duration of ingress translations in seconds by result",
    )
    .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]);
    let histogram = HistogramVec::new(opts, &["result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record the outcome of an ingress class check
pub fn record_class_decision(accepted: bool) {
    let result = if accepted { "accepted" } else { "ignored" };
    CLASS_DECISIONS_TOTAL.with_label_values(&[result]).inc();
}

/// Record the outcome of an ownership check
pub fn record_ownership_decision(owned: bool) {
    let result = if owned { "owned" } else { "not_owned" };
    OWNERSHIP_DECISIONS_TOTAL.with_label_values(&[result]).inc();
}

/// Record a location built in the denied state
pub fn record_denied_location() {
    DENIED_LOCATIONS_TOTAL.inc();
}

/// Record an annotation value skipped by the merger
///
/// # Arguments
/// * `field` - Key of the value in the extracted annotation map
/// * `kind` - Failure kind (see [`MergeError::kind`](crate::errors::MergeError::kind))
pub fn record_merge_failure(field: &str, kind: &str) {
    MERGE_FAILURES_TOTAL.with_label_values(&[field, kind]).inc();
}

/// Record how long one ingress translation took
pub fn record_translation(result: &str, duration: Duration) {
    TRANSLATION_DURATION_SECONDS
        .with_label_values(&[result])
        .observe(duration.as_secs_f64());
}

/// Gather all metrics in Prometheus text format
///
/// # Errors
///
/// Returns an error if metrics cannot be encoded.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
