//! # Config Transaction Metrics
//!
//! Prometheus metrics for monitoring configuration updates.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! configtx = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `configtx_updates_validated_total` - Counter of updates that passed validation
//! - `configtx_updates_applied_total` - Counter of installed updates
//! - `configtx_updates_rejected_total` - Counter of rejected updates (by kind)
//! - `configtx_sequence` - Gauge of the current config sequence
//! - `configtx_entries` - Gauge of entries in the current config

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Updates that passed validation
    pub static ref UPDATES_VALIDATED: IntCounter = register_int_counter!(
        "configtx_updates_validated_total",
        "Total number of config updates that passed validation"
    )
    .expect("Failed to create UPDATES_VALIDATED metric");

    /// Updates installed
    pub static ref UPDATES_APPLIED: IntCounter = register_int_counter!(
        "configtx_updates_applied_total",
        "Total number of config updates applied"
    )
    .expect("Failed to create UPDATES_APPLIED metric");

    /// Rejected updates, labeled by error kind
    pub static ref UPDATES_REJECTED: IntCounterVec = register_int_counter_vec!(
        "configtx_updates_rejected_total",
        "Total number of config updates rejected",
        &["kind"]
    )
    .expect("Failed to create UPDATES_REJECTED metric");

    /// Current config sequence
    pub static ref CONFIG_SEQUENCE: IntGauge = register_int_gauge!(
        "configtx_sequence",
        "Number of config updates applied since genesis"
    )
    .expect("Failed to create CONFIG_SEQUENCE metric");

    /// Entries in the current config
    pub static ref CONFIG_ENTRIES: IntGauge = register_int_gauge!(
        "configtx_entries",
        "Number of entries in the current config"
    )
    .expect("Failed to create CONFIG_ENTRIES metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

#[cfg(feature = "metrics")]
pub fn record_update_validated() {
    UPDATES_VALIDATED.inc();
}

/// Record an installed update and the resulting config shape
#[cfg(feature = "metrics")]
pub fn record_update_applied(sequence: u64, entries: usize) {
    UPDATES_APPLIED.inc();
    CONFIG_SEQUENCE.set(sequence as i64);
    CONFIG_ENTRIES.set(entries as i64);
}

#[cfg(feature = "metrics")]
pub fn record_update_rejected(kind: &str) {
    UPDATES_REJECTED.with_label_values(&[kind]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_update_validated() {}

#[cfg(not(feature = "metrics"))]
pub fn record_update_applied(_sequence: u64, _entries: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_update_rejected(_kind: &str) {}
