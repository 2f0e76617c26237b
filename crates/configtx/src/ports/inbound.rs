//! Driving Ports (API - Inbound)
//!
//! Called by the commit pipeline in the order the ordering layer finalized.

use crate::domain::{ConfigState, ConfigUpdateEnvelope, UpdateDiff};
use crate::error::ConfigTxResult;
use std::sync::Arc;

/// Outcome of a successful validation
#[derive(Clone, Debug)]
pub struct ValidatedUpdate {
    /// Configuration that would be (or was) installed
    pub candidate: Arc<ConfigState>,
    /// Per-entry classification of the write-set
    pub diff: UpdateDiff,
}

/// Primary configuration transaction API
pub trait ConfigTxApi: Send + Sync {
    /// Channel this manager governs
    fn channel_id(&self) -> &str;

    /// Check an update against the current configuration without installing it
    ///
    /// # Returns
    /// * The candidate state and diff on success; nothing is mutated either way
    fn validate(&self, update: &ConfigUpdateEnvelope) -> ConfigTxResult<ValidatedUpdate>;

    /// Validate and atomically install an update
    ///
    /// On error the configuration is exactly as before the call.
    fn apply(&self, update: &ConfigUpdateEnvelope) -> ConfigTxResult<ValidatedUpdate>;

    /// Snapshot of the configuration at call time
    fn current_config(&self) -> Arc<ConfigState>;

    /// Number of updates applied since genesis
    fn sequence(&self) -> u64 {
        self.current_config().sequence()
    }
}
