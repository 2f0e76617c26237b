//! Config Manager - owns the authoritative channel configuration
//!
//! ## Concurrency
//!
//! ```text
//!   readers ──read lock──→ clone Arc<ConfigState> ──→ work on snapshot
//!
//!   apply ──apply_lock──→ validate(snapshot) ──write lock──→ swap Arc
//!                                                             │
//!                                      commit_config ←────────┘
//!                                      callbacks (in order)
//! ```
//!
//! The write lock is held only for the pointer swap. Callbacks run while the
//! apply lock is still held, so a callback must not call `apply` on the same
//! manager.

use crate::config::ConfigTxConfig;
use crate::domain::{
    authorize_diff, build_candidate, check_limits, compute_diff, ConfigSnapshot, ConfigState,
    ConfigUpdateEnvelope,
};
use crate::error::{ConfigTxError, ConfigTxResult};
use crate::metrics;
use crate::ports::inbound::{ConfigTxApi, ValidatedUpdate};
use crate::ports::outbound::{ConfigHandler, PolicyManager};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Notification hook run after bootstrap and after every applied update
pub type ConfigCallback<P, H> = Box<dyn Fn(&ConfigManager<P, H>) + Send + Sync>;

/// Configuration transaction manager for one channel
pub struct ConfigManager<P, H>
where
    P: PolicyManager,
    H: ConfigHandler,
{
    channel_id: String,
    config: ConfigTxConfig,
    state: RwLock<Arc<ConfigState>>,
    /// Serializes apply calls
    apply_lock: Mutex<()>,
    policy_manager: Arc<P>,
    handler: Arc<H>,
    callbacks: Vec<ConfigCallback<P, H>>,
}

impl<P, H> ConfigManager<P, H>
where
    P: PolicyManager,
    H: ConfigHandler,
{
    /// Bootstrap a manager from a trusted genesis snapshot with default limits
    pub fn new(
        snapshot: ConfigSnapshot,
        policy_manager: Arc<P>,
        handler: Arc<H>,
        callbacks: Vec<ConfigCallback<P, H>>,
    ) -> ConfigTxResult<Self> {
        Self::with_config(
            ConfigTxConfig::default(),
            snapshot,
            policy_manager,
            handler,
            callbacks,
        )
    }

    /// Bootstrap a manager with explicit limits
    ///
    /// The snapshot is trusted: no version, policy or handler checks run, but
    /// it must fit the limits every later update is held to.
    /// Every callback is invoked once before this returns.
    pub fn with_config(
        config: ConfigTxConfig,
        snapshot: ConfigSnapshot,
        policy_manager: Arc<P>,
        handler: Arc<H>,
        callbacks: Vec<ConfigCallback<P, H>>,
    ) -> ConfigTxResult<Self> {
        let config = config.validate()?;

        if snapshot.channel_id.is_empty() {
            tracing::warn!("rejecting genesis configuration without channel ID");
            return Err(ConfigTxError::MissingChainId);
        }

        if let Err(err) = check_limits(&snapshot.entries, &config) {
            tracing::warn!(
                channel_id = %snapshot.channel_id,
                key = err.key().unwrap_or_default(),
                "rejecting genesis configuration outside limits: {}",
                err
            );
            return Err(err);
        }

        let state = ConfigState::from_snapshot(snapshot);
        tracing::info!(
            channel_id = %state.channel_id(),
            entries = state.len(),
            watermark = state.watermark(),
            digest = %state.digest_hex(),
            "config manager bootstrapped"
        );

        let manager = Self {
            channel_id: state.channel_id().to_string(),
            config,
            state: RwLock::new(Arc::new(state)),
            apply_lock: Mutex::new(()),
            policy_manager,
            handler,
            callbacks,
        };

        manager.notify();
        Ok(manager)
    }

    /// Limits this manager enforces
    pub fn config(&self) -> &ConfigTxConfig {
        &self.config
    }

    /// Full validation pipeline against a given snapshot
    fn validate_against(
        &self,
        state: &ConfigState,
        update: &ConfigUpdateEnvelope,
    ) -> ConfigTxResult<ValidatedUpdate> {
        let diff = compute_diff(state, update, &self.config)?;
        authorize_diff(&diff, update, &*self.policy_manager)?;

        let candidate = build_candidate(state, update);
        self.handler
            .propose_config(&candidate)
            .map_err(|e| ConfigTxError::HandlerRejected { reason: e.reason })?;

        Ok(ValidatedUpdate {
            candidate: Arc::new(candidate),
            diff,
        })
    }

    fn rejected(&self, err: ConfigTxError) -> ConfigTxError {
        tracing::warn!(
            channel_id = %self.channel_id,
            kind = err.kind().as_str(),
            key = err.key().unwrap_or_default(),
            "config update rejected: {}",
            err
        );
        metrics::record_update_rejected(err.kind().as_str());
        err
    }

    fn notify(&self) {
        for callback in &self.callbacks {
            callback(self);
        }
    }
}

impl<P, H> ConfigTxApi for ConfigManager<P, H>
where
    P: PolicyManager,
    H: ConfigHandler,
{
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn validate(&self, update: &ConfigUpdateEnvelope) -> ConfigTxResult<ValidatedUpdate> {
        let current = self.current_config();
        let validated = self
            .validate_against(&current, update)
            .map_err(|e| self.rejected(e))?;
        metrics::record_update_validated();
        Ok(validated)
    }

    fn apply(&self, update: &ConfigUpdateEnvelope) -> ConfigTxResult<ValidatedUpdate> {
        let _guard = self.apply_lock.lock();

        let current = self.current_config();
        let validated = self
            .validate_against(&current, update)
            .map_err(|e| self.rejected(e))?;

        *self.state.write() = Arc::clone(&validated.candidate);

        let installed = &validated.candidate;
        self.handler.commit_config(installed);
        metrics::record_update_applied(installed.sequence(), installed.len());
        tracing::info!(
            channel_id = %self.channel_id,
            sequence = installed.sequence(),
            watermark = installed.watermark(),
            modified = validated.diff.modified().count(),
            added = validated.diff.added().count(),
            digest = %installed.digest_hex(),
            "config update applied"
        );

        self.notify();
        Ok(validated)
    }

    fn current_config(&self) -> Arc<ConfigState> {
        self.state.read().clone()
    }
}
