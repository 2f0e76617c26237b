//! Update differ and validator
//!
//! Computes how a proposed write-set relates to the current state and
//! enforces the versioning rules:
//!
//! ```text
//!   current        proposed              outcome
//!   ───────        ────────              ───────
//!   v              v, same content       Unchanged (no authorization)
//!   v              v, other content      SilentModification
//!   v              v + 1                 Modified  (proposed mod_policy)
//!   v              < v  or  > v + 1      InvalidSequence
//!   absent         > watermark           Added     (proposed mod_policy)
//!   absent         <= watermark          StaleSequence
//!   present        absent                ImplicitDelete
//! ```
//!
//! Everything here is pure. Entries are visited in name order so every node
//! reports the same first failure for the same update.

use super::state::{ConfigEntries, ConfigState, ConfigUpdateEnvelope};
use super::value::ConfigValue;
use crate::config::ConfigTxConfig;
use crate::error::{ConfigTxError, ConfigTxResult};
use crate::ports::outbound::PolicyManager;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How one write-set entry relates to the current state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryChange {
    /// Carried forward verbatim
    Unchanged,
    /// Existing entry advanced by one version
    Modified { previous_version: u64 },
    /// Entry not present before
    Added,
}

impl EntryChange {
    /// Modified and added entries must satisfy their modification policy
    pub fn requires_authorization(&self) -> bool {
        !matches!(self, EntryChange::Unchanged)
    }
}

/// Per-entry classification of a whole update
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDiff {
    changes: BTreeMap<String, EntryChange>,
}

impl UpdateDiff {
    pub fn changes(&self) -> &BTreeMap<String, EntryChange> {
        &self.changes
    }

    pub fn get(&self, name: &str) -> Option<EntryChange> {
        self.changes.get(name).copied()
    }

    /// Names of modified entries, in order
    pub fn modified(&self) -> impl Iterator<Item = &str> {
        self.names_where(|c| matches!(c, EntryChange::Modified { .. }))
    }

    /// Names of added entries, in order
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.names_where(|c| matches!(c, EntryChange::Added))
    }

    /// Names of entries carried forward, in order
    pub fn unchanged(&self) -> impl Iterator<Item = &str> {
        self.names_where(|c| matches!(c, EntryChange::Unchanged))
    }

    /// True when nothing is modified or added
    pub fn is_noop(&self) -> bool {
        !self.changes.values().any(EntryChange::requires_authorization)
    }

    fn names_where(&self, pred: fn(&EntryChange) -> bool) -> impl Iterator<Item = &str> {
        self.changes
            .iter()
            .filter(move |(_, change)| pred(change))
            .map(|(name, _)| name.as_str())
    }
}

/// Envelope shape: channel, non-empty write-set, size limits
pub fn check_envelope(
    state: &ConfigState,
    update: &ConfigUpdateEnvelope,
    limits: &ConfigTxConfig,
) -> ConfigTxResult<()> {
    if update.channel_id != state.channel_id() {
        return Err(ConfigTxError::ChannelMismatch {
            expected: state.channel_id().to_string(),
            actual: update.channel_id.clone(),
        });
    }

    if update.write_set.is_empty() {
        return Err(ConfigTxError::EmptyUpdate);
    }

    check_limits(&update.write_set, limits)
}

/// Entry count and payload size bounds
///
/// Also enforced on genesis, since every update restates all of it.
pub fn check_limits(entries: &ConfigEntries, limits: &ConfigTxConfig) -> ConfigTxResult<()> {
    if entries.len() > limits.max_write_set_entries {
        return Err(ConfigTxError::TooManyEntries {
            count: entries.len(),
            limit: limits.max_write_set_entries,
        });
    }

    for (name, value) in entries {
        if value.payload.len() > limits.max_payload_bytes {
            return Err(ConfigTxError::PayloadTooLarge {
                key: name.clone(),
                size: value.payload.len(),
                limit: limits.max_payload_bytes,
            });
        }
    }

    Ok(())
}

/// Every current entry must be restated in the write-set
pub fn check_no_implicit_delete(
    state: &ConfigState,
    write_set: &ConfigEntries,
) -> ConfigTxResult<()> {
    match state
        .entries()
        .keys()
        .find(|name| !write_set.contains_key(name.as_str()))
    {
        Some(name) => Err(ConfigTxError::ImplicitDelete { key: name.clone() }),
        None => Ok(()),
    }
}

/// Classify one proposed entry against its current value (if any)
pub fn classify_entry(
    name: &str,
    current: Option<&ConfigValue>,
    proposed: &ConfigValue,
    watermark: u64,
) -> ConfigTxResult<EntryChange> {
    let Some(current) = current else {
        if proposed.version <= watermark {
            return Err(ConfigTxError::StaleSequence {
                key: name.to_string(),
                version: proposed.version,
                watermark,
            });
        }
        return Ok(EntryChange::Added);
    };

    if proposed.version == current.version {
        if !proposed.same_content(current) {
            return Err(ConfigTxError::SilentModification {
                key: name.to_string(),
            });
        }
        return Ok(EntryChange::Unchanged);
    }

    if current.version.checked_add(1) == Some(proposed.version) {
        return Ok(EntryChange::Modified {
            previous_version: current.version,
        });
    }

    Err(ConfigTxError::InvalidSequence {
        key: name.to_string(),
        current: current.version,
        proposed: proposed.version,
    })
}

/// Structural validation: envelope, deletions, per-entry versioning
///
/// Does not consult policies or the handler.
pub fn compute_diff(
    state: &ConfigState,
    update: &ConfigUpdateEnvelope,
    limits: &ConfigTxConfig,
) -> ConfigTxResult<UpdateDiff> {
    check_envelope(state, update, limits)?;
    check_no_implicit_delete(state, &update.write_set)?;

    let mut changes = BTreeMap::new();
    for (name, proposed) in &update.write_set {
        let change = classify_entry(name, state.get(name), proposed, state.watermark())?;
        tracing::debug!(channel_id = %state.channel_id(), key = %name, ?change, "classified entry");
        changes.insert(name.clone(), change);
    }

    let diff = UpdateDiff { changes };
    if limits.reject_noop_updates && diff.is_noop() {
        return Err(ConfigTxError::ReplayedUpdate);
    }
    Ok(diff)
}

/// Evaluate the proposed modification policy of every changed entry
///
/// Unchanged entries are never re-authorized: their policy may since have
/// become unsatisfiable without that implying the entry should go.
pub fn authorize_diff<P: PolicyManager + ?Sized>(
    diff: &UpdateDiff,
    update: &ConfigUpdateEnvelope,
    policy_manager: &P,
) -> ConfigTxResult<()> {
    for (name, change) in diff.changes() {
        if !change.requires_authorization() {
            continue;
        }
        // compute_diff only records names taken from this write-set
        let Some(proposed) = update.write_set.get(name) else {
            continue;
        };

        let policy = policy_manager
            .get_policy(&proposed.mod_policy)
            .ok_or_else(|| ConfigTxError::PolicyNotFound {
                key: name.clone(),
                policy: proposed.mod_policy.clone(),
            })?;

        policy
            .evaluate(&update.authorization)
            .map_err(|e| ConfigTxError::PolicyViolation {
                key: name.clone(),
                policy: proposed.mod_policy.clone(),
                reason: e.reason,
            })?;
    }
    Ok(())
}

/// Candidate state: the write-set becomes the full configuration
pub fn build_candidate(state: &ConfigState, update: &ConfigUpdateEnvelope) -> ConfigState {
    state.successor(update.write_set.clone())
}
