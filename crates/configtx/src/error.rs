//! Error types for the configuration transaction manager
//!
//! Every rejection is terminal: the caller drops the offending update and the
//! manager's state is left untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a rejection, stable across releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingChainID,
    ChannelMismatch,
    EmptyUpdate,
    ImplicitDelete,
    SilentModification,
    PolicyViolation,
    StaleSequence,
    InvalidSequence,
    HandlerRejected,
    LimitExceeded,
    InvalidConfig,
}

impl ErrorKind {
    /// Label used for logs and metric dimensions
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingChainID => "missing_chain_id",
            ErrorKind::ChannelMismatch => "channel_mismatch",
            ErrorKind::EmptyUpdate => "empty_update",
            ErrorKind::ImplicitDelete => "implicit_delete",
            ErrorKind::SilentModification => "silent_modification",
            ErrorKind::PolicyViolation => "policy_violation",
            ErrorKind::StaleSequence => "stale_sequence",
            ErrorKind::InvalidSequence => "invalid_sequence",
            ErrorKind::HandlerRejected => "handler_rejected",
            ErrorKind::LimitExceeded => "limit_exceeded",
            ErrorKind::InvalidConfig => "invalid_config",
        }
    }
}

/// Failure returned by a [`crate::ports::Policy`] evaluation
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PolicyError {
    pub reason: String,
}

impl PolicyError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure returned by a [`crate::ports::ConfigHandler`] proposal
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct HandlerError {
    pub reason: String,
}

impl HandlerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Configuration transaction errors
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigTxError {
    /// Genesis snapshot carries no channel ID
    #[error("initial configuration is missing a channel ID")]
    MissingChainId,

    /// Update targets another channel
    #[error("update is for channel {actual:?}, manager governs {expected:?}")]
    ChannelMismatch { expected: String, actual: String },

    /// Update carries no write-set
    #[error("update has an empty write-set")]
    EmptyUpdate,

    /// An existing entry was omitted from the write-set
    #[error("entry {key:?} is missing from the write-set (implicit delete)")]
    ImplicitDelete { key: String },

    /// Entry restated at its current version with different content
    #[error("entry {key:?} was modified without a version increment")]
    SilentModification { key: String },

    /// Named modification policy does not exist
    #[error("entry {key:?} names unknown modification policy {policy:?}")]
    PolicyNotFound { key: String, policy: String },

    /// Modification policy rejected the update's authorization data
    #[error("entry {key:?} failed modification policy {policy:?}: {reason}")]
    PolicyViolation {
        key: String,
        policy: String,
        reason: String,
    },

    /// New entry does not advance past the channel watermark
    #[error("new entry {key:?} has version {version}, must exceed watermark {watermark}")]
    StaleSequence {
        key: String,
        version: u64,
        watermark: u64,
    },

    /// Existing entry's version regressed or skipped ahead
    #[error("entry {key:?} moved from version {current} to {proposed}, expected {current} or {current}+1")]
    InvalidSequence {
        key: String,
        current: u64,
        proposed: u64,
    },

    /// Every entry is unchanged, so the update changes nothing
    #[error("update does not modify or add any entry (replayed or no-op)")]
    ReplayedUpdate,

    /// Handler refused the candidate configuration
    #[error("config handler rejected the candidate configuration: {reason}")]
    HandlerRejected { reason: String },

    /// Write-set exceeds configured entry count
    #[error("write-set has {count} entries, limit is {limit}")]
    TooManyEntries { count: usize, limit: usize },

    /// Entry payload exceeds configured size
    #[error("entry {key:?} payload is {size} bytes, limit is {limit}")]
    PayloadTooLarge { key: String, size: usize, limit: usize },

    /// Runtime configuration is unusable
    #[error("invalid manager configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ConfigTxError {
    /// Taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigTxError::MissingChainId => ErrorKind::MissingChainID,
            ConfigTxError::ChannelMismatch { .. } => ErrorKind::ChannelMismatch,
            ConfigTxError::EmptyUpdate => ErrorKind::EmptyUpdate,
            ConfigTxError::ImplicitDelete { .. } => ErrorKind::ImplicitDelete,
            ConfigTxError::SilentModification { .. } => ErrorKind::SilentModification,
            ConfigTxError::PolicyNotFound { .. } | ConfigTxError::PolicyViolation { .. } => {
                ErrorKind::PolicyViolation
            }
            ConfigTxError::StaleSequence { .. } => ErrorKind::StaleSequence,
            ConfigTxError::InvalidSequence { .. } | ConfigTxError::ReplayedUpdate => {
                ErrorKind::InvalidSequence
            }
            ConfigTxError::HandlerRejected { .. } => ErrorKind::HandlerRejected,
            ConfigTxError::TooManyEntries { .. } | ConfigTxError::PayloadTooLarge { .. } => {
                ErrorKind::LimitExceeded
            }
            ConfigTxError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }

    /// Offending entry name, when the error is about a single entry
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigTxError::ImplicitDelete { key }
            | ConfigTxError::SilentModification { key }
            | ConfigTxError::PolicyNotFound { key, .. }
            | ConfigTxError::PolicyViolation { key, .. }
            | ConfigTxError::StaleSequence { key, .. }
            | ConfigTxError::InvalidSequence { key, .. }
            | ConfigTxError::PayloadTooLarge { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Result type for configuration transaction operations
pub type ConfigTxResult<T> = Result<T, ConfigTxError>;
