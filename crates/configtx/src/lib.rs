//! # configtx
//!
//! Configuration transaction manager for a permissioned ledger channel.
//!
//! ## Overview
//!
//! The manager holds the authoritative configuration of one channel: a set of
//! named, versioned entries. It decides whether a proposed update may replace
//! that configuration:
//!
//! - **Complete write-sets**: every entry that should exist afterwards is
//!   restated; omission is rejected, never treated as a delete
//! - **Strict versioning**: a modified entry advances by exactly one version;
//!   a restated entry must be byte-identical
//! - **Watermark**: new entries must carry a version above every version the
//!   channel has already accepted
//! - **Per-entry authorization**: modified and new entries must satisfy their
//!   proposed modification policy
//! - **Semantic acceptance**: a pluggable handler vets the full candidate
//!
//! ## Architecture
//!
//! ```text
//! Ordering layer ──ConfigUpdateEnvelope──→ ConfigManager
//!                                              │
//!                                              ├── compute_diff      (domain::diff)
//!                                              ├── authorize_diff ──→ PolicyManager / Policy
//!                                              ├── propose_config ──→ ConfigHandler
//!                                              └── swap Arc<ConfigState>, callbacks
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use configtx::{
//!     AcceptAllHandler, ConfigManager, ConfigSnapshot, ConfigTxApi, ConfigUpdateEnvelope,
//!     ConfigValue, StaticPolicyManager,
//! };
//! use std::sync::Arc;
//!
//! let genesis = ConfigSnapshot::new("mychannel")
//!     .with_entry("batch_size", ConfigValue::new(b"10".to_vec(), 0, "admins"));
//!
//! let manager = ConfigManager::new(
//!     genesis,
//!     Arc::new(StaticPolicyManager::permissive()),
//!     Arc::new(AcceptAllHandler),
//!     Vec::new(),
//! )?;
//!
//! let update = ConfigUpdateEnvelope::new("mychannel")
//!     .with_entry("batch_size", ConfigValue::new(b"20".to_vec(), 1, "admins"));
//! manager.apply(&update)?;
//! assert_eq!(manager.sequence(), 1);
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{
    AcceptAllHandler, AcceptAllPolicy, RecordingHandler, RejectAllPolicy, StaticPolicyManager,
};
pub use config::ConfigTxConfig;
pub use domain::{
    ConfigEntries, ConfigSnapshot, ConfigState, ConfigUpdateEnvelope, ConfigValue, EntryChange,
    Hash, SignedData, UpdateDiff,
};
pub use error::{ConfigTxError, ConfigTxResult, ErrorKind, HandlerError, PolicyError};
pub use ports::inbound::{ConfigTxApi, ValidatedUpdate};
pub use ports::outbound::{ConfigHandler, Policy, PolicyManager};
pub use service::{ConfigCallback, ConfigManager};
