//! Domain module for configuration transactions
//!
//! ## Core Modules
//! - value: configuration entries and signatures
//! - state: immutable channel configuration snapshots
//! - diff: write-set classification and validation rules

pub mod diff;
pub mod state;
pub mod value;

pub use diff::{
    authorize_diff, build_candidate, check_envelope, check_limits, check_no_implicit_delete,
    classify_entry, compute_diff, EntryChange, UpdateDiff,
};
pub use state::{ConfigEntries, ConfigSnapshot, ConfigState, ConfigUpdateEnvelope, Hash};
pub use value::{ConfigValue, SignedData};
