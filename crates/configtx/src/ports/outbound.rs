//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Policy evaluation and namespace-specific validation live outside this
//! crate. Implementations are injected at construction.

use crate::domain::{ConfigState, SignedData};
use crate::error::{HandlerError, PolicyError};
use std::sync::Arc;

/// An authorization rule
pub trait Policy: Send + Sync {
    /// `Ok(())` when the signatures satisfy the rule
    fn evaluate(&self, authorization: &[SignedData]) -> Result<(), PolicyError>;
}

/// Resolves modification policies by name
pub trait PolicyManager: Send + Sync {
    /// `None` when no policy of that name exists
    fn get_policy(&self, name: &str) -> Option<Arc<dyn Policy>>;
}

/// Semantic acceptance of a fully resolved candidate configuration
pub trait ConfigHandler: Send + Sync {
    /// Accept or reject a candidate. Must not retain side effects: the
    /// candidate may never be installed.
    fn propose_config(&self, candidate: &ConfigState) -> Result<(), HandlerError>;

    /// Called once a previously proposed candidate has been installed
    fn commit_config(&self, _committed: &ConfigState) {}
}
