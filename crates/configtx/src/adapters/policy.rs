//! Static policy resolution
//!
//! Resolves modification policies from an in-memory table, with an optional
//! fallback used for names that are not registered.

use crate::domain::SignedData;
use crate::error::PolicyError;
use crate::ports::outbound::{Policy, PolicyManager};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Policy that authorizes everything
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllPolicy;

impl Policy for AcceptAllPolicy {
    fn evaluate(&self, _authorization: &[SignedData]) -> Result<(), PolicyError> {
        Ok(())
    }
}

/// Policy that authorizes nothing
#[derive(Clone, Debug)]
pub struct RejectAllPolicy {
    reason: String,
}

impl RejectAllPolicy {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for RejectAllPolicy {
    fn default() -> Self {
        Self::new("policy rejects all updates")
    }
}

impl Policy for RejectAllPolicy {
    fn evaluate(&self, _authorization: &[SignedData]) -> Result<(), PolicyError> {
        Err(PolicyError::new(self.reason.clone()))
    }
}

/// Name → policy table
///
/// Policies can be replaced while a manager holds the table, so the
/// authorization outcome for the same update may change between calls.
#[derive(Default)]
pub struct StaticPolicyManager {
    policies: RwLock<HashMap<String, Arc<dyn Policy>>>,
    fallback: RwLock<Option<Arc<dyn Policy>>>,
}

impl StaticPolicyManager {
    /// Empty table: every lookup fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Every name resolves to `policy` unless registered otherwise
    pub fn with_fallback(policy: Arc<dyn Policy>) -> Self {
        let manager = Self::new();
        manager.set_fallback(Some(policy));
        manager
    }

    /// Every name resolves to [`AcceptAllPolicy`]
    pub fn permissive() -> Self {
        Self::with_fallback(Arc::new(AcceptAllPolicy))
    }

    pub fn set_policy(&self, name: impl Into<String>, policy: Arc<dyn Policy>) {
        self.policies.write().insert(name.into(), policy);
    }

    pub fn remove_policy(&self, name: &str) -> Option<Arc<dyn Policy>> {
        self.policies.write().remove(name)
    }

    pub fn set_fallback(&self, policy: Option<Arc<dyn Policy>>) {
        *self.fallback.write() = policy;
    }
}

impl PolicyManager for StaticPolicyManager {
    fn get_policy(&self, name: &str) -> Option<Arc<dyn Policy>> {
        if let Some(policy) = self.policies.read().get(name) {
            return Some(Arc::clone(policy));
        }
        let fallback = self.fallback.read().clone();
        if fallback.is_none() {
            tracing::debug!(policy = %name, "modification policy not found");
        }
        fallback
    }
}
