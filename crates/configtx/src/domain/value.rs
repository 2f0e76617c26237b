//! Configuration entry and authorization records

use serde::{Deserialize, Serialize};

/// A single named, versioned configuration entry
///
/// The entry's name is the key it is stored under; it is not repeated here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    /// Opaque payload, interpreted only by the config handler
    pub payload: Vec<u8>,
    /// Per-entry version, +1 on every accepted modification
    pub version: u64,
    /// Name of the policy that must authorize changes to this entry
    pub mod_policy: String,
}

impl ConfigValue {
    pub fn new(payload: impl Into<Vec<u8>>, version: u64, mod_policy: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            version,
            mod_policy: mod_policy.into(),
        }
    }

    /// Same payload and policy, ignoring version
    pub fn same_content(&self, other: &ConfigValue) -> bool {
        self.payload == other.payload && self.mod_policy == other.mod_policy
    }
}

/// One signature over an update, as consumed by policies
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedData {
    pub data: Vec<u8>,
    pub identity: Vec<u8>,
    pub signature: Vec<u8>,
}

impl SignedData {
    pub fn new(
        data: impl Into<Vec<u8>>,
        identity: impl Into<Vec<u8>>,
        signature: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            data: data.into(),
            identity: identity.into(),
            signature: signature.into(),
        }
    }
}
