//! Channel configuration state and the envelopes that feed it
//!
//! A [`ConfigState`] is never mutated after construction. Bootstrap builds the
//! first one from a [`ConfigSnapshot`]; every accepted update builds a fresh
//! one from the previous state plus the update's write-set.

use super::value::{ConfigValue, SignedData};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::collections::BTreeMap;

/// 32-byte Keccak-256 digest
pub type Hash = [u8; 32];

/// Ordered entry map; ordering keeps iteration identical on every node
pub type ConfigEntries = BTreeMap<String, ConfigValue>;

/// Trusted genesis configuration for a channel
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub channel_id: String,
    pub entries: ConfigEntries,
}

impl ConfigSnapshot {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            entries: ConfigEntries::new(),
        }
    }

    /// Builder-style entry insertion
    pub fn with_entry(mut self, name: impl Into<String>, value: ConfigValue) -> Self {
        self.entries.insert(name.into(), value);
        self
    }
}

/// A proposed configuration update, already decoded from the wire
///
/// `write_set` is the full configuration that should exist afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdateEnvelope {
    pub channel_id: String,
    pub write_set: ConfigEntries,
    pub authorization: Vec<SignedData>,
}

impl ConfigUpdateEnvelope {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            write_set: ConfigEntries::new(),
            authorization: Vec::new(),
        }
    }

    pub fn with_entry(mut self, name: impl Into<String>, value: ConfigValue) -> Self {
        self.write_set.insert(name.into(), value);
        self
    }

    pub fn with_signature(mut self, signed: SignedData) -> Self {
        self.authorization.push(signed);
        self
    }
}

/// Authoritative configuration of one channel at one point in time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigState {
    channel_id: String,
    entries: ConfigEntries,
    /// INVARIANT: >= every entry version
    watermark: u64,
    /// Updates applied since genesis
    sequence: u64,
}

impl ConfigState {
    /// Load a genesis snapshot verbatim
    pub fn from_snapshot(snapshot: ConfigSnapshot) -> Self {
        let watermark = snapshot
            .entries
            .values()
            .map(|v| v.version)
            .max()
            .unwrap_or(0);
        Self {
            channel_id: snapshot.channel_id,
            entries: snapshot.entries,
            watermark,
            sequence: 0,
        }
    }

    /// Successor state holding `entries` as the full configuration
    pub(crate) fn successor(&self, entries: ConfigEntries) -> Self {
        let introduced = entries.values().map(|v| v.version).max().unwrap_or(0);
        Self {
            channel_id: self.channel_id.clone(),
            entries,
            watermark: self.watermark.max(introduced),
            sequence: self.sequence.saturating_add(1),
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn entries(&self) -> &ConfigEntries {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn watermark(&self) -> u64 {
        self.watermark
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Keccak-256 fingerprint of channel, watermark and entries
    ///
    /// Sequence is left out: a node bootstrapped from a later snapshot must
    /// agree with one that replayed every update.
    pub fn digest(&self) -> Hash {
        let mut hasher = Keccak256::new();
        update_prefixed(&mut hasher, self.channel_id.as_bytes());
        hasher.update(self.watermark.to_be_bytes());
        hasher.update((self.entries.len() as u64).to_be_bytes());
        for (name, value) in &self.entries {
            update_prefixed(&mut hasher, name.as_bytes());
            hasher.update(value.version.to_be_bytes());
            update_prefixed(&mut hasher, value.mod_policy.as_bytes());
            update_prefixed(&mut hasher, &value.payload);
        }
        let result = hasher.finalize();
        let mut output = [0u8; 32];
        output.copy_from_slice(&result);
        output
    }

    /// Hex rendering of [`Self::digest`] for logs
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

/// Length-prefixed write so adjacent fields cannot alias
fn update_prefixed(hasher: &mut Keccak256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}
