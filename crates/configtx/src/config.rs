//! Runtime limits for the configuration transaction manager
//!
//! # Example
//!
//! ```ignore
//! use configtx::ConfigTxConfig;
//!
//! let config = ConfigTxConfig::from_env().validate()?;
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CONFIGTX_MAX_WRITE_SET_ENTRIES` | `10000` |
//! | `CONFIGTX_MAX_PAYLOAD_BYTES` | `1048576` |
//! | `CONFIGTX_REJECT_NOOP_UPDATES` | `true` |

use crate::error::{ConfigTxError, ConfigTxResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Manager limits, applied to every update before any entry is classified
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigTxConfig {
    /// Largest accepted write-set
    pub max_write_set_entries: usize,
    /// Largest accepted single entry payload
    pub max_payload_bytes: usize,
    /// Reject updates that neither modify nor add an entry
    pub reject_noop_updates: bool,
}

impl Default for ConfigTxConfig {
    fn default() -> Self {
        Self {
            max_write_set_entries: 10_000,
            max_payload_bytes: 1024 * 1024,
            reject_noop_updates: true,
        }
    }
}

impl ConfigTxConfig {
    /// Read overrides from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_write_set_entries: env::var("CONFIGTX_MAX_WRITE_SET_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_write_set_entries),

            max_payload_bytes: env::var("CONFIGTX_MAX_PAYLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_payload_bytes),

            reject_noop_updates: env::var("CONFIGTX_REJECT_NOOP_UPDATES")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.reject_noop_updates),
        }
    }

    /// Reject limits that would refuse every update
    pub fn validate(self) -> ConfigTxResult<Self> {
        if self.max_write_set_entries == 0 {
            return Err(ConfigTxError::InvalidConfig {
                reason: "max_write_set_entries must be at least 1".into(),
            });
        }
        Ok(self)
    }
}

/// Anything but "false" or "0" (case and surrounding whitespace ignored) is true
fn parse_flag(raw: &str) -> bool {
    let value = raw.trim();
    !(value.eq_ignore_ascii_case("false") || value == "0")
}
