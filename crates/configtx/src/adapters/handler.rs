//! In-memory config handlers

use crate::domain::ConfigState;
use crate::error::HandlerError;
use crate::ports::outbound::ConfigHandler;
use parking_lot::{Mutex, RwLock};

/// Handler that accepts every candidate
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllHandler;

impl ConfigHandler for AcceptAllHandler {
    fn propose_config(&self, _candidate: &ConfigState) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Handler that records proposals and commits and can be told to reject
#[derive(Debug, Default)]
pub struct RecordingHandler {
    reject_with: RwLock<Option<String>>,
    proposed: Mutex<Vec<u64>>,
    committed: Mutex<Vec<u64>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(reason)` rejects every later proposal, `None` accepts again
    pub fn set_rejection(&self, reason: Option<String>) {
        *self.reject_with.write() = reason;
    }

    /// Sequences of every candidate proposed, accepted or not
    pub fn proposed(&self) -> Vec<u64> {
        self.proposed.lock().clone()
    }

    /// Sequences of every committed config
    pub fn committed(&self) -> Vec<u64> {
        self.committed.lock().clone()
    }
}

impl ConfigHandler for RecordingHandler {
    fn propose_config(&self, candidate: &ConfigState) -> Result<(), HandlerError> {
        self.proposed.lock().push(candidate.sequence());
        match self.reject_with.read().as_ref() {
            Some(reason) => Err(HandlerError::new(reason.clone())),
            None => Ok(()),
        }
    }

    fn commit_config(&self, committed: &ConfigState) {
        self.committed.lock().push(committed.sequence());
    }
}
