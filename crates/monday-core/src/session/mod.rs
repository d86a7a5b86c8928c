//! Process-wide session state.
//!
//! Pending memories and morning run guards are shared mutable state keyed
//! by session id, bundled into one injectable service so tests construct
//! isolated instances per scenario. Single-instance deployment is assumed;
//! a distributed deployment would need to externalize this state.

mod morning;
mod pending;

use std::time::Duration;

use crate::config::MondayConfig;

pub use morning::{MorningGate, MorningGuard, MorningRun};
pub use pending::PendingMemoryStore;

/// All session-keyed routing state.
pub struct SessionState {
    /// Proposed memories awaiting user confirmation.
    pub pending: PendingMemoryStore,
    /// Morning trigger mutual exclusion and cooldown.
    pub morning: MorningGuard,
}

impl SessionState {
    /// Create session state with explicit windows.
    pub fn new(pending_ttl: Duration, morning_cooldown: Duration) -> Self {
        Self {
            pending: PendingMemoryStore::new(pending_ttl),
            morning: MorningGuard::new(morning_cooldown),
        }
    }

    /// Create session state from configuration.
    pub fn from_config(config: &MondayConfig) -> Self {
        Self::new(
            Duration::from_secs(config.pending_ttl_secs),
            Duration::from_secs(config.morning_cooldown_secs),
        )
    }
}
