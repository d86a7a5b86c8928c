//! Per-session mutual exclusion and cooldown for the morning trigger.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::debug;

struct SessionEntry {
    /// Async gate: held for the whole guarded run.
    gate: Arc<AsyncMutex<()>>,
    /// When the last run completed for this session.
    last_run: Mutex<Option<Instant>>,
}

/// Outcome of attempting to start a morning run.
pub enum MorningGate {
    /// A completed run is still within the cooldown window.
    Cooldown,
    /// Another run for this session is currently in flight.
    Busy,
    /// The run may proceed; hold the guard for its duration.
    Acquired(MorningRun),
}

/// Guard for an in-flight morning run.
///
/// Dropping the guard releases the session gate on every exit path.
/// Only an explicit [`MorningRun::complete`] records a finished run
/// and starts the cooldown window; a failed run leaves the cooldown
/// untouched so the next request can retry immediately.
pub struct MorningRun {
    entry: Arc<SessionEntry>,
    _permit: OwnedMutexGuard<()>,
}

impl MorningRun {
    /// Record successful completion, starting the cooldown window.
    pub fn complete(self) {
        *self.entry.last_run.lock().unwrap() = Some(Instant::now());
    }
}

/// Session-keyed morning run guard.
pub struct MorningGuard {
    sessions: Mutex<HashMap<String, Arc<SessionEntry>>>,
    cooldown: Duration,
}

impl MorningGuard {
    /// Create a guard with the given cooldown window.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            cooldown,
        }
    }

    /// Try to start a morning run for the session.
    ///
    /// Never suspends: contention is answered with [`MorningGate::Busy`]
    /// instead of waiting, so other sessions are never blocked.
    pub fn begin(&self, session_id: &str) -> MorningGate {
        let entry = {
            let mut sessions = self.sessions.lock().unwrap();
            Arc::clone(sessions.entry(session_id.to_string()).or_insert_with(|| {
                Arc::new(SessionEntry {
                    gate: Arc::new(AsyncMutex::new(())),
                    last_run: Mutex::new(None),
                })
            }))
        };

        if let Some(last) = *entry.last_run.lock().unwrap() {
            if last.elapsed() < self.cooldown {
                debug!(session_id, "morning run within cooldown");
                return MorningGate::Cooldown;
            }
        }

        match Arc::clone(&entry.gate).try_lock_owned() {
            Ok(permit) => MorningGate::Acquired(MorningRun {
                entry,
                _permit: permit,
            }),
            Err(_) => {
                debug!(session_id, "morning run already in flight");
                MorningGate::Busy
            }
        }
    }
}
