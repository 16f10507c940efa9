//! Pause/resume session machine
//!
//! Running and Paused are the only states. Pausing captures a single
//! snapshot of the transient session; resuming hands it back and clears it.
//! At most one snapshot exists at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Invalid session transitions, reported to the caller instead of panicking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `resume` was called while the session was not paused
    ResumeWhileRunning,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::ResumeWhileRunning => write!(f, "session is not paused"),
        }
    }
}

impl std::error::Error for SessionError {}

/// State captured when the session pauses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseSnapshot {
    pub score: u64,
    pub health: i32,
    pub session_coins: u64,
    /// Opaque summary of the frozen frame, for display or diagnostics
    pub state_blob: String,
    /// Tick counter at the moment of pausing
    pub at_tick: u64,
}

/// Running/Paused machine; `Some` snapshot means paused
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    snapshot: Option<PauseSnapshot>,
}

impl SessionState {
    pub fn is_paused(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Enter the paused state. Returns `false` (and keeps the existing
    /// snapshot) when already paused.
    pub fn pause(&mut self, snapshot: PauseSnapshot) -> bool {
        if self.snapshot.is_some() {
            return false;
        }
        log::info!("session paused at tick {}", snapshot.at_tick);
        self.snapshot = Some(snapshot);
        true
    }

    /// Leave the paused state, handing the snapshot back to the caller.
    pub fn resume(&mut self) -> Result<PauseSnapshot, SessionError> {
        self.snapshot
            .take()
            .ok_or(SessionError::ResumeWhileRunning)
    }
}
