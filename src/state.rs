//! Shared session flags
//!
//! One `SessionState` is created per assistant and handed (behind an `Arc`) to the
//! control loop, the speaker and the capture task.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SessionState {
    /// Microphone input is accepted
    listening: AtomicBool,
    /// Speech output is playing; capture must not run
    speaking: AtomicBool,
    /// The greeting has been delivered and the control loop is live
    started: AtomicBool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub fn set_listening(&self, listening: bool) {
        self.listening.store(listening, Ordering::SeqCst);
    }

    /// Flip the listening flag, returning the new value
    pub fn toggle_listening(&self) -> bool {
        !self.listening.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    pub fn set_speaking(&self, speaking: bool) {
        self.speaking.store(speaking, Ordering::SeqCst);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Mark the session as started. Returns `false` if it already was.
    pub fn mark_started(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    /// Capture may only run while listening and not speaking
    pub fn can_capture(&self) -> bool {
        self.is_listening() && !self.is_speaking()
    }

    /// Status line shown when nothing is in progress
    pub fn idle_status(&self) -> &'static str {
        if self.is_listening() {
            "Ready"
        } else {
            "Paused"
        }
    }
}
