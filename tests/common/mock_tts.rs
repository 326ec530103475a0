//! Speech output stand-in that keeps what it was asked to say

use anyhow::Result;
use async_trait::async_trait;
use jarvis::tts::TtsEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockTts {
    spoken: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockTts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utterances in the order they were spoken
    pub fn get_spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn was_spoken(&self, text: &str) -> bool {
        self.spoken.lock().unwrap().iter().any(|s| s.contains(text))
    }

    /// Make every later `speak` fail
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TtsEngine for MockTts {
    async fn speak(&self, text: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("speech device unavailable");
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
