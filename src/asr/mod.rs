//! ASR (Automatic Speech Recognition) Module
//!
//! [`AsrEngine`] turns audio chunks into text; [`SpeechInput`] drives an engine over a
//! live microphone with a wait timeout and a phrase-length limit.

pub mod listener;
pub mod vosk;

use crate::config::Config;
use anyhow::Result;

pub use listener::{Heard, ListenSettings, SpeechInput};
pub use vosk::VoskAsr;

/// Result from ASR with confidence score
#[derive(Debug, Clone)]
pub struct AsrResult {
    pub text: String,
    pub confidence: f32,
}

/// Minimum confidence threshold (below this, results are discarded)
pub const MIN_CONFIDENCE: f32 = 0.5;

/// Trait for ASR engines
pub trait AsrEngine: Send {
    /// Process audio samples and return recognized text with confidence (if final)
    fn process(&mut self, samples: &[i16]) -> Result<Option<AsrResult>>;

    /// Flush whatever has been heard so far into a final result
    fn finish(&mut self) -> Result<Option<AsrResult>> {
        Ok(None)
    }

    /// Reset the recognizer state
    fn reset(&mut self);
}

/// Create the configured ASR engine
pub fn create_engine(config: &Config) -> Result<Box<dyn AsrEngine>> {
    Ok(Box::new(vosk::VoskAsr::new(config)?))
}
