//! Offline speech recognition with Vosk

use super::{AsrEngine, AsrResult, MIN_CONFIDENCE};
use crate::audio::SAMPLE_RATE;
use crate::config::Config;
use anyhow::{Context, Result};
use tracing::{debug, info};
use vosk::{CompleteResult, DecodingState, Model, Recognizer};

/// Vosk-based ASR engine
pub struct VoskAsr {
    recognizer: Recognizer,
}

impl VoskAsr {
    /// Load the model named in the config
    pub fn new(config: &Config) -> Result<Self> {
        let model_path = std::path::PathBuf::from(&config.vosk_model_path);
        if !model_path.exists() {
            return Err(anyhow::anyhow!(
                "Vosk model not found at {}",
                model_path.display()
            ));
        }

        info!("📦 Loading Vosk model from: {}", model_path.display());
        let model_str = model_path.to_str().ok_or_else(|| {
            anyhow::anyhow!(
                "Vosk model path is not valid UTF-8: {}",
                model_path.display()
            )
        })?;

        let model = Model::new(model_str).context("Failed to load Vosk model")?;
        let mut recognizer = Recognizer::new(&model, SAMPLE_RATE as f32)
            .context("Failed to create Vosk recognizer")?;
        recognizer.set_words(true);

        Ok(Self { recognizer })
    }

    fn take_final(&mut self) -> Option<AsrResult> {
        let result = self.recognizer.final_result();
        let CompleteResult::Single(single) = result else {
            return None;
        };
        let text = extract_text(single.text)?;

        let confidence = average_confidence(single.result.iter().map(|w| w.conf));
        if confidence < MIN_CONFIDENCE {
            info!(
                "🔇 Rejecting low-confidence ASR ({:.2}): '{}'",
                confidence, text
            );
            return None;
        }

        Some(AsrResult { text, confidence })
    }
}

impl AsrEngine for VoskAsr {
    fn process(&mut self, samples: &[i16]) -> Result<Option<AsrResult>> {
        match self.recognizer.accept_waveform(samples) {
            DecodingState::Finalized => Ok(self.take_final()),
            DecodingState::Running => {
                debug!("Partial: {}", self.recognizer.partial_result().partial);
                Ok(None)
            }
            DecodingState::Failed => {
                debug!("Decoding failed for this chunk");
                Ok(None)
            }
        }
    }

    fn finish(&mut self) -> Result<Option<AsrResult>> {
        Ok(self.take_final())
    }

    fn reset(&mut self) {
        self.recognizer.reset();
    }
}

/// Extract text from Vosk result, filtering empty results
fn extract_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Mean word confidence; 1.0 when the engine gave no word-level detail
fn average_confidence(confidences: impl ExactSizeIterator<Item = f32>) -> f32 {
    let count = confidences.len();
    if count == 0 {
        return 1.0;
    }
    confidences.sum::<f32>() / count as f32
}
