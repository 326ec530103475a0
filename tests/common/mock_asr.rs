//! Mock ASR Engine for Testing
//!
//! Returns scripted recognition results and records the audio it was fed.

use anyhow::Result;
use jarvis::asr::{AsrEngine, AsrResult};
use std::sync::{Arc, Mutex};

/// Mock ASR engine that returns predefined phrases
pub struct MockAsr {
    /// Results handed out in order, one per processed chunk
    pub responses: Vec<AsrResult>,
    idx: usize,
    /// Every chunk that was processed
    pub received_chunks: Arc<Mutex<Vec<Vec<i16>>>>,
}

impl MockAsr {
    pub fn new(responses: Vec<AsrResult>) -> Self {
        Self {
            responses,
            idx: 0,
            received_chunks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Single-phrase mock
    pub fn with_phrase(text: &str, confidence: f32) -> Self {
        Self::new(vec![AsrResult {
            text: text.to_string(),
            confidence,
        }])
    }

    pub fn chunk_count(&self) -> usize {
        self.received_chunks.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl AsrEngine for MockAsr {
    fn process(&mut self, samples: &[i16]) -> Result<Option<AsrResult>> {
        if let Ok(mut chunks) = self.received_chunks.lock() {
            chunks.push(samples.to_vec());
        }

        if self.idx < self.responses.len() {
            let result = self.responses[self.idx].clone();
            self.idx += 1;
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_asr_returns_responses() {
        let mut mock = MockAsr::with_phrase("hello world", 0.95);
        let result = mock.process(&[0i16; 100]).unwrap();
        assert_eq!(result.unwrap().text, "hello world");
        assert!(mock.process(&[0i16; 100]).unwrap().is_none());
        assert_eq!(mock.chunk_count(), 2);
    }
}
