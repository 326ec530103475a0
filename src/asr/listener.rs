//! Phrase-limited speech capture
//!
//! One [`SpeechInput::listen`] call waits for the user to start talking (up to the
//! listen timeout), then records until the recognizer finalizes or the phrase limit is
//! reached. The call blocks; run it on a blocking thread.

use super::AsrEngine;
use crate::audio::{calculate_energy, speech_threshold};
use crate::config::Config;
use crate::error::JarvisError;
use crate::state::SessionState;
use anyhow::Result;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of one listening attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    /// Recognized lowercase text
    Text(String),
    /// Nobody spoke before the timeout
    Timeout,
    /// Speech was detected but nothing could be recognized
    Unintelligible,
    /// Listening was paused or speech output started mid-capture
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenSettings {
    pub timeout: Duration,
    pub phrase_limit: Duration,
    pub calibration: Duration,
}

impl ListenSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.listen_timeout_secs),
            phrase_limit: Duration::from_secs(config.phrase_time_limit_secs),
            calibration: Duration::from_millis(config.ambient_calibration_ms),
        }
    }
}

pub struct SpeechInput {
    engine: Box<dyn AsrEngine>,
    audio: Receiver<Vec<i16>>,
    settings: ListenSettings,
    threshold: Option<f32>,
}

impl SpeechInput {
    pub fn new(
        engine: Box<dyn AsrEngine>,
        audio: Receiver<Vec<i16>>,
        settings: ListenSettings,
    ) -> Self {
        Self {
            engine,
            audio,
            settings,
            threshold: None,
        }
    }

    /// Energy a chunk needs to count as speech, once calibrated
    pub fn threshold(&self) -> Option<f32> {
        self.threshold
    }

    /// Measure background noise for the calibration window
    pub fn calibrate(&mut self) -> Result<f32> {
        let deadline = Instant::now() + self.settings.calibration;
        let mut energies = Vec::new();
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            match self.audio.recv_timeout(remaining) {
                Ok(chunk) => energies.push(calculate_energy(&chunk)),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return Err(disconnected()),
            }
        }

        let threshold = speech_threshold(&energies);
        info!(
            "🎚️ Ambient calibration: {} chunks, speech threshold {:.0}",
            energies.len(),
            threshold
        );
        self.threshold = Some(threshold);
        Ok(threshold)
    }

    /// Capture one phrase. Calibrates first if that hasn't happened yet.
    pub fn listen(&mut self, state: &SessionState) -> Result<Heard> {
        if self.threshold.is_none() {
            self.calibrate()?;
        }
        let threshold = self.threshold.unwrap_or_default();

        // Audio buffered while we weren't listening belongs to nobody
        while self.audio.try_recv().is_ok() {}
        self.engine.reset();

        let wait_deadline = Instant::now() + self.settings.timeout;
        let mut phrase_deadline: Option<Instant> = None;

        loop {
            if !state.can_capture() {
                self.engine.reset();
                return Ok(Heard::Interrupted);
            }

            let deadline = phrase_deadline.unwrap_or(wait_deadline);
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return self.deadline_reached(phrase_deadline.is_some());
            };

            let chunk = match self.audio.recv_timeout(remaining) {
                Ok(chunk) => chunk,
                Err(RecvTimeoutError::Timeout) => {
                    return self.deadline_reached(phrase_deadline.is_some())
                }
                Err(RecvTimeoutError::Disconnected) => return Err(disconnected()),
            };

            if phrase_deadline.is_none() && calculate_energy(&chunk) >= threshold {
                debug!("🗣️ Speech detected");
                phrase_deadline = Some(Instant::now() + self.settings.phrase_limit);
            }

            if let Some(result) = self.engine.process(&chunk)? {
                return Ok(heard_text(&result.text));
            }
        }
    }

    fn deadline_reached(&mut self, speech_started: bool) -> Result<Heard> {
        if !speech_started {
            self.engine.reset();
            return Ok(Heard::Timeout);
        }
        debug!("⏱️ Phrase limit reached");
        Ok(match self.engine.finish()? {
            Some(result) => heard_text(&result.text),
            None => Heard::Unintelligible,
        })
    }
}

fn heard_text(text: &str) -> Heard {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        Heard::Unintelligible
    } else {
        Heard::Text(text)
    }
}

fn disconnected() -> anyhow::Error {
    JarvisError::Audio("audio stream closed".to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asr::AsrResult;
    use std::sync::mpsc;

    /// Recognizes `phrase` after `after` loud chunks, or on finish
    struct Scripted {
        phrase: Option<String>,
        after: usize,
        loud_seen: usize,
    }

    impl AsrEngine for Scripted {
        fn process(&mut self, samples: &[i16]) -> Result<Option<AsrResult>> {
            if calculate_energy(samples) > 0.0 {
                self.loud_seen += 1;
            }
            if self.loud_seen >= self.after && self.after > 0 {
                return Ok(self.phrase.take().map(|text| AsrResult {
                    text,
                    confidence: 1.0,
                }));
            }
            Ok(None)
        }

        fn finish(&mut self) -> Result<Option<AsrResult>> {
            Ok(self.phrase.take().map(|text| AsrResult {
                text,
                confidence: 1.0,
            }))
        }

        fn reset(&mut self) {
            self.loud_seen = 0;
        }
    }

    fn settings(ms: u64) -> ListenSettings {
        ListenSettings {
            timeout: Duration::from_millis(ms),
            phrase_limit: Duration::from_millis(ms),
            calibration: Duration::from_millis(0),
        }
    }

    fn listening() -> SessionState {
        let state = SessionState::new();
        state.set_listening(true);
        state
    }

    #[test]
    fn test_recognized_phrase_is_lowercased() {
        let (tx, rx) = mpsc::channel();
        let engine = Scripted {
            phrase: Some("Ask What Is Rust".into()),
            after: 2,
            loud_seen: 0,
        };
        let mut input = SpeechInput::new(Box::new(engine), rx, settings(2000));
        input.calibrate().unwrap();

        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            for _ in 0..3 {
                let _ = tx.send(vec![5000i16; 160]);
                std::thread::sleep(Duration::from_millis(5));
            }
            std::thread::sleep(Duration::from_millis(500));
        });

        assert_eq!(
            input.listen(&listening()).unwrap(),
            Heard::Text("ask what is rust".into())
        );
    }

    #[test]
    fn test_silence_times_out() {
        let (tx, rx) = mpsc::channel();
        let engine = Scripted {
            phrase: None,
            after: 0,
            loud_seen: 0,
        };
        let mut input = SpeechInput::new(Box::new(engine), rx, settings(50));
        input.calibrate().unwrap();
        tx.send(vec![0i16; 160]).unwrap();

        assert_eq!(input.listen(&listening()).unwrap(), Heard::Timeout);
        drop(tx);
    }

    #[test]
    fn test_phrase_limit_flushes_partial_speech() {
        let (tx, rx) = mpsc::channel();
        let engine = Scripted {
            phrase: Some("look for golang".into()),
            after: 100,
            loud_seen: 0,
        };
        let mut input = SpeechInput::new(Box::new(engine), rx, settings(100));
        input.calibrate().unwrap();

        let sender = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            for _ in 0..5 {
                let _ = tx.send(vec![5000i16; 160]);
            }
            std::thread::sleep(Duration::from_millis(400));
        });

        assert_eq!(
            input.listen(&listening()).unwrap(),
            Heard::Text("look for golang".into())
        );
        sender.join().unwrap();
    }

    #[test]
    fn test_speaking_interrupts_capture() {
        let (_tx, rx) = mpsc::channel();
        let engine = Scripted {
            phrase: None,
            after: 0,
            loud_seen: 0,
        };
        let mut input = SpeechInput::new(Box::new(engine), rx, settings(1000));
        input.calibrate().unwrap();

        let state = listening();
        state.set_speaking(true);
        assert_eq!(input.listen(&state).unwrap(), Heard::Interrupted);
    }

    #[test]
    fn test_paused_listening_interrupts_capture() {
        let (_tx, rx) = mpsc::channel();
        let engine = Scripted {
            phrase: Some("open firefox".into()),
            after: 1,
            loud_seen: 0,
        };
        let mut input = SpeechInput::new(Box::new(engine), rx, settings(1000));
        input.calibrate().unwrap();

        let state = SessionState::new();
        assert_eq!(input.listen(&state).unwrap(), Heard::Interrupted);
    }

    #[test]
    fn test_closed_stream_is_an_error() {
        let (tx, rx) = mpsc::channel::<Vec<i16>>();
        drop(tx);
        let engine = Scripted {
            phrase: None,
            after: 0,
            loud_seen: 0,
        };
        let mut input = SpeechInput::new(Box::new(engine), rx, settings(1000));
        assert!(input.listen(&listening()).is_err());
    }
}
