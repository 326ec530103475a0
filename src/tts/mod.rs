//! TTS (Text-to-Speech) Module
//!
//! Engines turn plain text into audio. [`Speaker`] sits in front of the engine and owns
//! the speaking flag, so capture never hears the assistant's own voice.

use crate::config::Config;
use crate::display::Display;
use crate::markdown::{self, Style};
use crate::state::SessionState;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod speechd;
pub mod system;

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync + std::fmt::Debug {
    /// Speak the given text, returning once playback has finished
    async fn speak(&self, text: &str) -> Result<()>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Factory to create the configured TTS engine
pub async fn create_engine(config: &Config) -> Arc<dyn TtsEngine> {
    info!("🛠️ Creating TTS engine: {}", config.tts_engine);
    let engine: Arc<dyn TtsEngine> = match config.tts_engine.as_str() {
        "speechd_ng" | "speechd" => match speechd::SpeechdEngine::connect().await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!("  - Speechd unavailable ({}), falling back to System", e);
                Arc::new(system::SystemEngine::new())
            }
        },
        "system" => Arc::new(system::SystemEngine::new()),
        other => {
            warn!("  - Unknown engine '{}', falling back to System", other);
            Arc::new(system::SystemEngine::new())
        }
    };
    info!("✅ TTS engine '{}' initialized", engine.name());
    engine
}

/// Serializes speech and raises the speaking flag while a line is being read out
#[derive(Debug)]
pub struct Speaker {
    engine: Arc<dyn TtsEngine>,
    state: Arc<SessionState>,
    display: Display,
    voice: tokio::sync::Mutex<()>,
}

impl Speaker {
    pub fn new(engine: Arc<dyn TtsEngine>, state: Arc<SessionState>, display: Display) -> Self {
        Self {
            engine,
            state,
            display,
            voice: tokio::sync::Mutex::new(()),
        }
    }

    /// Speak `text`. Markdown markers are stripped first. Failures are shown, not returned.
    pub async fn say(&self, text: &str) {
        let plain = markdown::plain_text(&markdown::render(text, Style::Normal));
        let plain = plain.trim();
        if plain.is_empty() {
            return;
        }

        let _voice = self.voice.lock().await;
        self.state.set_speaking(true);
        self.display.status("Speaking...");
        debug!("🗣️ Speaking: {}", plain);

        if let Err(e) = self.engine.speak(plain).await {
            warn!("⚠️ TTS failed: {}", e);
            self.display.error(format!("TTS Error: {}", e));
        }

        self.state.set_speaking(false);
        self.display.status(self.state.idle_status());
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }
}
