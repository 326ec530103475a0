//! Speechd-ng TTS backend over D-Bus

use crate::tts::TtsEngine;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;
use zbus::{proxy, Connection};

const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[proxy(
    interface = "org.speech.Service",
    default_service = "org.speech.Service",
    default_path = "/org/speech/Service"
)]
trait SpeechService {
    fn speak(&self, text: &str) -> zbus::Result<()>;
    fn ping(&self) -> zbus::Result<String>;
}

pub struct SpeechdEngine {
    proxy: SpeechServiceProxy<'static>,
}

impl std::fmt::Debug for SpeechdEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechdEngine").finish_non_exhaustive()
    }
}

impl SpeechdEngine {
    /// Connect on the session bus and make sure the service answers
    pub async fn connect() -> Result<Self> {
        let connection = Connection::session()
            .await
            .context("no D-Bus session bus")?;
        let proxy = SpeechServiceProxy::new(&connection).await?;

        let greeting = tokio::time::timeout(PING_TIMEOUT, proxy.ping())
            .await
            .context("speechd-ng did not answer in time")?
            .context("speechd-ng not responding")?;
        info!("🔊 Connected to speechd-ng: {}", greeting);

        Ok(Self { proxy })
    }
}

#[async_trait]
impl TtsEngine for SpeechdEngine {
    async fn speak(&self, text: &str) -> Result<()> {
        self.proxy.speak(text).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "speechd"
    }
}
