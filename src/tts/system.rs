//! System fallback TTS engine
//!
//! Shells out to whichever command-line synthesizer is installed and waits for it.

use super::TtsEngine;
use anyhow::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::process::Command;
use tracing::debug;

/// Candidate synthesizers, tried in order: program and arguments placed before the text
const SYNTHESIZERS: &[(&str, &[&str])] = &[
    ("spd-say", &["--wait", "--rate", "-10"]),
    ("espeak-ng", &["-s", "150"]),
    ("espeak", &["-s", "150"]),
    ("say", &["-r", "150"]),
];

#[derive(Debug, Default)]
pub struct SystemEngine;

impl SystemEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TtsEngine for SystemEngine {
    async fn speak(&self, text: &str) -> Result<()> {
        for (program, args) in SYNTHESIZERS {
            match Command::new(program).args(*args).arg(text).status().await {
                Ok(status) if status.success() => {
                    debug!("System speech via {}", program);
                    return Ok(());
                }
                Ok(status) => {
                    return Err(anyhow::anyhow!("{} exited with {}", program, status));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(anyhow::anyhow!("{} failed: {}", program, e)),
            }
        }

        Err(anyhow::anyhow!(
            "No system TTS command found (tried spd-say, espeak-ng, espeak, say)"
        ))
    }

    fn name(&self) -> &str {
        "system"
    }
}
