//! Session history
//!
//! Append-only log of interactions, stored as a JSON array that is rewritten on each append.

use crate::error::JarvisResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One user utterance and the assistant's reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub timestamp: DateTime<Local>,
    pub user: String,
    pub assistant: String,
}

#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded interactions, oldest first
    pub fn entries(&self) -> JarvisResult<Vec<Interaction>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "⚠️ Session file {} unreadable ({}), starting a new one",
                    self.path.display(),
                    e
                );
                let backup_path = self.path.with_extension("json.corrupt");
                let _ = std::fs::rename(&self.path, backup_path);
                Ok(Vec::new())
            }
        }
    }

    /// Append an interaction stamped with the current local time.
    ///
    /// Timestamps never go backwards: a clock step back reuses the previous entry's time.
    pub fn log_interaction(&self, user: &str, reply: &str) -> JarvisResult<Interaction> {
        let mut entries = self.entries()?;

        let now = Local::now();
        let timestamp = match entries.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        let interaction = Interaction {
            timestamp,
            user: user.to_string(),
            assistant: reply.to_string(),
        };
        entries.push(interaction.clone());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        debug!("📝 Logged interaction #{}", entries.len());

        Ok(interaction)
    }
}
