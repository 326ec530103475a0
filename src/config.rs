use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable that overrides the configured OpenRouter key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

const DEFAULT_SYSTEM_PROMPT: &str = "You are Jarvis, a witty, intelligent, and loyal AI assistant. \
You speak clearly, offer helpful insights, and occasionally use dry humor. \
You are skilled in science, history, and technology. You never break character.";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Identity
    pub assistant_name: String,
    pub user_name: String,

    // Storage
    pub data_dir: String,

    // AI
    pub openrouter_url: String,
    pub openrouter_api_key: String,
    pub ai_model: String,
    pub system_prompt: String,
    pub ai_timeout_secs: u64,

    // Lookups
    pub github_api_url: String,
    pub search_timeout_secs: u64,
    pub wikipedia_url: String,
    pub lookup_timeout_secs: u64,
    pub results_limit: usize,

    // Desktop
    pub process_map: HashMap<String, String>,

    // Speech
    pub tts_engine: String,
    pub vosk_model_path: String,
    pub listen_timeout_secs: u64,
    pub phrase_time_limit_secs: u64,
    pub ambient_calibration_ms: u64,
    pub voice_corrections: HashMap<String, String>,

    // Runtime
    pub max_background_tasks: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant_name: "Jarvis".to_string(),
            user_name: "Mr. ColumnD".to_string(),
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("jarvis")
                .to_string_lossy()
                .to_string(),
            openrouter_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            openrouter_api_key: String::new(),
            ai_model: "mistralai/mistral-7b-instruct:free".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            ai_timeout_secs: 60,
            github_api_url: "https://api.github.com".to_string(),
            search_timeout_secs: 10,
            wikipedia_url: "https://en.wikipedia.org".to_string(),
            lookup_timeout_secs: 30,
            results_limit: 5,
            process_map: default_process_map(),
            tts_engine: "system".to_string(),
            vosk_model_path: dirs::data_dir()
                .unwrap_or_default()
                .join("jarvis/models/vosk-model-small-en-us")
                .to_string_lossy()
                .to_string(),
            listen_timeout_secs: 6,
            phrase_time_limit_secs: 6,
            ambient_calibration_ms: 1000,
            voice_corrections: HashMap::from([
                ("look four".to_string(), "look for".to_string()),
                ("get hub".to_string(), "github".to_string()),
                ("git hub".to_string(), "github".to_string()),
            ]),
            max_background_tasks: 4,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path, falling back to defaults on corruption
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    // Graceful degradation: log warning and use defaults
                    tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                    // Backup corrupt file for debugging
                    let backup_path = path.with_extension("json.corrupt");
                    let _ = std::fs::rename(path, &backup_path);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.openrouter_api_key = key.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Key-value memory file
    pub fn memory_path(&self) -> PathBuf {
        self.data_path().join("memory.json")
    }

    /// Session history file
    pub fn session_path(&self) -> PathBuf {
        self.data_path().join("session.json")
    }

    /// Root of the cached AI answers and Wikipedia summaries
    pub fn archive_path(&self) -> PathBuf {
        self.data_path().join("archive")
    }

    /// Introduction lines spoken when listening first starts
    pub fn introduction(&self) -> Vec<String> {
        vec![
            "Hello Sir!".to_string(),
            "Welcome back!".to_string(),
            format!(
                "I am {}, your personal-digital assistant!",
                self.assistant_name
            ),
        ]
    }
}

fn default_process_map() -> HashMap<String, String> {
    let entries: &[(&str, &str)] = if cfg!(windows) {
        &[
            ("chrome", "chrome.exe"),
            ("notepad", "notepad.exe"),
            ("edge", "msedge.exe"),
            ("firefox", "firefox.exe"),
        ]
    } else {
        &[
            ("chrome", "chrome"),
            ("notepad", "gedit"),
            ("edge", "msedge"),
            ("firefox", "firefox"),
        ]
    };

    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jarvis")
        .join("config.json")
}
