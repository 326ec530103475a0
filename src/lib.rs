//! Jarvis Library
//!
//! Core modules for the Jarvis desktop voice assistant.

pub mod ai;
pub mod asr;
pub mod assistant;
pub mod audio;
pub mod cache;
pub mod commands;
pub mod config;
pub mod desktop;
pub mod display;
pub mod error;
pub mod gui;
pub mod lookup;
pub mod markdown;
pub mod memory;
pub mod normalizer;
pub mod processor;
pub mod sanitize;
pub mod session;
pub mod state;
pub mod tasks;
pub mod tts;

pub use assistant::{Assistant, ShellCommand, ShellHandle, VoiceOptions};
pub use config::Config;
pub use display::{Display, DisplayEvent};
pub use error::{JarvisError, JarvisResult};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `--verbose` forces debug output; otherwise `RUST_LOG` wins over the configured level.
pub fn init_logging(verbose: bool, configured_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured_level))
    };

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
