//! GUI module using iced
//!
//! The window is a thin shell: buttons and the input box send [`ShellCommand`]s to the
//! assistant, and [`DisplayEvent`]s coming back are applied in `update`.

use futures::{SinkExt, Stream};
use iced::Subscription;
use tracing::warn;

use crate::assistant::{Assistant, ShellHandle, VoiceOptions};
use crate::config::Config;

pub mod app;
pub mod messages;
pub mod theme;

pub use app::JarvisApp;
pub use messages::Message;

impl JarvisApp {
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::run(assistant_worker)
    }
}

/// Build the assistant, hand its command sender to the app and forward its output
fn assistant_worker() -> impl Stream<Item = Message> {
    iced::stream::channel(100, |mut output| async move {
        let config = Config::load().unwrap_or_default();
        let voice = VoiceOptions {
            enabled: true,
            device: None,
        };

        let (assistant, handle) = match Assistant::from_config(config, voice).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("⚠️ Failed to start assistant: {}", e);
                let _ = output.send(Message::WorkerFailed(e.to_string())).await;
                return;
            }
        };

        let ShellHandle {
            commands,
            mut events,
        } = handle;
        let _ = output.send(Message::WorkerReady(commands)).await;
        tokio::spawn(assistant.run());

        while let Some(event) = events.recv().await {
            if output.send(Message::Display(event)).await.is_err() {
                break;
            }
        }
    })
}
