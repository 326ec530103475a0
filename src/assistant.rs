//! Assistant control loop
//!
//! Owns the single command channel every shell talks to. Typed lines, button presses and
//! recognized speech all arrive as [`ShellCommand`]s and are handled one at a time.
//! Output goes the other way as [`DisplayEvent`]s.

use crate::asr::{self, Heard, ListenSettings, SpeechInput};
use crate::audio;
use crate::config::Config;
use crate::display::{Display, DisplayEvent};
use crate::markdown::Style;
use crate::processor::{InputSource, ProcessResult, Processor, Services};
use crate::state::SessionState;
use crate::tasks::TaskPool;
use crate::tts::{self, Speaker, TtsEngine};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

const USAGE_HINT: &str = "Say `Look for` for Wikipedia, `Ask` for AI, or a desktop command.";

/// Input to the control loop
#[derive(Debug)]
pub enum ShellCommand {
    /// "Start Listening": greet and begin capture. Only the first one counts.
    Start,
    /// Pause or resume microphone input
    ToggleListening,
    /// A line entered in the shell
    Typed(String),
    /// Result of one capture attempt. `done` fires once it has been handled.
    Heard {
        heard: Heard,
        done: Option<oneshot::Sender<()>>,
    },
    Quit,
}

/// Voice input options
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceOptions {
    pub enabled: bool,
    /// Input device index, `None` for the default device
    pub device: Option<usize>,
}

/// What a shell needs to drive an assistant
#[derive(Debug)]
pub struct ShellHandle {
    pub commands: mpsc::UnboundedSender<ShellCommand>,
    pub events: mpsc::UnboundedReceiver<DisplayEvent>,
}

pub struct Assistant {
    config: Config,
    processor: Processor,
    speaker: Arc<Speaker>,
    display: Display,
    state: Arc<SessionState>,
    voice: VoiceOptions,
    commands_tx: mpsc::UnboundedSender<ShellCommand>,
    commands_rx: mpsc::UnboundedReceiver<ShellCommand>,
}

impl Assistant {
    /// Wire an assistant from explicit collaborators
    pub fn new(
        config: Config,
        services: Services,
        tts: Arc<dyn TtsEngine>,
        voice: VoiceOptions,
    ) -> (Self, ShellHandle) {
        let (display, events) = Display::channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let state = Arc::new(SessionState::new());
        let speaker = Arc::new(Speaker::new(tts, state.clone(), display.clone()));
        let tasks = Arc::new(TaskPool::new(config.max_background_tasks));
        let processor = Processor::new(
            &config,
            services,
            speaker.clone(),
            display.clone(),
            state.clone(),
            tasks,
        );

        let handle = ShellHandle {
            commands: commands_tx.clone(),
            events,
        };
        let assistant = Self {
            config,
            processor,
            speaker,
            display,
            state,
            voice,
            commands_tx,
            commands_rx,
        };
        (assistant, handle)
    }

    /// Wire an assistant to the real network, OS and speech adapters
    pub async fn from_config(config: Config, voice: VoiceOptions) -> Result<(Self, ShellHandle)> {
        let services = Services::from_config(&config)?;
        let tts = tts::create_engine(&config).await;
        Ok(Self::new(config, services, tts, voice))
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Run until "goodbye", a `Quit` command, or every shell handle is gone
    pub async fn run(mut self) {
        info!(
            "🤖 {} ready (speech: {})",
            self.config.assistant_name,
            self.speaker.engine_name()
        );
        self.display.info(format!(
            "{} is ready. Press “Start Listening”.",
            self.config.assistant_name
        ));
        self.display.info(format!(
            "Say 'help me' or 'i need you' to know how to work with {}",
            self.config.assistant_name
        ));
        self.display.status("***");

        while let Some(command) = self.commands_rx.recv().await {
            debug!("Shell command: {:?}", command);
            let result = match command {
                ShellCommand::Start => {
                    self.start().await;
                    ProcessResult::Handled
                }
                ShellCommand::ToggleListening => {
                    self.toggle();
                    ProcessResult::Handled
                }
                ShellCommand::Typed(text) => {
                    let result = self.processor.process(&text, InputSource::Typed).await;
                    self.display.status(self.state.idle_status());
                    result
                }
                ShellCommand::Heard { heard, done } => {
                    let result = self.heard(heard).await;
                    if let Some(done) = done {
                        let _ = done.send(());
                    }
                    result
                }
                ShellCommand::Quit => ProcessResult::Quit,
            };

            if result == ProcessResult::Quit {
                break;
            }
        }

        self.shutdown().await;
    }

    async fn start(&self) {
        if !self.state.mark_started() {
            debug!("Already started");
            return;
        }

        self.state.set_listening(true);
        self.display.status("Ready");
        self.display.info("Listening started. Speak a command.");
        self.greet().await;

        if self.voice.enabled {
            self.spawn_capture();
        }
    }

    fn toggle(&self) {
        if !self.state.is_started() {
            return;
        }
        let listening = self.state.toggle_listening();
        info!(
            "{} Listening {}",
            if listening { "▶️" } else { "⏸️" },
            if listening { "resumed" } else { "paused" }
        );
        self.display.status(self.state.idle_status());
    }

    async fn greet(&self) {
        for line in self.config.introduction() {
            self.display
                .markdown(&format!("*{}*\n", line), Style::Info);
            self.speaker.say(&line).await;
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        self.display.markdown(&format!("{}\n", USAGE_HINT), Style::Info);
        self.speaker.say(USAGE_HINT).await;
    }

    async fn heard(&self, heard: Heard) -> ProcessResult {
        let result = match heard {
            Heard::Text(text) => self.processor.process(&text, InputSource::Spoken).await,
            Heard::Timeout => {
                self.display.info("Listening timed out. Try again.");
                ProcessResult::Handled
            }
            Heard::Unintelligible => {
                self.display.info("I didn't catch that.");
                ProcessResult::Handled
            }
            Heard::Interrupted => ProcessResult::Handled,
        };
        self.display.status(self.state.idle_status());
        result
    }

    /// Start microphone capture on its own thread, feeding the command channel
    fn spawn_capture(&self) {
        let audio_rx = match audio::start_capture(self.voice.device) {
            Ok(rx) => rx,
            Err(e) => {
                warn!("⚠️ Failed to start audio capture: {}", e);
                self.display.error(format!("STT Error: {}", e));
                return;
            }
        };
        let engine = match asr::create_engine(&self.config) {
            Ok(engine) => engine,
            Err(e) => {
                warn!("⚠️ Failed to start ASR: {}", e);
                self.display.error(format!("STT Error: {}", e));
                return;
            }
        };

        let input = SpeechInput::new(engine, audio_rx, ListenSettings::from_config(&self.config));
        let state = self.state.clone();
        let display = self.display.clone();
        let commands = self.commands_tx.clone();

        let spawned = std::thread::Builder::new()
            .name("jarvis-capture".to_string())
            .spawn(move || capture_loop(input, state, display, commands));
        match spawned {
            Ok(_) => info!("🎙️ Voice capture started"),
            Err(e) => self.display.error(format!("STT Error: {}", e)),
        }
    }

    async fn shutdown(&self) {
        info!("👋 Shutting down");
        self.state.set_listening(false);
        self.processor.tasks().shutdown().await;
        self.display.exit();
    }
}

/// Blocking capture loop. Ends when the control loop stops taking commands.
fn capture_loop(
    mut input: SpeechInput,
    state: Arc<SessionState>,
    display: Display,
    commands: mpsc::UnboundedSender<ShellCommand>,
) {
    loop {
        if commands.is_closed() {
            break;
        }
        if !state.can_capture() {
            std::thread::sleep(Duration::from_millis(200));
            continue;
        }

        display.status("Listening...");
        let heard = match input.listen(&state) {
            Ok(Heard::Interrupted) => continue,
            Ok(heard) => heard,
            Err(e) => {
                warn!("⚠️ Capture failed: {}", e);
                display.error(format!("STT Error: {}", e));
                break;
            }
        };
        if matches!(heard, Heard::Text(_)) {
            display.status("Recognizing...");
        }

        let (done_tx, done_rx) = oneshot::channel();
        let command = ShellCommand::Heard {
            heard,
            done: Some(done_tx),
        };
        if commands.send(command).is_err() {
            break;
        }
        // Wait for the command to be handled so replies aren't captured as input
        if done_rx.blocking_recv().is_err() {
            break;
        }
    }
    debug!("Capture loop finished");
}
