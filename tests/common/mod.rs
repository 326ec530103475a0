#![allow(dead_code)]

pub mod mock_asr;
pub mod mock_services;
pub mod mock_tts;

use jarvis::desktop::DesktopControl;
use jarvis::markdown::{self, StyledRun};
use jarvis::processor::{Processor, Services};
use jarvis::state::SessionState;
use jarvis::tasks::TaskPool;
use jarvis::tts::{Speaker, TtsEngine};
use jarvis::{Config, Display, DisplayEvent};
use mock_services::{MockChat, MockDesktop, MockKnowledge, MockRepos};
use mock_tts::MockTts;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

/// Config whose data files live in `dir`
pub fn test_config(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().to_string_lossy().to_string(),
        ..Config::default()
    }
}

/// The mock adapters behind a processor
pub struct Mocks {
    pub chat: Arc<MockChat>,
    pub knowledge: Arc<MockKnowledge>,
    pub repos: Arc<MockRepos>,
    pub desktop: Arc<MockDesktop>,
}

impl Mocks {
    pub fn new() -> Self {
        Self::with_desktop(MockDesktop::default())
    }

    pub fn with_desktop(desktop: MockDesktop) -> Self {
        Self {
            chat: Arc::new(MockChat::default()),
            knowledge: Arc::new(MockKnowledge::new(
                &["Go (programming language)", "Gopher", "Golang mascot"],
                &["Gopher"],
            )),
            repos: Arc::new(MockRepos::new(42, &["rust-lang/rust", "rust-lang/cargo"])),
            desktop: Arc::new(desktop),
        }
    }

    pub fn services(&self) -> Services {
        let desktop: Arc<dyn DesktopControl> = self.desktop.clone();
        Services {
            chat: self.chat.clone(),
            knowledge: self.knowledge.clone(),
            repos: self.repos.clone(),
            desktop,
        }
    }
}

/// A processor over mock adapters and a throwaway data directory
pub struct Harness {
    pub dir: TempDir,
    pub config: Config,
    pub mocks: Mocks,
    pub tts: Arc<MockTts>,
    pub processor: Processor,
    pub events: UnboundedReceiver<DisplayEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_mocks(Mocks::new())
    }

    pub fn with_mocks(mocks: Mocks) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&dir);
        let tts = Arc::new(MockTts::new());
        let engine: Arc<dyn TtsEngine> = tts.clone();
        let (display, events) = Display::channel();
        let state = Arc::new(SessionState::new());
        let speaker = Arc::new(Speaker::new(engine, state.clone(), display.clone()));
        let tasks = Arc::new(TaskPool::new(config.max_background_tasks));
        let processor = Processor::new(&config, mocks.services(), speaker, display, state, tasks);

        Self {
            dir,
            config,
            mocks,
            tts,
            processor,
            events,
        }
    }

    /// Plain text of everything appended to the display so far
    pub fn shown(&mut self) -> String {
        let mut runs: Vec<StyledRun> = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if let DisplayEvent::Append(mut appended) = event {
                runs.append(&mut appended);
            }
        }
        markdown::plain_text(&runs)
    }
}
