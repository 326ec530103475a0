//! Presentation updates
//!
//! Components never touch the shell directly. They push [`DisplayEvent`]s through a
//! [`Display`] handle; the shell drains the receiving end on its own context.

use crate::markdown::{self, Style, StyledRun};
use tokio::sync::mpsc;
use tracing::debug;

/// One mutation of the presentation shell
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    /// Append styled runs to the output log
    Append(Vec<StyledRun>),
    /// Replace the status line
    Status(String),
    /// The process is about to end
    Exit,
}

/// Cloneable sending side of the display channel
#[derive(Debug, Clone)]
pub struct Display {
    tx: mpsc::UnboundedSender<DisplayEvent>,
}

impl Display {
    /// Create a display handle and the receiver the shell drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DisplayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: DisplayEvent) {
        if self.tx.send(event).is_err() {
            debug!("Display receiver dropped, discarding update");
        }
    }

    /// Append a whole line in a single style, markers untouched
    pub fn log(&self, text: impl Into<String>, style: Style) {
        let mut text = text.into();
        text.push('\n');
        self.send(DisplayEvent::Append(vec![StyledRun::new(text, style)]));
    }

    /// Render `text` as markdown and append it. Code blocks always end their line.
    pub fn markdown(&self, text: &str, default_style: Style) {
        let mut runs = markdown::render(text, default_style);
        for run in runs.iter_mut().filter(|r| r.style == Style::CodeBlock) {
            if !run.text.ends_with('\n') {
                run.text.push('\n');
            }
        }
        if !runs.is_empty() {
            self.send(DisplayEvent::Append(runs));
        }
    }

    pub fn error(&self, text: impl Into<String>) {
        self.log(text, Style::Error);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.log(text, Style::Info);
    }

    pub fn status(&self, text: impl Into<String>) {
        self.send(DisplayEvent::Status(text.into()));
    }

    pub fn exit(&self) {
        self.send(DisplayEvent::Exit);
    }
}
