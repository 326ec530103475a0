//! Message types for the Jarvis GUI

use crate::assistant::ShellCommand;
use crate::display::DisplayEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Messages that drive the application
#[derive(Debug, Clone)]
pub enum Message {
    // Assistant wiring
    WorkerReady(UnboundedSender<ShellCommand>),
    WorkerFailed(String),
    Display(DisplayEvent),

    // Controls
    StartPressed,
    TogglePressed,
    InputChanged(String),
    Submit,
}
