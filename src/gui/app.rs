//! Main application state for the Jarvis GUI

use iced::widget::{button, column, container, rich_text, row, scrollable, text, text_input};
use iced::{Element, Length, Task};
use lazy_static::lazy_static;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use super::messages::Message;
use super::theme;
use crate::assistant::ShellCommand;
use crate::display::DisplayEvent;
use crate::markdown::{Style, StyledRun};

lazy_static! {
    static ref LOG_ID: scrollable::Id = scrollable::Id::new("jarvis-log");
}

/// Main application state
#[derive(Debug, Default)]
pub struct JarvisApp {
    /// Status line
    pub(crate) status: String,
    /// Everything shown in the output area
    pub(crate) log: Vec<StyledRun>,
    /// Manual input box
    pub(crate) input: String,
    /// Command channel into the assistant, once it is up
    pub(crate) commands: Option<UnboundedSender<ShellCommand>>,
    pub(crate) started: bool,
    pub(crate) listening: bool,
}

impl JarvisApp {
    pub fn new() -> (Self, Task<Message>) {
        info!("🚀 Jarvis window initialized");
        let app = Self {
            status: "***".to_string(),
            ..Self::default()
        };
        (app, Task::none())
    }

    pub fn title(&self) -> String {
        "Jarvis Assistant".to_string()
    }

    pub fn theme(&self) -> iced::Theme {
        theme::theme()
    }

    fn send(&self, command: ShellCommand) {
        match &self.commands {
            Some(tx) => {
                if tx.send(command).is_err() {
                    warn!("⚠️ Assistant is no longer running");
                }
            }
            None => warn!("⚠️ Assistant not ready yet, dropping {:?}", command),
        }
    }

    /// Add runs to the log, merging with the last run when the style matches
    pub(crate) fn append(&mut self, runs: Vec<StyledRun>) {
        for run in runs {
            match self.log.last_mut() {
                Some(last) if last.style == run.style => last.text.push_str(&run.text),
                _ => self.log.push(run),
            }
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::WorkerReady(commands) => {
                info!("🔗 Assistant connected");
                self.commands = Some(commands);
            }
            Message::WorkerFailed(error) => {
                self.status = "Error".to_string();
                self.append(vec![StyledRun::new(
                    format!("Assistant failed to start: {}\n", error),
                    Style::Error,
                )]);
            }
            Message::Display(DisplayEvent::Append(runs)) => {
                self.append(runs);
                return scrollable::snap_to(LOG_ID.clone(), scrollable::RelativeOffset::END);
            }
            Message::Display(DisplayEvent::Status(status)) => {
                self.status = status;
            }
            Message::Display(DisplayEvent::Exit) => {
                info!("👋 Closing window");
                return iced::exit();
            }
            Message::StartPressed => {
                if !self.started && self.commands.is_some() {
                    self.started = true;
                    self.listening = true;
                    self.send(ShellCommand::Start);
                }
            }
            Message::TogglePressed => {
                if self.started {
                    self.listening = !self.listening;
                    self.send(ShellCommand::ToggleListening);
                }
            }
            Message::InputChanged(value) => {
                self.input = value;
            }
            Message::Submit => {
                let line = self.input.trim().to_string();
                if !line.is_empty() {
                    self.input.clear();
                    self.send(ShellCommand::Typed(line));
                }
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = text("🤖 Jarvis Assistant")
            .size(26)
            .color(theme::green());
        let status = text(&self.status).size(14).color(theme::blue());

        let spans: Vec<_> = self.log.iter().map(theme::span).collect();
        let output = scrollable(
            container(rich_text(spans))
                .padding(10)
                .width(Length::Fill),
        )
        .id(LOG_ID.clone())
        .height(Length::Fill);

        let start = button(text("Start Listening"))
            .padding([6, 12])
            .style(button::primary)
            .on_press_maybe((!self.started).then_some(Message::StartPressed));
        let toggle = if self.listening || !self.started {
            button(text("Pause Listening")).style(button::danger)
        } else {
            button(text("Resume Listening")).style(button::success)
        }
        .padding([6, 12])
        .on_press_maybe(self.started.then_some(Message::TogglePressed));

        let entry = row![
            text_input("Type a command...", &self.input)
                .on_input(Message::InputChanged)
                .on_submit(Message::Submit)
                .padding(8)
                .width(Length::Fill),
            button(text("Send"))
                .padding([6, 12])
                .style(button::primary)
                .on_press(Message::Submit),
        ]
        .spacing(6);

        container(
            column![
                header,
                status,
                output,
                row![start, toggle].spacing(12),
                entry
            ]
            .spacing(10)
            .align_x(iced::Alignment::Center),
        )
        .padding(12)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}
