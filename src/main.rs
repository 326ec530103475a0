//! Jarvis - terminal front end
//!
//! Type commands on stdin; add `--voice` to talk to it as well.

use anyhow::Result;
use clap::Parser;
use jarvis::markdown::{Style, StyledRun};
use jarvis::{audio, Assistant, Config, DisplayEvent, ShellCommand, ShellHandle, VoiceOptions};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Listen on the microphone as well as reading stdin
    #[arg(long)]
    voice: bool,

    /// Audio input device index
    #[arg(short, long)]
    device: Option<usize>,

    /// Print the available audio input devices and exit
    #[arg(long)]
    list_devices: bool,
}

const RESET: &str = "\x1b[0m";

/// ANSI escape for a display style
fn ansi(style: Style) -> &'static str {
    match style {
        Style::Normal => "",
        Style::Bold => "\x1b[1;32m",
        Style::Italic => "\x1b[3;34m",
        Style::InlineCode | Style::CodeBlock => "\x1b[48;5;238m",
        Style::SectionTitle => "\x1b[1;4;34m",
        Style::ArticleTitle => "\x1b[1;32m",
        Style::Info => "\x1b[3;34m",
        Style::Error => "\x1b[31m",
    }
}

fn paint(run: &StyledRun) -> String {
    let code = ansi(run.style);
    if code.is_empty() {
        return run.text.clone();
    }
    // Escape codes end before any trailing line break
    let body = run.text.trim_end_matches('\n');
    let breaks = &run.text[body.len()..];
    format!("{}{}{}{}", code, body, RESET, breaks)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;
    jarvis::init_logging(args.verbose, &config.log_level);

    if args.list_devices {
        for (index, name) in audio::list_input_devices()?.iter().enumerate() {
            println!("[{}] {}", index, name);
        }
        return Ok(());
    }

    info!("🤖 Jarvis v{} starting...", env!("CARGO_PKG_VERSION"));
    let voice = VoiceOptions {
        enabled: args.voice,
        device: args.device,
    };
    let (assistant, handle) = Assistant::from_config(config, voice).await?;
    let ShellHandle { commands, mut events } = handle;

    let runner = tokio::spawn(assistant.run());
    commands.send(ShellCommand::Start)?;

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            if commands.send(ShellCommand::Typed(line)).is_err() {
                return;
            }
        }
        // End of input only ends a typed session
        if !voice.enabled {
            let _ = commands.send(ShellCommand::Quit);
        }
    });

    let mut stdout = std::io::stdout();
    while let Some(event) = events.recv().await {
        match event {
            DisplayEvent::Append(runs) => {
                for run in &runs {
                    write!(stdout, "{}", paint(run))?;
                }
                stdout.flush()?;
            }
            DisplayEvent::Status(status) => debug!("Status: {}", status),
            DisplayEvent::Exit => break,
        }
    }

    runner.await?;
    Ok(())
}
