//! Desktop control
//!
//! Opening programs or files, closing known programs, and powering the machine off.

use crate::error::{JarvisError, JarvisResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;
use sysinfo::{ProcessesToUpdate, System};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// How long a launched program gets to fail before it counts as started
const LAUNCH_SETTLE: Duration = Duration::from_millis(1500);

/// Result of a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// This many processes were signalled
    Closed(usize),
    /// The target is known but nothing by that name is running
    NotRunning,
    /// No process name is configured for the target
    Unmapped,
}

#[async_trait]
pub trait DesktopControl: Send + Sync + std::fmt::Debug {
    /// Launch a program, or open a file or URL with its default handler
    async fn open(&self, target: &str) -> JarvisResult<()>;

    /// Terminate the processes mapped to `target`
    async fn close(&self, target: &str) -> JarvisResult<CloseOutcome>;

    /// Power the machine off
    async fn shutdown(&self) -> JarvisResult<()>;
}

/// Desktop control through the host OS
#[derive(Debug, Clone)]
pub struct SystemDesktop {
    /// Spoken name (lowercase) -> executable / process name
    process_map: HashMap<String, String>,
}

impl SystemDesktop {
    pub fn new(process_map: HashMap<String, String>) -> Self {
        let process_map = process_map
            .into_iter()
            .map(|(name, exe)| (name.to_lowercase(), exe))
            .collect();
        Self { process_map }
    }

    /// Process name configured for a spoken target
    pub fn mapped(&self, target: &str) -> Option<&str> {
        self.process_map
            .get(&target.trim().to_lowercase())
            .map(String::as_str)
    }
}

#[async_trait]
impl DesktopControl for SystemDesktop {
    async fn open(&self, target: &str) -> JarvisResult<()> {
        if let Some(program) = self.mapped(target) {
            info!("🚀 Launching {} for '{}'", program, target);
            return launch(Command::new(program), program, LAUNCH_SETTLE, true).await;
        }

        info!("🚀 Opening '{}' with the default handler", target);
        // explorer.exe exits non-zero even when it opened the target
        launch(opener(target), target, LAUNCH_SETTLE, !cfg!(windows)).await
    }

    async fn close(&self, target: &str) -> JarvisResult<CloseOutcome> {
        let Some(process_name) = self.mapped(target) else {
            return Ok(CloseOutcome::Unmapped);
        };

        let process_name = process_name.to_string();
        let killed = tokio::task::spawn_blocking(move || {
            let mut system = System::new();
            system.refresh_processes(ProcessesToUpdate::All, true);
            let killed = system
                .processes_by_exact_name(OsStr::new(&process_name))
                .filter(|process| process.kill())
                .count();
            debug!("🔪 Closed {} process(es) named {}", killed, process_name);
            killed
        })
        .await
        .map_err(|e| JarvisError::Desktop(format!("process scan failed: {}", e)))?;

        if killed == 0 {
            Ok(CloseOutcome::NotRunning)
        } else {
            Ok(CloseOutcome::Closed(killed))
        }
    }

    async fn shutdown(&self) -> JarvisResult<()> {
        info!("🛑 Requesting system shutdown");
        let mut command = Command::new("shutdown");
        if cfg!(windows) {
            command.args(["/s", "/t", "5"]);
        } else {
            command.args(["-h", "now"]);
        }

        let status = command
            .status()
            .await
            .map_err(|e| JarvisError::Desktop(format!("couldn't run shutdown: {}", e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(JarvisError::Desktop(format!("shutdown refused ({})", status)))
        }
    }
}

/// Start `command` detached from the terminal.
///
/// A process that exits within `settle` is judged by its status (when `check_status`
/// is set). One still running is left alone and reaped in the background.
async fn launch(
    mut command: Command,
    label: &str,
    settle: Duration,
    check_status: bool,
) -> JarvisResult<()> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| JarvisError::Desktop(format!("couldn't start {}: {}", label, e)))?;

    match tokio::time::timeout(settle, child.wait()).await {
        Ok(Ok(status)) if check_status && !status.success() => Err(JarvisError::Desktop(
            format!("couldn't open {} ({})", label, status),
        )),
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(JarvisError::Desktop(format!("lost track of {}: {}", label, e))),
        Err(_) => {
            let label = label.to_string();
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) => debug!("{} exited ({})", label, status),
                    Err(e) => warn!("⚠️ Couldn't reap {}: {}", label, e),
                }
            });
            Ok(())
        }
    }
}

/// Platform command that opens `target` with its associated application.
/// The target is always a single argument and never passes through a shell.
fn opener(target: &str) -> Command {
    let program = if cfg!(windows) {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let mut command = Command::new(program);
    command.arg(target);
    command
}
