//! PST CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`pst_engine`] (scene state) and [`pst_tui`] (rendering and
//! the control loop), providing RAII-based terminal management with
//! guaranteed cleanup.
//!
//! ```text
//! main() -> ConfigStore::open_or_init() -> TerminalSession::new() -> supervise()
//!                                                                     |
//!                                                                     v
//!                                             Ok(Termination) -> exit 0
//!                                             Err(Fault)      -> report, exit 1
//! ```
//!
//! The fault report is printed only after the session is dropped, so it lands
//! on the restored terminal rather than the alternate screen.

use std::{
    fs::{self, OpenOptions},
    io::{self, Stdout, stdout},
    path::PathBuf,
    process::ExitCode,
    sync::Mutex,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pst_config::{BASE_CONFIG, ConfigStore, config_path, pst_dir};
use pst_engine::{App, ViewRegistry};
use pst_tui::{Screen, supervise};
use pst_types::FatalError;

const STORE_NAME: &str = "pst";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_pst_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_pst_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in pst_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn pst_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.pst/logs/pst.log
    if let Some(dir) = pst_dir() {
        candidates.push(dir.join("logs").join("pst.log"));
    }

    // Fallback: ./.pst/logs/pst.log (useful in constrained environments)
    candidates.push(PathBuf::from(".pst").join("logs").join("pst.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Manages raw mode and the alternate screen. On drop, terminal state is
/// restored, so the terminal stays usable after errors or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Screen for TerminalSession {
    type Backend = CrosstermBackend<Stdout>;

    fn terminal(&mut self) -> &mut Terminal<Self::Backend> {
        &mut self.terminal
    }

    fn next_event(&mut self) -> io::Result<Event> {
        event::read()
    }

    fn reopen(&mut self) -> io::Result<()> {
        // The next draw picks up the new size; clearing drops stale cells.
        self.terminal.clear()
    }
}

fn run() -> Result<ExitCode> {
    let path = config_path();
    let store = ConfigStore::open_or_init(&path, BASE_CONFIG, Some(STORE_NAME))
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!(path = %store.path().display(), entries = store.len(), "Configuration loaded");

    let mut app = App::new(store, ViewRegistry::builtin())?;

    let outcome = {
        let mut session = TerminalSession::new()?;
        supervise(&mut session, &mut app)
    };

    match outcome {
        Ok(reason) => {
            tracing::info!(reason = reason.message(), "Exiting");
            Ok(ExitCode::SUCCESS)
        }
        Err(fault) => {
            tracing::error!(kind = fault.kind(), line = ?fault.line(), "Exiting on fatal error");
            let report = FatalError(fault);
            eprintln!("Error: {report}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
