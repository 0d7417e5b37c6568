//! Tracing setup
//!
//! CLI mode logs to stderr (stdout carries results and JSON). The TUI owns
//! the terminal, so it logs to `<data_dir>/lecturetui/lecturetui.log`.
//! Both honor `LECTURETUI_LOG`, an `EnvFilter` directive. Without it the CLI
//! logs warnings and the TUI logs `info`.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "LECTURETUI_LOG";
pub const LOG_FILE: &str = "lecturetui.log";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Stderr logging for CLI subcommands. `--quiet` drops everything below
/// `error`.
pub fn init_cli(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let subscriber = tracing_subscriber::registry().with(env_filter(default)).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false),
    );

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

/// Directory for the TUI log file
pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("lecturetui"))
}

/// File logging for the TUI. The guard must live until the program exits
/// or buffered lines are lost. Returns `None` when no data directory exists.
pub fn init_tui() -> Option<WorkerGuard> {
    let dir = log_dir()?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("lecturetui: cannot create log directory {}: {}", dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let subscriber = tracing_subscriber::registry().with(env_filter("info")).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false),
    );

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
    Some(guard)
}
