//! LectureTUI - search and watch a lecture catalog from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! lecturetui
//! lecturetui --topic Endgames --rank GM
//!
//! # CLI mode (for automation)
//! lecturetui search "rook endings" --sort rank --json
//! lecturetui theme toggle
//! lecturetui watch dQw4w9WgXcQ --player vlc
//! lecturetui filters topic
//! ```

use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use lecturetui::api::{CatalogClient, CatalogError};
use lecturetui::app::App;
use lecturetui::cli::{Cli, Command, ExitCode, Output};
use lecturetui::commands;
use lecturetui::config::{Config, ConfigError};
use lecturetui::logging;
use lecturetui::models::SearchPage;
use lecturetui::overlay::VideoOverlay;
use lecturetui::search::{Debouncer, SearchController, SearchRequest};
use lecturetui::stream::player::{self, LocalPlayer};
use lecturetui::theme::{system, StateFile, ThemeController};
use lecturetui::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

type TuiApp = App<StateFile, LocalPlayer>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        logging::init_cli(cli.quiet);
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        let config = load_config(&cli)?;
        run_tui(cli, config).await
    }
}

/// Config file (`--config` or the default path) plus flag/env overrides
fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_overrides(cli.base_url.as_deref());
    Ok(config)
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &config, &output).await,
        Some(Command::Theme(cmd)) => commands::theme_cmd(cmd, &output).await,
        Some(Command::Watch(cmd)) => commands::watch_cmd(cmd, &config, &output).await,
        Some(Command::Filters(cmd)) => commands::filters_cmd(cmd, &config, &output),
        None => output.error("No command given", ExitCode::InvalidArgs),
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Background work the event loop polls between frames
struct Background {
    search: Option<InFlight>,
    scheme: mpsc::Receiver<bool>,
    probe: Option<oneshot::Receiver<bool>>,
}

/// A search task and the request it is answering
struct InFlight {
    request: SearchRequest,
    rx: oneshot::Receiver<Result<SearchPage, CatalogError>>,
}

fn spawn_search(client: &CatalogClient, request: SearchRequest) -> InFlight {
    let (tx, rx) = oneshot::channel();
    let client = client.clone();
    let query = request.query.clone();
    tokio::spawn(async move {
        let result = client.search(&query).await;
        if tx.send(result).is_err() {
            debug!("search result dropped: app already gone");
        }
    });
    InFlight { request, rx }
}

/// Run interactive TUI
async fn run_tui(cli: Cli, config: Config) -> Result<()> {
    // Held until exit so buffered log lines are flushed
    let _log_guard = logging::init_tui();
    info!(base_url = %config.base_url, player = %config.player, "starting TUI");

    let client = CatalogClient::new(&config.base_url);

    let mut search =
        SearchController::new(config.filters.clone(), Debouncer::new(config.debounce()));
    for (kind, value) in cli.preselect.selections() {
        search.preselect(kind, value);
    }

    let system_dark = system::detect().await;
    let theme = ThemeController::init(StateFile::open(), system_dark);
    let overlay = VideoOverlay::new(LocalPlayer::new(config.player));
    let mut app = App::new(search, theme, overlay);
    app.system_dark = system_dark;

    let (scheme_tx, scheme_rx) = mpsc::channel(4);
    let watcher = system::spawn_watcher(system_dark, system::POLL_INTERVAL, scheme_tx);

    let (probe_tx, probe_rx) = oneshot::channel();
    let player_type = config.player;
    tokio::spawn(async move {
        if probe_tx.send(player::probe(player_type).await).is_err() {
            debug!("player probe finished after exit");
        }
    });

    let mut background = Background {
        search: None,
        scheme: scheme_rx,
        probe: Some(probe_rx),
    };

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &client, &mut background).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    watcher.abort();
    app.search.dispose();
    info!("TUI closed");
    result
}

/// Main event loop - handles input, polls background work, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut TuiApp,
    client: &CatalogClient,
    background: &mut Background,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    // Initial search with whatever filters the command line preselected
    if let Some(request) = app.search_now(Instant::now()) {
        background.search = Some(spawn_search(client, request));
    }

    while app.running {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout so background work is picked up; wake
        // early when a debounced search comes due and can start
        let timeout = match app.search.debouncer().time_until_due(Instant::now()) {
            Some(left) if !app.search.is_loading() => left.min(TICK_RATE),
            _ => TICK_RATE,
        };
        if event::poll(timeout)? {
            let request = match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now())
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
                _ => None,
            };
            if let Some(request) = request {
                background.search = Some(spawn_search(client, request));
            }
        }

        poll_background(app, background);

        if let Some(request) = app.tick(Instant::now()) {
            background.search = Some(spawn_search(client, request));
        }
    }

    Ok(())
}

fn poll_background(app: &mut TuiApp, background: &mut Background) {
    if let Some(mut flight) = background.search.take() {
        match flight.rx.try_recv() {
            Ok(result) => {
                app.on_search_result(&flight.request, result);
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                app.on_search_lost(&flight.request);
            }
            Err(oneshot::error::TryRecvError::Empty) => background.search = Some(flight),
        }
    }

    while let Ok(prefers_dark) = background.scheme.try_recv() {
        app.on_system_scheme(prefers_dark);
    }

    if let Some(rx) = background.probe.as_mut() {
        let available = match rx.try_recv() {
            Ok(found) => found,
            Err(oneshot::error::TryRecvError::Closed) => false,
            Err(oneshot::error::TryRecvError::Empty) => return,
        };
        background.probe = None;

        let player_type = app.overlay.backend().player_type();
        if available {
            app.overlay.backend_mut().mark_ready();
            app.on_player_ready();
        } else {
            app.on_player_unavailable(format!(
                "{} not found. Install it to watch lectures.",
                player_type.display_name()
            ));
        }
    }
}
