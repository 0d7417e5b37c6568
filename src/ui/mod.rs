//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first, with mouse clicks on everything a
//! reader would expect to click: cards, badges, filters, the theme toggle.

pub mod filters;
pub mod player;
pub mod results;
pub mod search;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Focus, InputMode};
use crate::stream::PlayerBackend;
use crate::theme::PreferenceStore;

/// Draw a frame and rebuild the click map
pub fn render<S: PreferenceStore, B: PlayerBackend>(frame: &mut Frame, app: &mut App<S, B>) {
    let area = frame.area();
    let theme = app.theme.palette();
    app.screen = area;
    app.hits.clear();

    // Clear with background color
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(theme.text()), area);

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    search::render_header(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(filters::PANEL_WIDTH), Constraint::Min(1)])
        .split(chunks[1]);
    filters::render_filters(frame, body[0], app);
    results::render_results(frame, body[1], app);

    render_status_bar(frame, chunks[2], app);

    if app.overlay.is_open() {
        player::render_overlay(frame, area, theme, &app.overlay.status());
    }
}

fn render_status_bar<S: PreferenceStore, B: PlayerBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &App<S, B>,
) {
    let theme = app.theme.palette();

    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(" NORMAL ", theme.highlighted()),
        InputMode::Editing => Span::styled(
            " INSERT ",
            ratatui::style::Style::default()
                .fg(theme.background)
                .bg(theme.accent),
        ),
    };

    let page = if app.search.page() > 1 {
        format!(" page {} ", app.search.page())
    } else {
        String::new()
    };

    let help = match (app.input_mode, app.focus) {
        (InputMode::Editing, _) => " ↵:search  ESC:done ",
        (InputMode::Normal, Focus::Filters) => " ↑↓:move  ␣:toggle  c:clear  tab:results  q:quit ",
        (InputMode::Normal, Focus::Results) => {
            " /:search  ↵:play  ←→:badge  m:more  s:sort  f:filters  t:theme  q:quit "
        }
    };

    let status_line = Line::from(vec![
        mode_indicator,
        Span::styled(page, theme.dimmed()),
        Span::raw(" │ "),
        Span::styled(help, theme.keybind_desc()),
    ]);

    frame.render_widget(Paragraph::new(status_line).style(theme.status_bar()), area);
}
