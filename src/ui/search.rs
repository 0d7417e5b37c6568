//! Header: logo, search box and the theme toggle

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, Hit, InputMode};
use crate::stream::PlayerBackend;
use crate::theme::PreferenceStore;

const LOGO_WIDTH: u16 = 16;

/// Width of the toggle: icon, space, label, borders
fn toggle_width(label: &str) -> u16 {
    label.chars().count() as u16 + 6
}

pub fn render_header<S: PreferenceStore, B: PlayerBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<S, B>,
) {
    let theme = app.theme.palette();
    let label = app.theme.toggle_label();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(LOGO_WIDTH),
            Constraint::Min(1),
            Constraint::Length(toggle_width(label)),
        ])
        .split(area);

    // Logo
    let logo = Paragraph::new(Line::from(vec![
        Span::styled("LECTURE", theme.title()),
        Span::styled("TUI", theme.secondary().add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border()),
    );
    frame.render_widget(logo, chunks[0]);

    // Search box
    let editing = app.input_mode == InputMode::Editing;
    let line = if editing {
        let (before, after) = app.input.split();
        Line::from(vec![
            Span::raw("⌕ "),
            Span::raw(before.to_string()),
            Span::styled("│", theme.accent()),
            Span::raw(after.to_string()),
        ])
    } else if app.input.text.is_empty() {
        Line::from(Span::styled("⌕ Type / to search lectures...", theme.dimmed()))
    } else {
        Line::from(format!("⌕ {}", app.input.text))
    };

    let search_box = Paragraph::new(line)
        .style(if editing {
            theme.input().fg(theme.primary)
        } else {
            theme.input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing {
                    theme.border_focused()
                } else {
                    theme.border()
                })
                .title(Span::styled(" SEARCH ", theme.title())),
        );
    frame.render_widget(search_box, chunks[1]);
    app.hits.push(chunks[1], Hit::SearchBox);

    // Theme toggle: icon shows the mode it switches to
    let toggle = Paragraph::new(Line::from(vec![
        Span::styled(app.theme.toggle_icon(), theme.accent()),
        Span::raw(" "),
        Span::styled(label, theme.keybind_desc()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border()),
    );
    frame.render_widget(toggle, chunks[2]);
    app.hits.push(chunks[2], Hit::ThemeToggle);
}
