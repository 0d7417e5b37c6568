//! Video overlay
//!
//! Drawn over everything else. The panel itself is the player's stand-in:
//! playback happens in the local player window, the panel shows its status.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::models::watch_url;
use crate::overlay::{OverlayLayout, OverlayStatus, CLOSE_BUTTON_LABEL};
use crate::ui::Theme;

pub fn render_overlay(frame: &mut Frame, screen: Rect, theme: &Theme, status: &OverlayStatus<'_>) {
    let (video_id, body, border) = match status {
        OverlayStatus::Closed => return,
        OverlayStatus::Waiting { video_id } => (
            *video_id,
            vec![Line::from(Span::styled("⟳ Starting player...", theme.loading()))],
            theme.border_focused(),
        ),
        OverlayStatus::Playing { video_id, session } => (
            *video_id,
            vec![
                Line::from(Span::styled("▶ Playing in your video player", theme.success())),
                Line::from(""),
                Line::from(Span::styled(format!("session {}", session), theme.dimmed())),
            ],
            theme.border_focused(),
        ),
        OverlayStatus::Failed { video_id, message } => (
            *video_id,
            vec![
                Line::from(Span::styled("✗ Could not start playback", theme.error())),
                Line::from(""),
                Line::from(Span::styled(message.to_string(), theme.error())),
            ],
            theme.error(),
        ),
    };

    // Dim backdrop
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.dim)),
        screen,
    );

    let layout = OverlayLayout::for_screen(screen);
    frame.render_widget(Clear, layout.video);

    let mut lines = vec![Line::from("")];
    lines.extend(body);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(watch_url(video_id), theme.secondary())));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("ESC", theme.keybind()),
        Span::styled(" close  ", theme.keybind_desc()),
        Span::styled("x", theme.keybind()),
        Span::styled(" close  ", theme.keybind_desc()),
        Span::styled("q", theme.keybind()),
        Span::styled(" quit", theme.keybind_desc()),
    ]));

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(border)
                .title(Span::styled(format!(" ▶ {} ", video_id), theme.title()))
                .style(theme.overlay()),
        );
    frame.render_widget(panel, layout.video);

    frame.render_widget(
        Paragraph::new(Span::styled(CLOSE_BUTTON_LABEL, theme.error())),
        layout.close_button,
    );
}
