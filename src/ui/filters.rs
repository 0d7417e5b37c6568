//! Filter panel
//!
//! Sort toggle, rank radio group, topic and tag checkboxes.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, FilterRow, Focus, Hit};
use crate::models::FilterKind;
use crate::stream::PlayerBackend;
use crate::theme::PreferenceStore;

pub const PANEL_WIDTH: u16 = 28;

/// Label of a row, without its check mark
pub fn row_label<S: PreferenceStore, B: PlayerBackend>(app: &App<S, B>, row: &FilterRow) -> String {
    let catalog = app.search.filters();
    match row {
        FilterRow::Sort => format!("Sort: {}", app.search.query().sort),
        FilterRow::Rank(id) => catalog.name_of(FilterKind::Rank, id).to_string(),
        FilterRow::Topic(id) => catalog.name_of(FilterKind::Topic, id).to_string(),
        FilterRow::Tag(id) => catalog.name_of(FilterKind::Tag, id).to_string(),
        FilterRow::ClearAll => "✕ Clear filters".to_string(),
    }
}

fn check_mark(row: &FilterRow, active: bool) -> &'static str {
    match (row, active) {
        (FilterRow::Rank(_), true) => "(•) ",
        (FilterRow::Rank(_), false) => "( ) ",
        (FilterRow::Topic(_) | FilterRow::Tag(_), true) => "[x] ",
        (FilterRow::Topic(_) | FilterRow::Tag(_), false) => "[ ] ",
        (FilterRow::Sort, _) => "⇅ ",
        (FilterRow::ClearAll, _) => "",
    }
}

pub fn render_filters<S: PreferenceStore, B: PlayerBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<S, B>,
) {
    let theme = app.theme.palette();
    let focused = app.focus == Focus::Filters;

    let active = {
        let q = app.search.query();
        q.topics.len() + q.tags.len() + usize::from(q.rank.is_some())
    };
    let title = if active > 0 {
        format!(" FILTERS ({}) ", active)
    } else {
        " FILTERS ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme.border_focused()
        } else {
            theme.border()
        })
        .title(Span::styled(title, theme.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = app.filter_rows();
    app.filters.set_len(rows.len());
    app.filters.scroll_into_view(inner.height as usize);
    let offset = app.filters.offset;

    let mut lines = Vec::new();
    let mut previous_kind = None;
    for (index, row) in rows.iter().enumerate().skip(offset).take(inner.height as usize) {
        let is_active = app.row_active(row);
        let is_selected = focused && index == app.filters.selected;
        let kind = row.kind();

        let style = if is_selected {
            theme.list_item_selected()
        } else if is_active {
            theme.filter_active()
        } else if matches!(row, FilterRow::Sort | FilterRow::ClearAll) {
            theme.accent()
        } else {
            theme.list_item()
        };

        let mut spans = vec![
            Span::styled(check_mark(row, is_active), style),
            Span::styled(row_label(app, row), style),
        ];
        // Name the group on its first row
        if let Some(group) = kind.filter(|k| Some(*k) != previous_kind) {
            spans.push(Span::styled(format!("  {}", group), theme.dimmed()));
        }
        previous_kind = kind;
        lines.push(Line::from(spans));

        let y = inner.y + (index - offset) as u16;
        app.hits.push(
            Rect {
                x: inner.x,
                y,
                width: inner.width,
                height: 1,
            },
            Hit::FilterRow(index),
        );
    }

    if rows.len() == 1 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No filters configured",
            theme.dimmed(),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
