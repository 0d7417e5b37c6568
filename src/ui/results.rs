//! Lecture results
//!
//! Cards are drawn as fixed-height blocks so clicks can be mapped back to
//! a card and a badge. The load-more row appears under the last card while
//! the server reports another page.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, Focus, Hit};
use crate::search::card::{Badge, BadgeKind, LectureCard};
use crate::search::ResultView;
use crate::stream::PlayerBackend;
use crate::theme::PreferenceStore;
use crate::ui::Theme;

/// Title, date, badges, spacer
pub const CARD_HEIGHT: u16 = 4;

pub const LOAD_MORE_LABEL: &str = "▾ Load more";

/// On-screen text of a badge
pub fn badge_text(badge: &Badge) -> String {
    match badge.kind {
        BadgeKind::Rank => format!(" {} ", badge.label),
        BadgeKind::Topic => format!("◆ {}", badge.label),
        BadgeKind::Tag => format!("#{}", badge.label),
    }
}

fn badge_style(theme: &Theme, badge: &Badge, highlighted: bool) -> Style {
    let style = match badge.kind {
        BadgeKind::Rank => theme.rank_badge(),
        BadgeKind::Topic => theme.topic_badge(),
        BadgeKind::Tag => theme.tag_badge(),
    };
    if highlighted {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

pub fn render_results<S: PreferenceStore, B: PlayerBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &mut App<S, B>,
) {
    let theme = app.theme.palette();
    let count = app.cards().len();
    let title = if count > 0 {
        format!(" LECTURES ({}) · {} ", count, app.search.query().sort)
    } else {
        format!(" LECTURES · {} ", app.search.query().sort)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if app.focus == Focus::Results {
            theme.border_focused()
        } else {
            theme.border()
        })
        .title(Span::styled(title, theme.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.search.view() {
        ResultView::Cards(_) => {}
        ResultView::Idle => {
            return render_message(frame, inner, "Type / to search lectures", theme.dimmed());
        }
        ResultView::Loading => {
            return render_message(frame, inner, "⟳ Searching...", theme.loading());
        }
        ResultView::Empty(msg) => {
            let msg = msg.clone();
            return render_message(frame, inner, &msg, theme.dimmed());
        }
        ResultView::Error(msg) => {
            let msg = msg.clone();
            return render_message(frame, inner, &msg, theme.error());
        }
    }

    let footer = inner.height > 1 && (app.search.load_more_visible() || app.search.is_loading());
    let list_height = inner.height.saturating_sub(u16::from(footer));
    let visible = (list_height / CARD_HEIGHT).max(1) as usize;
    app.results.scroll_into_view(visible);

    let offset = app.results.offset;
    let selected = app.results.selected;
    let badge_cursor = app.badge_cursor;
    let cards: Vec<LectureCard> = app
        .cards()
        .iter()
        .skip(offset)
        .take(visible)
        .cloned()
        .collect();

    for (row, card) in cards.iter().enumerate() {
        let index = offset + row;
        let y = inner.y + row as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > inner.y + list_height && row > 0 {
            break;
        }
        let card_area = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: CARD_HEIGHT.min(inner.y + inner.height - y),
        };
        let is_selected = index == selected;
        let cursor = if is_selected { badge_cursor } else { None };
        render_card(frame, card_area, theme, card, is_selected, cursor);
        record_card_hits(app, card_area, index, card);
    }

    if footer {
        let footer_area = Rect {
            x: inner.x,
            y: inner.y + inner.height - 1,
            width: inner.width,
            height: 1,
        };
        if app.search.is_loading() {
            render_message(frame, footer_area, "⟳ Loading more...", theme.loading());
        } else {
            let label = Paragraph::new(Span::styled(LOAD_MORE_LABEL, theme.accent()))
                .alignment(Alignment::Center);
            frame.render_widget(label, footer_area);
            let width = LOAD_MORE_LABEL.chars().count() as u16;
            app.hits.push(
                Rect {
                    x: footer_area.x + footer_area.width.saturating_sub(width) / 2,
                    y: footer_area.y,
                    width: width.min(footer_area.width),
                    height: 1,
                },
                Hit::LoadMore,
            );
        }
    }
}

fn render_message(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let para = Paragraph::new(Span::styled(text.to_string(), style)).alignment(Alignment::Center);
    let line = Rect {
        y: area.y + area.height / 3,
        height: 1.min(area.height),
        ..area
    };
    frame.render_widget(para, line);
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    card: &LectureCard,
    is_selected: bool,
    badge_cursor: Option<usize>,
) {
    let marker = if is_selected { "▸ " } else { "  " };
    let title_style = if is_selected {
        theme.list_item_selected()
    } else {
        theme.list_item()
    };

    let mut badges: Vec<Span> = vec![Span::raw("  ")];
    for (i, badge) in card.all_badges().enumerate() {
        if i > 0 {
            badges.push(Span::raw(" "));
        }
        badges.push(Span::styled(
            badge_text(badge),
            badge_style(theme, badge, badge_cursor == Some(i)),
        ));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled(marker, if is_selected { theme.accent() } else { theme.dimmed() }),
            Span::styled("▶ ", theme.secondary()),
            Span::styled(card.title.clone(), title_style),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(card.date_label.clone(), theme.date()),
        ]),
        Line::from(badges),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Register the play row and every visible badge
fn record_card_hits<S: PreferenceStore, B: PlayerBackend>(
    app: &mut App<S, B>,
    area: Rect,
    index: usize,
    card: &LectureCard,
) {
    app.hits.push(Rect { height: 1, ..area }, Hit::Card(index));

    if area.height < 3 {
        return;
    }
    let y = area.y + 2;
    let right = area.x + area.width;
    let mut x = area.x + 2;
    for (badge, label) in card.all_badges().map(badge_text).enumerate() {
        let width = Span::raw(label.as_str()).width() as u16;
        if x >= right {
            break;
        }
        app.hits.push(
            Rect {
                x,
                y,
                width: width.min(right - x),
                height: 1,
            },
            Hit::Badge { card: index, badge },
        );
        x += width + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_text() {
        assert_eq!(badge_text(&Badge::new(BadgeKind::Rank, "GM")), " GM ");
        assert_eq!(badge_text(&Badge::new(BadgeKind::Topic, "Endgames")), "◆ Endgames");
        assert_eq!(badge_text(&Badge::new(BadgeKind::Tag, "classic")), "#classic");
    }
}
