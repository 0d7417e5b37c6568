//! UI rendering tests for LectureTUI
//!
//! Renders the whole app into a `TestBackend` and clicks on what was drawn.
//!
//! ## Test Cases
//! - idle screen: logo, search prompt, filter panel, theme toggle
//! - result cards with dates and badges, load-more row
//! - clicks on rendered badges and the load-more row
//! - error and empty messages
//! - video overlay with its close button
//! - small terminals

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, Terminal};
use std::time::Instant;

use lecturetui::app::App;
use lecturetui::models::{FilterCatalog, FilterOption, Lecture, SearchPage, ThemeMode};
use lecturetui::overlay::{OverlayLayout, VideoOverlay};
use lecturetui::search::card::ERROR_MESSAGE;
use lecturetui::search::{Debouncer, SearchController};
use lecturetui::stream::{LocalPlayer, PlayerType};
use lecturetui::theme::{MemoryStore, ThemeController};
use lecturetui::ui;
use lecturetui::CatalogError;

type TestApp = App<MemoryStore, LocalPlayer>;

fn app() -> TestApp {
    let filters = FilterCatalog {
        topics: vec![
            FilterOption::new("1", "Openings"),
            FilterOption::new("2", "Endgames"),
        ],
        tags: vec![FilterOption::new("10", "classic")],
        ranks: vec![FilterOption::new("gm", "GM")],
    };
    App::new(
        SearchController::new(filters, Debouncer::default()),
        ThemeController::init(MemoryStore::default(), None),
        // Never marked ready, so no process is spawned
        VideoOverlay::new(LocalPlayer::new(PlayerType::Mpv)),
    )
}

fn lecture(i: usize, title: &str) -> Lecture {
    Lecture {
        id: Some(i as u64),
        title: title.to_string(),
        youtube_id: format!("video{:06}", i),
        thumbnail_url: None,
        publish_date: Some("2024-03-05".into()),
        topics: vec!["Endgames".into()],
        tags: vec!["classic".into()],
        rank: Some("GM".into()),
    }
}

fn loaded(titles: &[&str], has_next: bool) -> TestApp {
    let mut app = app();
    let request = app.search_now(Instant::now()).unwrap();
    let page = SearchPage {
        lectures: titles.iter().enumerate().map(|(i, t)| lecture(i, t)).collect(),
        has_next,
    };
    app.on_search_result(&request, Ok(page));
    app
}

fn draw(app: &mut TestApp, width: u16, height: u16) -> Vec<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

/// Column and row where `needle` starts
fn find(screen: &[String], needle: &str) -> Option<(u16, u16)> {
    screen.iter().enumerate().find_map(|(y, line)| {
        line.find(needle)
            .map(|byte| (line[..byte].chars().count() as u16, y as u16))
    })
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn test_idle_screen() {
    let mut app = app();
    let screen = draw(&mut app, 100, 30);

    assert!(find(&screen, "LECTURETUI").is_some());
    assert!(find(&screen, "Type / to search lectures").is_some());
    assert!(find(&screen, "FILTERS").is_some());
    assert!(find(&screen, "Sort: Newest").is_some());
    assert!(find(&screen, "[ ] Openings").is_some());
    assert!(find(&screen, "( ) GM").is_some());
    assert!(find(&screen, "Switch to dark mode").is_some());
    assert!(find(&screen, "NORMAL").is_some());
}

#[test]
fn test_cards_render_dates_and_badges() {
    let mut app = loaded(&["Lucena Position", "Philidor Position"], true);
    let screen = draw(&mut app, 100, 30);

    assert!(find(&screen, "▸ ▶ Lucena Position").is_some());
    assert!(find(&screen, "Philidor Position").is_some());
    assert!(find(&screen, "Mar 5, 2024").is_some());
    assert!(find(&screen, "◆ Endgames").is_some());
    assert!(find(&screen, "#classic").is_some());
    assert!(find(&screen, "LECTURES (2)").is_some());
    assert!(find(&screen, "▾ Load more").is_some());
}

#[test]
fn test_load_more_hidden_on_last_page() {
    let mut app = loaded(&["Lucena Position"], false);
    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, "Load more").is_none());
}

#[test]
fn test_click_rendered_load_more() {
    let mut app = loaded(&["Lucena Position"], true);
    let screen = draw(&mut app, 100, 30);

    let (x, y) = find(&screen, "▾ Load more").unwrap();
    let request = app.handle_mouse(click(x + 2, y), Instant::now()).unwrap();
    assert!(request.append);
    assert_eq!(request.query.page, 2);

    // While the page loads the row turns into a loading indicator
    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, "Loading more...").is_some());
    assert!(app.handle_mouse(click(x + 2, y), Instant::now()).is_none());
}

#[test]
fn test_click_rendered_badge_filters() {
    let mut app = loaded(&["Lucena Position"], false);
    let screen = draw(&mut app, 100, 30);

    let (x, y) = find(&screen, "◆ Endgames").unwrap();
    let request = app.handle_mouse(click(x + 3, y), Instant::now()).unwrap();
    assert!(request.query.topics.contains("2"));

    // The filter panel reflects the selection
    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, "[x] Endgames").is_some());
    assert!(find(&screen, "FILTERS (1)").is_some());
}

#[test]
fn test_click_filter_row() {
    let mut app = app();
    let screen = draw(&mut app, 100, 30);

    let (x, y) = find(&screen, "[ ] Openings").unwrap();
    let request = app.handle_mouse(click(x, y), Instant::now()).unwrap();
    assert!(request.query.topics.contains("1"));
}

#[test]
fn test_click_theme_toggle() {
    let mut app = app();
    let screen = draw(&mut app, 100, 30);

    let (x, y) = find(&screen, "Switch to dark mode").unwrap();
    app.handle_mouse(click(x, y), Instant::now());
    assert_eq!(app.theme.mode(), ThemeMode::Dark);

    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, "Switch to light mode").is_some());
}

#[test]
fn test_error_message() {
    let mut app = app();
    let request = app.search_now(Instant::now()).unwrap();
    app.on_search_result(&request, Err(CatalogError::Status(500)));

    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, ERROR_MESSAGE).is_some());
}

#[test]
fn test_empty_message() {
    let mut app = app();
    let request = app.search_now(Instant::now()).unwrap();
    app.on_search_result(&request, Ok(SearchPage::default()));

    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, "No lectures found matching your criteria.").is_some());
}

#[test]
fn test_loading_message() {
    let mut app = app();
    app.search_now(Instant::now()).unwrap();
    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, "Searching...").is_some());
}

#[test]
fn test_overlay_renders_and_closes_from_button() {
    let mut app = loaded(&["Lucena Position"], false);
    let screen = draw(&mut app, 100, 30);
    let (x, y) = find(&screen, "Lucena Position").unwrap();
    app.handle_mouse(click(x, y), Instant::now());
    assert_eq!(app.overlay.video_id(), Some("video000000"));

    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, "[✕]").is_some());
    assert!(find(&screen, "https://www.youtube.com/watch?v=video000000").is_some());
    assert!(find(&screen, "Starting player...").is_some());

    let layout = OverlayLayout::for_screen(app.screen);
    assert_eq!(
        find(&screen, "[✕]"),
        Some((layout.close_button.x, layout.close_button.y))
    );

    // Clicks on the panel do nothing
    app.handle_mouse(click(layout.video.x + 2, layout.video.y + 2), Instant::now());
    assert!(app.overlay.is_open());

    app.handle_mouse(
        click(layout.close_button.x + 1, layout.close_button.y),
        Instant::now(),
    );
    assert!(!app.overlay.is_open());
}

#[test]
fn test_overlay_shows_unavailable_player() {
    let mut app = loaded(&["Lucena Position"], false);
    app.on_player_unavailable("mpv not found. Install it to watch lectures.");
    app.open_selected();

    let screen = draw(&mut app, 100, 30);
    assert!(find(&screen, "Could not start playback").is_some());
    assert!(find(&screen, "mpv not found").is_some());
}

#[test]
fn test_small_terminal_does_not_panic() {
    let mut app = loaded(&["Lucena Position", "Philidor Position"], true);
    for (w, h) in [(20, 6), (40, 10), (80, 24), (200, 50)] {
        draw(&mut app, w, h);
    }
    app.open_selected();
    for (w, h) in [(10, 4), (40, 10), (200, 50)] {
        draw(&mut app, w, h);
    }
}
