//! App state and core application logic
//!
//! Routes keyboard and mouse input to the three controllers (search, theme,
//! video overlay) and keeps the selection state the views need. Anything
//! that must happen off the UI thread comes back out as a [`SearchRequest`]
//! for the event loop to run.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Instant;
use tracing::debug;

use crate::api::CatalogError;
use crate::models::{FilterKind, SearchPage};
use crate::overlay::{CloseTrigger, VideoOverlay};
use crate::search::card::LectureCard;
use crate::search::{SearchController, SearchOutcome, SearchRequest};
use crate::stream::player::{LocalPlayer, PlayerBackend};
use crate::theme::{PreferenceStore, StateFile, ThemeController};

// =============================================================================
// Input Mode / Focus
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

/// Which panel receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Results,
    Filters,
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.selected = index;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible > 0 && self.selected >= self.offset + visible {
            self.offset = self.selected + 1 - visible;
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Search Box
// =============================================================================

/// Text and cursor of the search box. The cursor counts characters.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub text: String,
    pub cursor: usize,
}

impl SearchInput {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    /// Delete character at cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.chars().count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Text before and after the cursor
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.byte_index(self.cursor))
    }
}

// =============================================================================
// Filter Panel Rows
// =============================================================================

/// One selectable row of the filter panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRow {
    Sort,
    Rank(String),
    Topic(String),
    Tag(String),
    ClearAll,
}

impl FilterRow {
    pub fn kind(&self) -> Option<FilterKind> {
        match self {
            FilterRow::Rank(_) => Some(FilterKind::Rank),
            FilterRow::Topic(_) => Some(FilterKind::Topic),
            FilterRow::Tag(_) => Some(FilterKind::Tag),
            FilterRow::Sort | FilterRow::ClearAll => None,
        }
    }
}

// =============================================================================
// Mouse Hit Regions
// =============================================================================

/// Something clickable drawn in the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    SearchBox,
    ThemeToggle,
    /// A card's play marker or title
    Card(usize),
    Badge { card: usize, badge: usize },
    LoadMore,
    FilterRow(usize),
}

/// Clickable regions, rebuilt on every draw
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Hit)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, hit: Hit) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, hit));
        }
    }

    /// The most recently drawn region under the pointer
    pub fn at(&self, column: u16, row: u16) -> Option<Hit> {
        self.regions
            .iter()
            .rev()
            .find(|(r, _)| {
                column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .map(|(_, hit)| *hit)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App<S: PreferenceStore = StateFile, B: PlayerBackend = LocalPlayer> {
    /// Whether the app is running
    pub running: bool,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub input: SearchInput,

    pub search: SearchController,
    pub theme: ThemeController<S>,
    pub overlay: VideoOverlay<B>,

    /// Card selection
    pub results: ListState,
    /// Highlighted badge of the selected card
    pub badge_cursor: Option<usize>,
    /// Filter panel selection
    pub filters: ListState,

    /// Clickable regions of the last frame
    pub hits: HitMap,
    /// Size of the last frame
    pub screen: Rect,
    /// Last known OS preference
    pub system_dark: Option<bool>,
    player_unavailable: Option<String>,
}

impl<S: PreferenceStore, B: PlayerBackend> App<S, B> {
    pub fn new(search: SearchController, theme: ThemeController<S>, overlay: VideoOverlay<B>) -> Self {
        let input = SearchInput::new(search.query().term.clone());
        let mut app = Self {
            running: true,
            input_mode: InputMode::Normal,
            focus: Focus::Results,
            input,
            search,
            theme,
            overlay,
            results: ListState::default(),
            badge_cursor: None,
            filters: ListState::default(),
            hits: HitMap::default(),
            screen: Rect::default(),
            system_dark: None,
            player_unavailable: None,
        };
        app.filters.set_len(app.filter_rows().len());
        app
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn cards(&self) -> &[LectureCard] {
        self.search.view().cards()
    }

    pub fn selected_card(&self) -> Option<&LectureCard> {
        self.cards().get(self.results.selected)
    }

    /// Rows of the filter panel: sort, ranks, topics, tags, then "clear"
    /// when anything is selected. Selected ids missing from the catalog
    /// (startup flags) are listed too so they can be deselected.
    pub fn filter_rows(&self) -> Vec<FilterRow> {
        let catalog = self.search.filters();
        let query = self.search.query();
        let mut rows = vec![FilterRow::Sort];

        let mut ranks: Vec<String> = catalog.ranks.iter().map(|o| o.id.clone()).collect();
        if let Some(rank) = &query.rank {
            if !ranks.contains(rank) {
                ranks.push(rank.clone());
            }
        }
        rows.extend(ranks.into_iter().map(FilterRow::Rank));

        let mut topics: Vec<String> = catalog.topics.iter().map(|o| o.id.clone()).collect();
        topics.extend(query.topics.iter().filter(|t| !topics.contains(t)).cloned().collect::<Vec<_>>());
        rows.extend(topics.into_iter().map(FilterRow::Topic));

        let mut tags: Vec<String> = catalog.tags.iter().map(|o| o.id.clone()).collect();
        tags.extend(query.tags.iter().filter(|t| !tags.contains(t)).cloned().collect::<Vec<_>>());
        rows.extend(tags.into_iter().map(FilterRow::Tag));

        if query.has_filters() {
            rows.push(FilterRow::ClearAll);
        }
        rows
    }

    /// Whether a filter row is currently applied
    pub fn row_active(&self, row: &FilterRow) -> bool {
        let query = self.search.query();
        match row {
            FilterRow::Rank(id) => query.rank.as_deref() == Some(id.as_str()),
            FilterRow::Topic(id) => query.topics.contains(id),
            FilterRow::Tag(id) => query.tags.contains(id),
            FilterRow::Sort | FilterRow::ClearAll => false,
        }
    }

    // -------------------------------------------------------------------------
    // Searching
    // -------------------------------------------------------------------------

    /// Start a fresh search now. If one is already in flight, the debouncer
    /// is re-armed so the new criteria are searched once it finishes.
    pub fn search_now(&mut self, now: Instant) -> Option<SearchRequest> {
        let request = self.search.begin_search(true);
        if request.is_none() {
            let term = self.search.query().term.clone();
            self.search.edit_term(term, now);
        } else {
            self.results.reset();
            self.results.set_len(0);
            self.badge_cursor = None;
        }
        request
    }

    /// Fire the debounced search if it is due
    pub fn tick(&mut self, now: Instant) -> Option<SearchRequest> {
        let request = self.search.poll_debounce(now);
        if request.is_some() {
            self.results.reset();
            self.results.set_len(0);
            self.badge_cursor = None;
        }
        request
    }

    pub fn load_more(&mut self) -> Option<SearchRequest> {
        self.search.load_more()
    }

    /// A search task delivered its result
    pub fn on_search_result(
        &mut self,
        request: &SearchRequest,
        result: Result<SearchPage, CatalogError>,
    ) -> SearchOutcome {
        let outcome = self.search.finish_search(request, result);
        self.sync_results(request.append);
        outcome
    }

    /// A search task went away without a result
    pub fn on_search_lost(&mut self, request: &SearchRequest) -> SearchOutcome {
        let outcome = self.search.request_channel_closed(request);
        self.sync_results(request.append);
        outcome
    }

    fn sync_results(&mut self, append: bool) {
        let len = self.cards().len();
        if !append {
            self.results.reset();
            self.badge_cursor = None;
        }
        self.results.set_len(len);
    }

    fn apply_filter_row(&mut self, index: usize, now: Instant) -> Option<SearchRequest> {
        let row = self.filter_rows().get(index).cloned()?;
        let changed = match &row {
            FilterRow::Sort => {
                self.search.cycle_sort();
                true
            }
            FilterRow::Rank(id) => {
                let next = if self.row_active(&row) {
                    None
                } else {
                    Some(id.clone())
                };
                self.search.set_rank(next)
            }
            FilterRow::Topic(id) => self.search.toggle_topic(id),
            FilterRow::Tag(id) => self.search.toggle_tag(id),
            FilterRow::ClearAll => self.search.clear_filters(),
        };
        self.filters.set_len(self.filter_rows().len());
        if changed {
            self.search_now(now)
        } else {
            None
        }
    }

    fn apply_badge(&mut self, card: usize, badge: usize, now: Instant) -> Option<SearchRequest> {
        let badge = self.cards().get(card)?.all_badges().nth(badge)?.clone();
        if !self.search.apply_badge(&badge) {
            return None;
        }
        self.filters.set_len(self.filter_rows().len());
        self.search_now(now)
    }

    // -------------------------------------------------------------------------
    // Video overlay
    // -------------------------------------------------------------------------

    pub fn open_video(&mut self, video_id: &str) {
        self.overlay.open(video_id);
        if let Some(reason) = &self.player_unavailable {
            self.overlay.on_backend_unavailable(reason.clone());
        }
    }

    pub fn open_selected(&mut self) {
        if let Some(video_id) = self.selected_card().map(|c| c.video_id.clone()) {
            self.open_video(&video_id);
        }
    }

    /// The player backend finished starting up
    pub fn on_player_ready(&mut self) {
        self.player_unavailable = None;
        self.overlay.on_backend_ready();
    }

    /// The player backend cannot be used
    pub fn on_player_unavailable(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.overlay.on_backend_unavailable(reason.clone());
        self.player_unavailable = Some(reason);
    }

    // -------------------------------------------------------------------------
    // Theme
    // -------------------------------------------------------------------------

    pub fn on_system_scheme(&mut self, prefers_dark: bool) {
        self.system_dark = Some(prefers_dark);
        self.theme.on_system_change(prefers_dark);
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event. Returns a search for the event loop to run.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<SearchRequest> {
        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        if self.overlay.is_open() {
            self.handle_overlay_key(key);
            return None;
        }

        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key, now),
            InputMode::Normal => self.handle_normal_key(key, now),
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.overlay.close(CloseTrigger::Escape);
            }
            KeyCode::Char('x') => {
                self.overlay.close(CloseTrigger::CloseButton);
            }
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    /// Keys in the search box. Typing is debounced; Enter searches at once.
    fn handle_editing_key(&mut self, key: KeyEvent, now: Instant) -> Option<SearchRequest> {
        let edited = match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                false
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.search.set_term(self.input.text.clone());
                return self.search_now(now);
            }
            KeyCode::Char(c) => {
                self.input.insert(c);
                true
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => {
                self.input.cursor_left();
                false
            }
            KeyCode::Right => {
                self.input.cursor_right();
                false
            }
            KeyCode::Home => {
                self.input.cursor_home();
                false
            }
            KeyCode::End => {
                self.input.cursor_end();
                false
            }
            _ => false,
        };
        if edited {
            self.search.edit_term(self.input.text.clone(), now);
        }
        None
    }

    fn handle_normal_key(&mut self, key: KeyEvent, now: Instant) -> Option<SearchRequest> {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Char('/') | KeyCode::Char('i') => {
                self.input_mode = InputMode::Editing;
                self.input.cursor_end();
                return None;
            }
            KeyCode::Char('t') => {
                self.theme.toggle();
                return None;
            }
            KeyCode::Char('s') => {
                self.search.cycle_sort();
                return self.search_now(now);
            }
            KeyCode::Char('c') => {
                if self.search.clear_filters() {
                    self.filters.set_len(self.filter_rows().len());
                    return self.search_now(now);
                }
                return None;
            }
            KeyCode::Char('r') => return self.search_now(now),
            KeyCode::Tab | KeyCode::Char('f') => {
                self.focus = match self.focus {
                    Focus::Results => Focus::Filters,
                    Focus::Filters => Focus::Results,
                };
                self.filters.set_len(self.filter_rows().len());
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Results => self.handle_results_key(key, now),
            Focus::Filters => self.handle_filters_key(key, now),
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent, now: Instant) -> Option<SearchRequest> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.results.up();
                self.badge_cursor = None;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.results.down();
                self.badge_cursor = None;
            }
            KeyCode::PageUp => {
                self.results.page_up(5);
                self.badge_cursor = None;
            }
            KeyCode::PageDown => {
                self.results.page_down(5);
                self.badge_cursor = None;
            }
            KeyCode::Home | KeyCode::Char('g') => self.results.first(),
            KeyCode::End | KeyCode::Char('G') => self.results.last(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.badge_cursor = match self.badge_cursor {
                    None | Some(0) => None,
                    Some(i) => Some(i - 1),
                };
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let count = self.selected_card().map(|c| c.all_badges().count()).unwrap_or(0);
                self.badge_cursor = match self.badge_cursor {
                    _ if count == 0 => None,
                    None => Some(0),
                    Some(i) => Some((i + 1).min(count - 1)),
                };
            }
            KeyCode::Enter => {
                if let Some(badge) = self.badge_cursor {
                    return self.apply_badge(self.results.selected, badge, now);
                }
                self.open_selected();
            }
            KeyCode::Char('p') => self.open_selected(),
            KeyCode::Char('m') | KeyCode::Char('n') => return self.load_more(),
            KeyCode::Esc => self.badge_cursor = None,
            _ => {}
        }
        None
    }

    fn handle_filters_key(&mut self, key: KeyEvent, now: Instant) -> Option<SearchRequest> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.filters.up(),
            KeyCode::Down | KeyCode::Char('j') => self.filters.down(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return self.apply_filter_row(self.filters.selected, now);
            }
            KeyCode::Esc => self.focus = Focus::Results,
            _ => {}
        }
        None
    }

    // -------------------------------------------------------------------------
    // Mouse Event Handling
    // -------------------------------------------------------------------------

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Option<SearchRequest> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row, now),
            MouseEventKind::ScrollDown if !self.overlay.is_open() => {
                self.results.down();
                None
            }
            MouseEventKind::ScrollUp if !self.overlay.is_open() => {
                self.results.up();
                None
            }
            _ => None,
        }
    }

    fn click(&mut self, column: u16, row: u16, now: Instant) -> Option<SearchRequest> {
        if self.overlay.is_open() {
            let trigger = self.overlay.click(self.screen, column, row);
            debug!(?trigger, column, row, "overlay click");
            return None;
        }

        match self.hits.at(column, row)? {
            Hit::SearchBox => {
                self.input_mode = InputMode::Editing;
                self.input.cursor_end();
                None
            }
            Hit::ThemeToggle => {
                self.theme.toggle();
                None
            }
            Hit::Card(index) => {
                self.focus = Focus::Results;
                self.results.select(index);
                self.badge_cursor = None;
                self.open_selected();
                None
            }
            Hit::Badge { card, badge } => {
                self.focus = Focus::Results;
                self.results.select(card);
                self.badge_cursor = Some(badge);
                self.apply_badge(card, badge, now)
            }
            Hit::LoadMore => self.load_more(),
            Hit::FilterRow(index) => {
                self.focus = Focus::Filters;
                self.filters.select(index);
                self.apply_filter_row(index, now)
            }
        }
    }
}
