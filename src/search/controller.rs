//! Search controller
//!
//! Owns the query, the rendered result view and the loading flag. A search is
//! split into `begin_search` (guard + snapshot) and `finish_search` (apply +
//! release) so the TUI can run the request on a spawned task; the CLI uses
//! [`SearchController::perform_search`] which does both around one await.

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{CatalogClient, CatalogError};
use crate::models::{FilterCatalog, FilterKind, Lecture, SearchPage, SearchQuery, SortKey};
use crate::search::card::{
    render_card, Badge, BadgeKind, ResultView, ERROR_MESSAGE, NO_RESULTS_MESSAGE,
};
use crate::search::debounce::Debouncer;

/// Snapshot of one allowed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: u64,
    pub query: SearchQuery,
    /// Append to the rendered results instead of replacing them
    pub append: bool,
}

/// Result of one search trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Another search was in flight; nothing happened
    Rejected,
    /// Cards were rendered (or appended)
    Rendered { added: usize, has_next: bool },
    /// A fresh search matched nothing
    Empty,
    /// The request failed
    Errored(String),
}

#[derive(Debug, Default)]
pub struct SearchController {
    query: SearchQuery,
    filters: FilterCatalog,
    lectures: Vec<Lecture>,
    view: ResultView,
    has_next: bool,
    /// Query of the last response that rendered cards
    shown: Option<SearchQuery>,
    in_flight: Option<u64>,
    next_request_id: u64,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(filters: FilterCatalog, debouncer: Debouncer) -> Self {
        Self {
            filters,
            debouncer,
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn filters(&self) -> &FilterCatalog {
        &self.filters
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    /// Lectures behind the rendered cards, in display order
    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// "Load more" is shown only after a successful, non-empty response that
    /// reported another page, and never while a request is in flight or once
    /// the term, filters or sort moved away from what the cards show.
    pub fn load_more_visible(&self) -> bool {
        self.has_next
            && !self.is_loading()
            && matches!(self.view, ResultView::Cards(_))
            && self.shown.as_ref() == Some(&self.query)
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    // -------------------------------------------------------------------------
    // Request cycle
    // -------------------------------------------------------------------------

    /// Start a search. Returns `None` without touching any state if a search
    /// is already in flight.
    pub fn begin_search(&mut self, reset_page: bool) -> Option<SearchRequest> {
        if let Some(id) = self.in_flight {
            debug!(in_flight = id, "search: rejected, request already in flight");
            return None;
        }

        if reset_page {
            self.query.page = 1;
            self.lectures.clear();
            self.view = ResultView::Loading;
            // The fresh search already carries the current term
            self.debouncer.cancel();
        }
        self.has_next = false;

        self.next_request_id += 1;
        let id = self.next_request_id;
        self.in_flight = Some(id);

        debug!(id, page = self.query.page, append = !reset_page, "search: begin");
        Some(SearchRequest {
            id,
            query: self.query.clone(),
            append: !reset_page,
        })
    }

    /// Apply the result of `request` and release the loading flag
    pub fn finish_search(
        &mut self,
        request: &SearchRequest,
        result: Result<SearchPage, CatalogError>,
    ) -> SearchOutcome {
        if self.in_flight != Some(request.id) {
            warn!(id = request.id, "search: dropping result of a superseded request");
            return SearchOutcome::Rejected;
        }
        self.in_flight = None;

        match result {
            Ok(page) if page.lectures.is_empty() => {
                self.has_next = false;
                if request.append {
                    debug!("search: load more returned nothing");
                    SearchOutcome::Rendered {
                        added: 0,
                        has_next: false,
                    }
                } else {
                    info!(term = %request.query.term, "search: no results");
                    self.shown = None;
                    self.lectures.clear();
                    self.view = ResultView::Empty(NO_RESULTS_MESSAGE.to_string());
                    SearchOutcome::Empty
                }
            }
            Ok(page) => {
                let added = page.lectures.len();
                let new_cards = page.lectures.iter().map(render_card);

                let mut cards = match std::mem::take(&mut self.view) {
                    ResultView::Cards(existing) if request.append => existing,
                    _ => {
                        self.lectures.clear();
                        Vec::with_capacity(added)
                    }
                };
                cards.extend(new_cards);
                self.lectures.extend(page.lectures);
                self.view = ResultView::Cards(cards);
                self.has_next = page.has_next;
                self.shown = Some(request.query.clone());

                info!(
                    added,
                    total = self.lectures.len(),
                    has_next = page.has_next,
                    "search: rendered"
                );
                SearchOutcome::Rendered {
                    added,
                    has_next: page.has_next,
                }
            }
            Err(e) => {
                warn!(error = %e, "search: request failed");
                self.shown = None;
                self.lectures.clear();
                self.has_next = false;
                self.view = ResultView::Error(ERROR_MESSAGE.to_string());
                SearchOutcome::Errored(e.to_string())
            }
        }
    }

    /// The task running `request` went away without a result
    pub fn request_channel_closed(&mut self, request: &SearchRequest) -> SearchOutcome {
        self.finish_search(request, Err(CatalogError::Interrupted))
    }

    /// Begin, await and finish one search
    pub async fn perform_search(
        &mut self,
        client: &CatalogClient,
        reset_page: bool,
    ) -> SearchOutcome {
        let Some(request) = self.begin_search(reset_page) else {
            return SearchOutcome::Rejected;
        };
        let result = client.search(&request.query).await;
        self.finish_search(&request, result)
    }

    /// Request the next page. Rejected while loading or when there is no
    /// next page; the page counter only moves when the request starts.
    pub fn load_more(&mut self) -> Option<SearchRequest> {
        if !self.load_more_visible() {
            return None;
        }
        self.query.page += 1;
        let request = self.begin_search(false);
        if request.is_none() {
            self.query.page -= 1;
        }
        request
    }

    /// Await the next page
    pub async fn perform_load_more(&mut self, client: &CatalogClient) -> SearchOutcome {
        let Some(request) = self.load_more() else {
            return SearchOutcome::Rejected;
        };
        let result = client.search(&request.query).await;
        self.finish_search(&request, result)
    }

    // -------------------------------------------------------------------------
    // Free-text input (debounced)
    // -------------------------------------------------------------------------

    /// Record a term edit. The search fires from [`Self::poll_debounce`] once
    /// input has been quiet for the debounce period.
    pub fn edit_term(&mut self, term: impl Into<String>, now: Instant) {
        let term = term.into();
        if term != self.query.term {
            self.query.term = term;
            self.query.page = 1;
        }
        self.debouncer.touch(now);
    }

    /// Start the debounced search if its quiet period has elapsed. A deadline
    /// that comes due while another search is in flight stays armed until
    /// that search finishes.
    pub fn poll_debounce(&mut self, now: Instant) -> Option<SearchRequest> {
        if self.is_loading() || !self.debouncer.fire_if_due(now) {
            return None;
        }
        self.begin_search(true)
    }

    // -------------------------------------------------------------------------
    // Filters (immediate)
    // -------------------------------------------------------------------------

    /// Replace the term without debouncing (used for submit and startup)
    pub fn set_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.query.term {
            return false;
        }
        self.query.term = term;
        self.query.page = 1;
        true
    }

    /// Add or remove a topic id
    pub fn toggle_topic(&mut self, id: &str) -> bool {
        if !self.query.topics.remove(id) {
            self.query.topics.insert(id.to_string());
        }
        self.query.page = 1;
        true
    }

    /// Add or remove a tag id
    pub fn toggle_tag(&mut self, id: &str) -> bool {
        if !self.query.tags.remove(id) {
            self.query.tags.insert(id.to_string());
        }
        self.query.page = 1;
        true
    }

    pub fn set_rank(&mut self, rank: Option<String>) -> bool {
        if rank == self.query.rank {
            return false;
        }
        self.query.rank = rank;
        self.query.page = 1;
        true
    }

    pub fn set_sort(&mut self, sort: SortKey) -> bool {
        if sort == self.query.sort {
            return false;
        }
        self.query.sort = sort;
        self.query.page = 1;
        true
    }

    pub fn cycle_sort(&mut self) -> SortKey {
        let next = self.query.sort.next();
        self.set_sort(next);
        next
    }

    /// Drop every topic, tag and rank selection
    pub fn clear_filters(&mut self) -> bool {
        if !self.query.has_filters() {
            return false;
        }
        self.query.topics.clear();
        self.query.tags.clear();
        self.query.rank = None;
        self.query.page = 1;
        true
    }

    /// Select a filter from a user-supplied label or id (startup flags).
    /// Never deselects.
    pub fn preselect(&mut self, kind: FilterKind, value: &str) -> bool {
        let id = self.filters.resolve(kind, value);
        if id.is_empty() {
            return false;
        }
        let changed = match kind {
            FilterKind::Topic => self.query.topics.insert(id),
            FilterKind::Tag => self.query.tags.insert(id),
            FilterKind::Rank => {
                let changed = self.query.rank.as_deref() != Some(id.as_str());
                self.query.rank = Some(id);
                changed
            }
        };
        if changed {
            self.query.page = 1;
        }
        changed
    }

    /// Re-apply a clicked badge as an active filter. Returns false (and the
    /// caller should not search) when the label has no known id or is
    /// already selected.
    pub fn apply_badge(&mut self, badge: &Badge) -> bool {
        let kind = badge.kind.filter_kind();
        let Some(option) = self.filters.by_label(kind, &badge.label) else {
            debug!(label = %badge.label, %kind, "search: badge has no matching filter");
            return false;
        };
        let id = option.id.clone();

        let changed = match badge.kind {
            BadgeKind::Topic => self.query.topics.insert(id),
            BadgeKind::Tag => self.query.tags.insert(id),
            BadgeKind::Rank => {
                let changed = self.query.rank.as_deref() != Some(id.as_str());
                self.query.rank = Some(id);
                changed
            }
        };
        if changed {
            self.query.page = 1;
        }
        changed
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Forget results and filters. A request still in flight is abandoned:
    /// its result will be dropped on arrival.
    pub fn reset(&mut self) {
        self.query = SearchQuery::default();
        self.lectures.clear();
        self.view = ResultView::Idle;
        self.has_next = false;
        self.shown = None;
        self.in_flight = None;
    }

    /// Reset and cancel any pending debounced search
    pub fn dispose(&mut self) {
        self.reset();
        self.debouncer.cancel();
    }
}
