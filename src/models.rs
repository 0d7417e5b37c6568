//! Data structures and types for LectureTUI
//!
//! Contains the shared models used across the application organized by domain:
//! - **Search**: query state, sort keys, the catalog's response page
//! - **Filters**: topic/tag/rank option lists used to resolve displayed labels
//! - **Theme**: the persisted light/dark preference
//! - **Video**: parsing of video references (ids and YouTube URLs)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

// =============================================================================
// Search Models
// =============================================================================

/// Sort order accepted by the catalog's search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest publish date first
    #[default]
    Date,
    /// Ascending rank
    Rank,
}

impl SortKey {
    /// Wire value for the `sort` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Rank => "rank",
        }
    }

    /// Next sort key in display order (used by the sort toggle)
    pub fn next(&self) -> Self {
        match self {
            SortKey::Date => SortKey::Rank,
            SortKey::Rank => SortKey::Date,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Date => write!(f, "Newest"),
            SortKey::Rank => write!(f, "Rank"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "rank" => Ok(SortKey::Rank),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Everything the search endpoint needs to produce one page of results.
///
/// Topics and tags are kept in ordered sets so a selection is never
/// duplicated and the serialized query string is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text term matched against lecture titles
    pub term: String,
    /// Selected topic ids
    pub topics: BTreeSet<String>,
    /// Selected tag ids
    pub tags: BTreeSet<String>,
    /// Selected rank id
    pub rank: Option<String>,
    /// Sort order
    pub sort: SortKey,
    /// 1-based page number
    pub page: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            term: String::new(),
            topics: BTreeSet::new(),
            tags: BTreeSet::new(),
            rank: None,
            sort: SortKey::default(),
            page: 1,
        }
    }
}

impl SearchQuery {
    /// Whether any filter beyond the free-text term is active
    pub fn has_filters(&self) -> bool {
        !self.topics.is_empty() || !self.tags.is_empty() || self.rank.is_some()
    }

    /// Key/value pairs in wire order. Array parameters repeat once per value.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("q", self.term.clone()),
            ("page", self.page.max(1).to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        pairs.extend(self.topics.iter().map(|t| ("topics[]", t.clone())));
        pairs.extend(self.tags.iter().map(|t| ("tags[]", t.clone())));
        if let Some(ref rank) = self.rank {
            pairs.push(("rank", rank.clone()));
        }
        pairs
    }

    /// Percent-encoded query string, e.g. `q=&page=1&sort=date&topics%5B%5D=3`
    pub fn to_query_string(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A lecture summary as returned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    pub youtube_id: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rank: Option<String>,
}

impl Lecture {
    /// Watch URL for the lecture's video
    pub fn watch_url(&self) -> String {
        watch_url(&self.youtube_id)
    }
}

impl fmt::Display for Lecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank_str = self
            .rank
            .as_ref()
            .map(|r| format!(" [{}]", r))
            .unwrap_or_default();
        write!(f, "{}{} ({})", self.title, rank_str, self.youtube_id)
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub lectures: Vec<Lecture>,
    pub has_next: bool,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }
}

// =============================================================================
// Filter Models
// =============================================================================

/// A selectable filter value: the id sent to the server and its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
}

impl FilterOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Kind of filter a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Topic,
    Tag,
    Rank,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Topic => write!(f, "topic"),
            FilterKind::Tag => write!(f, "tag"),
            FilterKind::Rank => write!(f, "rank"),
        }
    }
}

/// Option lists for the filter widgets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCatalog {
    #[serde(default)]
    pub topics: Vec<FilterOption>,
    #[serde(default)]
    pub tags: Vec<FilterOption>,
    #[serde(default)]
    pub ranks: Vec<FilterOption>,
}

impl FilterCatalog {
    /// Options of one kind
    pub fn options(&self, kind: FilterKind) -> &[FilterOption] {
        match kind {
            FilterKind::Topic => &self.topics,
            FilterKind::Tag => &self.tags,
            FilterKind::Rank => &self.ranks,
        }
    }

    /// Find the option whose display name matches `label` (case-insensitive)
    pub fn by_label(&self, kind: FilterKind, label: &str) -> Option<&FilterOption> {
        let label = label.trim();
        self.options(kind)
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(label))
    }

    /// Display name for an id, falling back to the id itself
    pub fn name_of<'a>(&'a self, kind: FilterKind, id: &'a str) -> &'a str {
        self.options(kind)
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.name.as_str())
            .unwrap_or(id)
    }

    /// Resolve a user-supplied value to an id: a label match wins, then an id
    /// match; anything else is passed through unchanged.
    pub fn resolve(&self, kind: FilterKind, value: &str) -> String {
        if let Some(option) = self.by_label(kind, value) {
            return option.id.clone();
        }
        value.trim().to_string()
    }
}

// =============================================================================
// Theme Models
// =============================================================================

/// Display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_prefers_dark(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    /// The mode a toggle would switch to
    pub fn opposite(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

// =============================================================================
// Video References
// =============================================================================

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:https?://)?(?:www\.|m\.)?(?:youtu\.be/|youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/))([A-Za-z0-9_-]{6,})",
        )
        .expect("video id pattern is valid")
    })
}

/// Extract a video id from a bare id, a `youtu.be/<id>` short link, or a
/// `youtube.com/watch?v=<id>` URL.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(caps) = video_id_regex().captures(input) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    let is_bare_id = input.len() >= 6
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if is_bare_id {
        Some(input.to_string())
    } else {
        None
    }
}

/// Canonical watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
