//! LectureTUI - terminal client for a lecture catalog
//!
//! Search lectures by free text, topic, tag and rank, page through the
//! results, and watch them in a local video player.
//!
//! # Modules
//!
//! - `models` - Query, lecture and filter data structures
//! - `api` - Catalog search client
//! - `search` - Search controller, debouncing, result cards
//! - `theme` - Light/dark mode resolution and persistence
//! - `overlay` - Video overlay lifecycle
//! - `stream` - Local player backend
//! - `ui` - TUI components
//! - `app` - Application state and input routing
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod overlay;
pub mod search;
pub mod stream;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use models::{
    FilterCatalog, FilterKind, FilterOption, Lecture, SearchPage, SearchQuery, SortKey, ThemeMode,
};

pub use api::{CatalogClient, CatalogError};
pub use app::App;
pub use overlay::{CloseTrigger, VideoOverlay};
pub use search::{SearchController, SearchOutcome};
pub use theme::ThemeController;
