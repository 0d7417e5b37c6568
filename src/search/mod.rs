//! Lecture search
//!
//! - `controller`: query state, request cycle, loading guard
//! - `debounce`: quiet-period timer for free-text input
//! - `card`: pure lecture -> card mapping

pub mod card;
pub mod controller;
pub mod debounce;

pub use card::{render_card, Badge, BadgeKind, LectureCard, ResultView};
pub use controller::{SearchController, SearchOutcome, SearchRequest};
pub use debounce::Debouncer;
