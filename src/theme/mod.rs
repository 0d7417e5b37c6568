//! Light/dark mode
//!
//! - `controller`: resolve, toggle, follow the OS
//! - `store`: persisted explicit choice
//! - `system`: OS color-scheme detection and change watcher

pub mod controller;
pub mod store;
pub mod system;

pub use controller::ThemeController;
pub use store::{MemoryStore, PreferenceStore, StateFile, StoreError};
