//! Integration tests for LectureTUI
//!
//! Tests are organized by component:
//! - catalog_test: catalog client request encoding and error handling
//! - search_flow_test: search controller against a mocked catalog
//! - theme_test: theme resolution and the state file
//! - ui_test: rendering and mouse routing through `TestBackend`
//! - cli_test: command handlers and exit codes

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
