//! API clients for external services
//!
//! - Catalog: the lecture catalog's search endpoint

pub mod catalog;

pub use catalog::{CatalogClient, CatalogError};
