//! Lecture catalog client
//!
//! Wraps `GET /api/search`, the catalog's only read endpoint.
//! Array filters are sent as repeated `topics[]` / `tags[]` parameters.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{SearchPage, SearchQuery};

/// Default catalog location (the Flask development server)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Catalog API error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Search endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Search task ended before returning a result")]
    Interrupted,
}

impl CatalogError {
    /// Whether the failure happened before the server answered
    pub fn is_network(&self) -> bool {
        matches!(self, CatalogError::RequestFailed(_) | CatalogError::Interrupted)
    }
}

/// Lecture catalog client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a client for the catalog at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for a query
    pub fn search_url(&self, query: &SearchQuery) -> String {
        format!("{}/api/search?{}", self.base_url, query.to_query_string())
    }

    /// Fetch one page of lectures
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage, CatalogError> {
        let url = self.search_url(query);
        debug!(%url, "catalog: search");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                let page: SearchPage = serde_json::from_str(&body).map_err(|e| {
                    CatalogError::InvalidResponse(format!("JSON parse error: {}", e))
                })?;
                debug!(
                    count = page.lectures.len(),
                    has_next = page.has_next,
                    "catalog: search ok"
                );
                Ok(page)
            }
            StatusCode::NOT_FOUND => {
                warn!(%url, "catalog: search endpoint not found");
                Err(CatalogError::Status(404))
            }
            status => {
                warn!(status = status.as_u16(), "catalog: search failed");
                Err(CatalogError::Status(status.as_u16()))
            }
        }
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
