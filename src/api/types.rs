// src/api/types.rs
//! Wire-level response shapes and fetch tuning shared by the API layer.

use crate::constants::{CHILD_FETCH_BATCH_DELAY, CHILD_FETCH_BATCH_SIZE};
use serde::Deserialize;
use std::time::Duration;

/// Generic paginated response from Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub object: String,
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Error response from Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionApiErrorResponse {
    pub code: String,
    pub message: String,
}

/// Result of a pagination operation.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: usize,
}

/// How hard the tree fetcher leans on the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// Sibling subtrees fetched concurrently.
    pub batch_size: usize,
    /// Pause between batches. Zero disables the pause.
    pub batch_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            batch_size: CHILD_FETCH_BATCH_SIZE,
            batch_delay: CHILD_FETCH_BATCH_DELAY,
        }
    }
}
