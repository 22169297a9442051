// src/api/pagination.rs
//! Cursor pagination over any Notion list endpoint.

use super::types::{PaginatedResponse, PaginationResult};
use crate::error::AppError;

/// Fetches every page of a listing, following `next_cursor` until Notion
/// reports no more results.
///
/// `fetch_fn` receives the cursor for the next page (`None` for the first).
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_fn: F) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0usize;

    loop {
        let response = fetch_fn(cursor.take()).await?;
        pages_fetched += 1;
        all_items.extend(response.results);

        match response.next_cursor {
            Some(next) if response.has_more => cursor = Some(next),
            _ => break,
        }
    }

    Ok(PaginationResult {
        items: all_items,
        pages_fetched,
    })
}
