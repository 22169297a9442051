// src/api/mod.rs
//! Notion API interaction: the ability to read a page and its block tree.
//!
//! Business logic depends on [`NotionRepository`], never on HTTP details.
//! [`NotionHttpClient`] is the production implementation; tests substitute
//! an in-memory one.

pub mod client;
pub mod pagination;
pub mod parser;
mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use crate::error::AppError;
use crate::model::{Block, PageMetadata};
use crate::types::DocumentId;

pub use client::NotionHttpClient;
pub use tree::BlockTreeFetcher;
pub use types::{FetchSettings, PaginatedResponse};

/// One page of a block's children.
pub type ChildrenPage = PaginatedResponse<Block>;

/// The ability to retrieve content from a Notion workspace.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Page-level metadata and raw properties.
    async fn retrieve_page(&self, id: &DocumentId) -> Result<PageMetadata, AppError>;

    /// One page of direct children of a block (or page), starting at `cursor`.
    async fn retrieve_children_page(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, AppError>;
}
