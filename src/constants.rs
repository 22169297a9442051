// src/constants.rs
//! Domain constants that define the operational boundaries of the importer.
//!
//! Reading these constants should tell you how the importer talks to
//! Notion: how much it fetches per request, how deep it descends, and how
//! hard it leans on the API while doing so.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Base URL of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1/";

/// API version header sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. Using the maximum keeps the number of
/// round-trips per child list low.
pub const NOTION_API_PAGE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Tree fetching
// ---------------------------------------------------------------------------

/// Deepest block level that is ever populated.
///
/// The page's direct children are level 1. Blocks at this level are
/// returned with an empty child list even when Notion reports children.
pub const MAX_FETCH_DEPTH: u8 = 5;

/// Sibling subtrees fetched concurrently before pausing.
pub const CHILD_FETCH_BATCH_SIZE: usize = 5;

/// Pause between consecutive batches of sibling fetches.
pub const CHILD_FETCH_BATCH_DELAY: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Document assembly
// ---------------------------------------------------------------------------

/// Title used when a page has no non-empty title property.
pub const UNTITLED_DOCUMENT_TITLE: &str = "Untitled";

/// Alt text for images without a caption.
pub const DEFAULT_IMAGE_CAPTION: &str = "Image";

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Address the HTTP service binds when nothing else is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Directory name used under the user cache root.
pub const CACHE_DIR_NAME: &str = "notion-importer";

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
