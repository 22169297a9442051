// src/lib.rs
//! notion-importer library: imports Notion pages as Markdown, HTML and raw
//! block trees, with a disk cache and an HTTP surface.
//!
//! # Public API
//!
//! - **Error handling**: `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `ImporterConfig`
//! - **Domain model**: `Block`, `BlockKind`, `DocumentRecord`, `OutputFormat`, `PageMetadata`
//! - **Domain types**: `DocumentId`, `BlockId`, `ApiKey`, `RichTextItem`, `Color`
//! - **API client**: `NotionRepository`, `NotionHttpClient`, `BlockTreeFetcher`
//! - **Formatting**: `DocumentConverter`, `MarkdownVisitor`, `HtmlVisitor`, `extract_properties`
//! - **Import**: `DocumentImporter`, `ImportOptions`, `DocumentCache`
//! - **HTTP**: `server::router`, `server::serve`

pub mod api;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod importer;
pub mod model;
pub mod server;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ImporterConfig};

// --- Domain Model ---
pub use crate::model::{Block, BlockKind, DocumentRecord, OutputFormat, PageMetadata};

// --- Domain Types ---
pub use crate::types::{ApiKey, BlockId, Color, DocumentId, RichTextItem};

// --- API Client ---
pub use crate::api::{BlockTreeFetcher, FetchSettings, NotionHttpClient, NotionRepository};

// --- Formatting ---
pub use crate::formatting::{
    document_title, extract_properties, DocumentConverter, HtmlVisitor, MarkdownVisitor,
};

// --- Import ---
pub use crate::cache::DocumentCache;
pub use crate::importer::{DocumentImporter, ImportOptions};
