// src/importer.rs
//! Cache-aware import of a single Notion page.
//!
//! An import resolves the page id, answers from the cache when it can, and
//! otherwise fetches metadata and blocks, renders the outputs, stores the
//! result and hands back the requested subset.

use crate::api::{BlockTreeFetcher, FetchSettings, NotionRepository};
use crate::cache::DocumentCache;
use crate::error::AppError;
use crate::formatting::{document_title, extract_properties, DocumentConverter};
use crate::model::{Block, DocumentRecord, OutputFormat, PageMetadata};
use crate::types::DocumentId;
use std::sync::Arc;
use std::time::Instant;

/// What one import call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub format: OutputFormat,
    /// Read from and write to the document cache.
    pub use_cache: bool,
    /// Fetch the whole block tree up front instead of only top-level blocks.
    pub include_children: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::All,
            use_cache: true,
            include_children: true,
        }
    }
}

/// Imports pages through a [`NotionRepository`] and a [`DocumentCache`].
///
/// Cheap to share behind an `Arc`; concurrent imports of the same page are
/// not coordinated and the last cache write wins.
pub struct DocumentImporter {
    client: Arc<dyn NotionRepository>,
    fetcher: BlockTreeFetcher,
    cache: Arc<DocumentCache>,
}

impl DocumentImporter {
    pub fn new(
        client: Arc<dyn NotionRepository>,
        cache: Arc<DocumentCache>,
        settings: FetchSettings,
    ) -> Self {
        let fetcher = BlockTreeFetcher::new(Arc::clone(&client), settings);
        Self {
            client,
            fetcher,
            cache,
        }
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Imports the page named by `reference`, a Notion URL or raw page id.
    ///
    /// With caching on, a cache hit is returned without touching Notion and
    /// a miss stores the record with every output before projecting it.
    /// With caching off, only the requested outputs are rendered and
    /// nothing is stored.
    pub async fn import(
        &self,
        reference: &str,
        options: ImportOptions,
    ) -> Result<DocumentRecord, AppError> {
        let id = DocumentId::extract(reference)
            .map_err(|e| AppError::InvalidReference(e.to_string()))?;
        log::info!(
            "Importing {} (format: {}, cache: {}, children: {})",
            id,
            options.format,
            options.use_cache,
            options.include_children
        );

        if options.use_cache {
            if let Some(record) = self.cache.get(&id).await {
                log::info!("Served {} from cache", id);
                return Ok(record.project(options.format));
            }
        }

        let started = Instant::now();
        let page = self
            .client
            .retrieve_page(&id)
            .await
            .map_err(|e| AppError::upstream("fetching page metadata", e))?;

        let root = id.to_hyphenated();
        let blocks = if options.include_children {
            self.fetcher.fetch_tree(&root).await
        } else {
            self.fetcher.fetch_children(&root).await
        }
        .map_err(|e| AppError::upstream("fetching page content", e))?;
        log::info!("Fetched {} top-level blocks for {}", blocks.len(), id);

        let build = if options.use_cache {
            OutputFormat::All
        } else {
            options.format
        };
        let record = self.assemble(page, blocks, reference, build).await;

        if options.use_cache {
            match self.cache.put(&id, &record).await {
                Ok(()) => log::info!("Cached {}", id),
                Err(e) => log::warn!("Failed to cache {}: {}", id, e),
            }
        }

        log::info!(
            "Imported '{}' ({}) in {:.2?}",
            record.title,
            id,
            started.elapsed()
        );
        Ok(record.project(options.format))
    }

    /// The cached record for a page, without contacting Notion.
    pub async fn cached(&self, reference: &str) -> Result<Option<DocumentRecord>, AppError> {
        let id = DocumentId::extract(reference)
            .map_err(|e| AppError::InvalidReference(e.to_string()))?;
        Ok(self.cache.get(&id).await)
    }

    async fn assemble(
        &self,
        page: PageMetadata,
        blocks: Vec<Block>,
        reference: &str,
        format: OutputFormat,
    ) -> DocumentRecord {
        let converter = DocumentConverter::new(&self.fetcher);
        let markdown = if format.includes_markdown() {
            Some(converter.to_markdown(&blocks).await)
        } else {
            None
        };
        let html = if format.includes_html() {
            Some(converter.to_html(&blocks).await)
        } else {
            None
        };

        let source_url = if page.url.is_empty() {
            reference.to_string()
        } else {
            page.url
        };

        DocumentRecord {
            title: document_title(&page.properties),
            properties: extract_properties(&page.properties),
            id: page.id,
            source_url,
            created_at: page.created_time,
            last_updated_at: page.last_edited_time,
            icon: page.icon.as_ref().map(|icon| icon.display_value().to_string()),
            cover: page.cover,
            blocks: format.includes_blocks().then_some(blocks),
            markdown,
            html,
        }
    }
}
