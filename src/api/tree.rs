// src/api/tree.rs
//! Bounded-depth recursive retrieval of a page's block tree.
//!
//! Siblings are fetched in small concurrent batches with a pause between
//! batches. Failures below the root degrade to an empty child list; only a
//! failure to list the root's own children reaches the caller.

use super::pagination::fetch_all_pages;
use super::types::FetchSettings;
use super::NotionRepository;
use crate::constants::MAX_FETCH_DEPTH;
use crate::error::AppError;
use crate::model::Block;
use futures::future::{join_all, BoxFuture};
use std::collections::HashMap;
use std::sync::Arc;

/// Fetches block children from a [`NotionRepository`].
#[derive(Clone)]
pub struct BlockTreeFetcher {
    client: Arc<dyn NotionRepository>,
    settings: FetchSettings,
}

impl BlockTreeFetcher {
    pub fn new(client: Arc<dyn NotionRepository>, settings: FetchSettings) -> Self {
        Self { client, settings }
    }

    /// Lists every direct child of a block, following pagination cursors.
    ///
    /// The returned blocks have unresolved children.
    pub async fn fetch_children(&self, block_id: &str) -> Result<Vec<Block>, AppError> {
        log::debug!("Fetching children of {}", block_id);
        let result = fetch_all_pages(|cursor| {
            let client = Arc::clone(&self.client);
            async move {
                client
                    .retrieve_children_page(block_id, cursor.as_deref())
                    .await
            }
        })
        .await?;

        log::debug!(
            "Fetched {} children of {} in {} page(s)",
            result.items.len(),
            block_id,
            result.pages_fetched
        );
        Ok(result.items)
    }

    /// Fetches the tree below `block_id`.
    ///
    /// The root's children are level 1. Every block up to
    /// [`MAX_FETCH_DEPTH`] that reports children comes back with its
    /// children resolved; blocks at the deepest level, and blocks whose
    /// listing failed, come back with an empty list.
    pub async fn fetch_tree(&self, block_id: &str) -> Result<Vec<Block>, AppError> {
        let children = self.fetch_children(block_id).await?;
        Ok(self.resolve_descendants(children, 1).await)
    }

    async fn resolve_descendants(&self, blocks: Vec<Block>, level: u8) -> Vec<Block> {
        let pending: Vec<(usize, String)> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.needs_children())
            .map(|(index, block)| (index, block.id.as_str().to_string()))
            .collect();

        if pending.is_empty() {
            return blocks;
        }

        if level >= MAX_FETCH_DEPTH {
            log::debug!(
                "Depth limit {} reached; {} block(s) left without children",
                MAX_FETCH_DEPTH,
                pending.len()
            );
            return blocks
                .into_iter()
                .map(|block| {
                    if block.needs_children() {
                        block.with_children(Vec::new())
                    } else {
                        block
                    }
                })
                .collect();
        }

        let batch_size = self.settings.batch_size.max(1);
        let mut subtrees: HashMap<usize, Vec<Block>> = HashMap::with_capacity(pending.len());
        for (batch_index, batch) in pending.chunks(batch_size).enumerate() {
            if batch_index > 0 && !self.settings.batch_delay.is_zero() {
                tokio::time::sleep(self.settings.batch_delay).await;
            }
            let results = join_all(
                batch
                    .iter()
                    .map(|(_, id)| self.fetch_subtree(id.clone(), level + 1)),
            )
            .await;
            for ((index, _), children) in batch.iter().zip(results) {
                subtrees.insert(*index, children);
            }
        }

        blocks
            .into_iter()
            .enumerate()
            .map(|(index, block)| match subtrees.remove(&index) {
                Some(children) => block.with_children(children),
                None => block,
            })
            .collect()
    }

    /// Lists the children of `block_id` (which sit at `level`) and resolves
    /// their descendants. Errors become an empty list.
    fn fetch_subtree(&self, block_id: String, level: u8) -> BoxFuture<'_, Vec<Block>> {
        Box::pin(async move {
            match self.fetch_children(&block_id).await {
                Ok(children) => self.resolve_descendants(children, level).await,
                Err(e) => {
                    log::warn!("Failed to fetch children of block {}: {}", block_id, e);
                    Vec::new()
                }
            }
        })
    }
}
