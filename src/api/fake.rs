//! In-memory [`NotionRepository`] for unit tests.

use super::{ChildrenPage, NotionRepository};
use crate::error::{AppError, NotionErrorCode};
use crate::model::*;
use crate::types::{DocumentId, RichTextItem};
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct InMemoryNotion {
    pages: HashMap<String, PageMetadata>,
    children: HashMap<String, Vec<Vec<Block>>>,
    failing: HashSet<String>,
    denied_pages: HashSet<String>,
    latency: Duration,
    page_calls: AtomicUsize,
    children_log: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemoryNotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: PageMetadata) -> Self {
        self.pages.insert(page.id.as_str().to_string(), page);
        self
    }

    /// Children served as a single page.
    pub fn with_children(self, block_id: &str, children: Vec<Block>) -> Self {
        self.with_children_pages(block_id, vec![children])
    }

    /// Children served across several cursor pages.
    pub fn with_children_pages(mut self, block_id: &str, pages: Vec<Vec<Block>>) -> Self {
        self.children.insert(block_id.to_string(), pages);
        self
    }

    pub fn failing_children(mut self, block_id: &str) -> Self {
        self.failing.insert(block_id.to_string());
        self
    }

    pub fn denying_page(mut self, id: &DocumentId) -> Self {
        self.denied_pages.insert(id.as_str().to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn children_calls(&self) -> usize {
        self.children_log.lock().unwrap().len()
    }

    pub fn children_requests(&self) -> Vec<String> {
        self.children_log.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.page_calls() + self.children_calls()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NotionRepository for InMemoryNotion {
    async fn retrieve_page(&self, id: &DocumentId) -> Result<PageMetadata, AppError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.denied_pages.contains(id.as_str()) {
            return Err(AppError::NotionService {
                code: NotionErrorCode::RestrictedResource,
                message: "Integration has no access to this page".to_string(),
                status: StatusCode::FORBIDDEN,
            });
        }
        self.pages
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| AppError::NotionService {
                code: NotionErrorCode::ObjectNotFound,
                message: format!("Could not find page with ID: {}", id.to_hyphenated()),
                status: StatusCode::NOT_FOUND,
            })
    }

    async fn retrieve_children_page(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, AppError> {
        self.children_log.lock().unwrap().push(block_id.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(block_id) {
            return Err(AppError::NotionService {
                code: NotionErrorCode::InternalError,
                message: "Injected failure".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }

        let pages = self.children.get(block_id).cloned().unwrap_or_default();
        let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let has_more = index + 1 < pages.len();
        Ok(ChildrenPage {
            object: "list".to_string(),
            results: pages.into_iter().nth(index).unwrap_or_default(),
            next_cursor: has_more.then(|| (index + 1).to_string()),
            has_more,
        })
    }
}

pub fn page(id: &DocumentId, title: &str) -> PageMetadata {
    let mut properties = IndexMap::new();
    properties.insert(
        "Name".to_string(),
        json!({ "id": "title", "type": "title", "title": [{ "plain_text": title }] }),
    );
    PageMetadata {
        id: id.clone(),
        url: format!("https://www.notion.so/{}", id.as_str()),
        created_time: "2024-01-02T03:04:05Z".parse().unwrap(),
        last_edited_time: "2024-02-03T04:05:06Z".parse().unwrap(),
        icon: Some(Icon::Emoji {
            emoji: "📘".to_string(),
        }),
        cover: None,
        properties,
    }
}

pub fn untitled_page(id: &DocumentId, properties: IndexMap<String, Value>) -> PageMetadata {
    PageMetadata {
        properties,
        icon: None,
        ..page(id, "")
    }
}

pub fn paragraph(id: &str, text: &str) -> Block {
    Block::new(id, BlockKind::Paragraph(TextBlockContent::plain(text)), false)
}

pub fn toggle(id: &str, text: &str, has_children: bool) -> Block {
    Block::new(id, BlockKind::Toggle(TextBlockContent::plain(text)), has_children)
}

pub fn text(text: &str) -> Vec<RichTextItem> {
    vec![RichTextItem::plain_text(text)]
}

/// `root` holds `n1`, which holds `n2`, down to `n{depth}`.
pub fn chain_of_toggles(root: &str, depth: usize) -> InMemoryNotion {
    let mut notion = InMemoryNotion::new().with_children(root, vec![toggle("n1", "level 1", true)]);
    for level in 1..depth {
        let child = toggle(
            &format!("n{}", level + 1),
            &format!("level {}", level + 1),
            level + 1 < depth,
        );
        notion = notion.with_children(&format!("n{}", level), vec![child]);
    }
    notion
}
