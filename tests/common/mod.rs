// tests/common/mod.rs
//! Shared fixtures: a Notion workspace held in memory as raw API JSON.
//!
//! Pages and blocks are stored the way Notion returns them and go through
//! the crate's own parsers, so these tests cover wire parsing as well.
#![allow(dead_code)]

use notion_importer::api::parser::{parse_block, parse_page};
use notion_importer::api::{ChildrenPage, FetchSettings, NotionRepository};
use notion_importer::error::{AppError, NotionErrorCode};
use notion_importer::model::PageMetadata;
use notion_importer::{DocumentCache, DocumentId, DocumentImporter};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const PAGE_ID: &str = "8a1f6a1e5c2b4d0f9e3a7b6c5d4e3f21";
pub const PAGE_URL: &str = "https://www.notion.so/acme/Launch-plan-8a1f6a1e5c2b4d0f9e3a7b6c5d4e3f21";

pub fn page_id() -> DocumentId {
    DocumentId::extract(PAGE_ID).unwrap()
}

#[derive(Default)]
pub struct FixtureNotion {
    pages: HashMap<String, Value>,
    children: HashMap<String, Vec<Value>>,
    denied: HashSet<String>,
    failing: HashSet<String>,
    page_size: Option<usize>,
    calls: AtomicUsize,
}

impl FixtureNotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: Value) -> Self {
        let id = DocumentId::extract(page["id"].as_str().unwrap()).unwrap();
        self.pages.insert(id.as_str().to_string(), page);
        self
    }

    pub fn children(mut self, block_id: &str, blocks: Vec<Value>) -> Self {
        self.children.insert(block_id.to_string(), blocks);
        self
    }

    pub fn deny(mut self, id: &DocumentId) -> Self {
        self.denied.insert(id.as_str().to_string());
        self
    }

    pub fn fail_children(mut self, block_id: &str) -> Self {
        self.failing.insert(block_id.to_string());
        self
    }

    /// Serve child listings in pages of `size` results.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NotionRepository for FixtureNotion {
    async fn retrieve_page(&self, id: &DocumentId) -> Result<PageMetadata, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.denied.contains(id.as_str()) {
            return Err(AppError::NotionService {
                code: NotionErrorCode::Unauthorized,
                message: "API token is invalid.".to_string(),
                status: StatusCode::UNAUTHORIZED,
            });
        }
        match self.pages.get(id.as_str()) {
            Some(page) => parse_page(page.clone()),
            None => Err(AppError::NotionService {
                code: NotionErrorCode::ObjectNotFound,
                message: format!("Could not find page with ID: {}", id.to_hyphenated()),
                status: StatusCode::NOT_FOUND,
            }),
        }
    }

    async fn retrieve_children_page(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(block_id) {
            return Err(AppError::NotionService {
                code: NotionErrorCode::ServiceUnavailable,
                message: "Notion is temporarily unavailable".to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }

        let all = self.children.get(block_id).cloned().unwrap_or_default();
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let size = self.page_size.unwrap_or(100);
        let end = (start + size).min(all.len());
        let has_more = end < all.len();

        Ok(ChildrenPage {
            object: "list".to_string(),
            results: all[start..end]
                .iter()
                .cloned()
                .map(|value| parse_block(value).unwrap())
                .collect(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }
}

pub async fn importer(notion: FixtureNotion) -> (Arc<FixtureNotion>, DocumentImporter, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(DocumentCache::open(dir.path()).await.unwrap());
    let notion = Arc::new(notion);
    let settings = FetchSettings {
        batch_size: 5,
        batch_delay: Duration::ZERO,
    };
    let importer = DocumentImporter::new(notion.clone(), cache, settings);
    (notion, importer, dir)
}

// --- Wire fixtures ---

pub fn text(content: &str) -> Value {
    json!({
        "type": "text",
        "text": { "content": content, "link": null },
        "annotations": {
            "bold": false, "italic": false, "strikethrough": false,
            "underline": false, "code": false, "color": "default"
        },
        "plain_text": content,
        "href": null
    })
}

pub fn styled(content: &str, annotations: Value) -> Value {
    let mut item = text(content);
    for (key, value) in annotations.as_object().unwrap() {
        item["annotations"][key] = value.clone();
    }
    item
}

pub fn link(content: &str, href: &str) -> Value {
    let mut item = text(content);
    item["text"]["link"] = json!({ "url": href });
    item["href"] = json!(href);
    item
}

pub fn block(id: &str, block_type: &str, payload: Value, has_children: bool) -> Value {
    let mut value = json!({
        "object": "block",
        "id": id,
        "type": block_type,
        "created_time": "2024-03-01T10:00:00.000Z",
        "last_edited_time": "2024-03-01T10:00:00.000Z",
        "has_children": has_children,
        "archived": false,
    });
    value[block_type] = payload;
    value
}

pub fn text_block(id: &str, block_type: &str, content: &str) -> Value {
    block(
        id,
        block_type,
        json!({ "rich_text": [text(content)], "color": "default" }),
        false,
    )
}

pub fn launch_page() -> Value {
    json!({
        "object": "page",
        "id": "8a1f6a1e-5c2b-4d0f-9e3a-7b6c5d4e3f21",
        "created_time": "2024-03-01T09:30:00.000Z",
        "last_edited_time": "2024-03-04T16:45:00.000Z",
        "archived": false,
        "url": PAGE_URL,
        "icon": { "type": "emoji", "emoji": "🚀" },
        "cover": { "type": "external", "external": { "url": "https://img.example/cover.png" } },
        "properties": {
            "Status": { "id": "s%3A", "type": "select", "select": { "id": "1", "name": "In progress", "color": "blue" } },
            "Tags": { "id": "t%3A", "type": "multi_select", "multi_select": [
                { "id": "a", "name": "launch", "color": "red" },
                { "id": "b", "name": "q2", "color": "green" }
            ] },
            "Owner": { "id": "o%3A", "type": "people", "people": [
                { "object": "user", "id": "u-1", "name": "Robin", "avatar_url": null }
            ] },
            "Approved": { "id": "c%3A", "type": "checkbox", "checkbox": false },
            "Name": { "id": "title", "type": "title", "title": [text("Launch plan")] }
        }
    })
}

/// Top-level blocks of the launch page, with their nested content.
pub fn launch_workspace() -> FixtureNotion {
    let root = page_id().to_hyphenated();
    FixtureNotion::new()
        .page(launch_page())
        .children(
            &root,
            vec![
                text_block("b-h1", "heading_1", "Launch plan"),
                block(
                    "b-intro",
                    "paragraph",
                    json!({ "rich_text": [
                        text("Ship "),
                        styled("v2", json!({ "bold": true })),
                        text(" by "),
                        link("Friday", "https://cal.example/fri")
                    ], "color": "default" }),
                    false,
                ),
                text_block("b-l1", "bulleted_list_item", "Alpha"),
                text_block("b-l2", "bulleted_list_item", "Beta"),
                block(
                    "b-todo",
                    "to_do",
                    json!({ "rich_text": [text("Write notes")], "checked": true, "color": "default" }),
                    false,
                ),
                block(
                    "b-toggle",
                    "toggle",
                    json!({ "rich_text": [text("Details")], "color": "default" }),
                    true,
                ),
                block(
                    "b-code",
                    "code",
                    json!({ "rich_text": [text("let x = 1 < 2;")], "language": "rust", "caption": [] }),
                    false,
                ),
                block(
                    "b-callout",
                    "callout",
                    json!({
                        "rich_text": [text("Remember")],
                        "icon": { "type": "emoji", "emoji": "💡" },
                        "color": "gray_background"
                    }),
                    false,
                ),
                block("b-div", "divider", json!({}), false),
                block(
                    "b-table",
                    "table",
                    json!({ "table_width": 2, "has_column_header": true, "has_row_header": false }),
                    true,
                ),
                block(
                    "b-img",
                    "image",
                    json!({
                        "caption": [text("Chart")],
                        "type": "external",
                        "external": { "url": "https://img.example/chart.png" }
                    }),
                    false,
                ),
                block("b-cols", "column_list", json!({}), true),
            ],
        )
        .children("b-toggle", vec![text_block("b-hidden", "paragraph", "Hidden")])
        .children(
            "b-table",
            vec![
                block(
                    "b-r1",
                    "table_row",
                    json!({ "cells": [[text("Name")], [text("Qty")]] }),
                    false,
                ),
                block(
                    "b-r2",
                    "table_row",
                    json!({ "cells": [[text("Apples")], [text("3")]] }),
                    false,
                ),
            ],
        )
        .children("b-cols", vec![block("b-col", "column", json!({}), true)])
        .children("b-col", vec![text_block("b-left", "paragraph", "Left column")])
}

pub const LAUNCH_MARKDOWN: &str = "# Launch plan\n\n\
Ship **v2** by [Friday](https://cal.example/fri)\n\n\
* Alpha\n* Beta\n\n\
- [x] Write notes\n\n\
<details><summary>Details</summary>\n\nHidden\n\n</details>\n\n\
```rust\nlet x = 1 < 2;\n```\n\n\
> 💡 Remember\n\n\
---\n\n\
| Name | Qty |\n| --- | --- |\n| Apples | 3 |\n\n\
![Chart](https://img.example/chart.png)\n\n\
Left column\n\n";
