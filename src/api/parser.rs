// src/api/parser.rs
//! Turns raw Notion responses into domain values.
//!
//! Parsing is tolerant: block types and payloads the importer does not
//! know become [`BlockKind::Unsupported`] and unknown property types are
//! kept verbatim, so a page never fails to import because Notion added
//! something new.

use super::client::ApiResponse;
use super::types::{NotionApiErrorResponse, PaginatedResponse};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use crate::model::*;
use crate::types::{DocumentId, RichTextItem};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Parse any Notion API response, mapping non-2xx statuses to errors.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    if result.status.is_success() {
        parse_success_body(&result.data, &result.url)
    } else {
        Err(parse_error_body(&result.data, result.status, &result.url))
    }
}

fn parse_success_body<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

fn parse_error_body(body: &str, status: StatusCode, url: &str) -> AppError {
    match serde_json::from_str::<NotionApiErrorResponse>(body) {
        Ok(error) => AppError::NotionService {
            code: NotionErrorCode::from_api_response(&error.code),
            message: error.message,
            status,
        },
        Err(_) => AppError::NotionService {
            code: NotionErrorCode::from_http_status(status.as_u16()),
            message: format!("HTTP {} from {}: {}", status, url, preview(body)),
            status,
        },
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

// --- Pages ---

#[derive(Debug, Deserialize)]
struct WirePage {
    id: String,
    #[serde(default)]
    url: String,
    created_time: DateTime<Utc>,
    last_edited_time: DateTime<Utc>,
    #[serde(default)]
    icon: Option<Value>,
    #[serde(default)]
    cover: Option<Value>,
    #[serde(default)]
    properties: IndexMap<String, Value>,
}

/// Parse a `GET pages/{id}` response.
pub fn parse_page_response(result: ApiResponse<String>) -> Result<PageMetadata, AppError> {
    let page: WirePage = parse_api_response(result)?;
    page_from_wire(page)
}

/// Parse a page object that has already been decoded to JSON.
pub fn parse_page(value: Value) -> Result<PageMetadata, AppError> {
    let page: WirePage = serde_json::from_value(value)?;
    page_from_wire(page)
}

fn page_from_wire(page: WirePage) -> Result<PageMetadata, AppError> {
    let id = DocumentId::extract(&page.id)
        .map_err(|e| AppError::MalformedResponse(format!("page id: {}", e)))?;
    Ok(PageMetadata {
        id,
        url: page.url,
        created_time: page.created_time,
        last_edited_time: page.last_edited_time,
        icon: page.icon.as_ref().and_then(parse_icon),
        cover: page.cover.as_ref().and_then(file_url),
        properties: page.properties,
    })
}

/// Reads an emoji, external or Notion-hosted icon.
pub fn parse_icon(value: &Value) -> Option<Icon> {
    match value.get("type")?.as_str()? {
        "emoji" => Some(Icon::Emoji {
            emoji: value.get("emoji")?.as_str()?.to_string(),
        }),
        "external" => Some(Icon::External {
            url: file_url(value)?,
        }),
        "file" => Some(Icon::File {
            url: file_url(value)?,
        }),
        other => {
            log::debug!("Ignoring icon of type '{}'", other);
            None
        }
    }
}

/// URL of a Notion file object, whichever way it is hosted.
pub fn file_url(value: &Value) -> Option<String> {
    let hosting = value.get("type")?.as_str()?;
    value
        .get(hosting)?
        .get("url")?
        .as_str()
        .map(str::to_string)
}

// --- Blocks ---

#[derive(Debug, Deserialize)]
struct WireBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payloads: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct WireCallout {
    #[serde(default)]
    rich_text: Vec<RichTextItem>,
    #[serde(default)]
    icon: Option<Value>,
    #[serde(default)]
    color: crate::types::Color,
}

/// Parse a `GET blocks/{id}/children` response page.
///
/// Entries that are not blocks at all (no id or type) are skipped.
pub fn parse_children_response(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let response: PaginatedResponse<Value> = parse_api_response(result)?;
    let results = response
        .results
        .into_iter()
        .filter_map(|value| match parse_block(value) {
            Ok(block) => Some(block),
            Err(e) => {
                log::warn!("Skipping malformed block in children listing: {}", e);
                None
            }
        })
        .collect();

    Ok(PaginatedResponse {
        object: response.object,
        results,
        next_cursor: response.next_cursor,
        has_more: response.has_more,
    })
}

/// Parse a single block object.
pub fn parse_block(value: Value) -> Result<Block, AppError> {
    let mut wire: WireBlock = serde_json::from_value(value)?;
    let payload = wire
        .payloads
        .remove(&wire.block_type)
        .unwrap_or(Value::Null);

    let kind = block_kind(&wire.block_type, payload).unwrap_or_else(|e| {
        log::debug!(
            "Block {} of type '{}' kept as unsupported: {}",
            wire.id,
            wire.block_type,
            e
        );
        BlockKind::Unsupported {
            block_type: wire.block_type.clone(),
        }
    });

    Ok(Block::new(wire.id, kind, wire.has_children))
}

fn content<T: DeserializeOwned>(payload: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(payload)
}

fn missing(what: &str) -> serde_json::Error {
    <serde_json::Error as serde::de::Error>::custom(format!("missing {}", what))
}

fn block_kind(block_type: &str, payload: Value) -> Result<BlockKind, serde_json::Error> {
    let kind = match block_type {
        "paragraph" => BlockKind::Paragraph(content(payload)?),
        "heading_1" => BlockKind::Heading1(content(payload)?),
        "heading_2" => BlockKind::Heading2(content(payload)?),
        "heading_3" => BlockKind::Heading3(content(payload)?),
        "bulleted_list_item" => BlockKind::BulletedListItem(content(payload)?),
        "numbered_list_item" => BlockKind::NumberedListItem(content(payload)?),
        "to_do" => BlockKind::ToDo(content(payload)?),
        "toggle" => BlockKind::Toggle(content(payload)?),
        "code" => BlockKind::Code(content(payload)?),
        "quote" => BlockKind::Quote(content(payload)?),
        "divider" => BlockKind::Divider,
        "callout" => {
            let wire: WireCallout = content(payload)?;
            BlockKind::Callout(CalloutContent {
                rich_text: wire.rich_text,
                icon: wire.icon.as_ref().and_then(parse_icon),
                color: wire.color,
            })
        }
        "bookmark" => BlockKind::Bookmark(content(payload)?),
        "equation" => BlockKind::Equation(content(payload)?),
        "table" => BlockKind::Table(content(payload)?),
        "table_row" => BlockKind::TableRow(content(payload)?),
        "image" => {
            let url = file_url(&payload).ok_or_else(|| missing("image url"))?;
            let caption = match payload.get("caption") {
                Some(caption) => content(caption.clone())?,
                None => Vec::new(),
            };
            BlockKind::Image(ImageContent { url, caption })
        }
        other => BlockKind::Unsupported {
            block_type: other.to_string(),
        },
    };
    Ok(kind)
}
