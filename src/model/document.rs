use super::{Block, Icon};
use crate::types::{DocumentId, ValidationError};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Normalized page properties, keyed by property name in page order.
pub type DocumentProperties = IndexMap<String, Value>;

/// Page-level data from Notion, before any block content is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    pub id: DocumentId,
    pub url: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    pub icon: Option<Icon>,
    pub cover: Option<String>,
    /// Raw property objects exactly as Notion sent them.
    pub properties: IndexMap<String, Value>,
}

/// The importer's result for one page.
///
/// Cached entries hold every output. Responses may carry a subset,
/// selected with [`DocumentRecord::project`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub title: String,
    pub source_url: String,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default)]
    pub properties: DocumentProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl DocumentRecord {
    /// Keeps the metadata and only the outputs `format` asks for.
    pub fn project(mut self, format: OutputFormat) -> Self {
        if !format.includes_blocks() {
            self.blocks = None;
        }
        if !format.includes_markdown() {
            self.markdown = None;
        }
        if !format.includes_html() {
            self.html = None;
        }
        self
    }
}

/// Which renderings of a page the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    All,
    Markdown,
    Html,
    /// The raw block tree only.
    Json,
}

impl OutputFormat {
    pub fn includes_blocks(self) -> bool {
        matches!(self, OutputFormat::All | OutputFormat::Json)
    }

    pub fn includes_markdown(self) -> bool {
        matches!(self, OutputFormat::All | OutputFormat::Markdown)
    }

    pub fn includes_html(self) -> bool {
        matches!(self, OutputFormat::All | OutputFormat::Html)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::All => "all",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(OutputFormat::All),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ValidationError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
