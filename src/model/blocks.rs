use crate::types::{Color, RichTextItem};
use serde::{Deserialize, Serialize};

/// Content shared by paragraph, heading, list item, toggle and quote blocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlockContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub color: Color,
}

impl TextBlockContent {
    pub fn plain(text: &str) -> Self {
        Self {
            rich_text: vec![RichTextItem::plain_text(text)],
            color: Color::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToDoContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalloutContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookmarkContent {
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquationContent {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableContent {
    pub table_width: usize,
    #[serde(default)]
    pub has_column_header: bool,
    #[serde(default)]
    pub has_row_header: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRowContent {
    #[serde(default)]
    pub cells: Vec<Vec<RichTextItem>>,
}

/// An image resolved to a single URL, whether Notion hosts it or not.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageContent {
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

/// Page or callout icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { url: String },
    File { url: String },
}

impl Icon {
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Icon::Emoji { emoji } => Some(emoji),
            _ => None,
        }
    }

    /// The emoji itself, or the image URL for uploaded and external icons.
    pub fn display_value(&self) -> &str {
        match self {
            Icon::Emoji { emoji } => emoji,
            Icon::External { url } | Icon::File { url } => url,
        }
    }
}
