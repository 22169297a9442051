use super::Color;
use serde::{Deserialize, Serialize};

/// One styled run of text.
///
/// Deserializes straight from Notion's rich text objects; mention and
/// equation runs carry their display text in `plain_text` like plain text
/// runs do, so they render without special handling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item without styling.
    pub fn plain_text(text: &str) -> Self {
        Self {
            plain_text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_link(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

/// Concatenates the unstyled text of a run.
pub fn plain_text(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}
