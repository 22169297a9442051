use super::blocks::*;
use crate::types::BlockId;
use serde::{Deserialize, Serialize};

/// The closed set of block types the importer understands.
///
/// Anything else Notion returns becomes [`BlockKind::Unsupported`], which
/// keeps the original type name so the raw tree still says what it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph(TextBlockContent),
    #[serde(rename = "heading_1")]
    Heading1(TextBlockContent),
    #[serde(rename = "heading_2")]
    Heading2(TextBlockContent),
    #[serde(rename = "heading_3")]
    Heading3(TextBlockContent),
    BulletedListItem(TextBlockContent),
    NumberedListItem(TextBlockContent),
    ToDo(ToDoContent),
    Toggle(TextBlockContent),
    Code(CodeContent),
    Quote(TextBlockContent),
    Divider,
    Callout(CalloutContent),
    Bookmark(BookmarkContent),
    Equation(EquationContent),
    Table(TableContent),
    TableRow(TableRowContent),
    Image(ImageContent),
    Unsupported { block_type: String },
}

impl BlockKind {
    /// Notion's name for this block type.
    pub fn type_name(&self) -> &str {
        match self {
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::Heading1(_) => "heading_1",
            BlockKind::Heading2(_) => "heading_2",
            BlockKind::Heading3(_) => "heading_3",
            BlockKind::BulletedListItem(_) => "bulleted_list_item",
            BlockKind::NumberedListItem(_) => "numbered_list_item",
            BlockKind::ToDo(_) => "to_do",
            BlockKind::Toggle(_) => "toggle",
            BlockKind::Code(_) => "code",
            BlockKind::Quote(_) => "quote",
            BlockKind::Divider => "divider",
            BlockKind::Callout(_) => "callout",
            BlockKind::Bookmark(_) => "bookmark",
            BlockKind::Equation(_) => "equation",
            BlockKind::Table(_) => "table",
            BlockKind::TableRow(_) => "table_row",
            BlockKind::Image(_) => "image",
            BlockKind::Unsupported { block_type } => block_type,
        }
    }
}

/// A node of a page's content tree.
///
/// The block's own data never changes after parsing. Its children live in
/// a separate slot that starts out unresolved (`None`) and is filled at
/// most once, either by the tree fetcher or not at all. A resolved empty
/// list means "looked, found nothing or stopped looking", which is how
/// depth-capped and failed subtrees are represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<Block>>,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind, has_children: bool) -> Self {
        Self {
            id: BlockId::new(id),
            kind,
            has_children,
            children: None,
        }
    }

    /// Fills the children slot, consuming the block.
    ///
    /// A slot that is already resolved is left as it was.
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        if self.children.is_some() {
            log::warn!("Children of block {} already resolved; keeping the first result", self.id);
            return self;
        }
        self.children = Some(children);
        self
    }

    /// Resolved children, or `None` if nobody fetched them.
    pub fn children(&self) -> Option<&[Block]> {
        self.children.as_deref()
    }

    /// Whether Notion reports children that have not been fetched yet.
    pub fn needs_children(&self) -> bool {
        self.has_children && self.children.is_none()
    }

    pub fn block_type(&self) -> &str {
        self.kind.type_name()
    }
}
