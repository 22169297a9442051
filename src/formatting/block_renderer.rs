// src/formatting/block_renderer.rs
//! Block rendering engine: walks a block tree once for any output format.
//!
//! The traversal owns list grouping, recursion into children and the lazy
//! fetch of children that were never resolved. Output formats only say how
//! each block kind looks, through [`BlockVisitor`].

use super::html::HtmlVisitor;
use super::markdown::MarkdownVisitor;
use crate::api::BlockTreeFetcher;
use crate::constants::{CHARS_PER_BLOCK_ESTIMATE, MAX_FETCH_DEPTH};
use crate::model::{Block, BlockKind, Icon};
use crate::types::{plain_text, RichTextItem};
use futures::future::BoxFuture;
use std::borrow::Cow;

/// Kinds of list item that group into one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bulleted,
    Numbered,
    ToDo,
}

impl ListKind {
    fn of(kind: &BlockKind) -> Option<Self> {
        match kind {
            BlockKind::BulletedListItem(_) => Some(ListKind::Bulleted),
            BlockKind::NumberedListItem(_) => Some(ListKind::Numbered),
            BlockKind::ToDo(_) => Some(ListKind::ToDo),
            _ => None,
        }
    }
}

/// How one output format writes each kind of block.
///
/// Text arguments arrive already rendered through [`BlockVisitor::render_text`],
/// except code and equation sources, which arrive as plain text.
pub trait BlockVisitor: Sync {
    fn render_text(&self, items: &[RichTextItem]) -> String;

    fn open_list(&self, out: &mut String, kind: ListKind);
    fn close_list(&self, out: &mut String, kind: ListKind);

    fn paragraph(&self, out: &mut String, text: &str);
    fn heading(&self, out: &mut String, level: u8, text: &str);
    fn bulleted_item(&self, out: &mut String, text: &str);
    fn numbered_item(&self, out: &mut String, text: &str);
    fn to_do(&self, out: &mut String, text: &str, checked: bool);
    fn toggle(&self, out: &mut String, summary: &str, body: &str);
    fn code(&self, out: &mut String, language: &str, source: &str);
    fn quote(&self, out: &mut String, text: &str);
    fn divider(&self, out: &mut String);
    fn callout(&self, out: &mut String, emoji: Option<&str>, text: &str);
    fn bookmark(&self, out: &mut String, url: &str, caption: &[RichTextItem]);
    fn equation(&self, out: &mut String, expression: &str);
    fn image(&self, out: &mut String, url: &str, caption: &[RichTextItem]);
    /// Rows of rendered cells. Never called with zero rows.
    fn table(&self, out: &mut String, rows: &[Vec<String>], width: usize, has_column_header: bool);
}

/// Converts block trees into Markdown and HTML.
///
/// Blocks whose children were never resolved but which report children
/// get them fetched on the spot, up to the same depth the tree fetcher
/// stops at. A failed fetch renders as no children.
pub struct DocumentConverter<'a> {
    fetcher: &'a BlockTreeFetcher,
}

impl<'a> DocumentConverter<'a> {
    pub fn new(fetcher: &'a BlockTreeFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn to_markdown(&self, blocks: &[Block]) -> String {
        self.render_with(blocks, &MarkdownVisitor).await
    }

    pub async fn to_html(&self, blocks: &[Block]) -> String {
        self.render_with(blocks, &HtmlVisitor).await
    }

    /// Renders top-level page blocks with any visitor.
    pub async fn render_with<V: BlockVisitor>(&self, blocks: &[Block], visitor: &V) -> String {
        log::debug!("Rendering {} top-level blocks", blocks.len());
        self.render(blocks, visitor, 1).await
    }

    fn render<'b, V: BlockVisitor>(
        &'b self,
        blocks: &'b [Block],
        visitor: &'b V,
        level: u8,
    ) -> BoxFuture<'b, String> {
        Box::pin(async move {
            let mut out = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
            let mut open_list: Option<ListKind> = None;

            for block in blocks {
                let list = ListKind::of(&block.kind);
                if list != open_list {
                    if let Some(kind) = open_list {
                        visitor.close_list(&mut out, kind);
                    }
                    if let Some(kind) = list {
                        visitor.open_list(&mut out, kind);
                    }
                    open_list = list;
                }
                self.render_block(block, visitor, level, &mut out).await;
            }

            if let Some(kind) = open_list {
                visitor.close_list(&mut out, kind);
            }
            out
        })
    }

    async fn render_block<V: BlockVisitor>(
        &self,
        block: &Block,
        visitor: &V,
        level: u8,
        out: &mut String,
    ) {
        match &block.kind {
            BlockKind::Paragraph(c) => visitor.paragraph(out, &visitor.render_text(&c.rich_text)),
            BlockKind::Heading1(c) => visitor.heading(out, 1, &visitor.render_text(&c.rich_text)),
            BlockKind::Heading2(c) => visitor.heading(out, 2, &visitor.render_text(&c.rich_text)),
            BlockKind::Heading3(c) => visitor.heading(out, 3, &visitor.render_text(&c.rich_text)),
            BlockKind::BulletedListItem(c) => {
                visitor.bulleted_item(out, &visitor.render_text(&c.rich_text))
            }
            BlockKind::NumberedListItem(c) => {
                visitor.numbered_item(out, &visitor.render_text(&c.rich_text))
            }
            BlockKind::ToDo(c) => visitor.to_do(out, &visitor.render_text(&c.rich_text), c.checked),
            BlockKind::Toggle(c) => {
                let summary = visitor.render_text(&c.rich_text);
                let children = self.children_of(block, level).await;
                let body = self.render(&children, visitor, level + 1).await;
                visitor.toggle(out, &summary, &body);
            }
            BlockKind::Code(c) => visitor.code(out, &c.language, &plain_text(&c.rich_text)),
            BlockKind::Quote(c) => visitor.quote(out, &visitor.render_text(&c.rich_text)),
            BlockKind::Divider => visitor.divider(out),
            BlockKind::Callout(c) => visitor.callout(
                out,
                c.icon.as_ref().and_then(Icon::emoji),
                &visitor.render_text(&c.rich_text),
            ),
            BlockKind::Bookmark(b) => visitor.bookmark(out, &b.url, &b.caption),
            BlockKind::Equation(e) => visitor.equation(out, &e.expression),
            BlockKind::Image(i) => visitor.image(out, &i.url, &i.caption),
            BlockKind::Table(t) => {
                let children = self.children_of(block, level).await;
                let rows: Vec<Vec<String>> = children
                    .iter()
                    .filter_map(|child| match &child.kind {
                        BlockKind::TableRow(row) => Some(
                            row.cells
                                .iter()
                                .map(|cell| visitor.render_text(cell))
                                .collect(),
                        ),
                        _ => None,
                    })
                    .collect();
                if rows.is_empty() {
                    log::debug!("Table {} has no resolved rows; skipping", block.id);
                } else {
                    visitor.table(out, &rows, t.table_width, t.has_column_header);
                }
            }
            // Rows are consumed by their table.
            BlockKind::TableRow(_) => {}
            BlockKind::Unsupported { block_type } => {
                log::debug!("Rendering only the children of {} block {}", block_type, block.id);
                let children = self.children_of(block, level).await;
                let body = self.render(&children, visitor, level + 1).await;
                out.push_str(&body);
            }
        }
    }

    /// Children of `block`, which sits at `level`.
    async fn children_of<'b>(&self, block: &'b Block, level: u8) -> Cow<'b, [Block]> {
        if let Some(children) = block.children() {
            return Cow::Borrowed(children);
        }
        if !block.has_children || level >= MAX_FETCH_DEPTH {
            return Cow::Borrowed(&[]);
        }

        match self.fetcher.fetch_children(block.id.as_str()).await {
            Ok(children) => {
                log::debug!("Lazily fetched {} children of {}", children.len(), block.id);
                Cow::Owned(children)
            }
            Err(e) => {
                log::warn!("Failed to fetch children of block {}: {}", block.id, e);
                Cow::Borrowed(&[])
            }
        }
    }
}
