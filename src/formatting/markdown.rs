// src/formatting/markdown.rs
//! Markdown output.

use super::block_renderer::{BlockVisitor, ListKind};
use super::rich_text::rich_text_to_markdown;
use crate::constants::DEFAULT_IMAGE_CAPTION;
use crate::types::RichTextItem;

/// Writes blocks as GitHub-flavored Markdown.
///
/// Numbered items always use the marker `1.` and leave numbering to the
/// Markdown renderer. Toggles become `<details>` elements since Markdown
/// has no collapsible block.
pub struct MarkdownVisitor;

impl MarkdownVisitor {
    fn table_row(out: &mut String, cells: &[String]) {
        out.push('|');
        for cell in cells {
            out.push(' ');
            out.push_str(&cell.replace('|', "\\|").replace('\n', " "));
            out.push_str(" |");
        }
        out.push('\n');
    }
}

impl BlockVisitor for MarkdownVisitor {
    fn render_text(&self, items: &[RichTextItem]) -> String {
        rich_text_to_markdown(items)
    }

    fn open_list(&self, _out: &mut String, _kind: ListKind) {}

    fn close_list(&self, out: &mut String, _kind: ListKind) {
        out.push('\n');
    }

    fn paragraph(&self, out: &mut String, text: &str) {
        out.push_str(text);
        out.push_str("\n\n");
    }

    fn heading(&self, out: &mut String, level: u8, text: &str) {
        out.push_str(&"#".repeat(level as usize));
        out.push(' ');
        out.push_str(text);
        out.push_str("\n\n");
    }

    fn bulleted_item(&self, out: &mut String, text: &str) {
        out.push_str(&format!("* {}\n", text));
    }

    fn numbered_item(&self, out: &mut String, text: &str) {
        out.push_str(&format!("1. {}\n", text));
    }

    fn to_do(&self, out: &mut String, text: &str, checked: bool) {
        let mark = if checked { 'x' } else { ' ' };
        out.push_str(&format!("- [{}] {}\n", mark, text));
    }

    fn toggle(&self, out: &mut String, summary: &str, body: &str) {
        out.push_str(&format!(
            "<details><summary>{}</summary>\n\n{}</details>\n\n",
            summary, body
        ));
    }

    fn code(&self, out: &mut String, language: &str, source: &str) {
        out.push_str(&format!("```{}\n{}\n```\n\n", language, source));
    }

    fn quote(&self, out: &mut String, text: &str) {
        out.push_str("> ");
        out.push_str(&text.replace('\n', "\n> "));
        out.push_str("\n\n");
    }

    fn divider(&self, out: &mut String) {
        out.push_str("---\n\n");
    }

    fn callout(&self, out: &mut String, emoji: Option<&str>, text: &str) {
        match emoji {
            Some(emoji) => out.push_str(&format!("> {} {}\n\n", emoji, text)),
            None => out.push_str(&format!("> {}\n\n", text)),
        }
    }

    fn bookmark(&self, out: &mut String, url: &str, caption: &[RichTextItem]) {
        let caption = self.render_text(caption);
        let label = if caption.is_empty() { url } else { caption.as_str() };
        out.push_str(&format!("[{}]({})\n\n", label, url));
    }

    fn equation(&self, out: &mut String, expression: &str) {
        out.push_str(&format!("$$\n{}\n$$\n\n", expression));
    }

    fn image(&self, out: &mut String, url: &str, caption: &[RichTextItem]) {
        let caption = self.render_text(caption);
        let alt = if caption.is_empty() {
            DEFAULT_IMAGE_CAPTION
        } else {
            caption.as_str()
        };
        out.push_str(&format!("![{}]({})\n\n", alt, url));
    }

    fn table(&self, out: &mut String, rows: &[Vec<String>], width: usize, has_column_header: bool) {
        for (index, row) in rows.iter().enumerate() {
            Self::table_row(out, row);
            if index == 0 && has_column_header {
                out.push('|');
                out.push_str(&" --- |".repeat(width.max(1)));
                out.push('\n');
            }
        }
        out.push('\n');
    }
}
