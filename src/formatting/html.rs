// src/formatting/html.rs
//! HTML output.

use super::block_renderer::{BlockVisitor, ListKind};
use super::rich_text::{attribute_escape, html_escape, rich_text_to_html};
use crate::constants::DEFAULT_IMAGE_CAPTION;
use crate::types::{plain_text, RichTextItem};

/// Writes blocks as an HTML fragment, one element per line.
///
/// Consecutive list items share a `<ul>` or `<ol>`. Text colors become
/// `notion-*` CSS classes; no stylesheet is emitted.
pub struct HtmlVisitor;

impl HtmlVisitor {
    fn table_row(out: &mut String, cells: &[String], tag: &str) {
        out.push_str("<tr>");
        for cell in cells {
            out.push_str(&format!("<{tag}>{cell}</{tag}>", tag = tag, cell = cell));
        }
        out.push_str("</tr>\n");
    }
}

impl BlockVisitor for HtmlVisitor {
    fn render_text(&self, items: &[RichTextItem]) -> String {
        rich_text_to_html(items)
    }

    fn open_list(&self, out: &mut String, kind: ListKind) {
        out.push_str(match kind {
            ListKind::Bulleted => "<ul>\n",
            ListKind::Numbered => "<ol>\n",
            ListKind::ToDo => "<ul class=\"to-do-list\">\n",
        });
    }

    fn close_list(&self, out: &mut String, kind: ListKind) {
        out.push_str(match kind {
            ListKind::Numbered => "</ol>\n",
            ListKind::Bulleted | ListKind::ToDo => "</ul>\n",
        });
    }

    fn paragraph(&self, out: &mut String, text: &str) {
        out.push_str(&format!("<p>{}</p>\n", text));
    }

    fn heading(&self, out: &mut String, level: u8, text: &str) {
        out.push_str(&format!("<h{level}>{text}</h{level}>\n", level = level, text = text));
    }

    fn bulleted_item(&self, out: &mut String, text: &str) {
        out.push_str(&format!("<li>{}</li>\n", text));
    }

    fn numbered_item(&self, out: &mut String, text: &str) {
        out.push_str(&format!("<li value=\"1\">{}</li>\n", text));
    }

    fn to_do(&self, out: &mut String, text: &str, checked: bool) {
        let state = if checked { " checked" } else { "" };
        out.push_str(&format!(
            "<li><input type=\"checkbox\" disabled{} /> {}</li>\n",
            state, text
        ));
    }

    fn toggle(&self, out: &mut String, summary: &str, body: &str) {
        out.push_str(&format!(
            "<details><summary>{}</summary>\n{}</details>\n",
            summary, body
        ));
    }

    fn code(&self, out: &mut String, language: &str, source: &str) {
        if language.is_empty() {
            out.push_str(&format!("<pre><code>{}</code></pre>\n", html_escape(source)));
        } else {
            out.push_str(&format!(
                "<pre><code class=\"language-{}\">{}</code></pre>\n",
                attribute_escape(&language.replace(' ', "-")),
                html_escape(source)
            ));
        }
    }

    fn quote(&self, out: &mut String, text: &str) {
        out.push_str(&format!("<blockquote>{}</blockquote>\n", text));
    }

    fn divider(&self, out: &mut String) {
        out.push_str("<hr />\n");
    }

    fn callout(&self, out: &mut String, emoji: Option<&str>, text: &str) {
        match emoji {
            Some(emoji) => out.push_str(&format!(
                "<blockquote class=\"callout\">{} {}</blockquote>\n",
                html_escape(emoji),
                text
            )),
            None => out.push_str(&format!("<blockquote class=\"callout\">{}</blockquote>\n", text)),
        }
    }

    fn bookmark(&self, out: &mut String, url: &str, caption: &[RichTextItem]) {
        let caption = self.render_text(caption);
        let label = if caption.is_empty() {
            html_escape(url)
        } else {
            caption
        };
        out.push_str(&format!(
            "<p><a href=\"{}\">{}</a></p>\n",
            attribute_escape(url),
            label
        ));
    }

    fn equation(&self, out: &mut String, expression: &str) {
        out.push_str(&format!(
            "<div class=\"equation\">$${}$$</div>\n",
            html_escape(expression)
        ));
    }

    fn image(&self, out: &mut String, url: &str, caption: &[RichTextItem]) {
        let alt = plain_text(caption);
        let alt = if alt.is_empty() {
            DEFAULT_IMAGE_CAPTION
        } else {
            alt.as_str()
        };
        out.push_str(&format!(
            "<figure><img src=\"{}\" alt=\"{}\" />",
            attribute_escape(url),
            attribute_escape(alt)
        ));
        if !caption.is_empty() {
            out.push_str(&format!("<figcaption>{}</figcaption>", self.render_text(caption)));
        }
        out.push_str("</figure>\n");
    }

    fn table(&self, out: &mut String, rows: &[Vec<String>], _width: usize, has_column_header: bool) {
        out.push_str("<table>\n");
        let body = if has_column_header {
            out.push_str("<thead>\n");
            Self::table_row(out, &rows[0], "th");
            out.push_str("</thead>\n");
            &rows[1..]
        } else {
            rows
        };
        out.push_str("<tbody>\n");
        for row in body {
            Self::table_row(out, row, "td");
        }
        out.push_str("</tbody>\n</table>\n");
    }
}
