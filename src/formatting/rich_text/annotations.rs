// src/formatting/rich_text/annotations.rs
//! Annotation processing for rich text.
//!
//! Styles nest in a fixed order. From the outside in: link, color, bold,
//! italic, strikethrough, underline, code. Markdown has no underline or
//! color, so those only appear in HTML.

use crate::types::Annotations;

/// Renderer for text styles to Markdown.
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Applies styles to text content for Markdown output.
    pub fn apply_styles(content: &str, annotations: &Annotations, href: Option<&str>) -> String {
        if content.is_empty() {
            return String::new();
        }

        let mut result = content.to_string();

        if annotations.code {
            result = format!("`{}`", result);
        }

        if annotations.strikethrough {
            result = format!("~~{}~~", result);
        }

        if annotations.italic {
            result = format!("_{}_", result);
        }

        if annotations.bold {
            result = format!("**{}**", result);
        }

        if let Some(url) = href {
            result = format!("[{}]({})", result, url);
        }

        result
    }
}

/// Renderer for text styles to HTML.
pub struct HtmlStyleRenderer;

impl HtmlStyleRenderer {
    /// Applies styles to text content for HTML output. The content is escaped here.
    pub fn apply_styles(content: &str, annotations: &Annotations, href: Option<&str>) -> String {
        if content.is_empty() {
            return String::new();
        }

        let mut result = html_escape(content);

        if annotations.code {
            result = format!("<code>{}</code>", result);
        }

        if annotations.underline {
            result = format!("<u>{}</u>", result);
        }

        if annotations.strikethrough {
            result = format!("<s>{}</s>", result);
        }

        if annotations.italic {
            result = format!("<em>{}</em>", result);
        }

        if annotations.bold {
            result = format!("<strong>{}</strong>", result);
        }

        if let Some(class) = annotations.color.css_class() {
            result = format!("<span class=\"{}\">{}</span>", class, result);
        }

        if let Some(url) = href {
            result = format!("<a href=\"{}\">{}</a>", attribute_escape(url), result);
        }

        result
    }
}

/// Escapes text for HTML element content.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes text for a double-quoted HTML attribute value.
pub fn attribute_escape(text: &str) -> String {
    html_escape(text).replace('"', "&quot;")
}
