//! Embed cards for externally-linked content.
//!
//! Page bodies reference external URLs; at render time each one becomes a
//! small HTML card built from display metadata (title, description, icon,
//! canonical host). Metadata lookup itself is an opaque collaborator; this
//! module only defines its contract and formats the result.

use std::fmt::Write;

use serde_json::Value;

// ============================================================================
// Collaborator Trait
// ============================================================================

/// Display metadata for an embedded URL. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedMetadata {
    pub page_title: String,
    pub page_description: String,
    pub page_icon: String,
    pub embed_url: String,
    pub embed_host: String,
}

/// Resolves a URL to its display metadata.
///
/// Typically backed by an HTTP metadata lookup; the rendering path treats it
/// as a black box and tolerates empty fields.
pub trait EmbedResolver {
    fn resolve(&self, url: &str) -> EmbedMetadata;
}

// ============================================================================
// Rendering
// ============================================================================

/// Render an embed node from page-body data.
///
/// Nodes carrying a `url` string are resolved and formatted as a card. A
/// node without one cannot be embedded at all; the fallback surfaces the raw
/// node data as a diagnostic rather than failing the render.
pub fn render_embed(node: &Value, resolver: &dyn EmbedResolver) -> String {
    match node.get("url").and_then(Value::as_str) {
        Some(url) => render_embed_card(&resolver.resolve(url)),
        None => format!(
            "<div class=\"embed embed-unknown\">Unknown embed type: {}</div>\n",
            escape_html(&node.to_string())
        ),
    }
}

/// Format resolved metadata as an HTML card.
///
/// Empty description and icon are omitted; the link is labelled with the
/// canonical host.
pub fn render_embed_card(meta: &EmbedMetadata) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"embed\">\n");

    if !meta.page_icon.is_empty() {
        let _ = writeln!(
            out,
            "  <img class=\"embed-icon\" src=\"{}\" alt=\"\"/>",
            escape_html(&meta.page_icon)
        );
    }

    let _ = writeln!(
        out,
        "  <p class=\"embed-title\">{}</p>",
        escape_html(&meta.page_title)
    );

    if !meta.page_description.is_empty() {
        let _ = writeln!(
            out,
            "  <p class=\"embed-description\">{}</p>",
            escape_html(&meta.page_description)
        );
    }

    let _ = writeln!(
        out,
        "  <a class=\"embed-link\" href=\"{}\">{}</a>",
        escape_html(&meta.embed_url),
        escape_html(&meta.embed_host)
    );

    out.push_str("</div>\n");
    out
}

/// Escape text for use in HTML content and attribute values.
fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

// ============================================================================
// Tests
// ============================================================================
