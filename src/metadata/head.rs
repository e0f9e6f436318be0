//! Document-head tag rendering.
//!
//! Renders a [`MetadataRecord`] into the head-tag fragment the host commits
//! to the document before mount-phase effects run. Tag presence tracks
//! record field presence exactly: an absent `canonical` or Open Graph
//! description produces no tag at all.

use super::MetadataRecord;
use crate::config::AppConfig;
use std::borrow::Cow;
use std::fmt::Write;

/// Render the full head-tag fragment for a page.
pub fn render(config: &AppConfig, record: &MetadataRecord) -> String {
    let mut out = String::with_capacity(512);

    let title = html_escape(&record.title);
    let description = html_escape(&record.description);
    let og_title = html_escape(&record.open_graph.title);
    let og_description = record
        .open_graph
        .description
        .as_deref()
        .map(html_escape);
    let image_url = html_escape(&record.open_graph.image_url);
    let host = html_escape(&config.site.host);

    writeln!(out, "<title>{title}</title>").ok();
    writeln!(out, r#"<meta name="description" content="{description}"/>"#).ok();

    if let Some(canonical) = record.canonical.as_deref() {
        let canonical = html_escape(canonical);
        writeln!(out, r#"<link rel="canonical" href="{canonical}"/>"#).ok();
    }

    // Open Graph tags
    writeln!(out, r#"<meta property="og:title" content="{og_title}"/>"#).ok();
    if let Some(og_description) = &og_description {
        writeln!(
            out,
            r#"<meta property="og:description" content="{og_description}"/>"#
        )
        .ok();
    }
    writeln!(out, r#"<meta property="og:image" content="{image_url}"/>"#).ok();
    writeln!(out, r#"<meta property="og:type" content="website"/>"#).ok();

    // Twitter Card tags
    writeln!(
        out,
        r#"<meta name="twitter:card" content="summary_large_image"/>"#
    )
    .ok();
    writeln!(out, r#"<meta property="twitter:domain" content="{host}"/>"#).ok();
    writeln!(out, r#"<meta name="twitter:title" content="{og_title}"/>"#).ok();
    if let Some(og_description) = &og_description {
        writeln!(
            out,
            r#"<meta name="twitter:description" content="{og_description}"/>"#
        )
        .ok();
    }
    writeln!(
        out,
        r#"<meta property="twitter:image" content="{image_url}"/>"#
    )
    .ok();

    out
}

/// Escape HTML special characters.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
fn html_escape(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['<', '>', '&', '"']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
