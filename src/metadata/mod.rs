//! Document-head metadata derivation.
//!
//! [`generate`] is the render-phase core: a pure function from
//! `(route, query, api_data)` to a [`MetadataRecord`]. It never fails and
//! never performs I/O, so it is safe to call on every render and memoizable
//! by the host if it cares to.
//!
//! # Resolution order
//!
//! 1. Static per-route defaults come from the [`crate::routes`] table.
//! 2. A route's data-dependent title template is used only when *every*
//!    `%placeholder%` in it resolves (from `ApiData`, then from the query);
//!    otherwise the static title wins. Fallback is per-field: a failed title
//!    substitution does not stop the description or canonical from
//!    resolving.
//! 3. The canonical URL is the route path with `[param]` segments filled
//!    from the same sources and all query variation stripped. Routes marked
//!    non-canonicalizable, and routes whose path params cannot be filled,
//!    yield no canonical link at all.

pub mod head;

use crate::{config::AppConfig, page::PageIdentity, routes::Route};
use serde::Serialize;

// ============================================================================
// Metadata Record
// ============================================================================

/// Open Graph fields of a metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
}

/// The document-level metadata derived for one page.
///
/// Invariants: `title` and `open_graph.image_url` are never empty;
/// `description` falls back to the site-wide default; `canonical` is
/// present only for canonicalizable routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    pub title: String,
    pub description: String,
    pub open_graph: OpenGraph,
    pub canonical: Option<String>,
}

// ============================================================================
// Generator
// ============================================================================

/// Derive the metadata record for a page. Pure and deterministic.
pub fn generate(config: &AppConfig, identity: &PageIdentity) -> MetadataRecord {
    let entry = identity.route.entry();

    let resolve = |name: &str| -> Option<String> {
        if name == "network" {
            return Some(config.site.network.clone());
        }
        // Server data is only trusted when its shape belongs to this route
        if let Some(data) = identity
            .api_data
            .as_ref()
            .filter(|data| data.matches_route(identity.route))
            && let Some(value) = data.field(name)
        {
            return Some(value);
        }
        identity.query_first(name).map(str::to_owned)
    };

    let static_title =
        substitute(entry.title, &resolve).unwrap_or_else(|| entry.title.to_owned());
    let title = entry
        .title_template
        .and_then(|template| substitute(template, &resolve))
        .unwrap_or(static_title);

    let description = entry
        .description
        .and_then(|description| substitute(description, &resolve))
        .unwrap_or_else(|| config.site.description.clone());

    let og_description = entry
        .og_description
        .and_then(|description| substitute(description, &resolve));

    let canonical = if entry.canonicalizable {
        canonical_url(&config.site.base_url, identity.route, &resolve)
    } else {
        None
    };

    MetadataRecord {
        open_graph: OpenGraph {
            title: title.clone(),
            description: og_description,
            image_url: config.site.og_image_url.clone(),
        },
        title,
        description,
        canonical,
    }
}

/// Fill every `%placeholder%` in a template.
///
/// Returns `None` when any placeholder does not resolve (or the markers are
/// unbalanced); the caller then falls back to its static default.
fn substitute(template: &str, resolve: &impl Fn(&str) -> Option<String>) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('%')?;
        out.push_str(&resolve(&after[..end])?);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Some(out)
}

/// Build the canonical URL: route path with params filled, query stripped.
fn canonical_url(
    base_url: &str,
    route: Route,
    resolve: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let path = route.pathname();
    if path == "/" {
        return Some(format!("{base_url}/"));
    }

    let mut url = String::from(base_url);
    for segment in path.split('/').skip(1) {
        url.push('/');
        match segment
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            // An unfillable param would leave a `[param]` marker in the
            // canonical URL; suppress the link instead.
            Some(param) => url.push_str(&urlencoding::encode(&resolve(param)?)),
            None => url.push_str(segment),
        }
    }
    Some(url)
}
