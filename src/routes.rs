//! The closed route set of the explorer front-end and its metadata table.
//!
//! Every page the front-end can render is identified by one [`Route`]. The
//! static [`RouteEntry`] table is the single source of truth for per-route
//! head metadata defaults: title templates, descriptions, and whether the
//! route has a canonical URL.
//!
//! # Templates
//!
//! Title and description strings may carry `%placeholder%` markers:
//!
//! | Placeholder  | Filled from                                  |
//! |--------------|----------------------------------------------|
//! | `%network%`  | `SiteConfig.network` (always resolvable)     |
//! | `%hash%` etc.| `ApiData` field, then first query value      |
//!
//! Dynamic path segments use the `[param]` marker (e.g. `/tx/[hash]`);
//! their values arrive through the page query.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Route
// ============================================================================

/// A page template in the closed route set.
///
/// Serializes as its pathname (e.g. `"/tx/[hash]"`); deserializing an
/// unknown pathname is an error at this boundary, so a constructed `Route`
/// always belongs to the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Txs,
    Tx,
    Blocks,
    Block,
    Address,
    Token,
    Accounts,
    Stats,
    SearchResults,
    Apps,
    App,
}

/// All routes, in table order.
pub const ALL_ROUTES: [Route; 12] = [
    Route::Home,
    Route::Txs,
    Route::Tx,
    Route::Blocks,
    Route::Block,
    Route::Address,
    Route::Token,
    Route::Accounts,
    Route::Stats,
    Route::SearchResults,
    Route::Apps,
    Route::App,
];

impl Route {
    /// Resolve a pathname string against the known route set.
    pub fn from_pathname(pathname: &str) -> Option<Self> {
        ALL_ROUTES
            .iter()
            .copied()
            .find(|route| route.pathname() == pathname)
    }

    /// The route key, with `[param]` markers for dynamic segments.
    pub const fn pathname(self) -> &'static str {
        self.entry().path
    }

    /// Static metadata defaults for this route.
    pub const fn entry(self) -> &'static RouteEntry {
        match self {
            Self::Home => &HOME,
            Self::Txs => &TXS,
            Self::Tx => &TX,
            Self::Blocks => &BLOCKS,
            Self::Block => &BLOCK,
            Self::Address => &ADDRESS,
            Self::Token => &TOKEN,
            Self::Accounts => &ACCOUNTS,
            Self::Stats => &STATS,
            Self::SearchResults => &SEARCH_RESULTS,
            Self::Apps => &APPS,
            Self::App => &APP,
        }
    }

    /// Names of the dynamic path segments, in path order.
    ///
    /// E.g. `/tx/[hash]` yields `["hash"]`; static routes yield nothing.
    pub fn path_params(self) -> impl Iterator<Item = &'static str> {
        self.pathname().split('/').filter_map(|segment| {
            segment
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pathname())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.pathname())
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pathname = String::deserialize(deserializer)?;
        Self::from_pathname(&pathname)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown route `{pathname}`")))
    }
}

// ============================================================================
// Route Entries
// ============================================================================

/// Static head-metadata defaults for one route.
pub struct RouteEntry {
    /// Route key with `[param]` markers for dynamic segments.
    pub path: &'static str,
    /// Static title; `%network%` is the only placeholder allowed here.
    pub title: &'static str,
    /// Data-dependent title template. Used instead of `title` when every
    /// placeholder resolves; otherwise the static title wins.
    pub title_template: Option<&'static str>,
    /// Route description; `None` falls back to the site-wide default.
    pub description: Option<&'static str>,
    /// Open Graph description; `None` means the tag is omitted.
    pub og_description: Option<&'static str>,
    /// Whether the route has a canonical URL. Routes whose content varies
    /// meaningfully with the query (e.g. search) are not canonicalizable.
    pub canonicalizable: bool,
}

static HOME: RouteEntry = RouteEntry {
    path: "/",
    title: "%network% blockchain explorer",
    title_template: None,
    description: None,
    og_description: Some("Track transactions, blocks and accounts on the %network% network"),
    canonicalizable: true,
};

static TXS: RouteEntry = RouteEntry {
    path: "/txs",
    title: "%network% transactions",
    title_template: None,
    description: Some("Latest transactions on the %network% network"),
    og_description: None,
    canonicalizable: true,
};

static TX: RouteEntry = RouteEntry {
    path: "/tx/[hash]",
    title: "%network% transaction",
    title_template: Some("%network% transaction %hash%"),
    description: Some("View transaction details, status, fee and logs"),
    og_description: None,
    // A transaction page is reached by hash lookup; there is no preferred
    // URL variant worth hinting to indexers.
    canonicalizable: false,
};

static BLOCKS: RouteEntry = RouteEntry {
    path: "/blocks",
    title: "%network% blocks",
    title_template: None,
    description: Some("Latest blocks on the %network% network"),
    og_description: None,
    canonicalizable: true,
};

static BLOCK: RouteEntry = RouteEntry {
    path: "/block/[height_or_hash]",
    title: "%network% block",
    title_template: Some("%network% block %height%"),
    description: Some("View block details, transactions and rewards"),
    og_description: None,
    canonicalizable: true,
};

static ADDRESS: RouteEntry = RouteEntry {
    path: "/address/[hash]",
    title: "%network% address",
    title_template: Some("%network% address %hash%"),
    description: Some("View address balance, transactions and token holdings"),
    og_description: None,
    canonicalizable: true,
};

static TOKEN: RouteEntry = RouteEntry {
    path: "/token/[hash]",
    title: "%network% token",
    title_template: Some("%name% token on %network%"),
    description: Some("View token supply, holders and transfers"),
    og_description: None,
    canonicalizable: true,
};

static ACCOUNTS: RouteEntry = RouteEntry {
    path: "/accounts",
    title: "%network% top accounts",
    title_template: None,
    description: Some("Accounts with the highest balances on %network%"),
    og_description: None,
    canonicalizable: true,
};

static STATS: RouteEntry = RouteEntry {
    path: "/stats",
    title: "%network% network stats",
    title_template: None,
    description: Some("Charts and statistics for the %network% network"),
    og_description: None,
    canonicalizable: true,
};

static SEARCH_RESULTS: RouteEntry = RouteEntry {
    path: "/search-results",
    title: "%network% search results",
    title_template: None,
    description: None,
    og_description: None,
    // Content is entirely query-driven
    canonicalizable: false,
};

static APPS: RouteEntry = RouteEntry {
    path: "/apps",
    title: "%network% apps marketplace",
    title_template: None,
    description: Some("Discover apps built on the %network% network"),
    og_description: None,
    canonicalizable: true,
};

static APP: RouteEntry = RouteEntry {
    path: "/apps/[id]",
    title: "%network% app",
    title_template: Some("%title% | %network% apps"),
    description: None,
    og_description: None,
    canonicalizable: true,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_routes_have_nonempty_defaults() {
        for route in ALL_ROUTES {
            let entry = route.entry();
            assert!(!entry.path.is_empty(), "{route} has empty path");
            assert!(!entry.title.is_empty(), "{route} has empty title");
            assert!(entry.path.starts_with('/'), "{route} path must be absolute");
        }
    }

    #[test]
    fn test_pathnames_are_unique() {
        for (i, a) in ALL_ROUTES.iter().enumerate() {
            for b in &ALL_ROUTES[i + 1..] {
                assert_ne!(a.pathname(), b.pathname());
            }
        }
    }

    #[test]
    fn test_from_pathname_roundtrip() {
        for route in ALL_ROUTES {
            assert_eq!(Route::from_pathname(route.pathname()), Some(route));
        }
    }

    #[test]
    fn test_from_pathname_unknown() {
        assert_eq!(Route::from_pathname("/nope"), None);
        assert_eq!(Route::from_pathname(""), None);
        assert_eq!(Route::from_pathname("/tx"), None);
    }

    #[test]
    fn test_path_params() {
        assert_eq!(Route::Tx.path_params().collect::<Vec<_>>(), vec!["hash"]);
        assert_eq!(
            Route::Block.path_params().collect::<Vec<_>>(),
            vec!["height_or_hash"]
        );
        assert_eq!(Route::Home.path_params().count(), 0);
        assert_eq!(Route::Txs.path_params().count(), 0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Route::Tx).unwrap();
        assert_eq!(json, r#""/tx/[hash]""#);
        let route: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(route, Route::Tx);
    }

    #[test]
    fn test_serde_unknown_pathname() {
        let result: Result<Route, _> = serde_json::from_str(r#""/bogus""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_query_driven_routes_not_canonicalizable() {
        assert!(!Route::SearchResults.entry().canonicalizable);
        assert!(!Route::Tx.entry().canonicalizable);
        assert!(Route::Home.entry().canonicalizable);
    }
}
