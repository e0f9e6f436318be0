//! Page identity: the input record the bootstrap layer works from.
//!
//! A [`PageIdentity`] names the page being rendered: a [`Route`] from the
//! closed route set, the query parameters the router resolved for it, and
//! the optional server-fetched payload ([`ApiData`]) associated with the
//! route.
//!
//! The `ApiData` shape is determined entirely by the route, so it is decoded
//! *in route context* via [`ApiData::from_json`] rather than through an
//! untagged union. A payload that does not match the route's expected shape
//! decodes to `None` and the metadata generator degrades to static defaults;
//! malformed server data is never an error at this layer.

use crate::routes::Route;
use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Query
// ============================================================================

/// Query parameters resolved for a page, keyed by parameter name.
pub type Query = BTreeMap<CompactString, QueryValue>;

/// A query parameter value: a single string or a repeated parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    One(CompactString),
    Many(Vec<CompactString>),
}

impl QueryValue {
    /// First value, for parameters where only one is meaningful.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(values) => values.first().map(CompactString::as_str),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::One(value.into())
    }
}

// ============================================================================
// Api Data
// ============================================================================

/// Server-produced payload for a page, shaped by its route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiData {
    Tx {
        hash: CompactString,
    },
    Block {
        height: u64,
    },
    Address {
        hash: CompactString,
        domain: Option<CompactString>,
    },
    Token {
        name: CompactString,
        symbol: Option<CompactString>,
    },
    App {
        title: CompactString,
    },
}

impl ApiData {
    /// Decode a JSON payload in route context.
    ///
    /// Returns `None` when the route has no data shape or the payload does
    /// not carry the fields the route expects.
    pub fn from_json(route: Route, value: &Value) -> Option<Self> {
        match route {
            Route::Tx => value.get("hash")?.as_str().map(|hash| Self::Tx {
                hash: hash.into(),
            }),
            Route::Block => value
                .get("height")?
                .as_u64()
                .map(|height| Self::Block { height }),
            Route::Address => value.get("hash")?.as_str().map(|hash| Self::Address {
                hash: hash.into(),
                domain: value
                    .get("domain")
                    .and_then(Value::as_str)
                    .map(CompactString::from),
            }),
            Route::Token => value.get("name")?.as_str().map(|name| Self::Token {
                name: name.into(),
                symbol: value
                    .get("symbol")
                    .and_then(Value::as_str)
                    .map(CompactString::from),
            }),
            Route::App => value.get("title")?.as_str().map(|title| Self::App {
                title: title.into(),
            }),
            _ => None,
        }
    }

    /// Whether this payload belongs to the given route.
    pub fn matches_route(&self, route: Route) -> bool {
        matches!(
            (self, route),
            (Self::Tx { .. }, Route::Tx)
                | (Self::Block { .. }, Route::Block)
                | (Self::Address { .. }, Route::Address)
                | (Self::Token { .. }, Route::Token)
                | (Self::App { .. }, Route::App)
        )
    }

    /// Look up a template placeholder value by field name.
    pub fn field(&self, name: &str) -> Option<String> {
        match (self, name) {
            (Self::Tx { hash }, "hash") => Some(hash.to_string()),
            (Self::Block { height }, "height") => Some(height.to_string()),
            (Self::Address { hash, .. }, "hash") => Some(hash.to_string()),
            (Self::Address { domain, .. }, "domain") => domain.as_ref().map(ToString::to_string),
            (Self::Token { name, .. }, "name") => Some(name.to_string()),
            (Self::Token { symbol, .. }, "symbol") => symbol.as_ref().map(ToString::to_string),
            (Self::App { title }, "title") => Some(title.to_string()),
            _ => None,
        }
    }
}

// ============================================================================
// Page Identity
// ============================================================================

/// A logical page: route key + resolved query + optional server data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIdentity {
    /// Route key, serialized as its pathname.
    #[serde(rename = "pathname")]
    pub route: Route,

    /// Query parameters; only meaningful for parameterized routes.
    #[serde(skip_serializing_if = "Query::is_empty")]
    pub query: Query,

    /// Server-fetched payload associated with the route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_data: Option<ApiData>,
}

impl PageIdentity {
    /// Identity for a route with no query and no server data.
    pub fn new(route: Route) -> Self {
        Self {
            route,
            query: Query::new(),
            api_data: None,
        }
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Attach server data.
    pub fn with_api_data(mut self, api_data: ApiData) -> Self {
        self.api_data = Some(api_data);
        self
    }

    /// First value of a query parameter.
    pub fn query_first(&self, key: &str) -> Option<&str> {
        self.query.get(key).and_then(QueryValue::first)
    }
}

/// Wire shape of a page identity before route-context decoding.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageIdentityRepr {
    pathname: Route,
    #[serde(default)]
    query: Query,
    #[serde(default)]
    api_data: Option<Value>,
}

impl<'de> Deserialize<'de> for PageIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PageIdentityRepr::deserialize(deserializer)?;
        // A payload that does not match the route degrades to None here;
        // the generator then falls back to the route's static defaults.
        let api_data = repr
            .api_data
            .as_ref()
            .and_then(|value| ApiData::from_json(repr.pathname, value));
        Ok(Self {
            route: repr.pathname,
            query: repr.query,
            api_data,
        })
    }
}
