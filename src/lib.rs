//! Pageboot - per-page bootstrap layer for the explorer front-end.
//!
//! Given a logical page identity (a route key from the closed route set,
//! plus optional query and server-fetched data), this crate:
//!
//! - derives the document-head metadata for that page (title, description,
//!   Open Graph / Twitter Card tags, canonical link) — pure and synchronous,
//!   safe to call on every render;
//! - runs the fixed set of mount-phase side effects: CSRF token
//!   provisioning, ad-blocker detection, and analytics init + a single
//!   page-view log per mount.
//!
//! # Architecture
//!
//! ```text
//! PageIdentity ──► metadata::generate() ──► MetadataRecord ──► head::render()
//!                       (pure, render phase)                  (head tags)
//!
//! page mount ──► PageComposer::on_mount()
//!                    ├── TokenProvisioner     (single-flight CSRF fetch)
//!                    ├── AdblockDetector      (one probe per visit)
//!                    └── AnalyticsCoordinator (at-most-once init, lossy log)
//! ```
//!
//! The token endpoint, the ad-blocker probe, and the analytics backend are
//! black-box collaborators behind traits. None of their failures ever reach
//! the rendered page; they are logged and swallowed.

pub mod config;
pub mod lifecycle;
pub mod logger;
pub mod metadata;
pub mod page;
pub mod routes;

pub use config::AppConfig;
pub use lifecycle::adblock::{AdblockDetector, AdblockProbe, ProbeError};
pub use lifecycle::analytics::{
    AnalyticsBackend, AnalyticsCoordinator, AnalyticsError, InitState,
};
pub use lifecycle::token::{CsrfToken, TokenEndpoint, TokenError, TokenProvisioner};
pub use lifecycle::{PageComposer, PageSession};
pub use metadata::{MetadataRecord, OpenGraph, generate};
pub use page::{ApiData, PageIdentity, Query, QueryValue};
pub use routes::{Route, RouteEntry};
