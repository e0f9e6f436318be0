//! Page-lifecycle coordination.
//!
//! The render phase is synchronous and side-effect-free: the host calls
//! [`PageComposer::render_head`] (or [`PageComposer::metadata`]) while
//! building the document. Once the page has mounted, the host invokes
//! [`PageComposer::on_mount`] exactly once per page visit; the three
//! mount-phase effects run concurrently and none of them can fail the page:
//!
//! - token provisioning ([`token::TokenProvisioner`]), fire-and-forget;
//! - ad-blocker detection ([`adblock::AdblockDetector`]), fire-and-forget;
//! - analytics init + page-view log ([`analytics::AnalyticsCoordinator`]),
//!   where the log reads the init outcome this mount observed.
//!
//! `on_mount` is safe to call across navigations without accumulating
//! duplicate work: the token and analytics coordinators already collapse
//! repeated requests through their shared process-wide state.

pub mod adblock;
pub mod analytics;
pub mod token;

use crate::{
    config::AppConfig,
    metadata::{self, MetadataRecord, head},
    page::PageIdentity,
};
use adblock::{AdblockDetector, AdblockProbe};
use analytics::{AnalyticsBackend, AnalyticsCoordinator, InitState};
use std::sync::Arc;
use token::{CsrfToken, TokenEndpoint, TokenProvisioner};
use tokio::sync::OnceCell;

// ============================================================================
// Page Session
// ============================================================================

/// Per-visit scope for mount-phase effects.
///
/// Created by the host for each page visit and dropped on unmount. Holds
/// the state that must not leak across visits (currently the ad-blocker
/// probe outcome); everything process-wide lives in the composer.
#[derive(Debug, Default)]
pub struct PageSession {
    pub(crate) adblock: OnceCell<bool>,
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ad-blocker probe outcome, once the probe has run for this visit.
    pub fn adblock_detected(&self) -> Option<bool> {
        self.adblock.get().copied()
    }
}

// ============================================================================
// Page Composer
// ============================================================================

/// Orchestrates metadata derivation and mount-phase effects for every page.
///
/// One composer per process; its coordinators own the only cross-mount
/// shared state (the token slot and the analytics init state).
pub struct PageComposer<E, P, B> {
    config: Arc<AppConfig>,
    token: TokenProvisioner<E>,
    adblock: AdblockDetector<P>,
    analytics: AnalyticsCoordinator<B>,
}

impl<E, P, B> PageComposer<E, P, B>
where
    E: TokenEndpoint,
    P: AdblockProbe,
    B: AnalyticsBackend,
{
    pub fn new(config: Arc<AppConfig>, endpoint: E, probe: P, backend: B) -> Self {
        let analytics_enabled = config.analytics.enabled;
        Self {
            config,
            token: TokenProvisioner::new(endpoint),
            adblock: AdblockDetector::new(probe),
            analytics: AnalyticsCoordinator::new(backend, analytics_enabled),
        }
    }

    /// Derive the metadata record for a page. Pure; safe on every render.
    pub fn metadata(&self, identity: &PageIdentity) -> MetadataRecord {
        metadata::generate(&self.config, identity)
    }

    /// Render the document-head fragment for a page. Pure; no effects.
    pub fn render_head(&self, identity: &PageIdentity) -> String {
        head::render(&self.config, &self.metadata(identity))
    }

    /// Run the mount-phase effects for one page visit.
    ///
    /// Call exactly once per mount, after the head output is committed.
    /// The effects are independent and run concurrently; the page-view log
    /// is causally ordered after this mount's view of the init outcome.
    /// Infallible by construction: every failure is logged and swallowed.
    pub async fn on_mount(&self, identity: &PageIdentity, session: &PageSession) {
        tokio::join!(
            self.token.ensure_token(),
            self.adblock.detect(session),
            async {
                let observed = self.analytics.ensure_init().await;
                self.analytics.log_page_view(observed, identity.route);
            },
        );
    }

    /// The current session token, for later mutating actions.
    pub fn csrf_token(&self) -> Option<Arc<CsrfToken>> {
        self.token.current()
    }

    /// The process-wide analytics init state.
    pub fn analytics_state(&self) -> InitState {
        self.analytics.state()
    }
}
