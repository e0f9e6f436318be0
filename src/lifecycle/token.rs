//! CSRF token provisioning with single-flight fetch collapse.
//!
//! Mutating requests made later in the page's life need a session token.
//! [`TokenProvisioner`] keeps the process-wide token slot filled: on mount
//! it checks the slot and, when the token is absent or expired, performs
//! one outbound fetch through the [`TokenEndpoint`] collaborator.
//!
//! # Invariant: at most one fetch in flight
//!
//! Rapid navigation mounts pages faster than the endpoint responds. All
//! callers that mount while a fetch is pending share that flight instead of
//! issuing their own; the pending-flight handle is checked explicitly
//! before any new work starts.
//!
//! Fetch failures are logged and swallowed. The page renders regardless; a
//! later mutating action finding the slot still empty is responsible for
//! asking again.

use crate::log;
use arc_swap::ArcSwapOption;
use compact_str::CompactString;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::watch;

/// Token endpoint failures. Recovered locally, never surfaced to the page.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("token endpoint rejected the request: {0}")]
    Rejected(String),
}

/// A session token with an optional expiry deadline.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    value: CompactString,
    expires_at: Option<Instant>,
}

impl CsrfToken {
    /// A token that never expires on its own.
    pub fn new(value: impl Into<CompactString>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    /// A token valid for `ttl` from now.
    pub fn with_ttl(value: impl Into<CompactString>, ttl: Duration) -> Self {
        Self {
            value: value.into(),
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// The raw token value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// An expired token counts as absent.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// The external "fetch current session token" operation.
pub trait TokenEndpoint: Send + Sync + 'static {
    /// Obtain a fresh token. One call per refresh cycle.
    fn fetch_token(&self) -> impl Future<Output = Result<CsrfToken, TokenError>> + Send;
}

/// Process-wide token state shared by all provisioner handles.
struct TokenState<E> {
    endpoint: E,
    /// Current token; read lock-free on every mount.
    slot: ArcSwapOption<CsrfToken>,
    /// Pending-flight handle. `Some` while a fetch is outstanding.
    inflight: Mutex<Option<watch::Receiver<bool>>>,
}

/// Ensures the session token is present, collapsing concurrent mounts into
/// a single outbound fetch. Cheap to clone; clones share state.
pub struct TokenProvisioner<E> {
    state: Arc<TokenState<E>>,
}

impl<E> Clone for TokenProvisioner<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: TokenEndpoint> TokenProvisioner<E> {
    pub fn new(endpoint: E) -> Self {
        Self {
            state: Arc::new(TokenState {
                endpoint,
                slot: ArcSwapOption::const_empty(),
                inflight: Mutex::new(None),
            }),
        }
    }

    /// The current token, if present and not expired.
    pub fn current(&self) -> Option<Arc<CsrfToken>> {
        let token = self.state.slot.load_full()?;
        if token.is_expired() { None } else { Some(token) }
    }

    /// Ensure a token is present, fetching one if needed.
    ///
    /// Infallible: a failed fetch leaves the slot empty and is only logged.
    /// The fetch itself runs detached, so a page unmounting mid-flight
    /// still lets the result land in the shared slot for future mounts.
    pub async fn ensure_token(&self) {
        if self.current().is_some() {
            return;
        }

        let mut done = {
            let mut inflight = self.state.inflight.lock();
            match inflight.as_ref() {
                // Join the pending flight. A closed channel is a stale
                // handle from an aborted fetch; start over in that case.
                Some(done) if done.has_changed().is_ok() => done.clone(),
                _ => {
                    let (tx, rx) = watch::channel(false);
                    *inflight = Some(rx.clone());
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        match state.endpoint.fetch_token().await {
                            Ok(token) => state.slot.store(Some(Arc::new(token))),
                            Err(err) => log!("token"; "fetch failed: {err}"),
                        }
                        *state.inflight.lock() = None;
                        tx.send_replace(true);
                    });
                    rx
                }
            }
        };

        let _ = done.wait_for(|done| *done).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockEndpoint {
        calls: AtomicUsize,
        delay: Option<Duration>,
        fail: bool,
    }

    impl MockEndpoint {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: None,
                fail: false,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: Some(delay),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: None,
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TokenEndpoint for Arc<MockEndpoint> {
        async fn fetch_token(&self) -> Result<CsrfToken, TokenError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(TokenError::Unreachable("connection refused".into()));
            }
            Ok(CsrfToken::new("tok-12345"))
        }
    }

    #[tokio::test]
    async fn test_fetches_and_stores_token() {
        let endpoint = MockEndpoint::new();
        let provisioner = TokenProvisioner::new(Arc::clone(&endpoint));

        assert!(provisioner.current().is_none());
        provisioner.ensure_token().await;

        assert_eq!(endpoint.calls(), 1);
        assert_eq!(provisioner.current().unwrap().value(), "tok-12345");
    }

    #[tokio::test]
    async fn test_present_token_skips_fetch() {
        let endpoint = MockEndpoint::new();
        let provisioner = TokenProvisioner::new(Arc::clone(&endpoint));

        provisioner.ensure_token().await;
        provisioner.ensure_token().await;
        provisioner.ensure_token().await;

        assert_eq!(endpoint.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_mounts_share_one_flight() {
        let endpoint = MockEndpoint::slow(Duration::from_millis(20));
        let provisioner = TokenProvisioner::new(Arc::clone(&endpoint));

        tokio::join!(
            provisioner.ensure_token(),
            provisioner.ensure_token(),
            provisioner.ensure_token(),
        );

        assert_eq!(endpoint.calls(), 1);
        assert!(provisioner.current().is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_swallowed() {
        let endpoint = MockEndpoint::failing();
        let provisioner = TokenProvisioner::new(Arc::clone(&endpoint));

        // Does not panic, does not error; the slot just stays empty
        provisioner.ensure_token().await;
        assert!(provisioner.current().is_none());

        // The next mount is allowed to try again
        provisioner.ensure_token().await;
        assert_eq!(endpoint.calls(), 2);
    }

    #[tokio::test]
    async fn test_expired_token_counts_as_absent() {
        let token = CsrfToken::with_ttl("short-lived", Duration::ZERO);
        assert!(token.is_expired());

        let endpoint = MockEndpoint::new();
        let provisioner = TokenProvisioner::new(Arc::clone(&endpoint));
        provisioner.state.slot.store(Some(Arc::new(token)));

        assert!(provisioner.current().is_none());
        provisioner.ensure_token().await;
        assert_eq!(endpoint.calls(), 1);
        assert!(!provisioner.current().unwrap().is_expired());
    }

    #[test]
    fn test_token_without_ttl_never_expires() {
        assert!(!CsrfToken::new("tok").is_expired());
    }
}
