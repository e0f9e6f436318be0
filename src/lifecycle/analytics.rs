//! Analytics initialization and page-view logging.
//!
//! The analytics client must be constructed at most once per process, but
//! page render must never wait for a third-party handshake. The
//! coordinator resolves that tension with an explicit process-lifetime
//! state machine:
//!
//! ```text
//! Uninitialized ──► Initializing ──► Ready
//!                        │
//!                        └─────────► Failed   (permanent, no retry)
//! ```
//!
//! The first mount wins the `Uninitialized → Initializing` transition and
//! performs the backend handshake; every other mount just reads whatever
//! state that first initialization has reached. Page-view logging is gated
//! on the state a mount observed: a page visited before the client is
//! `Ready` produces no event for that visit. Intentionally lossy — no
//! queueing, no retry.

use crate::{log, routes::Route};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Backend setup failures. Permanent for the process.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("client setup failed: {0}")]
    Setup(String),
}

/// Process-wide analytics initialization state. Never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl InitState {
    /// Whether the state machine has settled.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl std::fmt::Display for InitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The external analytics collaborator.
pub trait AnalyticsBackend: Send + Sync + 'static {
    /// Construct/handshake the client. Called at most once per process.
    fn init(&self) -> impl Future<Output = Result<(), AnalyticsError>> + Send;

    /// Record one page-view event for a route.
    fn record_page_view(&self, route: Route);
}

struct CoordinatorState<B> {
    backend: B,
    enabled: bool,
    /// Single owner of the init state; `send_if_modified` guards the
    /// one-shot `Uninitialized → Initializing` transition.
    state: watch::Sender<InitState>,
}

/// Owns the process-wide init state machine and the page-view gate.
/// Cheap to clone; clones share state.
pub struct AnalyticsCoordinator<B> {
    inner: Arc<CoordinatorState<B>>,
}

impl<B> Clone for AnalyticsCoordinator<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: AnalyticsBackend> AnalyticsCoordinator<B> {
    /// A coordinator in the `Uninitialized` state.
    ///
    /// With `enabled = false` the backend is never initialized and every
    /// page view is a no-op for the whole process.
    pub fn new(backend: B, enabled: bool) -> Self {
        let (state, _) = watch::channel(InitState::Uninitialized);
        Self {
            inner: Arc::new(CoordinatorState {
                backend,
                enabled,
                state,
            }),
        }
    }

    /// Current init state, read without waiting.
    pub fn state(&self) -> InitState {
        *self.inner.state.borrow()
    }

    /// Initialize the backend at most once per process.
    ///
    /// The first caller performs the handshake and returns the terminal
    /// state it produced. Every later caller is a no-op that returns the
    /// current state — possibly still `Initializing` — without waiting.
    pub async fn ensure_init(&self) -> InitState {
        if !self.inner.enabled {
            return self.state();
        }

        let mut claimed = false;
        self.inner.state.send_if_modified(|state| {
            if *state == InitState::Uninitialized {
                *state = InitState::Initializing;
                claimed = true;
                true
            } else {
                false
            }
        });
        if !claimed {
            return self.state();
        }

        // The handshake runs detached so that a page unmounting mid-init
        // still lets the outcome commit for future mounts.
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let next = match inner.backend.init().await {
                Ok(()) => InitState::Ready,
                Err(err) => {
                    log!("analytics"; "init failed, page views disabled for this process: {err}");
                    InitState::Failed
                }
            };
            inner.state.send_replace(next);
            next
        });

        handle.await.unwrap_or_else(|_| self.state())
    }

    /// Record one page-view event for this mount, iff the readiness the
    /// mount observed is `Ready`. Anything else is a silent no-op.
    pub fn log_page_view(&self, observed: InitState, route: Route) {
        if observed == InitState::Ready {
            self.inner.backend.record_page_view(route);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockBackend {
        init_calls: AtomicUsize,
        events: Mutex<Vec<Route>>,
        delay: Option<Duration>,
        fail: bool,
    }

    impl MockBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                init_calls: AtomicUsize::new(0),
                events: Mutex::new(Vec::new()),
                delay: None,
                fail: false,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                init_calls: AtomicUsize::new(0),
                events: Mutex::new(Vec::new()),
                delay: Some(delay),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                init_calls: AtomicUsize::new(0),
                events: Mutex::new(Vec::new()),
                delay: None,
                fail: true,
            })
        }

        fn init_calls(&self) -> usize {
            self.init_calls.load(Ordering::SeqCst)
        }

        fn events(&self) -> Vec<Route> {
            self.events.lock().clone()
        }
    }

    impl AnalyticsBackend for Arc<MockBackend> {
        async fn init(&self) -> Result<(), AnalyticsError> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(AnalyticsError::Setup("handshake timed out".into()));
            }
            Ok(())
        }

        fn record_page_view(&self, route: Route) {
            self.events.lock().push(route);
        }
    }

    #[tokio::test]
    async fn test_init_happy_path() {
        let backend = MockBackend::new();
        let coordinator = AnalyticsCoordinator::new(Arc::clone(&backend), true);

        assert_eq!(coordinator.state(), InitState::Uninitialized);
        let state = coordinator.ensure_init().await;
        assert_eq!(state, InitState::Ready);
        assert_eq!(coordinator.state(), InitState::Ready);
        assert_eq!(backend.init_calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_init_runs_backend_once() {
        let backend = MockBackend::slow(Duration::from_millis(20));
        let coordinator = AnalyticsCoordinator::new(Arc::clone(&backend), true);

        let states = tokio::join!(
            coordinator.ensure_init(),
            coordinator.ensure_init(),
            coordinator.ensure_init(),
            coordinator.ensure_init(),
        );

        assert_eq!(backend.init_calls(), 1);
        // Losers observed a non-terminal state; exactly one caller drove
        // the machine to its single terminal state.
        let states = [states.0, states.1, states.2, states.3];
        assert!(states.contains(&InitState::Ready));
        assert!(coordinator.state().is_terminal());
        assert_eq!(coordinator.state(), InitState::Ready);
    }

    #[tokio::test]
    async fn test_failed_init_is_permanent() {
        let backend = MockBackend::failing();
        let coordinator = AnalyticsCoordinator::new(Arc::clone(&backend), true);

        assert_eq!(coordinator.ensure_init().await, InitState::Failed);
        // Later mounts read Failed and never re-run the handshake
        assert_eq!(coordinator.ensure_init().await, InitState::Failed);
        assert_eq!(backend.init_calls(), 1);
    }

    #[tokio::test]
    async fn test_disabled_never_initializes() {
        let backend = MockBackend::new();
        let coordinator = AnalyticsCoordinator::new(Arc::clone(&backend), false);

        assert_eq!(coordinator.ensure_init().await, InitState::Uninitialized);
        assert_eq!(backend.init_calls(), 0);
    }

    #[tokio::test]
    async fn test_page_view_gated_on_observed_ready() {
        let backend = MockBackend::new();
        let coordinator = AnalyticsCoordinator::new(Arc::clone(&backend), true);

        coordinator.log_page_view(InitState::Uninitialized, Route::Home);
        coordinator.log_page_view(InitState::Initializing, Route::Home);
        coordinator.log_page_view(InitState::Failed, Route::Home);
        assert!(backend.events().is_empty());

        coordinator.log_page_view(InitState::Ready, Route::Txs);
        assert_eq!(backend.events(), vec![Route::Txs]);
    }

    #[tokio::test]
    async fn test_failed_init_then_log_records_nothing() {
        let backend = MockBackend::failing();
        let coordinator = AnalyticsCoordinator::new(Arc::clone(&backend), true);

        let observed = coordinator.ensure_init().await;
        coordinator.log_page_view(observed, Route::Home);

        assert!(backend.events().is_empty());
    }
}
