//! Ad-blocker detection.
//!
//! One lightweight probe per page visit (e.g. fetching a resource that
//! common blocking rules match), resolving to a boolean other consumers can
//! read from the page session. The result has no control-flow effect on the
//! bootstrap itself; a failed probe counts as "not detected" and there is
//! no retry.

use super::PageSession;
use crate::log;
use thiserror::Error;

/// Probe failures. Treated identically to "not detected".
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe request failed: {0}")]
    Request(String),
}

/// The client-environment probe collaborator.
pub trait AdblockProbe: Send + Sync + 'static {
    /// Run the probe once. `Ok(true)` means a blocker was detected.
    fn probe(&self) -> impl Future<Output = Result<bool, ProbeError>> + Send;
}

/// Runs the probe at most once per page visit and caches the outcome in
/// the session.
pub struct AdblockDetector<P> {
    probe: P,
}

impl<P: AdblockProbe> AdblockDetector<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Probe the environment, or return the session's cached outcome.
    pub async fn detect(&self, session: &PageSession) -> bool {
        *session
            .adblock
            .get_or_init(|| async {
                match self.probe.probe().await {
                    Ok(detected) => detected,
                    Err(err) => {
                        log!("adblock"; "probe failed, treating as not detected: {err}");
                        false
                    }
                }
            })
            .await
    }
}
