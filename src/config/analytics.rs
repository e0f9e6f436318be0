//! `[analytics]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[analytics]` section in pageboot.toml.
///
/// When disabled, the analytics coordinator never initializes its backend
/// and page-view logging is a no-op for the whole process.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Whether the analytics client should be initialized at all.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub enabled: bool,
}
