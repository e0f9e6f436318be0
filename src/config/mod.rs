//! Application configuration management for `pageboot.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                         |
//! |---------------|-------------------------------------------------|
//! | `[site]`      | Site identity (host, base URL, default metadata)|
//! | `[analytics]` | Analytics feature toggle                        |
//!
//! # Example
//!
//! ```toml
//! [site]
//! host = "explorer.mainnetz.io"
//! base_url = "https://explorer.mainnetz.io"
//! network = "MainnetZ"
//! description = "Blockchain explorer for the MainnetZ network"
//! og_image_url = "https://explorer.mainnetz.io/static/og_image.png"
//!
//! [analytics]
//! enabled = true
//! ```

mod analytics;
pub mod defaults;
mod error;
mod site;

pub use analytics::AnalyticsConfig;
pub use error::ConfigError;
pub use site::SiteConfig;

use anyhow::Result;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Root configuration structure representing pageboot.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Site identity and default metadata
    #[serde(default)]
    pub site: SiteConfig,

    /// Analytics settings
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Validate the configuration for use by the page composer.
    ///
    /// Checks the invariants the metadata generator relies on:
    /// - `site.host` and `site.base_url` are non-empty
    /// - `site.base_url` is absolute and has no trailing slash
    /// - `site.og_image_url` is non-empty (every page must carry `og:image`)
    /// - `site.description` is non-empty (the site-wide fallback)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let site = &self.site;

        if site.host.is_empty() {
            return Err(ConfigError::Validation("`site.host` must not be empty".into()));
        }
        if site.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "`site.base_url` must not be empty".into(),
            ));
        }
        if !site.base_url.starts_with("http://") && !site.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "`site.base_url` must be absolute, got `{}`",
                site.base_url
            )));
        }
        if site.base_url.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "`site.base_url` must not end with `/`, got `{}`",
                site.base_url
            )));
        }
        if site.og_image_url.is_empty() {
            return Err(ConfigError::Validation(
                "`site.og_image_url` must not be empty".into(),
            ));
        }
        if site.description.is_empty() {
            return Err(ConfigError::Validation(
                "`site.description` must not be empty (used as the site-wide fallback)".into(),
            ));
        }

        Ok(())
    }
}
