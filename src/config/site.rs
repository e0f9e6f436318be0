//! `[site]` section configuration.
//!
//! Site identity and the site-wide metadata defaults the generator falls
//! back to when a route supplies nothing of its own.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in pageboot.toml - site identity and metadata defaults.
///
/// # Example
/// ```toml
/// [site]
/// host = "explorer.mainnetz.io"
/// base_url = "https://explorer.mainnetz.io"
/// network = "MainnetZ"
/// description = "Blockchain explorer for the MainnetZ network"
/// og_image_url = "https://explorer.mainnetz.io/static/og_image.png"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Host name, used for the `twitter:domain` tag.
    #[serde(default = "defaults::site::host")]
    #[educe(Default = defaults::site::host())]
    pub host: String,

    /// Absolute base URL for canonical links, without trailing slash.
    #[serde(default = "defaults::site::base_url")]
    #[educe(Default = defaults::site::base_url())]
    pub base_url: String,

    /// Network name, substituted for `%network%` in route templates.
    #[serde(default = "defaults::site::network")]
    #[educe(Default = defaults::site::network())]
    pub network: String,

    /// Site-wide default description, used when a route declares none.
    #[serde(default = "defaults::site::description")]
    #[educe(Default = defaults::site::description())]
    pub description: String,

    /// Social-preview image URL, used for `og:image` and `twitter:image`.
    #[serde(default = "defaults::site::og_image_url")]
    #[educe(Default = defaults::site::og_image_url())]
    pub og_image_url: String,
}

#[cfg(test)]
mod tests {
    use super::super::AppConfig;

    #[test]
    fn test_site_config_defaults() {
        let config: AppConfig = toml::from_str("[site]").unwrap();

        assert_eq!(config.site.host, "localhost");
        assert_eq!(config.site.base_url, "http://localhost:3000");
        assert_eq!(config.site.network, "MainnetZ");
        assert!(!config.site.description.is_empty());
        assert!(!config.site.og_image_url.is_empty());
    }

    #[test]
    fn test_site_config_partial_override() {
        let config: AppConfig = toml::from_str(
            r#"
            [site]
            network = "Testnet"
        "#,
        )
        .unwrap();

        assert_eq!(config.site.network, "Testnet");
        // Untouched fields keep their defaults
        assert_eq!(config.site.host, "localhost");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [site]
            hostname = "typo.example.com"
        "#,
        );

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn test_site_config_unicode() {
        let config: AppConfig = toml::from_str(
            r#"
            [site]
            network = "MainnetZ ⚡"
            description = "区块链浏览器"
        "#,
        )
        .unwrap();

        assert_eq!(config.site.network, "MainnetZ ⚡");
        assert_eq!(config.site.description, "区块链浏览器");
    }
}
