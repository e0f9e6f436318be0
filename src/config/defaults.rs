//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn host() -> String {
        "localhost".into()
    }

    pub fn base_url() -> String {
        "http://localhost:3000".into()
    }

    pub fn network() -> String {
        "MainnetZ".into()
    }

    pub fn description() -> String {
        "Open-source blockchain explorer with real-time transaction, block and account data"
            .into()
    }

    pub fn og_image_url() -> String {
        "http://localhost:3000/static/og_placeholder.png".into()
    }
}
