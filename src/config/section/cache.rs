//! `[cache]` section configuration.
//!
//! Loading-screen manager settings.
//!
//! # Example
//!
//! ```toml
//! [cache.loading_screen]
//! theme = "minimal"
//! ```

use serde::{Deserialize, Serialize};

use super::LoadingTheme;
use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheManagerConfig {
    pub loading_screen: LoadingScreenConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingScreenConfig {
    pub theme: LoadingTheme,
    /// Replaces the themed markup entirely. Should carry `id="loading-screen"`.
    pub custom_html: Option<String>,
}

impl CacheManagerConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let screen = &self.loading_screen;
        if screen.theme == LoadingTheme::Custom && screen.custom_html.is_none() {
            diag.error(
                "cache.loading_screen.custom_html",
                "theme is `custom` but no markup was given",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_loading_screen_theme() {
        let config = test_parse_config("[cache.loading_screen]\ntheme = \"minimal\"");
        assert_eq!(config.cache.loading_screen.theme, LoadingTheme::Minimal);
        assert!(config.cache.loading_screen.custom_html.is_none());
    }
}
