//! `[bootstrap]` section configuration.
//!
//! Options for the bundler plugin and the generated loader script.
//!
//! # Example
//!
//! ```toml
//! [bootstrap]
//! app_name = "Dashboard"
//! loading_theme = "minimal"
//! enable_gzip = true
//! bootstrap_file_name = "AppBootstrap.js"
//!
//! [bootstrap.loader]
//! timeout = 8000            # ms per fetch attempt
//! retries = 2
//!
//! [bootstrap.priorities]
//! "polyfills.js" = 0        # per-entry override
//! vendor = 1
//!
//! [bootstrap.chunks]
//! charts = ["chart.js", "d3"]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Loading overlay look.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingTheme {
    #[default]
    Gradient,
    Minimal,
    /// Caller supplied markup (`custom_theme` / `custom_html`).
    Custom,
}

impl LoadingTheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gradient => "gradient",
            Self::Minimal => "minimal",
            Self::Custom => "custom",
        }
    }
}

/// Plugin and loader options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapOptions {
    /// Record gzip siblings in the manifest and let the loader prefer them.
    pub enable_gzip: bool,
    /// Show per-chunk progress text on the overlay.
    pub enable_progress: bool,
    /// Fall back to the uncompressed file when the gzip variant fails.
    pub enable_fallback: bool,
    /// Verbose browser console output from the generated scripts.
    pub debug: bool,
    pub app_name: String,
    pub app_icon: String,
    pub loading_theme: LoadingTheme,
    /// Overlay markup used when `loading_theme = "custom"`.
    pub custom_theme: String,
    /// Extra manual chunks, merged over the built-in `vendor` chunk.
    pub chunks: IndexMap<String, Vec<String>>,
    /// Priority overrides, keyed by bucket (`vendor`) or file name (`vendor.js`).
    pub priorities: IndexMap<String, u32>,
    /// URL prefix for emitted asset paths (e.g. a CDN origin or `/static`).
    pub asset_prefix: String,
    pub bootstrap_file_name: String,
    /// Minify generated scripts.
    pub minify: bool,
    pub loader: LoaderConfig,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            enable_gzip: false,
            enable_progress: true,
            enable_fallback: true,
            debug: false,
            app_name: "Application".into(),
            app_icon: "⚡".into(),
            loading_theme: LoadingTheme::Gradient,
            custom_theme: String::new(),
            chunks: IndexMap::new(),
            priorities: IndexMap::new(),
            asset_prefix: String::new(),
            bootstrap_file_name: "AppBootstrap.js".into(),
            minify: false,
            loader: LoaderConfig::default(),
        }
    }
}

impl BootstrapOptions {
    /// Whether the loader requests `.gz` variants before the originals.
    pub fn prefers_gzip(&self) -> bool {
        self.enable_gzip || self.loader.use_gzip
    }

    /// Whether a failed gzip fetch retries with the uncompressed file.
    pub fn falls_back(&self) -> bool {
        self.enable_fallback && self.loader.fallback_to_uncompressed
    }

    /// Public URL of an emitted file.
    pub fn public_path(&self, file_name: &str) -> String {
        let prefix = self.asset_prefix.trim_end_matches('/');
        let file_name = file_name.trim_start_matches('/');
        format!("{prefix}/{file_name}")
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let name = &self.bootstrap_file_name;
        if name.trim().is_empty() {
            diag.error("bootstrap.bootstrap_file_name", "must not be empty");
        } else if !name.ends_with(".js") {
            diag.error_with_hint(
                "bootstrap.bootstrap_file_name",
                format!("`{name}` is not a JavaScript file"),
                "use a name ending in `.js`, e.g. `AppBootstrap.js`",
            );
        } else if name.contains('/') || name.contains('\\') {
            diag.error(
                "bootstrap.bootstrap_file_name",
                "must be a file name, not a path",
            );
        }

        if self.loading_theme == LoadingTheme::Custom && self.custom_theme.trim().is_empty() {
            diag.error_with_hint(
                "bootstrap.custom_theme",
                "loading_theme is `custom` but no markup was given",
                "set `custom_theme` or pick `gradient` / `minimal`",
            );
        }

        self.loader.validate(diag);
    }
}

/// Fetch policy of the generated loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub debug: bool,
    pub use_gzip: bool,
    pub fallback_to_uncompressed: bool,
    /// Per-attempt timeout in milliseconds.
    pub timeout: u64,
    /// Attempts per variant.
    pub retries: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            debug: false,
            use_gzip: false,
            fallback_to_uncompressed: true,
            timeout: 10_000,
            retries: 3,
        }
    }
}

impl LoaderConfig {
    fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.retries == 0 {
            diag.error_with_hint(
                "bootstrap.loader.retries",
                "must be at least 1",
                "every asset variant is attempted `retries` times",
            );
        }
        if self.timeout == 0 {
            diag.error("bootstrap.loader.timeout", "must be greater than 0 ms");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_bootstrap_defaults() {
        let config = test_parse_config("");
        let opts = &config.bootstrap;
        assert_eq!(opts.app_name, "Application");
        assert_eq!(opts.bootstrap_file_name, "AppBootstrap.js");
        assert_eq!(opts.loading_theme, LoadingTheme::Gradient);
        assert_eq!(opts.loader.timeout, 10_000);
        assert_eq!(opts.loader.retries, 3);
        assert!(opts.loader.fallback_to_uncompressed);
        assert!(!opts.prefers_gzip());
    }

    #[test]
    fn test_nested_partial_override_keeps_sibling_defaults() {
        let config = test_parse_config("[bootstrap.loader]\nretries = 5");

        assert_eq!(config.bootstrap.loader.retries, 5);
        // siblings inside the nested table keep their defaults
        assert_eq!(config.bootstrap.loader.timeout, 10_000);
        assert!(config.bootstrap.loader.fallback_to_uncompressed);
        // and so does the parent table
        assert_eq!(config.bootstrap.app_name, "Application");
    }

    #[test]
    fn test_priorities_and_chunks_keep_order() {
        let config = test_parse_config(
            "[bootstrap.priorities]\nvendor = 1\npolyfills = 0\n\n[bootstrap.chunks]\ncharts = [\"d3\"]",
        );
        let keys: Vec<_> = config.bootstrap.priorities.keys().cloned().collect();
        assert_eq!(keys, ["vendor", "polyfills"]);
        assert_eq!(config.bootstrap.chunks["charts"], ["d3"]);
    }

    #[test]
    fn test_public_path() {
        let mut opts = BootstrapOptions::default();
        assert_eq!(opts.public_path("app.js"), "/app.js");

        opts.asset_prefix = "https://cdn.example.com/static/".into();
        assert_eq!(
            opts.public_path("/assets/app.css"),
            "https://cdn.example.com/static/assets/app.css"
        );
    }

    #[test]
    fn test_validate_rejects_bad_file_name_and_zero_retries() {
        let mut opts = BootstrapOptions::default();
        opts.bootstrap_file_name = "boot.txt".into();
        opts.loader.retries = 0;

        let mut diag = ConfigDiagnostics::new();
        opts.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_validate_custom_theme_requires_markup() {
        let mut opts = BootstrapOptions::default();
        opts.loading_theme = LoadingTheme::Custom;

        let mut diag = ConfigDiagnostics::new();
        opts.validate(&mut diag);
        assert!(diag.iter().any(|d| d.field == "bootstrap.custom_theme"));
    }
}
