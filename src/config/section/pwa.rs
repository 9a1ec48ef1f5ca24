//! `[pwa]` section configuration.
//!
//! Disabled by default. When `enable = false` nothing PWA related is emitted,
//! injected or registered.
//!
//! # Example
//!
//! ```toml
//! [pwa]
//! enable = true
//!
//! [pwa.manifest]
//! name = "Dashboard"
//! theme_color = "#0f172a"
//! icons = [{ src = "/icon-192.png", sizes = "192x192", type = "image/png" }]
//!
//! [pwa.service_worker]
//! update_strategy = "minimal"
//!
//! [pwa.install_prompt]
//! position = "top"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PwaConfig {
    pub enable: bool,
    pub manifest: WebManifestConfig,
    pub service_worker: ServiceWorkerConfig,
    pub install_prompt: InstallPromptConfig,
}

impl PwaConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        if self.manifest.name.trim().is_empty() {
            diag.error("pwa.manifest.name", "must not be empty when pwa is enabled");
        }
        if !self.service_worker.scope.starts_with('/') {
            diag.error_with_hint(
                "pwa.service_worker.scope",
                format!("`{}` is not an absolute path", self.service_worker.scope),
                "scopes are URL paths such as `/` or `/app/`",
            );
        }
        for (idx, icon) in self.manifest.icons.iter().enumerate() {
            if icon.src.trim().is_empty() || icon.sizes.trim().is_empty() {
                diag.error(
                    format!("pwa.manifest.icons[{idx}]"),
                    "icons need both `src` and `sizes`",
                );
            }
        }
    }
}

// ============================================================================
// Web app manifest
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    Standalone,
    Fullscreen,
    MinimalUi,
    Browser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconConfig {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebManifestConfig {
    pub name: String,
    /// Falls back to `name`.
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub theme_color: String,
    pub background_color: String,
    pub display: DisplayMode,
    pub orientation: Option<Orientation>,
    /// Falls back to `/`.
    pub scope: Option<String>,
    /// Falls back to `/`.
    pub start_url: Option<String>,
    pub icons: Vec<IconConfig>,
}

impl Default for WebManifestConfig {
    fn default() -> Self {
        Self {
            name: "Progressive Web App".into(),
            short_name: None,
            description: None,
            theme_color: "#000000".into(),
            background_color: "#ffffff".into(),
            display: DisplayMode::Standalone,
            orientation: None,
            scope: None,
            start_url: None,
            icons: Vec::new(),
        }
    }
}

// ============================================================================
// Service worker registration
// ============================================================================

/// How the browser revalidates the worker script and its imports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStrategy {
    /// HTTP cache used for the worker and its imports.
    #[default]
    All,
    /// HTTP cache used for imports only.
    Hierarchical,
    /// HTTP cache bypassed for everything.
    Minimal,
}

impl UpdateStrategy {
    /// Value for the `updateViaCache` registration option.
    pub const fn update_via_cache(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Hierarchical => "imports",
            Self::Minimal => "none",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceWorkerConfig {
    pub enabled: bool,
    pub src: String,
    pub scope: String,
    pub update_strategy: UpdateStrategy,
    pub skip_waiting: bool,
    pub clients_claim: bool,
}

impl Default for ServiceWorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            src: "/sw.js".into(),
            scope: "/".into(),
            update_strategy: UpdateStrategy::All,
            skip_waiting: true,
            clients_claim: true,
        }
    }
}

// ============================================================================
// Install prompt
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptPosition {
    Top,
    #[default]
    Bottom,
    Center,
}

impl PromptPosition {
    /// Inline CSS placing the prompt box.
    pub const fn css(self) -> &'static str {
        match self {
            Self::Top => "top: 20px;",
            Self::Bottom => "bottom: 20px;",
            Self::Center => "top: 50%; transform: translateY(-50%);",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallPromptConfig {
    pub enabled: bool,
    pub text: String,
    pub button_text: String,
    pub position: PromptPosition,
}

impl Default for InstallPromptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "Install this app for a better experience".into(),
            button_text: "Install".into(),
            position: PromptPosition::Bottom,
        }
    }
}
