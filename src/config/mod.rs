//! Project configuration from `bootkit.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── bootstrap  # [bootstrap], [bootstrap.loader]
//! │   ├── pwa        # [pwa], [pwa.manifest], [pwa.service_worker], [pwa.install_prompt]
//! │   ├── workbox    # [workbox], [workbox.strategies], [workbox.expiration]
//! │   ├── readiness  # [readiness]
//! │   ├── cache      # [cache.loading_screen]
//! │   └── integration# [integration]
//! ├── error.rs       # ConfigError, ConfigDiagnostics
//! └── mod.rs         # BootkitConfig (this file)
//! ```
//!
//! The file is optional: a missing `bootkit.toml` yields the defaults.
//!
//! # Resolution
//!
//! Defaults are resolved per nested struct. A table that names one field keeps
//! the defaults of all its other fields, and an absent table keeps the whole
//! default struct. Unknown keys are reported as warnings and ignored.

pub mod error;
pub mod section;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{
    BootstrapOptions, CacheManagerConfig, CacheStrategies, CacheStrategy, DisplayMode,
    ExpirationConfig, IconConfig, InstallPromptConfig, IntegrationConfig, LoaderConfig,
    LoadingScreenConfig, LoadingTheme, Orientation, PrecacheEntry, PromptPosition, PwaConfig,
    ReadinessConfig, ServiceWorkerConfig, UpdateStrategy, WebManifestConfig, WorkboxOptions,
};

use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing bootkit.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootkitConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    pub bootstrap: BootstrapOptions,
    pub pwa: PwaConfig,
    pub workbox: WorkboxOptions,
    pub readiness: ReadinessConfig,
    pub cache: CacheManagerConfig,
    pub integration: IntegrationConfig,
}

impl BootkitConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_path(path)?
        } else {
            crate::debug!("config"; "{} not found, using defaults", path.display());
            Self::default()
        };

        config.config_path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            log!("warning"; "- {}", field);
        }
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.bootstrap.validate(&mut diag);
        self.pwa.validate(&mut diag);
        if self.pwa.enable {
            self.workbox.validate(&mut diag);
        }
        self.readiness.validate(&mut diag);
        self.cache.validate(&mut diag);
        self.integration.validate(&mut diag);

        diag.into_result()
    }

    /// Whether `sw.js` is generated.
    pub fn emits_service_worker(&self) -> bool {
        self.pwa.enable && self.workbox.enabled
    }

    /// Whether `registerSW.js` is generated and injected.
    pub fn registers_service_worker(&self) -> bool {
        self.emits_service_worker() && self.pwa.service_worker.enabled
    }

    /// Apply a CLI override when present.
    pub fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> BootkitConfig {
    let (parsed, ignored) = BootkitConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
