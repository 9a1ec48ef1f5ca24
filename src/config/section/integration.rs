//! `[integration]` section configuration.
//!
//! Controls `unified-manifest.json`, the precache list consumed by SPA
//! handlers and service workers.
//!
//! # Example
//!
//! ```toml
//! [integration]
//! unified_manifest = true
//! include_pwa = true
//! custom_entries = [{ url = "/offline.html", revision = "3" }]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecacheEntry {
    pub url: String,
    #[serde(default)]
    pub revision: Option<String>,
}

impl PrecacheEntry {
    pub fn new(url: impl Into<String>, revision: Option<String>) -> Self {
        Self {
            url: url.into(),
            revision,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Emit `unified-manifest.json`.
    pub unified_manifest: bool,
    /// List `manifest.webmanifest`.
    pub include_pwa: bool,
    /// List `sw.js` and `registerSW.js`.
    pub include_sw: bool,
    pub custom_entries: Vec<PrecacheEntry>,
}

impl IntegrationConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (idx, entry) in self.custom_entries.iter().enumerate() {
            if entry.url.trim().is_empty() {
                diag.error(
                    format!("integration.custom_entries[{idx}].url"),
                    "must not be empty",
                );
            }
        }
    }
}
