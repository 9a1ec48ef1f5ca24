//! `[workbox]` section configuration.
//!
//! Caching policy of the generated service worker. Only used when `[pwa]` is
//! enabled.
//!
//! # Example
//!
//! ```toml
//! [workbox]
//! cache_name_prefix = "dashboard"
//!
//! [workbox.strategies]
//! js = "cache-first"
//! api = "network-first"
//!
//! [workbox.expiration]
//! max_entries = 120
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Runtime caching strategy for one asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    CacheFirst,
    StaleWhileRevalidate,
    NetworkFirst,
}

impl CacheStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CacheFirst => "cache-first",
            Self::StaleWhileRevalidate => "stale-while-revalidate",
            Self::NetworkFirst => "network-first",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheStrategies {
    pub js: CacheStrategy,
    pub css: CacheStrategy,
    pub images: CacheStrategy,
    pub html: CacheStrategy,
    pub api: CacheStrategy,
}

impl Default for CacheStrategies {
    fn default() -> Self {
        Self {
            js: CacheStrategy::StaleWhileRevalidate,
            css: CacheStrategy::StaleWhileRevalidate,
            images: CacheStrategy::CacheFirst,
            html: CacheStrategy::NetworkFirst,
            api: CacheStrategy::NetworkFirst,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpirationConfig {
    /// Entries kept per runtime cache.
    pub max_entries: u32,
    /// Age after which a cached response is treated as missing.
    pub max_age_seconds: u64,
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self {
            max_entries: 60,
            max_age_seconds: 30 * 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkboxOptions {
    pub enabled: bool,
    pub cache_name_prefix: String,
    pub strategies: CacheStrategies,
    pub expiration: ExpirationConfig,
    /// Precache every manifest entry on install.
    pub precache: bool,
    /// Relay `sync` events to open clients.
    pub background_sync: bool,
}

impl Default for WorkboxOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_name_prefix: "app-bootstrap".into(),
            strategies: CacheStrategies::default(),
            expiration: ExpirationConfig::default(),
            precache: true,
            background_sync: false,
        }
    }
}

impl WorkboxOptions {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enabled {
            return;
        }
        let prefix = &self.cache_name_prefix;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c))
        {
            diag.error_with_hint(
                "workbox.cache_name_prefix",
                format!("`{prefix}` is not a usable cache name prefix"),
                "use letters, digits, `-`, `_` or `.`",
            );
        }
        if self.expiration.max_entries == 0 {
            diag.error("workbox.expiration.max_entries", "must be at least 1");
        }
    }
}
