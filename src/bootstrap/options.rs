//! Option literals embedded into the loader script.

use serde::Serialize;

use crate::config::{BootstrapOptions, ReadinessConfig};

/// Loader options as seen by the generated script.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderOptions<'a> {
    pub enable_gzip: bool,
    pub enable_progress: bool,
    pub enable_fallback: bool,
    pub debug: bool,
    pub app_name: &'a str,
    pub app_icon: &'a str,
    pub loading_theme: &'static str,
    pub custom_theme: &'a str,
    pub asset_prefix: &'a str,
    pub loader: FetchPolicy,
}

/// Per-asset fetch policy.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FetchPolicy {
    /// Milliseconds per attempt.
    pub timeout: u64,
    pub retries: u32,
}

impl<'a> LoaderOptions<'a> {
    pub fn from_options(opts: &'a BootstrapOptions) -> Self {
        Self {
            enable_gzip: opts.prefers_gzip(),
            enable_progress: opts.enable_progress,
            enable_fallback: opts.falls_back(),
            debug: opts.debug || opts.loader.debug,
            app_name: &opts.app_name,
            app_icon: &opts.app_icon,
            loading_theme: opts.loading_theme.as_str(),
            custom_theme: &opts.custom_theme,
            asset_prefix: opts.asset_prefix.trim_end_matches('/'),
            loader: FetchPolicy {
                timeout: opts.loader.timeout,
                retries: opts.loader.retries.max(1),
            },
        }
    }
}

/// Readiness settings as seen by the generated script.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessOptions<'a> {
    pub root_id: &'a str,
    pub markers: &'a [String],
    /// Milliseconds.
    pub poll_interval: u64,
    /// Milliseconds.
    pub fallback_timeout: u64,
}

impl<'a> ReadinessOptions<'a> {
    pub fn from_config(config: &'a ReadinessConfig) -> Self {
        Self {
            root_id: &config.root_id,
            markers: &config.markers,
            poll_interval: config.poll_interval_ms,
            fallback_timeout: config.fallback_timeout_ms,
        }
    }
}
