//! `[readiness]` section configuration.
//!
//! Fallback DOM polling used by the loading-screen manager and the framework
//! hook when the host application never signals readiness itself.
//!
//! # Example
//!
//! ```toml
//! [readiness]
//! root_id = "app"
//! markers = [".shell"]
//! fallback_timeout_ms = 5000
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Id of the node the application mounts into.
    pub root_id: String,
    /// Class selectors that identify rendered application content.
    pub markers: Vec<String>,
    pub poll_interval_ms: u64,
    /// Force readiness after this long without any other signal.
    pub fallback_timeout_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            root_id: "root".into(),
            markers: vec![
                ".app".into(),
                ".home-page".into(),
                ".system-config-page".into(),
                ".video-player-page".into(),
            ],
            poll_interval_ms: 100,
            fallback_timeout_ms: 3_000,
        }
    }
}

impl ReadinessConfig {
    /// Poll period, never shorter than one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }

    /// Marker class names without the leading dot.
    pub fn marker_classes(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(|m| m.trim_start_matches('.'))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.poll_interval_ms == 0 {
            diag.error("readiness.poll_interval_ms", "must be greater than 0");
        }
        if self.fallback_timeout_ms < self.poll_interval_ms {
            diag.error_with_hint(
                "readiness.fallback_timeout_ms",
                "is shorter than the poll interval",
                "the timeout should allow at least one poll",
            );
        }
        if self.root_id.trim().is_empty() {
            diag.error("readiness.root_id", "must not be empty");
        }
    }
}
