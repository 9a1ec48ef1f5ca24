//! PWA file generation.
//!
//! Everything here is text generation from configuration and the asset
//! manifest: the web app manifest, the service worker, its registration
//! script and the unified precache manifest. Browser-side behaviour of the
//! generated worker lives in `src/embed/runtime/sw.js`.

mod register;
mod service_worker;
mod unified;
mod webmanifest;

pub use register::{REGISTER_SW_FILE, render_register_script};
pub use service_worker::{SERVICE_WORKER_FILE, render_service_worker};
pub use unified::{
    UNIFIED_MANIFEST_FILE, UNIFIED_MANIFEST_VERSION, UnifiedManifest, UnifiedMetadata,
};
pub use webmanifest::{WEB_MANIFEST_FILE, WebAppManifest, render_web_manifest};

use thiserror::Error;

/// Glob of the Workbox runtime a bundler PWA integration may emit.
pub const WORKBOX_FILE_PATTERN: &str = "workbox-*.js";

#[derive(Debug, Error)]
pub enum PwaError {
    #[error("failed to serialize {0}: {1}")]
    Serialize(&'static str, #[source] serde_json::Error),
}
