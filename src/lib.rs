//! Asset manifests, bootstrap loaders and PWA scaffolding for single-page
//! app builds.
//!
//! ```text
//! build time                         run time
//! ──────────                         ────────
//! manifest   scan output, fingerprint   runtime   context, events, state,
//! bootstrap  loader script               readiness detection, loading
//! pwa        webmanifest, sw.js          screen, hooks, PWA manager
//! plugin     bundler hooks
//! cli        `manifest`, `build`
//! ```

pub mod asset;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod embed;
pub mod logger;
pub mod manifest;
pub mod plugin;
pub mod pwa;
pub mod runtime;
pub mod utils;
