//! Configuration section definitions.
//!
//! Every section struct derives `Deserialize` with `#[serde(default)]` and
//! implements `Default`, so a partially specified table keeps the defaults of
//! every field it does not name, at every nesting level.

pub mod bootstrap;
pub mod cache;
pub mod integration;
pub mod pwa;
pub mod readiness;
pub mod workbox;

pub use bootstrap::{BootstrapOptions, LoaderConfig, LoadingTheme};
pub use cache::{CacheManagerConfig, LoadingScreenConfig};
pub use integration::{IntegrationConfig, PrecacheEntry};
pub use pwa::{
    DisplayMode, IconConfig, InstallPromptConfig, Orientation, PromptPosition, PwaConfig,
    ServiceWorkerConfig, UpdateStrategy, WebManifestConfig,
};
pub use readiness::ReadinessConfig;
pub use workbox::{CacheStrategies, CacheStrategy, ExpirationConfig, WorkboxOptions};
