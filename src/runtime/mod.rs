//! Host-side model of the loader runtime.
//!
//! The generated scripts run in the browser; this module models the same
//! behavior for headless hosts, embedding shells and tests.
//!
//! ```text
//! runtime/
//! ├── context    # RuntimeContext: manifest, state, ready flag, events
//! ├── events     # EventBridge (on / emit)
//! ├── state      # LoadingState machine
//! ├── readiness  # ReadinessDetector
//! ├── cache      # CacheManager (loading screen)
//! ├── hook       # BootstrapHook for UI frameworks
//! ├── pwa        # PwaManager
//! └── dom        # Document trait + MemoryDocument
//! ```

pub mod cache;
pub mod context;
pub mod dom;
pub mod events;
pub mod hook;
pub mod pwa;
pub mod readiness;
pub mod state;

pub use cache::{CacheManager, initialize_cache_manager};
pub use context::RuntimeContext;
pub use dom::{Document, MemoryDocument};
pub use events::{EventBridge, Unsubscribe};
pub use hook::{BootstrapHook, HookStatus};
pub use pwa::{DeferredPrompt, InstallOutcome, PwaHost, PwaManager, PwaStatus, WorkerState};
pub use readiness::{ReadinessDetector, Resolution};
pub use state::{LoadingState, Phase};
