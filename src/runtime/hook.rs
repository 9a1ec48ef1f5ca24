//! Framework-facing view of the loading state.
//!
//! A [`BootstrapHook`] keeps its own copy of the state, fed by the event
//! bridge, so a component can hold one without touching the shared context.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};

use super::{
    context::RuntimeContext,
    events::{self, Unsubscribe},
    readiness::{ReadinessDetector, Resolution},
    state::{LoadingState, Phase},
};
use crate::{debug, manifest::AssetManifest};

/// Events mirrored into the local state.
const MIRRORED: [&str; 6] = [
    events::LOADING_START,
    events::LOADING_PROGRESS,
    events::LOADING_COMPLETE,
    events::LOADING_ERROR,
    events::LOADING_RETRY,
    events::APP_READY,
];

/// Summary for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookStatus {
    pub phase: Phase,
    pub progress: u8,
    pub loaded_chunks: usize,
    pub total_chunks: usize,
    pub error: Option<String>,
}

pub struct BootstrapHook {
    ctx: RuntimeContext,
    state: Arc<watch::Sender<LoadingState>>,
    manifest: Arc<RwLock<Option<Arc<AssetManifest>>>>,
    detector: ReadinessDetector,
    task: Mutex<Option<JoinHandle<Resolution>>>,
    subscriptions: Vec<Unsubscribe>,
}

impl std::fmt::Debug for BootstrapHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapHook")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl BootstrapHook {
    /// Attach to `ctx`.
    ///
    /// When the context is not ready yet and a tokio runtime is available,
    /// `detector` runs in a background task until loading settles.
    pub fn new(ctx: RuntimeContext, detector: ReadinessDetector) -> Self {
        let (state, _) = watch::channel(ctx.state());
        let state = Arc::new(state);
        let manifest = Arc::new(RwLock::new(ctx.manifest()));

        let mut subscriptions: Vec<Unsubscribe> = MIRRORED
            .into_iter()
            .map(|event| {
                let state = Arc::clone(&state);
                let clock = ctx.clone();
                ctx.events().on(event, move |payload| {
                    let now = clock.now();
                    state.send_if_modified(|s| s.apply(event, payload, now));
                })
            })
            .collect();

        subscriptions.push({
            let manifest = Arc::clone(&manifest);
            let source = ctx.clone();
            ctx.events().on(events::MANIFEST_LOADED, move |_: &Value| {
                *manifest.write() = source.manifest();
            })
        });

        let hook = Self {
            ctx,
            state,
            manifest,
            detector,
            task: Mutex::new(None),
            subscriptions,
        };
        if !hook.ctx.is_ready() {
            hook.spawn_detector();
        }
        hook
    }

    fn spawn_detector(&self) {
        let Ok(handle) = Handle::try_current() else {
            debug!("hook"; "no async runtime, readiness detection skipped");
            return;
        };
        let detector = self.detector.clone();
        let ctx = self.ctx.clone();
        let task = handle.spawn(async move { detector.wait(&ctx).await });
        if let Some(previous) = self.task.lock().replace(task) {
            previous.abort();
        }
    }

    pub fn state(&self) -> LoadingState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.state.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().phase() == Phase::Ready
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn manifest(&self) -> Option<Arc<AssetManifest>> {
        self.manifest.read().clone()
    }

    /// Progress of one chunk: 100 once loaded, 0 otherwise.
    ///
    /// After readiness every chunk the manifest knows counts as loaded.
    /// `name` may be a logical or an emitted path.
    pub fn chunk_progress(&self, name: &str) -> u8 {
        let state = self.state.borrow();
        if state.loaded_chunks.iter().any(|c| c == name) {
            return 100;
        }
        if state.phase() != Phase::Ready {
            return 0;
        }
        let known = self.manifest.read().as_ref().is_some_and(|m| {
            m.get(name).is_some() || m.records().any(|(_, r)| r.original == name)
        });
        if known { 100 } else { 0 }
    }

    pub fn overall_progress(&self) -> u8 {
        self.state.borrow().progress
    }

    pub fn status(&self) -> HookStatus {
        let state = self.state.borrow();
        HookStatus {
            phase: state.phase(),
            progress: state.progress,
            loaded_chunks: state.loaded_chunks.len(),
            total_chunks: state.total_chunks,
            error: state.error.clone(),
        }
    }

    /// Ask every listener to start over and restart detection.
    pub fn retry(&self) {
        debug!("hook"; "retry requested");
        self.ctx.events().emit(events::LOADING_RETRY, &Value::Null);

        // the local state resets even when the bridge is detached
        let now = self.ctx.now();
        self.state.send_if_modified(|s| {
            if s.phase() == Phase::Loading {
                false
            } else {
                s.retry(now)
            }
        });
        self.spawn_detector();
    }
}

impl Drop for BootstrapHook {
    fn drop(&mut self) {
        for handle in self.subscriptions.drain(..) {
            handle.unsubscribe();
        }
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ReadinessConfig,
        manifest::ManifestBuilder,
        runtime::dom::{Document, MemoryDocument},
    };
    use serde_json::json;
    use std::time::Duration;

    fn detector() -> ReadinessDetector {
        let doc: Arc<dyn Document> = Arc::new(MemoryDocument::new());
        ReadinessDetector::new(ReadinessConfig::default(), doc)
    }

    fn manifest() -> AssetManifest {
        let mut builder = ManifestBuilder::new().quiet(true);
        builder.add_file("/vendor-1a2b3c4d.js", 10, None);
        builder.add_file("/app-5e6f7a8b.js", 10, None);
        builder.build()
    }

    #[tokio::test(start_paused = true)]
    async fn test_mirrors_context_events() {
        let ctx = RuntimeContext::new();
        let hook = BootstrapHook::new(ctx.clone(), detector());
        assert!(hook.manifest().is_none());

        ctx.init(manifest());
        assert!(hook.manifest().is_some());
        assert_eq!(hook.state().total_chunks, 2);

        ctx.events().emit(
            events::LOADING_PROGRESS,
            &json!({ "chunk": "/vendor.js", "progress": 50 }),
        );
        assert_eq!(hook.overall_progress(), 50);
        assert_eq!(hook.chunk_progress("/vendor.js"), 100);
        assert_eq!(hook.chunk_progress("/app.js"), 0);

        ctx.signal_app_ready();
        assert!(hook.is_ready());
        assert_eq!(hook.chunk_progress("/app.js"), 100);
        assert_eq!(hook.chunk_progress("/app-5e6f7a8b.js"), 100);
        assert_eq!(hook.chunk_progress("/missing.js"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detector_task_drives_ready() {
        let ctx = RuntimeContext::new();
        let hook = BootstrapHook::new(ctx.clone(), detector());
        let mut updates = hook.subscribe();

        tokio::time::sleep(Duration::from_millis(3_050)).await;
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().is_loaded);
        assert!(hook.is_ready());
        assert!(ctx.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_ignores_progress_until_retry() {
        let ctx = RuntimeContext::new();
        let hook = BootstrapHook::new(ctx.clone(), detector());

        ctx.events()
            .emit(events::LOADING_ERROR, &json!({ "error": "network" }));
        assert_eq!(hook.error().as_deref(), Some("network"));

        ctx.events()
            .emit(events::LOADING_PROGRESS, &json!({ "progress": 80 }));
        assert_eq!(hook.overall_progress(), 0);
        assert_eq!(hook.status().phase, Phase::Error);

        hook.retry();
        assert_eq!(hook.status().phase, Phase::Loading);
        assert!(hook.error().is_none());
        assert_eq!(ctx.state().phase(), Phase::Loading);

        ctx.events()
            .emit(events::LOADING_PROGRESS, &json!({ "progress": 80 }));
        assert_eq!(hook.overall_progress(), 80);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_unsubscribes() {
        let ctx = RuntimeContext::new();
        let before = ctx.events().listener_count(events::LOADING_PROGRESS);
        let hook = BootstrapHook::new(ctx.clone(), detector());
        assert_eq!(ctx.events().listener_count(events::LOADING_PROGRESS), before + 1);

        drop(hook);
        assert_eq!(ctx.events().listener_count(events::LOADING_PROGRESS), before);

        // the aborted detector never forces readiness
        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert!(!ctx.is_ready());
    }

    #[test]
    fn test_without_runtime() {
        let ctx = RuntimeContext::new();
        ctx.set_ready();
        let hook = BootstrapHook::new(ctx, detector());
        assert!(hook.is_ready());
        assert_eq!(hook.status().progress, 100);
    }
}
