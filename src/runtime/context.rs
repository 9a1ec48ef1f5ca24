//! Shared runtime globals.
//!
//! One [`RuntimeContext`] replaces the four browser globals the loader
//! publishes: the manifest, the loading state, the ready flag and the event
//! bridge. Clones share everything.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::{Mutex, RwLock};
use serde_json::{Value, json};
use tokio::{sync::watch, time::Instant};

use super::{
    events::{self, EventBridge, Unsubscribe},
    state::{LoadingState, Phase},
};
use crate::{
    debug,
    manifest::{AssetManifest, BuildInfo, PwaInfo, SpaHandlerInfo},
    utils::date::now_millis,
};

type ReadyCallback = Box<dyn FnOnce() + Send>;

/// Events that drive the loading state.
const STATE_EVENTS: [&str; 6] = [
    events::LOADING_START,
    events::LOADING_PROGRESS,
    events::LOADING_COMPLETE,
    events::LOADING_ERROR,
    events::LOADING_RETRY,
    events::APP_READY,
];

/// Wall clock anchored to a tokio instant, so paused test time moves it.
#[derive(Debug)]
struct Clock {
    epoch_ms: u64,
    origin: Instant,
}

impl Clock {
    fn start() -> Self {
        Self {
            epoch_ms: now_millis(),
            origin: Instant::now(),
        }
    }

    fn now(&self) -> u64 {
        self.epoch_ms + self.origin.elapsed().as_millis() as u64
    }
}

struct Inner {
    manifest: RwLock<Option<Arc<AssetManifest>>>,
    state: watch::Sender<LoadingState>,
    ready: AtomicBool,
    events: EventBridge,
    clock: Clock,
    shutdown: watch::Sender<bool>,
    ready_callbacks: Mutex<Vec<ReadyCallback>>,
    subscriptions: Mutex<Vec<Unsubscribe>>,
}

impl Inner {
    /// Run `change` against the state and publish the result if it changed.
    fn transition(&self, change: impl FnOnce(&mut LoadingState) -> bool) -> bool {
        let mut phase = Phase::Idle;
        let changed = self.state.send_if_modified(|state| {
            let changed = change(state);
            phase = state.phase();
            changed
        });
        if !changed {
            return false;
        }

        debug!("runtime"; "loading state -> {:?}", phase);
        let ready = phase == Phase::Ready;
        let was_ready = self.ready.swap(ready, Ordering::SeqCst);
        if ready && !was_ready {
            let callbacks = std::mem::take(&mut *self.ready_callbacks.lock());
            for callback in callbacks {
                callback();
            }
        }
        true
    }

    fn apply(&self, event: &str, payload: &Value) {
        let now = self.clock.now();
        self.transition(|state| state.apply(event, payload, now));
    }
}

/// Runtime globals shared by the loader, the detector, the cache manager and
/// framework hooks.
#[derive(Clone)]
pub struct RuntimeContext {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("phase", &self.inner.state.borrow().phase())
            .field("ready", &self.is_ready())
            .field("events", &self.inner.events)
            .finish_non_exhaustive()
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeContext {
    pub fn new() -> Self {
        let clock = Clock::start();
        let (state, _) = watch::channel(LoadingState::new(clock.now()));
        let (shutdown, _) = watch::channel(false);

        let inner = Arc::new(Inner {
            manifest: RwLock::new(None),
            state,
            ready: AtomicBool::new(false),
            events: EventBridge::new(),
            clock,
            shutdown,
            ready_callbacks: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
        });

        let handles = STATE_EVENTS
            .into_iter()
            .map(|event| {
                let weak = Arc::downgrade(&inner);
                inner.events.on(event, move |payload| {
                    if let Some(inner) = weak.upgrade() {
                        inner.apply(event, payload);
                    }
                })
            })
            .collect();
        *inner.subscriptions.lock() = handles;

        Self { inner }
    }

    /// Publish the manifest and start loading.
    ///
    /// Emits `manifest:loaded` then `loading:start`. Returns `false` if a
    /// manifest was already published.
    pub fn init(&self, manifest: AssetManifest) -> bool {
        let manifest = Arc::new(manifest);
        {
            let mut slot = self.inner.manifest.write();
            if slot.is_some() {
                return false;
            }
            *slot = Some(Arc::clone(&manifest));
        }

        let total = manifest.loading_sequence().css.len() + manifest.loading_sequence().js.len();
        debug!("runtime"; "manifest published, {} chunks", total);

        let payload = serde_json::to_value(&*manifest).unwrap_or(Value::Null);
        self.inner.events.emit(events::MANIFEST_LOADED, &payload);
        self.inner
            .events
            .emit(events::LOADING_START, &json!({ "totalChunks": total }));
        true
    }

    /// Mark the application ready without going through the event bridge.
    pub fn set_ready(&self) {
        let now = self.now();
        self.inner.transition(|state| state.complete(now));
    }

    /// Stop every waiting detector and detach internal subscriptions.
    pub fn teardown(&self) {
        self.inner.shutdown.send_replace(true);
        let handles = std::mem::take(&mut *self.inner.subscriptions.lock());
        for handle in handles {
            handle.unsubscribe();
        }
        self.inner.ready_callbacks.lock().clear();
        debug!("runtime"; "context torn down");
    }

    pub fn is_shut_down(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    pub(crate) fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.inner.shutdown.subscribe()
    }

    /// Milliseconds since the Unix epoch, on the runtime clock.
    pub fn now(&self) -> u64 {
        self.inner.clock.now()
    }

    // ------------------------------------------------------------------------
    // events
    // ------------------------------------------------------------------------

    pub fn events(&self) -> &EventBridge {
        &self.inner.events
    }

    /// Emit `app:ready`.
    pub fn signal_app_ready(&self) {
        self.inner.events.emit(events::APP_READY, &Value::Null);
    }

    /// Emit `reload:requested` for listeners that refetch assets.
    pub fn trigger_asset_reload(&self) {
        self.inner
            .events
            .emit(events::RELOAD_REQUESTED, &json!({ "timestamp": self.now() }));
    }

    /// Run `callback` once the application is ready, immediately if it
    /// already is.
    pub fn on_app_ready<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_ready() {
            callback();
            return;
        }
        let mut callbacks = self.inner.ready_callbacks.lock();
        // re-check under the lock so a concurrent transition cannot skip us
        if self.is_ready() {
            drop(callbacks);
            callback();
        } else {
            callbacks.push(Box::new(callback));
        }
    }

    // ------------------------------------------------------------------------
    // state
    // ------------------------------------------------------------------------

    pub fn state(&self) -> LoadingState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.inner.state.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    /// Time since loading started, once finished.
    pub fn load_duration(&self) -> Option<Duration> {
        self.inner.state.borrow().duration.map(Duration::from_millis)
    }

    // ------------------------------------------------------------------------
    // manifest
    // ------------------------------------------------------------------------

    pub fn manifest(&self) -> Option<Arc<AssetManifest>> {
        self.inner.manifest.read().clone()
    }

    pub fn build_info(&self) -> Option<BuildInfo> {
        self.manifest().map(|m| m.build_info().clone())
    }

    pub fn spa_handler(&self) -> Option<SpaHandlerInfo> {
        self.manifest().and_then(|m| m.spa_handler().cloned())
    }

    pub fn pwa_info(&self) -> Option<PwaInfo> {
        self.manifest().and_then(|m| m.pwa().cloned())
    }

    /// Generated files that are not application assets.
    pub fn system_files(&self) -> Vec<String> {
        self.spa_handler()
            .map(|spa| spa.system_files)
            .unwrap_or_default()
    }

    /// Whether `path` (with or without a leading `/`) is a system file.
    pub fn is_system_file(&self, path: &str) -> bool {
        let name = path.trim_start_matches('/');
        self.manifest()
            .and_then(|m| {
                m.spa_handler()
                    .map(|spa| spa.system_files.iter().any(|f| f == name))
            })
            .unwrap_or(false)
    }

    /// Emitted URLs of CSS then JS, in load order.
    pub fn asset_urls(&self) -> Vec<String> {
        let Some(manifest) = self.manifest() else {
            return Vec::new();
        };
        let sequence = manifest.loading_sequence();
        sequence
            .css
            .iter()
            .chain(&sequence.js)
            .map(|path| manifest.actual_path(path).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestBuilder, SpaHandlerInfo};
    use std::sync::atomic::AtomicUsize;

    fn sample_manifest() -> AssetManifest {
        let mut builder = ManifestBuilder::new().quiet(true).with_timestamp(1);
        builder.add_file("/assets/app-1a2b3c4d.js", 100, Some(40));
        builder.add_file("/vendor-9f8e7d6c.js", 200, None);
        builder.add_file("/assets/style-aaaabbbb.css", 50, None);
        builder.set_spa_handler(SpaHandlerInfo {
            root_path: "/".into(),
            fallback_file: "index.html".into(),
            enable_compression: true,
            enable_caching: true,
            cache_max_age: 3600,
            system_files: vec!["asset-manifest.js".into(), "AppBootstrap.js".into()],
        });
        builder.build()
    }

    #[test]
    fn test_init_is_idempotent() {
        let ctx = RuntimeContext::new();
        let loaded = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loaded);
        let _sub = ctx.events().on(events::MANIFEST_LOADED, move |payload| {
            assert!(payload["buildInfo"].is_object());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(ctx.init(sample_manifest()));
        assert!(!ctx.init(sample_manifest()));
        assert_eq!(loaded.load(Ordering::SeqCst), 1);

        let state = ctx.state();
        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(state.total_chunks, 3);
    }

    #[test]
    fn test_events_drive_state() {
        let ctx = RuntimeContext::new();
        ctx.init(sample_manifest());
        ctx.events().emit(
            events::LOADING_PROGRESS,
            &json!({ "chunk": "/vendor.js", "progress": 33 }),
        );
        assert_eq!(ctx.state().progress, 33);
        assert!(!ctx.is_ready());

        ctx.signal_app_ready();
        assert!(ctx.is_ready());
        assert_eq!(ctx.state().progress, 100);
        assert!(ctx.load_duration().is_some());
    }

    #[test]
    fn test_on_app_ready() {
        let ctx = RuntimeContext::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        ctx.on_app_ready(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        ctx.set_ready();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let c = Arc::clone(&calls);
        ctx.on_app_ready(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_manifest_accessors() {
        let ctx = RuntimeContext::new();
        assert!(ctx.asset_urls().is_empty());
        assert!(ctx.system_files().is_empty());

        ctx.init(sample_manifest());
        assert_eq!(
            ctx.asset_urls(),
            [
                "/assets/style-aaaabbbb.css",
                "/vendor-9f8e7d6c.js",
                "/assets/app-1a2b3c4d.js"
            ]
        );
        assert!(ctx.is_system_file("/asset-manifest.js"));
        assert!(ctx.is_system_file("AppBootstrap.js"));
        assert!(!ctx.is_system_file("/app.js"));
        assert_eq!(ctx.build_info().unwrap().timestamp, 1);
        assert!(ctx.pwa_info().is_none());
    }

    #[test]
    fn test_trigger_asset_reload() {
        let ctx = RuntimeContext::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        let _sub = ctx.events().on(events::RELOAD_REQUESTED, move |payload| {
            assert!(payload["timestamp"].is_u64());
            s.fetch_add(1, Ordering::SeqCst);
        });
        ctx.trigger_asset_reload();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_teardown_detaches_state_events() {
        let ctx = RuntimeContext::new();
        ctx.teardown();
        assert!(ctx.is_shut_down());
        assert_eq!(ctx.events().listener_count(events::APP_READY), 0);

        ctx.signal_app_ready();
        assert!(!ctx.is_ready());
    }
}
