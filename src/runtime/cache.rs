//! Loading-screen lifecycle.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;

use super::{
    context::RuntimeContext,
    dom::Document,
    events::{self, Unsubscribe},
    readiness::{ReadinessDetector, Resolution},
};
use crate::{
    bootstrap::{LOADING_SCREEN_ID, LOADING_TEXT_ID, error_markup, loading_markup},
    config::{BootkitConfig, LoadingScreenConfig, LoadingTheme},
    debug, logger,
    utils::html::element_id,
};

/// Delay between starting the fade-out and removing the overlay.
pub const FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Default)]
struct Mounted {
    /// The overlay was inserted by this manager rather than adopted.
    injected: bool,
    progress: Option<Unsubscribe>,
}

/// Shows the loading screen until the application is ready.
pub struct CacheManager {
    ctx: RuntimeContext,
    document: Arc<dyn Document>,
    detector: ReadinessDetector,
    screen: LoadingScreenConfig,
    app_name: String,
    app_icon: String,
    mounted: Mutex<Option<Mounted>>,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("screen", &self.screen)
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}

impl CacheManager {
    pub fn new(ctx: RuntimeContext, document: Arc<dyn Document>, config: &BootkitConfig) -> Self {
        let detector = ReadinessDetector::new(config.readiness.clone(), Arc::clone(&document));
        Self {
            ctx,
            document,
            detector,
            screen: config.cache.loading_screen.clone(),
            app_name: config.bootstrap.app_name.clone(),
            app_icon: config.bootstrap.app_icon.clone(),
            mounted: Mutex::new(None),
        }
    }

    /// Whether the overlay was inserted by this manager.
    pub fn injected(&self) -> bool {
        self.mounted.lock().as_ref().is_some_and(|m| m.injected)
    }

    /// Overlay markup for the configured theme.
    fn screen_markup(&self) -> String {
        match (&self.screen.custom_html, self.screen.theme) {
            (Some(html), _) if element_id(html) == Some(LOADING_SCREEN_ID) => html.clone(),
            (Some(html), _) => format!(r#"<div id="{LOADING_SCREEN_ID}">{html}</div>"#),
            (None, LoadingTheme::Custom) => {
                loading_markup(LoadingTheme::Gradient, &self.app_name, &self.app_icon)
            }
            (None, theme) => loading_markup(theme, &self.app_name, &self.app_icon),
        }
    }

    /// Insert or adopt the overlay. Returns `true` only when markup was
    /// inserted.
    pub fn mount(&self) -> bool {
        let mut mounted = self.mounted.lock();
        if mounted.is_some() {
            return false;
        }

        let injected = if self.document.element_exists(LOADING_SCREEN_ID) {
            debug!("cache"; "adopting existing #{}", LOADING_SCREEN_ID);
            false
        } else {
            self.document.insert_html(&self.screen_markup());
            debug!("cache"; "loading screen injected");
            true
        };

        let document = Arc::clone(&self.document);
        let app_name = self.app_name.clone();
        let progress = self.ctx.events().on(events::LOADING_PROGRESS, move |payload| {
            if let Some(p) = payload.get("progress").and_then(Value::as_f64) {
                let text = format!("Loading {app_name}... {}%", p.clamp(0.0, 100.0).round());
                document.set_text(LOADING_TEXT_ID, &text);
            }
        });

        *mounted = Some(Mounted {
            injected,
            progress: Some(progress),
        });
        injected
    }

    /// Mount the overlay, wait for readiness, then hide it or show the
    /// failure.
    pub async fn init(&self) -> Resolution {
        self.mount();
        let resolution = self.detector.wait(&self.ctx).await;
        match &resolution {
            Resolution::Failed(message) => self.show_error(message),
            Resolution::Cancelled => {}
            _ => {
                self.hide_loading_screen().await;
            }
        }
        resolution
    }

    pub fn update_loading_text(&self, text: &str) -> bool {
        self.document.set_text(LOADING_TEXT_ID, text)
    }

    /// Fade the overlay out and remove it. `false` if there was none.
    pub async fn hide_loading_screen(&self) -> bool {
        if !self.document.element_exists(LOADING_SCREEN_ID) {
            return false;
        }
        self.document
            .set_style(LOADING_SCREEN_ID, "transition", "opacity 0.3s ease-out");
        self.document.set_style(LOADING_SCREEN_ID, "opacity", "0");

        tokio::time::sleep(FADE_OUT).await;

        if let Some(mounted) = self.mounted.lock().as_mut()
            && let Some(progress) = mounted.progress.take()
        {
            progress.unsubscribe();
        }
        self.document.remove_element(LOADING_SCREEN_ID)
    }

    /// Replace the overlay content with an error and a retry button.
    pub fn show_error(&self, message: &str) {
        logger::error(&format!("application failed to load: {message}"));
        if !self.document.element_exists(LOADING_SCREEN_ID) {
            self.document.insert_html(&self.screen_markup());
        }
        self.document
            .set_inner_html(LOADING_SCREEN_ID, &error_markup(message));
    }

    /// Reload the page.
    pub fn retry(&self) {
        debug!("cache"; "reloading after failure");
        self.document.reload();
    }
}

/// Build a manager and run [`CacheManager::init`] on the current runtime.
pub fn initialize_cache_manager(
    ctx: RuntimeContext,
    document: Arc<dyn Document>,
    config: &BootkitConfig,
) -> (Arc<CacheManager>, JoinHandle<Resolution>) {
    let manager = Arc::new(CacheManager::new(ctx, document, config));
    let task = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.init().await })
    };
    (manager, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::dom::MemoryDocument;
    use serde_json::json;
    use tokio::time::{self, Instant};

    fn setup(config: &BootkitConfig) -> (Arc<MemoryDocument>, RuntimeContext, CacheManager) {
        let doc = Arc::new(MemoryDocument::new());
        doc.add_element("root");
        let ctx = RuntimeContext::new();
        let manager = CacheManager::new(ctx.clone(), Arc::clone(&doc) as Arc<dyn Document>, config);
        (doc, ctx, manager)
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_is_idempotent() {
        let (doc, _ctx, manager) = setup(&BootkitConfig::default());
        assert!(manager.mount());
        assert!(manager.injected());
        let count = doc.element_count();

        assert!(!manager.mount());
        assert_eq!(doc.element_count(), count);
    }

    #[tokio::test(start_paused = true)]
    async fn test_adopts_existing_screen() {
        let (doc, _ctx, manager) = setup(&BootkitConfig::default());
        doc.insert_html(r#"<div id="loading-screen">static</div>"#);
        assert!(!manager.mount());
        assert!(!manager.injected());
        assert_eq!(doc.element("loading-screen").unwrap().html, r#"<div id="loading-screen">static</div>"#);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_markup_is_wrapped() {
        let mut config = BootkitConfig::default();
        config.cache.loading_screen.custom_html = Some("<p>brb</p>".into());
        let (doc, _ctx, manager) = setup(&config);
        manager.mount();
        assert_eq!(
            doc.element("loading-screen").unwrap().html,
            r#"<div id="loading-screen"><p>brb</p></div>"#
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_updates_text() {
        let (doc, ctx, manager) = setup(&BootkitConfig::default());
        manager.mount();
        ctx.events()
            .emit(events::LOADING_PROGRESS, &json!({ "chunk": "/a.js", "progress": 42 }));
        assert_eq!(
            doc.element(LOADING_TEXT_ID).unwrap().text.as_deref(),
            Some("Loading Application... 42%")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_hides_after_ready() {
        let (doc, ctx, manager) = setup(&BootkitConfig::default());
        let signal = ctx.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            signal.signal_app_ready();
        });

        let started = Instant::now();
        assert_eq!(manager.init().await, Resolution::Completed);
        assert!(started.elapsed() >= Duration::from_millis(350));
        assert!(!doc.element_exists(LOADING_SCREEN_ID));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_fades_before_removal() {
        let (doc, _ctx, manager) = setup(&BootkitConfig::default());
        manager.mount();

        let manager = Arc::new(manager);
        let hiding = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.hide_loading_screen().await })
        };
        time::sleep(Duration::from_millis(100)).await;
        let screen = doc.element(LOADING_SCREEN_ID).unwrap();
        assert_eq!(screen.style["opacity"], "0");

        assert!(hiding.await.unwrap());
        assert!(!doc.element_exists(LOADING_SCREEN_ID));
        assert!(!manager.hide_loading_screen().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_shows_error() {
        let (doc, ctx, manager) = setup(&BootkitConfig::default());
        let signal = ctx.clone();
        tokio::spawn(async move {
            signal
                .events()
                .emit(events::LOADING_ERROR, &json!({ "error": "<boom>" }));
        });

        let resolution = manager.init().await;
        assert_eq!(resolution, Resolution::Failed("<boom>".into()));
        let screen = doc.element(LOADING_SCREEN_ID).unwrap();
        assert!(screen.html.contains("&lt;boom&gt;"));
        assert!(doc.element_exists("loading-retry"));

        manager.retry();
        assert_eq!(doc.reload_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_spawns() {
        let doc = Arc::new(MemoryDocument::new());
        let ctx = RuntimeContext::new();
        let (manager, task) =
            initialize_cache_manager(ctx, Arc::clone(&doc) as Arc<dyn Document>, &BootkitConfig::default());
        assert_eq!(task.await.unwrap(), Resolution::TimedOut);
        assert!(manager.injected());
        assert!(!doc.element_exists(LOADING_SCREEN_ID));
    }
}
