//! Install prompt, worker registration and update banner.
//!
//! Browser facilities are reached through [`PwaHost`]; markup goes through
//! [`Document`]. Nothing here fails: host errors are logged and swallowed.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;
use serde::Serialize;

use super::dom::Document;
use crate::{
    config::{BootkitConfig, InstallPromptConfig, ServiceWorkerConfig},
    debug, log, logger,
    utils::html::escape,
};

pub const INSTALL_PROMPT_ID: &str = "pwa-install-prompt";
pub const UPDATE_PROMPT_ID: &str = "pwa-update-prompt";

const PROMPT_STYLE: &str = "position: fixed; left: 20px; right: 20px; border-radius: 8px; \
    padding: 16px; box-shadow: 0 4px 12px rgba(0,0,0,0.15); z-index: 10000; \
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;";

/// Lifecycle states of an installing service worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// Arguments of `navigator.serviceWorker.register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration<'a> {
    pub src: &'a str,
    pub scope: &'a str,
    pub update_via_cache: &'static str,
}

impl<'a> Registration<'a> {
    pub fn from_config(sw: &'a ServiceWorkerConfig) -> Self {
        Self {
            src: &sw.src,
            scope: &sw.scope,
            update_via_cache: sw.update_strategy.update_via_cache(),
        }
    }
}

/// A captured `beforeinstallprompt` event.
pub trait DeferredPrompt: Send {
    /// Show the native prompt and wait for the user's choice.
    fn prompt(self) -> impl Future<Output = anyhow::Result<InstallOutcome>> + Send;
}

/// Browser capabilities the manager needs.
pub trait PwaHost: Send + Sync {
    type Prompt: DeferredPrompt;

    fn supports_service_worker(&self) -> bool;

    fn register_service_worker(
        &self,
        registration: &Registration<'_>,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Whether a worker already controls the page.
    fn has_controller(&self) -> bool;

    /// `display-mode: standalone`, or the iOS `navigator.standalone` flag.
    fn is_standalone(&self) -> bool;

    fn is_online(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PwaStatus {
    pub is_installed: bool,
    pub is_online: bool,
    pub has_service_worker: bool,
    pub registered: bool,
    pub update_available: bool,
}

pub struct PwaManager<H: PwaHost> {
    enabled: bool,
    registers: bool,
    service_worker: ServiceWorkerConfig,
    install_prompt: InstallPromptConfig,
    host: H,
    document: Arc<dyn Document>,
    deferred: Mutex<Option<H::Prompt>>,
    registered: AtomicBool,
    update_available: AtomicBool,
}

impl<H: PwaHost> std::fmt::Debug for PwaManager<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PwaManager")
            .field("enabled", &self.enabled)
            .field("registered", &self.registered.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<H: PwaHost> PwaManager<H> {
    pub fn new(config: &BootkitConfig, host: H, document: Arc<dyn Document>) -> Self {
        Self {
            enabled: config.pwa.enable,
            registers: config.registers_service_worker(),
            service_worker: config.pwa.service_worker.clone(),
            install_prompt: config.pwa.install_prompt.clone(),
            host,
            document,
            deferred: Mutex::new(None),
            registered: AtomicBool::new(false),
            update_available: AtomicBool::new(false),
        }
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Register the worker when configured. Returns `false` when PWA
    /// support is disabled.
    pub async fn init(&self) -> bool {
        if !self.enabled {
            log!("pwa"; "PWA support is disabled");
            return false;
        }
        if self.registers {
            self.register().await;
        }
        debug!("pwa"; "initialized");
        true
    }

    async fn register(&self) {
        if !self.host.supports_service_worker() {
            debug!("pwa"; "service workers not supported");
            return;
        }
        let registration = Registration::from_config(&self.service_worker);
        match self.host.register_service_worker(&registration).await {
            Ok(()) => {
                self.registered.store(true, Ordering::SeqCst);
                debug!("pwa"; "registered {} (scope {})", registration.src, registration.scope);
            }
            Err(err) => logger::error(&format!("service worker registration failed: {err:#}")),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------------
    // install prompt
    // ------------------------------------------------------------------------

    /// Keep `prompt` for later and render the install box. Returns whether
    /// the box is shown.
    pub fn on_before_install_prompt(&self, prompt: H::Prompt) -> bool {
        if !self.enabled || !self.install_prompt.enabled {
            return false;
        }
        *self.deferred.lock() = Some(prompt);
        if !self.document.element_exists(INSTALL_PROMPT_ID) {
            self.document.insert_html(&self.install_markup());
        }
        true
    }

    fn install_markup(&self) -> String {
        let prompt = &self.install_prompt;
        format!(
            concat!(
                r#"<div id="{id}" class="pwa-install-prompt" "#,
                r#"style="{style} {position} background: white; border: 1px solid #ddd;">"#,
                r#"<div class="pwa-install-content"><p>{text}</p>"#,
                r#"<button type="button" id="pwa-install-button">{button}</button>"#,
                r#"<button type="button" id="pwa-install-dismiss">Dismiss</button>"#,
                "</div></div>"
            ),
            id = INSTALL_PROMPT_ID,
            style = PROMPT_STYLE,
            position = prompt.position.css(),
            text = escape(&prompt.text),
            button = escape(&prompt.button_text),
        )
    }

    pub fn install_available(&self) -> bool {
        self.deferred.lock().is_some()
    }

    /// Show the native prompt. `None` if no prompt was captured or it
    /// failed.
    pub async fn install(&self) -> Option<InstallOutcome> {
        let prompt = self.deferred.lock().take()?;
        let outcome = match prompt.prompt().await {
            Ok(outcome) => {
                debug!("pwa"; "install prompt {:?}", outcome);
                Some(outcome)
            }
            Err(err) => {
                logger::error(&format!("install prompt failed: {err:#}"));
                None
            }
        };
        self.dismiss_install_prompt();
        outcome
    }

    /// Remove the install box, keeping any captured prompt.
    pub fn dismiss_install_prompt(&self) -> bool {
        self.document.remove_element(INSTALL_PROMPT_ID)
    }

    pub fn on_app_installed(&self) {
        debug!("pwa"; "app installed");
        self.deferred.lock().take();
        self.dismiss_install_prompt();
    }

    // ------------------------------------------------------------------------
    // updates
    // ------------------------------------------------------------------------

    /// Track the installing worker. Shows the update banner when a new
    /// worker finished installing while an old one controls the page.
    pub fn on_worker_state_change(&self, state: WorkerState) -> bool {
        if !self.enabled || state != WorkerState::Installed || !self.host.has_controller() {
            return false;
        }
        self.update_available.store(true, Ordering::SeqCst);
        if !self.document.element_exists(UPDATE_PROMPT_ID) {
            self.document.insert_html(&format!(
                concat!(
                    r#"<div id="{id}" class="pwa-update-prompt" "#,
                    r#"style="{style} top: 20px; background: #4CAF50; color: white;">"#,
                    r#"<div class="pwa-update-content"><p>A new version is available!</p>"#,
                    r#"<button type="button" id="pwa-update-button">Update Now</button>"#,
                    r#"<button type="button" id="pwa-update-dismiss">Later</button>"#,
                    "</div></div>"
                ),
                id = UPDATE_PROMPT_ID,
                style = PROMPT_STYLE,
            ));
        }
        true
    }

    /// Reload onto the new worker.
    pub fn apply_update(&self) {
        self.document.reload();
    }

    pub fn dismiss_update(&self) -> bool {
        self.document.remove_element(UPDATE_PROMPT_ID)
    }

    // ------------------------------------------------------------------------
    // status
    // ------------------------------------------------------------------------

    pub fn is_installed(&self) -> bool {
        self.host.is_standalone()
    }

    pub fn status(&self) -> PwaStatus {
        PwaStatus {
            is_installed: self.is_installed(),
            is_online: self.host.is_online(),
            has_service_worker: self.host.supports_service_worker(),
            registered: self.is_registered(),
            update_available: self.update_available.load(Ordering::SeqCst),
        }
    }
}
