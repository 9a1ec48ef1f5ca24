//! Decides when the application counts as rendered.
//!
//! Signals, strongest first:
//!
//! 1. the context is already ready when waiting starts;
//! 2. the state reaches `Ready` or `Error` through the event bridge;
//! 3. a poll finds marker classes rendered under the root element;
//! 4. the fallback timer expires.
//!
//! Outcomes 3 and 4 emit `loading:complete`, so every listener sees the
//! same transition. Dropping the future stops every timer.

use std::sync::Arc;

use serde_json::json;
use tokio::time::{self, MissedTickBehavior};

use super::{
    context::RuntimeContext,
    dom::Document,
    events,
    state::{LoadingState, Phase},
};
use crate::{config::ReadinessConfig, debug};

/// How waiting ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The context was ready before waiting started.
    AlreadyReady,
    /// Another party completed loading.
    Completed,
    /// Loading failed with the given message.
    Failed(String),
    /// Marker content appeared under the root element.
    ContentDetected,
    /// The fallback timer forced completion.
    TimedOut,
    /// The context was torn down.
    Cancelled,
}

impl Resolution {
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Failed(_) | Self::Cancelled)
    }
}

#[derive(Clone)]
pub struct ReadinessDetector {
    config: ReadinessConfig,
    document: Arc<dyn Document>,
}

impl std::fmt::Debug for ReadinessDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessDetector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReadinessDetector {
    pub fn new(config: ReadinessConfig, document: Arc<dyn Document>) -> Self {
        Self { config, document }
    }

    pub const fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Whether marker content is rendered right now.
    pub fn content_rendered(&self) -> bool {
        let markers: Vec<&str> = self.config.marker_classes().collect();
        self.document
            .has_rendered_content(&self.config.root_id, &markers)
    }

    /// Wait until the context reaches a terminal state, driving it to
    /// `Ready` when content shows up or the fallback expires.
    pub async fn wait(&self, ctx: &RuntimeContext) -> Resolution {
        if ctx.is_ready() {
            return Resolution::AlreadyReady;
        }

        let mut shutdown = ctx.shutdown_signal();
        if *shutdown.borrow_and_update() {
            return Resolution::Cancelled;
        }

        let mut state = ctx.subscribe();
        if let Some(resolution) = terminal(&state.borrow_and_update()) {
            return resolution;
        }

        let mut poll = time::interval(self.config.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let fallback = time::sleep(self.config.fallback_timeout());
        tokio::pin!(fallback);

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow_and_update() {
                        debug!("runtime"; "readiness wait cancelled");
                        return Resolution::Cancelled;
                    }
                }
                changed = state.changed() => {
                    if changed.is_err() {
                        return Resolution::Cancelled;
                    }
                    if let Some(resolution) = terminal(&state.borrow_and_update()) {
                        return resolution;
                    }
                }
                _ = poll.tick() => {
                    if self.content_rendered() {
                        debug!("runtime"; "content detected under #{}", self.config.root_id);
                        complete(ctx, "content-detected");
                        return Resolution::ContentDetected;
                    }
                }
                () = &mut fallback => {
                    debug!(
                        "runtime";
                        "no content after {}ms, forcing ready",
                        self.config.fallback_timeout_ms
                    );
                    complete(ctx, "fallback-timeout");
                    return Resolution::TimedOut;
                }
            }
        }
    }
}

fn terminal(state: &LoadingState) -> Option<Resolution> {
    match state.phase() {
        Phase::Ready => Some(Resolution::Completed),
        Phase::Error => Some(Resolution::Failed(state.error.clone().unwrap_or_default())),
        Phase::Idle | Phase::Loading => None,
    }
}

fn complete(ctx: &RuntimeContext, reason: &str) {
    ctx.events()
        .emit(events::LOADING_COMPLETE, &json!({ "reason": reason }));
}
