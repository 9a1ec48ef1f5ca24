//! Loading-state machine.
//!
//! ```text
//! Idle ──start──▶ Loading ──complete──▶ Ready
//!   │                │
//!   └────────────────┴──fail──▶ Error
//!
//! Ready / Error ──retry──▶ Loading
//! ```
//!
//! `Ready` and `Error` are terminal: every signal except `retry` is ignored
//! once one of them is reached.

use serde::Serialize;
use serde_json::Value;

use super::events;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

/// Observable loading progress.
///
/// Times are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub is_loaded: bool,
    pub is_loading: bool,
    /// 0..=100
    pub progress: u8,
    pub current_chunk: String,
    pub loaded_chunks: Vec<String>,
    pub total_chunks: usize,
    pub error: Option<String>,
    pub start_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl LoadingState {
    pub fn new(now: u64) -> Self {
        Self {
            is_loaded: false,
            is_loading: false,
            progress: 0,
            current_chunk: String::new(),
            loaded_chunks: Vec::new(),
            total_chunks: 0,
            error: None,
            start_time: now,
            end_time: None,
            duration: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.error.is_some() {
            Phase::Error
        } else if self.is_loaded {
            Phase::Ready
        } else if self.is_loading {
            Phase::Loading
        } else {
            Phase::Idle
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }

    /// `Idle → Loading`.
    pub fn start(&mut self, total_chunks: Option<usize>, now: u64) -> bool {
        if self.phase() != Phase::Idle {
            return false;
        }
        self.is_loading = true;
        self.start_time = now;
        if let Some(total) = total_chunks {
            self.total_chunks = total;
        }
        true
    }

    /// Record a resolved chunk and/or an explicit progress value.
    ///
    /// Without an explicit value, progress is derived from the chunk counts.
    pub fn record_progress(&mut self, chunk: Option<&str>, progress: Option<u8>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.is_loading = true;

        if let Some(chunk) = chunk {
            self.current_chunk = chunk.to_string();
            if !self.loaded_chunks.iter().any(|c| c == chunk) {
                self.loaded_chunks.push(chunk.to_string());
            }
        }

        self.progress = match progress {
            Some(p) => p.min(100),
            None if self.total_chunks > 0 => {
                let pct = self.loaded_chunks.len() * 100 / self.total_chunks;
                pct.min(100) as u8
            }
            None => self.progress,
        };
        true
    }

    /// `→ Ready`.
    pub fn complete(&mut self, now: u64) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.is_loaded = true;
        self.is_loading = false;
        self.progress = 100;
        self.finish(now);
        true
    }

    /// `→ Error`.
    pub fn fail(&mut self, error: impl Into<String>, now: u64) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.is_loading = false;
        self.error = Some(error.into());
        self.finish(now);
        true
    }

    /// Start over in `Loading`, keeping the chunk total.
    pub fn retry(&mut self, now: u64) -> bool {
        let total_chunks = self.total_chunks;
        *self = Self::new(now);
        self.total_chunks = total_chunks;
        self.is_loading = true;
        true
    }

    fn finish(&mut self, now: u64) {
        self.end_time = Some(now);
        self.duration = Some(now.saturating_sub(self.start_time));
    }

    /// Apply a bridge event. Returns whether the state changed.
    pub fn apply(&mut self, event: &str, payload: &Value, now: u64) -> bool {
        match event {
            events::LOADING_START => {
                let total = payload
                    .get("totalChunks")
                    .and_then(Value::as_u64)
                    .map(|n| n as usize);
                self.start(total, now)
            }
            events::LOADING_PROGRESS => {
                let chunk = payload.get("chunk").and_then(Value::as_str);
                let progress = payload
                    .get("progress")
                    .and_then(Value::as_f64)
                    .map(|p| p.clamp(0.0, 100.0).round() as u8);
                self.record_progress(chunk, progress)
            }
            events::LOADING_COMPLETE | events::APP_READY => self.complete(now),
            events::LOADING_ERROR => {
                let message = payload
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown loading error");
                self.fail(message, now)
            }
            events::LOADING_RETRY => self.retry(now),
            _ => false,
        }
    }
}
