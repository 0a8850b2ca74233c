//! Error surface
//!
//! Session-scoped state holding the last user-visible playback error. All
//! engine-originated errors funnel through [`ErrorSurface::publish`]; the
//! presentation layer reads [`ErrorSurface::current`] (or the preformatted
//! [`ErrorSurface::banner`]) and renders it next to the video.

use crate::engine::EngineErrorEvent;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Message used when an engine event carries no usable description
const GENERIC_MESSAGE: &str = "Unknown playback error";

/// Code used when an engine event carries no numeric code
const GENERIC_CODE: u32 = 0;

/// The last user-visible playback error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackError {
    /// Engine-level numeric code (0 when the engine reported none)
    pub code: u32,
    /// Human-readable message
    pub message: String,
    /// When the error was published
    pub occurred_at: DateTime<Utc>,
}

impl PlaybackError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Playback Error {}: {}", self.code, self.message)
    }
}

/// Last-write-wins holder for the current playback error
#[derive(Default)]
pub struct ErrorSurface {
    current: RwLock<Option<PlaybackError>>,
}

impl ErrorSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate an engine error event into the current playback error.
    ///
    /// Tolerates every event shape: a missing `detail`, code, or message
    /// degrades to the generic error instead of failing the handler.
    pub fn publish(&self, event: &EngineErrorEvent) -> PlaybackError {
        let (code, message) = match &event.detail {
            Some(detail) => (
                detail.code.unwrap_or(GENERIC_CODE),
                detail
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
            ),
            None => (GENERIC_CODE, GENERIC_MESSAGE.to_string()),
        };

        self.report(code, message)
    }

    /// Record a playback error directly (engine start/configure failures)
    pub fn report(&self, code: u32, message: impl Into<String>) -> PlaybackError {
        let playback_error = PlaybackError::new(code, message);
        error!(code = playback_error.code, message = %playback_error.message, "Playback error");
        *self.current.write() = Some(playback_error.clone());
        playback_error
    }

    /// The current error, if any
    pub fn current(&self) -> Option<PlaybackError> {
        self.current.read().clone()
    }

    /// Reset to no error
    pub fn clear(&self) {
        *self.current.write() = None;
    }

    /// User-visible banner text for the current error
    pub fn banner(&self) -> Option<String> {
        self.current.read().as_ref().map(|e| e.to_string())
    }
}
