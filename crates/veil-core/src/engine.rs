//! Streaming engine contract
//!
//! The adaptive-streaming engine is a black box: it fetches the manifest,
//! performs ABR, and decrypts content against the configured license
//! servers. This crate only instantiates it, hands it a [`LicenseConfig`],
//! listens for its events, and disposes it.

use crate::drm::LicenseConfig;
use crate::error::Result;
use crate::host::VideoSurface;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// Error payload attached to an engine error event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Engine-level numeric error code
    pub code: Option<u32>,
    /// Human-readable message
    pub message: Option<String>,
    /// Engine error category, if the engine reports one
    pub category: Option<u32>,
}

/// An engine-level error event. Real engines are not obligated to fill any
/// field; consumers must tolerate every shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineErrorEvent {
    pub detail: Option<ErrorDetail>,
}

impl EngineErrorEvent {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            detail: Some(ErrorDetail {
                code: Some(code),
                message: Some(message.into()),
                category: None,
            }),
        }
    }
}

/// Events an engine delivers to its registered listener
#[derive(Clone)]
pub enum EngineEvent {
    /// The rendered video surface exists; emitted once per engine instance
    SurfaceReady(Arc<dyn VideoSurface>),
    /// An engine-level error occurred; playback may continue or the engine
    /// may recover internally
    Error(EngineErrorEvent),
}

impl std::fmt::Debug for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineEvent::SurfaceReady(_) => f.write_str("SurfaceReady"),
            EngineEvent::Error(event) => f.debug_tuple("Error").field(event).finish(),
        }
    }
}

/// Listener for engine events
pub type EngineEventListener = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// One live streaming-engine instance, exclusively owned by its session
pub trait PlaybackEngine: Send {
    /// Apply license-server configuration to the engine's DRM surface.
    /// The configuration is applied verbatim; nothing is merged in.
    fn configure(&mut self, license: &LicenseConfig) -> Result<()>;

    /// Register the single event listener. A later call replaces the
    /// previous listener.
    fn set_event_listener(&mut self, listener: EngineEventListener);

    /// The rendered surface, once the engine has produced one
    fn surface(&self) -> Option<Arc<dyn VideoSurface>>;

    /// Release the engine and its media resources. Safe to call twice.
    fn dispose(&mut self);

    /// Whether [`PlaybackEngine::dispose`] has run
    fn is_disposed(&self) -> bool;
}

/// Constructs engine instances against a streaming manifest
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn create(&self, manifest: &Url) -> Result<Box<dyn PlaybackEngine>>;
}
