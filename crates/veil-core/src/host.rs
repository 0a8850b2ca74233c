//! Host page contract
//!
//! Traits describing the pieces of the embedding environment this crate
//! touches: stylesheet injection, the optional display-capture capability,
//! and the rendered video surface. Production embedders back these with the
//! real page; tests back them with in-memory fakes.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Handle to an injected stylesheet node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleSheetId(pub u64);

/// The page hosting the player
pub trait HostPage: Send + Sync {
    /// Inject a stylesheet and return a handle for later removal
    fn inject_stylesheet(&self, css: &str) -> Result<StyleSheetId>;

    /// Remove a previously injected stylesheet. Removing a handle that is
    /// already gone is a no-op, never an error.
    fn remove_stylesheet(&self, id: StyleSheetId) -> Result<()>;

    /// The page's display-capture capability, if the host environment has
    /// one. `None` means the capability is absent entirely.
    fn display_capture(&self) -> Option<Arc<dyn DisplayCapture>>;

    /// Replace the page's display-capture capability
    fn set_display_capture(&self, capture: Arc<dyn DisplayCapture>);
}

/// Constraints for a display-capture request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

/// The "request a screen/window/tab capture stream" capability
pub trait DisplayCapture: Send + Sync {
    fn request(&self, constraints: &CaptureConstraints) -> Result<Box<dyn CaptureStream>>;
}

/// A capture stream obtained from [`DisplayCapture::request`]
pub trait CaptureStream: Send {
    /// Stop every track on this stream
    fn stop_tracks(&mut self);

    /// Number of tracks still live
    fn live_tracks(&self) -> usize;
}

/// The rendered video surface element
pub trait VideoSurface: Send + Sync {
    /// Swallow context-menu events on the surface
    fn suppress_context_menu(&self) -> Result<()>;

    /// Override an inline style property on the surface
    fn set_style(&self, property: &str, value: &str) -> Result<()>;
}
