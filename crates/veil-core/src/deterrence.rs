//! Capture deterrence
//!
//! Page-level friction against screen sharing/recording and UI-driven
//! content extraction. Two layers:
//!
//! - Global countermeasures, installed once per mount of the protected
//!   view: a stylesheet that hides native control overlays on the video
//!   element, and an interceptor wrapped around the page's display-capture
//!   capability that stops any obtained stream and fails the request.
//! - Per-surface countermeasures, attached once a session's rendered
//!   surface exists: context-menu suppression and disabled selection
//!   affordances.
//!
//! None of this is a security boundary. Deterrence is best-effort friction
//! and must never prevent legitimate playback: every installation failure
//! is caught, logged, and ignored.

use crate::error::{Error, Result};
use crate::host::{
    CaptureConstraints, CaptureStream, DisplayCapture, HostPage, StyleSheetId, VideoSurface,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Hides platform chrome on the video element so native overlays (cast
/// buttons, control bars) cannot be repurposed to exfiltrate the stream,
/// and pins the filter chain so CSS overrides cannot lift it.
const SURFACE_SHIELD_CSS: &str = "\
video::-internal-media-controls-overlay-cast-button {
  display: none;
}
video::-webkit-media-controls {
  display: none !important;
}
video {
  -webkit-filter: none !important;
}
";

/// Inline style overrides applied to the rendered surface itself
const SURFACE_STYLE_OVERRIDES: [(&str, &str); 3] = [
    ("user-select", "none"),
    ("-webkit-user-select", "none"),
    ("-webkit-touch-callout", "none"),
];

/// Wraps the page's display-capture capability: any stream the underlying
/// capability produces is stopped immediately and the request fails.
struct CaptureInterceptor {
    inner: Arc<dyn DisplayCapture>,
}

impl DisplayCapture for CaptureInterceptor {
    fn request(&self, constraints: &CaptureConstraints) -> Result<Box<dyn CaptureStream>> {
        if let Ok(mut stream) = self.inner.request(constraints) {
            stream.stop_tracks();
            debug!(live = stream.live_tracks(), "Stopped intercepted capture stream");
        }
        Err(Error::CaptureBlocked)
    }
}

#[derive(Default)]
struct Installed {
    active: bool,
    stylesheet: Option<StyleSheetId>,
    /// Restoration handle for the wrapped capture capability
    original_capture: Option<Arc<dyn DisplayCapture>>,
}

/// Installs and reverts page-wide capture countermeasures.
///
/// One controller owns the page's deterrence state; installing twice is a
/// no-op rather than a stack of duplicate styles and wrappers.
pub struct DeterrenceController {
    page: Arc<dyn HostPage>,
    installed: Mutex<Installed>,
}

impl DeterrenceController {
    pub fn new(page: Arc<dyn HostPage>) -> Self {
        Self {
            page,
            installed: Mutex::new(Installed::default()),
        }
    }

    /// Install the global countermeasures. Idempotent; never fails playback.
    pub fn install(&self) {
        let mut installed = self.installed.lock();
        if installed.active {
            debug!("Deterrence already installed");
            return;
        }

        match self.page.inject_stylesheet(SURFACE_SHIELD_CSS) {
            Ok(id) => installed.stylesheet = Some(id),
            Err(err) => warn!(error = %err, "Stylesheet injection failed; continuing without it"),
        }

        match self.page.display_capture() {
            Some(original) => {
                let interceptor = CaptureInterceptor {
                    inner: Arc::clone(&original),
                };
                self.page.set_display_capture(Arc::new(interceptor));
                installed.original_capture = Some(original);
            }
            // Feature detection, not an error
            None => debug!("Display-capture capability absent; skipping interception"),
        }

        installed.active = true;
        debug!("Capture deterrence installed");
    }

    /// Revert everything [`DeterrenceController::install`] did: remove the
    /// injected stylesheet and restore the original capture capability.
    /// Idempotent; safe when the stylesheet node is already gone.
    pub fn uninstall(&self) {
        let mut installed = self.installed.lock();

        if let Some(id) = installed.stylesheet.take() {
            if let Err(err) = self.page.remove_stylesheet(id) {
                debug!(error = %err, "Stylesheet already removed");
            }
        }

        if let Some(original) = installed.original_capture.take() {
            self.page.set_display_capture(original);
        }

        if installed.active {
            installed.active = false;
            debug!("Capture deterrence uninstalled");
        }
    }

    /// Whether the global countermeasures are currently installed
    pub fn is_installed(&self) -> bool {
        self.installed.lock().active
    }

    /// Attach per-surface countermeasures to a rendered video surface.
    /// Scoped to the surface; no teardown beyond the surface's own
    /// destruction.
    pub fn protect_surface(&self, surface: &dyn VideoSurface) {
        if let Err(err) = surface.suppress_context_menu() {
            warn!(error = %err, "Context-menu suppression failed");
        }
        for (property, value) in SURFACE_STYLE_OVERRIDES {
            if let Err(err) = surface.set_style(property, value) {
                warn!(property, error = %err, "Surface style override failed");
            }
        }
    }
}
