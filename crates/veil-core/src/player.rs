//! Protected playback view
//!
//! [`ProtectedPlayer`] binds catalog, deterrence, session manager, and
//! error surface into the lifecycle of the protected playback view.
//! Mount installs page-wide deterrence before any engine can
//! produce frames, then starts a session for the default catalog entry;
//! unmount tears the session down first and only then reverts the page.
//!
//! The presentation layer sees three things and nothing else: the active
//! descriptor's title, the current playback error (raw or as banner text),
//! and the session state.

use crate::catalog::{Catalog, VideoDescriptor};
use crate::deterrence::DeterrenceController;
use crate::engine::EngineFactory;
use crate::error::{Error, Result};
use crate::host::HostPage;
use crate::reporting::{ErrorSurface, PlaybackError};
use crate::session::SessionManager;
use crate::types::{PlayerOptions, SessionState};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// The protected playback view: one catalog, one page, at most one live
/// session
pub struct ProtectedPlayer {
    catalog: Catalog,
    deterrence: Arc<DeterrenceController>,
    errors: Arc<ErrorSurface>,
    manager: SessionManager,
    options: PlayerOptions,
    mounted: bool,
}

impl ProtectedPlayer {
    pub fn new(catalog: Catalog, page: Arc<dyn HostPage>, factory: Arc<dyn EngineFactory>) -> Self {
        Self::with_options(catalog, page, factory, PlayerOptions::default())
    }

    pub fn with_options(
        catalog: Catalog,
        page: Arc<dyn HostPage>,
        factory: Arc<dyn EngineFactory>,
        options: PlayerOptions,
    ) -> Self {
        let deterrence = Arc::new(DeterrenceController::new(page));
        let errors = Arc::new(ErrorSurface::new());
        let manager = SessionManager::new(
            factory,
            Arc::clone(&errors),
            Arc::clone(&deterrence),
            options.clone(),
        );

        Self {
            catalog,
            deterrence,
            errors,
            manager,
            options,
            mounted: false,
        }
    }

    /// Mount the view: install deterrence, then start playback of the
    /// default catalog entry. Idempotent while mounted.
    ///
    /// An empty catalog is a configuration failure and is reported loudly.
    #[instrument(skip(self))]
    pub async fn mount(&mut self) -> Result<()> {
        if self.mounted {
            debug!("Already mounted");
            return Ok(());
        }

        let descriptor = match self.catalog.first() {
            Ok(descriptor) => descriptor.clone(),
            Err(err) => {
                error!(error = %err, "Cannot mount: no video available");
                return Err(err);
            }
        };

        self.start(descriptor).await
    }

    /// Switch to the catalog entry at `index`, replacing the active session
    #[instrument(skip(self))]
    pub async fn select(&mut self, index: usize) -> Result<()> {
        let descriptor = self
            .catalog
            .get(index)
            .ok_or(Error::DescriptorOutOfRange { index })?
            .clone();

        self.start(descriptor).await
    }

    async fn start(&mut self, descriptor: VideoDescriptor) -> Result<()> {
        // Countermeasures must be in place before the engine can render a
        // single frame.
        if self.options.deterrence_enabled {
            self.deterrence.install();
        }
        self.manager.start(descriptor).await?;
        self.mounted = true;
        Ok(())
    }

    /// Unmount the view: stop the session, then revert every page-wide
    /// countermeasure. Runs on every unmount path and is idempotent.
    #[instrument(skip(self))]
    pub fn unmount(&mut self) {
        self.manager.stop();
        self.deterrence.uninstall();
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Title of the active descriptor, for display
    pub fn title(&self) -> Option<&str> {
        self.manager
            .active()
            .map(|session| session.descriptor().title.as_str())
    }

    /// The current playback error, if any
    pub fn current_error(&self) -> Option<PlaybackError> {
        self.errors.current()
    }

    /// User-visible banner text for the current error
    pub fn error_banner(&self) -> Option<String> {
        self.errors.banner()
    }

    /// State of the active session
    pub fn state(&self) -> SessionState {
        self.manager.state()
    }

    /// Whether the page-wide countermeasures are currently installed
    pub fn deterrence_installed(&self) -> bool {
        self.deterrence.is_installed()
    }

    /// The error surface, for embedders wiring their own rendering
    pub fn errors(&self) -> Arc<ErrorSurface> {
        Arc::clone(&self.errors)
    }
}

impl Drop for ProtectedPlayer {
    fn drop(&mut self) {
        // An error unmount must still revert the page
        self.unmount();
    }
}
