//! Playback session manager
//!
//! Owns the lifecycle of one active streaming-engine instance bound to one
//! video descriptor:
//! - instantiates the engine against the descriptor's manifest URL
//! - applies the descriptor's license configuration, verbatim
//! - registers the single error listener feeding the error surface
//! - attaches per-surface deterrence once the engine reports its surface
//!
//! Sessions never layer: starting while a session is active disposes the
//! previous engine before the new one is constructed, so no two engines are
//! ever attached to the same surface.

use crate::catalog::VideoDescriptor;
use crate::deterrence::DeterrenceController;
use crate::engine::{EngineEvent, EngineFactory, PlaybackEngine};
use crate::error::Result;
use crate::reporting::ErrorSurface;
use crate::types::{PlayerOptions, SessionId, SessionState};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Code reported when the engine could not be started or configured; the
/// engine never produced a code of its own in that case.
const SESSION_SETUP_ERROR_CODE: u32 = 0;

/// Session state shared between the manager and the engine's event listener
struct StateCell {
    current: RwLock<SessionState>,
    tx: watch::Sender<SessionState>,
}

impl StateCell {
    fn new() -> Arc<Self> {
        let (tx, _) = watch::channel(SessionState::Idle);
        Arc::new(Self {
            current: RwLock::new(SessionState::Idle),
            tx,
        })
    }

    fn get(&self) -> SessionState {
        *self.current.read()
    }

    /// Apply a transition if the state machine allows it. Stale engine
    /// callbacks racing teardown land here with an invalid transition and
    /// are dropped.
    fn advance(&self, target: SessionState) -> bool {
        let mut current = self.current.write();
        let from = *current;
        if !from.can_transition_to(target) {
            debug!(from = %from, to = %target, "Ignoring invalid state transition");
            return false;
        }
        info!(from = %from, to = %target, "State transition");
        *current = target;
        // send_replace updates the stored value even with no receivers
        self.tx.send_replace(target);
        true
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

/// The live binding of one descriptor to one engine instance
pub struct PlaybackSession {
    id: SessionId,
    descriptor: VideoDescriptor,
    engine: Box<dyn PlaybackEngine>,
    state: Arc<StateCell>,
}

impl PlaybackSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn descriptor(&self) -> &VideoDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Subscribe to state changes
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Dispose the engine and force the terminal state. Safe to call on an
    /// already-stopped session.
    fn shutdown(&mut self) {
        if !self.engine.is_disposed() {
            self.engine.dispose();
        }
        self.state.advance(SessionState::Stopped);
    }
}

/// Owns at most one active [`PlaybackSession`] per viewport
pub struct SessionManager {
    factory: Arc<dyn EngineFactory>,
    errors: Arc<ErrorSurface>,
    deterrence: Arc<DeterrenceController>,
    options: PlayerOptions,
    active: Option<PlaybackSession>,
}

impl SessionManager {
    pub fn new(
        factory: Arc<dyn EngineFactory>,
        errors: Arc<ErrorSurface>,
        deterrence: Arc<DeterrenceController>,
        options: PlayerOptions,
    ) -> Self {
        Self {
            factory,
            errors,
            deterrence,
            options,
            active: None,
        }
    }

    /// Start a session for a descriptor.
    ///
    /// Instantiation and configuration failures are published to the error
    /// surface and propagated; there is no retry here.
    #[instrument(skip(self, descriptor), fields(url = %descriptor.url, title = %descriptor.title))]
    pub async fn start(&mut self, descriptor: VideoDescriptor) -> Result<SessionId> {
        // The previous engine must be fully disposed before the new one is
        // constructed.
        self.stop();

        let state = StateCell::new();
        state.advance(SessionState::Starting);

        let mut engine = match self.factory.create(&descriptor.url).await {
            Ok(engine) => engine,
            Err(err) => {
                self.errors.report(SESSION_SETUP_ERROR_CODE, err.to_string());
                return Err(err);
            }
        };

        if let Err(err) = engine.configure(&descriptor.license) {
            self.errors.report(SESSION_SETUP_ERROR_CODE, err.to_string());
            engine.dispose();
            return Err(err);
        }

        // The single listener: every engine error funnels into the error
        // surface, and the first surface signal attaches per-surface
        // deterrence before transitioning to Playing.
        let listener_state = Arc::clone(&state);
        let listener_errors = Arc::clone(&self.errors);
        let listener_deterrence = Arc::clone(&self.deterrence);
        let deterrence_enabled = self.options.deterrence_enabled;
        engine.set_event_listener(Arc::new(move |event| match event {
            EngineEvent::SurfaceReady(surface) => {
                if deterrence_enabled {
                    listener_deterrence.protect_surface(surface.as_ref());
                }
                listener_state.advance(SessionState::Playing);
            }
            EngineEvent::Error(error_event) => {
                listener_errors.publish(error_event);
                listener_state.advance(SessionState::Erroring);
            }
        }));

        if self.options.clear_error_on_start {
            self.errors.clear();
        }

        let session = PlaybackSession {
            id: SessionId::new(),
            descriptor,
            engine,
            state,
        };
        let id = session.id;
        info!(session_id = %id, "Playback session started");
        self.active = Some(session);
        Ok(id)
    }

    /// Dispose the active session's engine and release the session.
    /// A no-op when nothing is active.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.active.take() {
            session.shutdown();
            info!(session_id = %session.id, "Playback session stopped");
        }
    }

    /// The active session, if any
    pub fn active(&self) -> Option<&PlaybackSession> {
        self.active.as_ref()
    }

    /// State of the active session; `Idle` when nothing has started
    pub fn state(&self) -> SessionState {
        self.active
            .as_ref()
            .map(|s| s.state())
            .unwrap_or(SessionState::Idle)
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drm::LicenseConfig;
    use crate::engine::{EngineErrorEvent, EngineEventListener};
    use crate::error::Error;
    use crate::host::{DisplayCapture, HostPage, StyleSheetId, VideoSurface};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use url::Url;

    struct NullPage;

    impl HostPage for NullPage {
        fn inject_stylesheet(&self, _css: &str) -> Result<StyleSheetId> {
            Ok(StyleSheetId(0))
        }
        fn remove_stylesheet(&self, _id: StyleSheetId) -> Result<()> {
            Ok(())
        }
        fn display_capture(&self) -> Option<Arc<dyn DisplayCapture>> {
            None
        }
        fn set_display_capture(&self, _capture: Arc<dyn DisplayCapture>) {}
    }

    #[derive(Default)]
    struct FakeSurface {
        context_menu_suppressed: AtomicBool,
        styles: Mutex<Vec<(String, String)>>,
    }

    impl VideoSurface for FakeSurface {
        fn suppress_context_menu(&self) -> Result<()> {
            self.context_menu_suppressed.store(true, Ordering::SeqCst);
            Ok(())
        }
        fn set_style(&self, property: &str, value: &str) -> Result<()> {
            self.styles.lock().push((property.into(), value.into()));
            Ok(())
        }
    }

    /// Observation point for one fake engine instance
    #[derive(Default)]
    struct EngineProbe {
        configured: Mutex<Vec<LicenseConfig>>,
        listener: Mutex<Option<EngineEventListener>>,
        disposed: AtomicBool,
    }

    impl EngineProbe {
        fn fire(&self, event: EngineEvent) {
            let listener = self.listener.lock().clone().expect("listener registered");
            listener(&event);
        }
    }

    struct FakeEngine {
        probe: Arc<EngineProbe>,
        fail_configure: bool,
        log: Arc<Mutex<Vec<String>>>,
        index: usize,
    }

    impl PlaybackEngine for FakeEngine {
        fn configure(&mut self, license: &LicenseConfig) -> Result<()> {
            if self.fail_configure {
                return Err(Error::EngineConfig("unsupported key system".into()));
            }
            self.probe.configured.lock().push(license.clone());
            Ok(())
        }

        fn set_event_listener(&mut self, listener: EngineEventListener) {
            *self.probe.listener.lock() = Some(listener);
        }

        fn surface(&self) -> Option<Arc<dyn VideoSurface>> {
            None
        }

        fn dispose(&mut self) {
            self.probe.disposed.store(true, Ordering::SeqCst);
            self.log.lock().push(format!("dispose:{}", self.index));
        }

        fn is_disposed(&self) -> bool {
            self.probe.disposed.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct FakeFactory {
        probes: Mutex<Vec<Arc<EngineProbe>>>,
        log: Arc<Mutex<Vec<String>>>,
        fail_create: bool,
        fail_configure: bool,
    }

    impl FakeFactory {
        fn probe(&self, index: usize) -> Arc<EngineProbe> {
            Arc::clone(&self.probes.lock()[index])
        }
    }

    #[async_trait]
    impl EngineFactory for FakeFactory {
        async fn create(&self, _manifest: &Url) -> Result<Box<dyn PlaybackEngine>> {
            if self.fail_create {
                return Err(Error::EngineStart("engine unavailable".into()));
            }
            let mut probes = self.probes.lock();
            let index = probes.len();
            let probe = Arc::new(EngineProbe::default());
            probes.push(Arc::clone(&probe));
            self.log.lock().push(format!("create:{index}"));
            Ok(Box::new(FakeEngine {
                probe,
                fail_configure: self.fail_configure,
                log: Arc::clone(&self.log),
                index,
            }))
        }
    }

    fn manager(factory: Arc<FakeFactory>) -> (SessionManager, Arc<ErrorSurface>) {
        let errors = Arc::new(ErrorSurface::new());
        let deterrence = Arc::new(DeterrenceController::new(Arc::new(NullPage)));
        let manager = SessionManager::new(
            factory,
            Arc::clone(&errors),
            deterrence,
            PlayerOptions::default(),
        );
        (manager, errors)
    }

    fn descriptor(title: &str) -> VideoDescriptor {
        VideoDescriptor::new(
            Url::parse("https://cdn.example.com/a/manifest.mpd").unwrap(),
            title,
            LicenseConfig::widevine(Url::parse("https://license.example.com/wv").unwrap()),
        )
    }

    #[tokio::test]
    async fn test_start_configures_exact_license() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, _) = manager(Arc::clone(&factory));

        let wanted = descriptor("A");
        manager.start(wanted.clone()).await.unwrap();

        let configured = factory.probe(0).configured.lock().clone();
        assert_eq!(configured, vec![wanted.license]);
        assert_eq!(manager.state(), SessionState::Starting);
    }

    #[tokio::test]
    async fn test_restart_disposes_previous_engine_first() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, _) = manager(Arc::clone(&factory));

        manager.start(descriptor("A")).await.unwrap();
        manager.start(descriptor("B")).await.unwrap();

        assert!(factory.probe(0).disposed.load(Ordering::SeqCst));
        assert!(!factory.probe(1).disposed.load(Ordering::SeqCst));
        // No overlap: the first engine is gone before the second exists
        let log = factory.log.lock().clone();
        assert_eq!(log, vec!["create:0", "dispose:0", "create:1"]);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, _) = manager(Arc::clone(&factory));

        manager.stop(); // nothing active yet

        manager.start(descriptor("A")).await.unwrap();
        manager.stop();
        manager.stop();

        assert!(factory.probe(0).disposed.load(Ordering::SeqCst));
        assert_eq!(manager.state(), SessionState::Idle);
        assert!(manager.active().is_none());
    }

    #[tokio::test]
    async fn test_error_event_reaches_error_surface() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, errors) = manager(Arc::clone(&factory));

        manager.start(descriptor("A")).await.unwrap();
        factory
            .probe(0)
            .fire(EngineEvent::Error(EngineErrorEvent::new(
                3016,
                "LICENSE_REQUEST_FAILED",
            )));

        let current = errors.current().unwrap();
        assert_eq!(current.code, 3016);
        assert_eq!(current.message, "LICENSE_REQUEST_FAILED");
        assert_eq!(manager.state(), SessionState::Erroring);
    }

    #[tokio::test]
    async fn test_surface_ready_protects_and_plays() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, _) = manager(Arc::clone(&factory));

        manager.start(descriptor("A")).await.unwrap();

        let surface = Arc::new(FakeSurface::default());
        factory.probe(0).fire(EngineEvent::SurfaceReady(surface.clone()));

        assert_eq!(manager.state(), SessionState::Playing);
        assert!(surface.context_menu_suppressed.load(Ordering::SeqCst));
        assert!(surface
            .styles
            .lock()
            .contains(&("user-select".into(), "none".into())));
    }

    #[tokio::test]
    async fn test_engine_recovery_returns_to_playing() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, _) = manager(Arc::clone(&factory));

        manager.start(descriptor("A")).await.unwrap();
        let probe = factory.probe(0);

        probe.fire(EngineEvent::SurfaceReady(Arc::new(FakeSurface::default())));
        probe.fire(EngineEvent::Error(EngineErrorEvent::new(1002, "HTTP_ERROR")));
        assert_eq!(manager.state(), SessionState::Erroring);

        // Engine recovered internally and re-signalled its surface
        probe.fire(EngineEvent::SurfaceReady(Arc::new(FakeSurface::default())));
        assert_eq!(manager.state(), SessionState::Playing);
    }

    #[tokio::test]
    async fn test_stale_event_after_stop_is_ignored() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, errors) = manager(Arc::clone(&factory));

        manager.start(descriptor("A")).await.unwrap();
        let probe = factory.probe(0);
        manager.stop();

        // A late callback from the disposed engine must not resurrect state
        probe.fire(EngineEvent::SurfaceReady(Arc::new(FakeSurface::default())));
        assert_eq!(manager.state(), SessionState::Idle);

        // Late errors still surface; the banner outlives the session
        probe.fire(EngineEvent::Error(EngineErrorEvent::new(6000, "late")));
        assert_eq!(errors.current().unwrap().code, 6000);
    }

    #[tokio::test]
    async fn test_create_failure_is_reported() {
        let factory = Arc::new(FakeFactory {
            fail_create: true,
            ..FakeFactory::default()
        });
        let (mut manager, errors) = manager(factory);

        let result = manager.start(descriptor("A")).await;
        assert!(matches!(result, Err(Error::EngineStart(_))));
        assert!(errors.current().unwrap().message.contains("engine unavailable"));
        assert!(manager.active().is_none());
    }

    #[tokio::test]
    async fn test_configure_failure_disposes_engine() {
        let factory = Arc::new(FakeFactory {
            fail_configure: true,
            ..FakeFactory::default()
        });
        let (mut manager, errors) = manager(Arc::clone(&factory));

        let result = manager.start(descriptor("A")).await;
        assert!(matches!(result, Err(Error::EngineConfig(_))));
        assert!(factory.probe(0).disposed.load(Ordering::SeqCst));
        assert!(errors.current().is_some());
    }

    #[tokio::test]
    async fn test_clean_start_clears_previous_error() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, errors) = manager(Arc::clone(&factory));

        manager.start(descriptor("A")).await.unwrap();
        factory
            .probe(0)
            .fire(EngineEvent::Error(EngineErrorEvent::new(1002, "HTTP_ERROR")));
        assert!(errors.current().is_some());

        manager.start(descriptor("B")).await.unwrap();
        assert!(errors.current().is_none());
    }

    #[tokio::test]
    async fn test_state_subscription() {
        let factory = Arc::new(FakeFactory::default());
        let (mut manager, _) = manager(Arc::clone(&factory));

        manager.start(descriptor("A")).await.unwrap();
        let rx = manager.active().unwrap().subscribe_state();
        assert_eq!(*rx.borrow(), SessionState::Starting);

        factory
            .probe(0)
            .fire(EngineEvent::SurfaceReady(Arc::new(FakeSurface::default())));
        assert_eq!(*rx.borrow(), SessionState::Playing);
    }
}
