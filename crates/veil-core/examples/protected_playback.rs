//! Protected playback example
//!
//! Demonstrates mounting the protected player against a stub host
//! environment and engine: catalog setup, capture deterrence, and error
//! surfacing.
//!
//! Run with: cargo run -p veil-core --example protected_playback

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use url::Url;
use veil_core::{
    Catalog, DisplayCapture, EngineErrorEvent, EngineEvent, EngineEventListener, EngineFactory,
    HostPage, LicenseConfig, PlaybackEngine, ProtectedPlayer, Result, StyleSheetId, VideoSurface,
};

/// A stand-in page: counts injected stylesheets, has no capture capability
#[derive(Default)]
struct StubPage {
    next_id: AtomicU64,
    styles: Mutex<Vec<StyleSheetId>>,
}

impl HostPage for StubPage {
    fn inject_stylesheet(&self, _css: &str) -> Result<StyleSheetId> {
        let id = StyleSheetId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.styles.lock().push(id);
        Ok(id)
    }

    fn remove_stylesheet(&self, id: StyleSheetId) -> Result<()> {
        self.styles.lock().retain(|existing| *existing != id);
        Ok(())
    }

    fn display_capture(&self) -> Option<Arc<dyn DisplayCapture>> {
        None
    }

    fn set_display_capture(&self, _capture: Arc<dyn DisplayCapture>) {}
}

type ListenerSlot = Arc<Mutex<Option<EngineEventListener>>>;

/// A stand-in engine that shares its listener slot with the factory so the
/// example can simulate engine events
struct StubEngine {
    listener: ListenerSlot,
    disposed: bool,
}

impl PlaybackEngine for StubEngine {
    fn configure(&mut self, license: &LicenseConfig) -> Result<()> {
        println!(
            "  Engine configured with {} license server(s)",
            license.servers.len()
        );
        Ok(())
    }

    fn set_event_listener(&mut self, listener: EngineEventListener) {
        *self.listener.lock() = Some(listener);
    }

    fn surface(&self) -> Option<Arc<dyn VideoSurface>> {
        None
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[derive(Default)]
struct StubFactory {
    listeners: Mutex<Vec<ListenerSlot>>,
}

impl StubFactory {
    fn fire(&self, index: usize, event: EngineEvent) {
        let slot = Arc::clone(&self.listeners.lock()[index]);
        let listener = slot.lock().clone().expect("listener registered");
        listener(&event);
    }
}

#[async_trait]
impl EngineFactory for StubFactory {
    async fn create(&self, manifest: &Url) -> Result<Box<dyn PlaybackEngine>> {
        println!("  Engine created for {manifest}");
        let listener: ListenerSlot = Arc::default();
        self.listeners.lock().push(Arc::clone(&listener));
        Ok(Box::new(StubEngine {
            listener,
            disposed: false,
        }))
    }
}

#[tokio::main]
async fn main() {
    veil_core::init();

    println!("Veil Core - Protected Playback Example");
    println!("======================================\n");

    // 1. The catalog: one protected asset
    println!("1. Video Catalog");
    println!("----------------");

    let catalog = Catalog::demo();
    let first = catalog.first().unwrap();
    println!("  Title: {}", first.title);
    println!("  Manifest: {}", first.url);
    println!("  DRM systems: {:?}\n", first.license.supported_systems());

    // 2. Mount the protected view
    println!("2. Mounting");
    println!("-----------");

    let page = Arc::new(StubPage::default());
    let factory = Arc::new(StubFactory::default());
    let mut player = ProtectedPlayer::new(catalog, page.clone(), factory.clone());

    player.mount().await.unwrap();
    println!("  Deterrence installed: {}", player.deterrence_installed());
    println!("  Stylesheets on page: {}", page.styles.lock().len());
    println!("  Session state: {}\n", player.state());

    // 3. Surface an error the way the engine would deliver it
    println!("3. Error Surface");
    println!("----------------");

    factory.fire(
        0,
        EngineEvent::Error(EngineErrorEvent::new(3016, "LICENSE_REQUEST_FAILED")),
    );
    println!("  Banner: {}", player.error_banner().unwrap());
    println!("  Session state: {}\n", player.state());

    // 4. Unmount and verify the page is clean
    println!("4. Unmounting");
    println!("-------------");

    player.unmount();
    println!("  Deterrence installed: {}", player.deterrence_installed());
    println!("  Stylesheets on page: {}", page.styles.lock().len());
}
