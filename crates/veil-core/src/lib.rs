//! Veil Core - Protected Playback Library
//!
//! This crate provides the core functionality for presenting DRM-protected
//! video through an opaque adaptive-streaming engine:
//! - Video catalog: static descriptors binding a manifest URL to its
//!   license-server configuration
//! - Playback session management over an engine the host supplies
//! - Error surfacing for the presentation layer
//! - Capture deterrence: best-effort friction against screen recording and
//!   UI-driven content extraction
//!
//! The engine itself (manifest parsing, ABR, decryption) and the license
//! servers are outside this crate. So is capture *prevention*: the
//! deterrents are UX friction, not a security boundary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Veil Core                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐        ┌──────────────┐                       │
//! │  │    Video     │        │  Deterrence  │                       │
//! │  │   Catalog    │        │  Controller  │                       │
//! │  └──────┬───────┘        └──────┬───────┘                       │
//! │         │                       │                               │
//! │         └───────────┬───────────┘                               │
//! │                     │                                           │
//! │              ┌──────┴──────┐                                    │
//! │              │  Protected  │                                    │
//! │              │   Player    │                                    │
//! │              └──────┬──────┘                                    │
//! │                     │                                           │
//! │  ┌──────────────┐  ┌┴─────────────┐  ┌──────────────┐           │
//! │  │    Error     │  │   Session    │  │    Engine    │           │
//! │  │   Surface    │  │   Manager    │  │   Contract   │           │
//! │  └──────────────┘  └──────────────┘  └──────────────┘           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod deterrence;
pub mod drm;
pub mod engine;
pub mod error;
pub mod host;
pub mod player;
pub mod reporting;
pub mod session;
pub mod types;

pub use catalog::{Catalog, VideoDescriptor};
pub use deterrence::DeterrenceController;
pub use drm::LicenseConfig;
pub use engine::{
    EngineErrorEvent, EngineEvent, EngineEventListener, EngineFactory, ErrorDetail, PlaybackEngine,
};
pub use error::{Error, Result};
pub use host::{
    CaptureConstraints, CaptureStream, DisplayCapture, HostPage, StyleSheetId, VideoSurface,
};
pub use player::ProtectedPlayer;
pub use reporting::{ErrorSurface, PlaybackError};
pub use session::{PlaybackSession, SessionManager};
pub use types::{DrmSystem, PlayerOptions, SessionId, SessionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Veil Core initialized");
}
