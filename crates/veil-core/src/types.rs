//! Core types for Veil Core

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// DRM system types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrmSystem {
    Widevine,
    FairPlay,
    PlayReady,
    ClearKey,
}

impl DrmSystem {
    /// Returns the key-system identifier the streaming engine recognizes
    pub fn key_system(&self) -> &'static str {
        match self {
            DrmSystem::Widevine => "com.widevine.alpha",
            DrmSystem::FairPlay => "com.apple.fps",
            DrmSystem::PlayReady => "com.microsoft.playready",
            DrmSystem::ClearKey => "org.w3.clearkey",
        }
    }

    /// Parse a key-system identifier back into a DRM system
    pub fn from_key_system(id: &str) -> Option<DrmSystem> {
        match id {
            "com.widevine.alpha" => Some(DrmSystem::Widevine),
            "com.apple.fps" => Some(DrmSystem::FairPlay),
            "com.microsoft.playready" => Some(DrmSystem::PlayReady),
            "org.w3.clearkey" => Some(DrmSystem::ClearKey),
            _ => None,
        }
    }
}

impl std::fmt::Display for DrmSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrmSystem::Widevine => write!(f, "Widevine"),
            DrmSystem::FairPlay => write!(f, "FairPlay"),
            DrmSystem::PlayReady => write!(f, "PlayReady"),
            DrmSystem::ClearKey => write!(f, "ClearKey"),
        }
    }
}

/// Session state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No engine instantiated yet
    Idle,
    /// Engine created and configured, waiting for the rendered surface
    Starting,
    /// Engine reported a renderable surface
    Playing,
    /// Engine reported an error; playback may still recover internally
    Erroring,
    /// Engine disposed; terminal for this session instance
    Stopped,
}

impl SessionState {
    /// Check if transition to target state is valid
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            // From Idle
            (Idle, Starting) |
            // From Starting
            (Starting, Playing) | (Starting, Erroring) |
            // From Playing
            (Playing, Erroring) |
            // From Erroring: the engine may recover on its own
            (Erroring, Playing) |
            // Stop is reachable from every live state
            (Idle, Stopped) | (Starting, Stopped) | (Playing, Stopped) | (Erroring, Stopped)
        )
    }

    /// Returns true once the session can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Stopped)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Starting => write!(f, "starting"),
            SessionState::Playing => write!(f, "playing"),
            SessionState::Erroring => write!(f, "erroring"),
            SessionState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Player behaviour options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerOptions {
    /// Clear the error surface when a new session starts cleanly
    pub clear_error_on_start: bool,
    /// Install capture deterrence on mount
    pub deterrence_enabled: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            clear_error_on_start: true,
            deterrence_enabled: true,
        }
    }
}
