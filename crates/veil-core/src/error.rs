//! Error types for Veil Core

use thiserror::Error;

/// Result type alias for playback operations
pub type Result<T> = std::result::Result<T, Error>;

/// Playback error types
#[derive(Error, Debug)]
pub enum Error {
    // Catalog errors
    #[error("Video catalog is empty")]
    EmptyCatalog,

    #[error("Invalid catalog document: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("No catalog entry at position {index}")]
    DescriptorOutOfRange { index: usize },

    // Engine errors
    #[error("Failed to start playback engine: {0}")]
    EngineStart(String),

    #[error("Engine rejected license configuration: {0}")]
    EngineConfig(String),

    #[error("Engine already disposed")]
    EngineDisposed,

    // Deterrence errors
    #[error("Screen recording is not allowed")]
    CaptureBlocked,

    #[error("Failed to install capture deterrence: {0}")]
    DeterrenceInstall(String),

    // Session errors
    #[error("Invalid session state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a deterrence installation error
    pub fn deterrence(msg: impl Into<String>) -> Self {
        Error::DeterrenceInstall(msg.into())
    }

    /// Returns true if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EngineStart(_) | Error::EngineConfig(_) | Error::DeterrenceInstall(_)
        )
    }

    /// Returns the error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::EmptyCatalog => "EMPTY_CATALOG",
            Error::CatalogParse(_) => "CATALOG_PARSE",
            Error::DescriptorOutOfRange { .. } => "DESCRIPTOR_RANGE",
            Error::EngineStart(_) => "ENGINE_START",
            Error::EngineConfig(_) => "ENGINE_CONFIG",
            Error::EngineDisposed => "ENGINE_DISPOSED",
            Error::CaptureBlocked => "CAPTURE_BLOCKED",
            Error::DeterrenceInstall(_) => "DETERRENCE_INSTALL",
            Error::InvalidStateTransition { .. } => "INVALID_STATE",
            Error::Internal(_) => "INTERNAL",
        }
    }
}
