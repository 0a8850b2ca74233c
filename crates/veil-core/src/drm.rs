//! License server configuration
//!
//! A [`LicenseConfig`] maps DRM key-system identifiers (reverse-domain
//! strings such as `com.widevine.alpha`) to license-server URLs. The map is
//! handed to the streaming engine verbatim; schemes the engine does not
//! recognize are simply never attempted, and an empty map means the engine
//! is configured without any license servers (unencrypted content).

use crate::types::DrmSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// License-server configuration for a content item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Key system identifier -> license server URL
    pub servers: BTreeMap<String, Url>,
}

impl LicenseConfig {
    /// Create an empty configuration (no license servers)
    pub fn none() -> Self {
        Self::default()
    }

    /// Create a Widevine-only configuration
    pub fn widevine(license_url: Url) -> Self {
        Self::none().with_server(DrmSystem::Widevine.key_system(), license_url)
    }

    /// Create a PlayReady-only configuration
    pub fn playready(license_url: Url) -> Self {
        Self::none().with_server(DrmSystem::PlayReady.key_system(), license_url)
    }

    /// Add a license server for a key system
    pub fn with_server(mut self, key_system: impl Into<String>, license_url: Url) -> Self {
        self.servers.insert(key_system.into(), license_url);
        self
    }

    /// License server for a key system, if configured
    pub fn server_for(&self, key_system: &str) -> Option<&Url> {
        self.servers.get(key_system)
    }

    /// Check if any license server is configured
    pub fn is_configured(&self) -> bool {
        !self.servers.is_empty()
    }

    /// DRM systems with a configured license server, skipping identifiers
    /// no known system claims
    pub fn supported_systems(&self) -> Vec<DrmSystem> {
        self.servers
            .keys()
            .filter_map(|id| DrmSystem::from_key_system(id))
            .collect()
    }
}
