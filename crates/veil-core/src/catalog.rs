//! Video catalog
//!
//! A static, ordered list of the video descriptors this deployment can play.
//! The catalog is read-only configuration data: descriptors are constructed
//! once (in code or from a JSON document) and never mutated.

use crate::drm::LicenseConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// A playable content item: manifest address, display label, and the
/// license-server configuration needed to decrypt it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    /// Streaming manifest address (opaque to this crate)
    pub url: Url,
    /// Display label
    pub title: String,
    /// License-server configuration
    #[serde(default)]
    pub license: LicenseConfig,
}

impl VideoDescriptor {
    pub fn new(url: Url, title: impl Into<String>, license: LicenseConfig) -> Self {
        Self {
            url,
            title: title.into(),
            license,
        }
    }
}

/// Ordered, immutable collection of video descriptors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<VideoDescriptor>,
}

impl Catalog {
    /// Create a catalog from a list of descriptors
    pub fn new(entries: Vec<VideoDescriptor>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from a JSON document
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// The built-in demo catalog: Sintel behind the public Widevine test
    /// license proxy
    pub fn demo() -> Self {
        let url = Url::parse("https://storage.googleapis.com/shaka-demo-assets/sintel-widevine/dash.mpd")
            .expect("demo manifest URL is valid");
        let license_url = Url::parse("https://cwip-shaka-proxy.appspot.com/no_auth")
            .expect("demo license URL is valid");

        Self::new(vec![VideoDescriptor::new(
            url,
            "Sintel (Protected)",
            LicenseConfig::widevine(license_url),
        )])
    }

    /// All descriptors, in presentation order
    pub fn list(&self) -> &[VideoDescriptor] {
        &self.entries
    }

    /// The default selection
    pub fn first(&self) -> Result<&VideoDescriptor> {
        self.entries.first().ok_or(Error::EmptyCatalog)
    }

    /// Descriptor at a position, if present
    pub fn get(&self, index: usize) -> Option<&VideoDescriptor> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.len(), 1);

        let first = catalog.first().unwrap();
        assert_eq!(first.title, "Sintel (Protected)");
        assert!(first.url.as_str().ends_with("dash.mpd"));
        assert_eq!(
            first
                .license
                .server_for("com.widevine.alpha")
                .unwrap()
                .as_str(),
            "https://cwip-shaka-proxy.appspot.com/no_auth"
        );
    }

    #[test]
    fn test_empty_catalog_first_fails() {
        let catalog = Catalog::new(Vec::new());
        assert!(catalog.is_empty());
        assert!(matches!(catalog.first(), Err(Error::EmptyCatalog)));
    }

    #[test]
    fn test_from_json() {
        let document = r#"[
            {
                "url": "https://cdn.example.com/show/manifest.mpd",
                "title": "Example Show",
                "license": {
                    "servers": {
                        "com.widevine.alpha": "https://license.example.com/wv"
                    }
                }
            }
        ]"#;

        let catalog = Catalog::from_json(document).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.first().unwrap().title, "Example Show");
        assert!(catalog.first().unwrap().license.is_configured());
    }

    #[test]
    fn test_from_json_missing_license_defaults_empty() {
        let document = r#"[
            { "url": "https://cdn.example.com/open/manifest.mpd", "title": "Open Content" }
        ]"#;

        let catalog = Catalog::from_json(document).unwrap();
        assert!(!catalog.first().unwrap().license.is_configured());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(Error::CatalogParse(_))
        ));
    }

    #[test]
    fn test_identity_is_position() {
        let catalog = Catalog::new(vec![
            VideoDescriptor::new(
                Url::parse("https://cdn.example.com/a.mpd").unwrap(),
                "A",
                LicenseConfig::none(),
            ),
            VideoDescriptor::new(
                Url::parse("https://cdn.example.com/b.mpd").unwrap(),
                "B",
                LicenseConfig::none(),
            ),
        ]);

        assert_eq!(catalog.get(0).unwrap().title, "A");
        assert_eq!(catalog.get(1).unwrap().title, "B");
        assert!(catalog.get(2).is_none());
    }
}
