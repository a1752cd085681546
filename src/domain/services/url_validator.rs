//! Source URL acceptance policy and validation.

use std::sync::Arc;

use url::Url;

use crate::domain::entities::SourceUrl;

const CDN_HOST: &str = "cdn.discordapp.com";
const MEDIA_HOST: &str = "media.discordapp.net";

const ATTACHMENT_MARKER: &str = "/attachments/";
const EXTERNAL_MARKER: &str = "/external/";

const RETAINED_PARAMS: [&str; 2] = ["format", "quality"];
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Immutable acceptance policy for source URLs.
///
/// Injected at construction rather than read from module state so tests
/// can substitute their own hosts and markers.
#[derive(Debug, Clone)]
pub struct SourcePolicy {
    /// The two mirror-equivalent source hostnames. Every image servable
    /// from one is servable from the other.
    pub hosts: [String; 2],
    /// Path substrings distinguishing attachment images from
    /// proxied/external images.
    pub path_markers: Vec<String>,
    /// Query parameters kept on the first fetch attempt; everything else
    /// is a request-specific signing or cache-busting token.
    pub retained_params: Vec<String>,
    /// Extensions a mirrored image may carry.
    pub allowed_extensions: Vec<String>,
}

impl SourcePolicy {
    /// The Discord CDN policy used in production.
    #[must_use]
    pub fn discord() -> Self {
        Self {
            hosts: [CDN_HOST.to_string(), MEDIA_HOST.to_string()],
            path_markers: vec![ATTACHMENT_MARKER.to_string(), EXTERNAL_MARKER.to_string()],
            retained_params: RETAINED_PARAMS.iter().map(ToString::to_string).collect(),
            allowed_extensions: IMAGE_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Returns the mirror-equivalent host pair.
    #[must_use]
    pub fn host_pair(&self) -> (&str, &str) {
        (&self.hosts[0], &self.hosts[1])
    }

    /// Whether the given extension names a recognized image format.
    #[must_use]
    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == extension)
    }
}

/// Returns the URL's host, including an explicit port when present.
#[must_use]
pub fn authority(url: &Url) -> Option<String> {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => Some(format!("{host}:{port}")),
        (Some(host), None) => Some(host.to_string()),
        _ => None,
    }
}

/// Decides whether a candidate string names an image on the source CDN.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    policy: Arc<SourcePolicy>,
}

impl UrlValidator {
    /// Creates a validator over the given policy.
    #[must_use]
    pub const fn new(policy: Arc<SourcePolicy>) -> Self {
        Self { policy }
    }

    /// Parses and validates a candidate URL.
    ///
    /// Total: malformed input degrades to `None` rather than an error.
    /// Query parameters are ignored here; they carry no identity.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<SourceUrl> {
        let url = Url::parse(raw).ok()?;

        let host = authority(&url)?;
        if !self.policy.hosts.iter().any(|h| *h == host) {
            return None;
        }

        let path = url.path();
        if !self.policy.path_markers.iter().any(|m| path.contains(m.as_str())) {
            return None;
        }

        Some(SourceUrl::new(url))
    }

    /// Whether the candidate is an acceptable source URL.
    #[must_use]
    pub fn is_acceptable(&self, raw: &str) -> bool {
        self.parse(raw).is_some()
    }
}
