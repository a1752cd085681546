//! Source CDN URL types.

use serde::Serialize;
use url::Url;

/// A source CDN image URL that has passed policy validation.
///
/// Constructed only by the URL validator, so holding one guarantees the
/// host is on the allow-list and the path carries a recognized marker.
/// Immutable; the fetch strategist derives transformed variants from it
/// without ever mutating the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    url: Url,
}

impl SourceUrl {
    /// Wraps an already-validated URL.
    pub(crate) fn new(url: Url) -> Self {
        Self { url }
    }

    /// Returns the parsed URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the URL as originally received, query included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl std::fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// One entry in the ordered log of URL variants tried during a fetch.
///
/// Kept only for the diagnostic payload of a failed fetch; discarded once
/// the request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchAttempt {
    /// The exact URL variant that was requested.
    pub url: String,
    /// HTTP status returned, when a response arrived at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Transport-level error, when no response arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchAttempt {
    /// Records an attempt that received a response.
    #[must_use]
    pub fn responded(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            error: None,
        }
    }

    /// Records an attempt that failed before any response arrived.
    #[must_use]
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            error: Some(error.into()),
        }
    }
}

impl std::fmt::Display for FetchAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.status, &self.error) {
            (Some(status), _) => write!(f, "{} -> {status}", self.url),
            (None, Some(error)) => write!(f, "{} -> {error}", self.url),
            (None, None) => write!(f, "{}", self.url),
        }
    }
}

/// The fetch strategist's success result.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Raw image bytes as served by the source.
    pub bytes: bytes::Bytes,
    /// Content type declared by the source.
    pub content_type: String,
    /// The URL variant that ultimately succeeded.
    pub final_url: String,
    /// Lowercased extension of the final URL's last path segment.
    pub extension: String,
}
