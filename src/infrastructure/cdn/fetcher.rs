//! Fetch strategist for the source CDN.
//!
//! The CDN rejects hotlinked requests based on browser headers and issues
//! signed, short-lived URLs. The strategist sends browser-like headers and
//! walks a fixed fallback sequence of URL variants, stopping at the first
//! success.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::domain::entities::{FetchAttempt, FetchedImage, SourceUrl};
use crate::domain::errors::MirrorError;
use crate::domain::ports::ImageFetchPort;
use crate::domain::services::SourcePolicy;

use super::variants;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";
const REFERER: &str = "https://discord.com/";
const ORIGIN: &str = "https://discord.com";

const IMAGE_MIME_PREFIX: &str = "image/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum accepted image size (25 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 25 * 1024 * 1024;

/// Tuning knobs for the fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Largest image body accepted, in bytes.
    pub max_image_bytes: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Fetches images from the source CDN with the fallback strategy.
pub struct CdnImageFetcher {
    client: Client,
    policy: Arc<SourcePolicy>,
    max_image_bytes: u64,
}

impl CdnImageFetcher {
    /// Creates a fetcher over the given source policy.
    ///
    /// # Errors
    /// Returns a fetch error if the HTTP client cannot be built.
    pub fn new(policy: Arc<SourcePolicy>, config: &FetcherConfig) -> Result<Self, MirrorError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
        headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                MirrorError::fetch(
                    format!("failed to create HTTP client: {e}"),
                    None,
                    Vec::new(),
                    BTreeMap::new(),
                )
            })?;

        Ok(Self {
            client,
            policy,
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Sends one request and records it in the attempt log.
    async fn attempt(
        &self,
        url: &Url,
        attempts: &mut Vec<FetchAttempt>,
    ) -> Result<reqwest::Response, MirrorError> {
        debug!(url = %url, attempt = attempts.len() + 1, "Requesting source");

        match self.client.get(url.clone()).send().await {
            Ok(response) => {
                attempts.push(FetchAttempt::responded(
                    url.as_str(),
                    response.status().as_u16(),
                ));
                Ok(response)
            }
            Err(e) => {
                attempts.push(FetchAttempt::failed(url.as_str(), e.to_string()));
                Err(MirrorError::fetch(
                    format!("request to {url} failed: {e}"),
                    None,
                    attempts.clone(),
                    BTreeMap::new(),
                ))
            }
        }
    }
}

#[async_trait]
impl ImageFetchPort for CdnImageFetcher {
    async fn fetch(&self, source: &SourceUrl) -> Result<FetchedImage, MirrorError> {
        let mut attempts = Vec::new();

        // Attempt 1: the requested URL with transient parameters stripped.
        let primary = variants::strip_transient_params(source.url(), &self.policy.retained_params);
        let mut response = self.attempt(&primary, &mut attempts).await?;

        // Attempt 2: the mirror-equivalent host, only after a 403. Any
        // other failure mode means the image is gone, not hotlink-blocked.
        if response.status() == StatusCode::FORBIDDEN {
            let mirrored = variants::swap_mirror_host(&primary, self.policy.host_pair());
            response = self.attempt(&mirrored, &mut attempts).await?;
        }

        // Attempt 3: the original host with every parameter stripped.
        if response.status() == StatusCode::FORBIDDEN {
            let bare = variants::strip_all_params(source.url());
            response = self.attempt(&bare, &mut attempts).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or("<binary>").to_string(),
                    )
                })
                .collect();
            warn!(status = %status, tried = attempts.len(), "All fetch variants exhausted");
            return Err(MirrorError::fetch(
                format!("source responded with {status}"),
                Some(status.as_u16()),
                attempts,
                headers,
            ));
        }

        let final_url = response.url().clone();

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with(IMAGE_MIME_PREFIX) {
            return Err(MirrorError::validation(format!(
                "source returned non-image content type: {content_type:?}"
            )));
        }

        let extension = variants::extension_of(&final_url)
            .filter(|e| self.policy.is_allowed_extension(e))
            .ok_or_else(|| {
                MirrorError::validation(format!(
                    "final URL has no recognized image extension: {final_url}"
                ))
            })?;

        let bytes = response.bytes().await.map_err(|e| {
            MirrorError::fetch(
                format!("failed to read response body: {e}"),
                None,
                attempts.clone(),
                BTreeMap::new(),
            )
        })?;

        if bytes.len() as u64 > self.max_image_bytes {
            return Err(MirrorError::validation(format!(
                "image of {} bytes exceeds the {} byte limit",
                bytes.len(),
                self.max_image_bytes
            )));
        }

        debug!(
            url = %final_url,
            size = bytes.len(),
            content_type = %content_type,
            "Image fetched"
        );

        Ok(FetchedImage {
            bytes,
            content_type,
            final_url: final_url.to_string(),
            extension,
        })
    }
}
