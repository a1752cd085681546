//! Source URL variant transforms used by the fallback sequence.
//!
//! All transforms are pure; when a transform cannot apply, it degrades to
//! an unchanged clone of the input rather than failing.

use url::Url;

use crate::domain::services::url_validator::authority;

/// Drops every query parameter except the retained allow-list.
///
/// The dropped parameters are per-request signing and cache-busting
/// tokens; the retained ones (format, quality) change which rendition the
/// CDN serves.
#[must_use]
pub fn strip_transient_params(url: &Url, retained: &[String]) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| retained.iter().any(|r| r == key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut out = url.clone();
    out.set_query(None);
    if !kept.is_empty() {
        out.query_pairs_mut()
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    out
}

/// Swaps between the two mirror-equivalent source hosts.
///
/// A URL on neither host, or one whose host cannot be rewritten, comes
/// back unchanged.
#[must_use]
pub fn swap_mirror_host(url: &Url, hosts: (&str, &str)) -> Url {
    let Some(current) = authority(url) else {
        return url.clone();
    };

    let target = if current == hosts.0 {
        hosts.1
    } else if current == hosts.1 {
        hosts.0
    } else {
        return url.clone();
    };

    let (host, port) = match target.split_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host, Some(port)),
            Err(_) => return url.clone(),
        },
        None => (target, None),
    };

    let mut out = url.clone();
    if out.set_host(Some(host)).is_err() || out.set_port(port).is_err() {
        return url.clone();
    }
    out
}

/// Removes the query string entirely.
#[must_use]
pub fn strip_all_params(url: &Url) -> Url {
    let mut out = url.clone();
    out.set_query(None);
    out
}

/// Lowercased extension of the URL's last path segment, if it has one.
#[must_use]
pub fn extension_of(url: &Url) -> Option<String> {
    let segment = url.path_segments().and_then(Iterator::last)?;
    let (_, extension) = segment.rsplit_once('.')?;
    if extension.is_empty() {
        None
    } else {
        Some(extension.to_ascii_lowercase())
    }
}
