//! Cache key derivation.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::domain::entities::StorageKey;

/// Number of hex characters kept from the digest.
const SHORT_HASH_LEN: usize = 8;

/// Derives the storage key for a source URL at the given instant.
///
/// Hashing always uses the ORIGINAL source URL with every query parameter
/// stripped, never a fallback variant, so repeated writes for the same
/// image converge on one key regardless of which fetch attempt succeeded.
/// Pure and total.
#[must_use]
pub fn derive(source_url: &str, extension: &str, now: DateTime<Utc>) -> StorageKey {
    let stripped = source_url
        .split_once('?')
        .map_or(source_url, |(base, _)| base);

    let digest = Sha256::digest(stripped.as_bytes());

    StorageKey {
        date_prefix: now.format("%Y%m%d").to_string(),
        short_hash: hex::encode(&digest[..SHORT_HASH_LEN / 2]),
        extension: extension.to_ascii_lowercase(),
    }
}
