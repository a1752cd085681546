//! The mirror pipeline's error taxonomy.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::entities::FetchAttempt;

/// Discriminant for [`MirrorError`], used when rendering errors at the
/// HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself was malformed (bad JSON, missing fields).
    Input,
    /// The URL or the fetched response failed a policy check.
    Validation,
    /// Every URL variant was tried and none yielded a usable response.
    Fetch,
    /// The storage backend failed on read or write.
    Storage,
}

impl ErrorKind {
    /// Stable lowercase name for serialized payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Validation => "validation",
            Self::Fetch => "fetch",
            Self::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single tagged error for the whole caching pipeline.
///
/// The core never maps these to HTTP concepts; the presentation layer owns
/// the kind-to-status translation.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Malformed or incomplete request body.
    #[error("invalid request: {message}")]
    Input {
        /// What was wrong with the request.
        message: String,
    },

    /// URL or response failed validation; never retried.
    #[error("validation failed: {message}")]
    Validation {
        /// Which check failed.
        message: String,
    },

    /// All fetch variants exhausted or a transport failure occurred.
    #[error("fetch failed: {message}")]
    Fetch {
        /// Summary of the final failure.
        message: String,
        /// Status of the last upstream response, when one arrived.
        status: Option<u16>,
        /// Every URL variant tried, in order.
        attempts: Vec<FetchAttempt>,
        /// Headers of the last upstream response, for diagnosis.
        headers: BTreeMap<String, String>,
    },

    /// Storage backend failure on read or write.
    #[error("storage error: {message}")]
    Storage {
        /// What the backend reported.
        message: String,
    },
}

impl MirrorError {
    /// Creates an input error.
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a fetch error carrying the attempt log.
    #[must_use]
    pub fn fetch(
        message: impl Into<String>,
        status: Option<u16>,
        attempts: Vec<FetchAttempt>,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self::Fetch {
            message: message.into(),
            status,
            attempts,
            headers,
        }
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns the error's kind discriminant.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Input { .. } => ErrorKind::Input,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Returns the bare message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Input { message }
            | Self::Validation { message }
            | Self::Fetch { message, .. }
            | Self::Storage { message } => message,
        }
    }

    /// Status code of the last upstream response, for fetch errors that
    /// received one.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the caller is at fault, as opposed to the source or the
    /// backend.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Input { .. } | Self::Validation { .. })
    }
}
