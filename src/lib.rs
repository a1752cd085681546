//! Mirrorcord - a Discord CDN image mirror.
//!
//! Discord serves attachment and proxied images through signed,
//! short-lived CDN URLs that stop working once shared outside the client.
//! This crate fetches such an image once, persists it in durable object
//! storage under a deterministic path, and serves it indefinitely from a
//! stable URL.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing the HTTP boundary.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "mirrorcord";
