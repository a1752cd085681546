//! Application configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::infrastructure::cdn::{DEFAULT_MAX_IMAGE_BYTES, DEFAULT_TIMEOUT_SECS, FetcherConfig};

const APP_NAME: &str = "mirrorcord";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Config file exists but is not valid TOML.
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Outbound fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest accepted image body in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

/// Application configuration, merged from a TOML file and the CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Root directory for the filesystem object store.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,

    /// Base URL to build `cached_url` values with. Falls back to the
    /// request's `Host` header when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Outbound fetch settings.
    #[serde(default)]
    pub fetch: FetchSettings,
}

impl AppConfig {
    /// Loads configuration from the given file, or from the default
    /// location, or falls back to defaults when no file exists.
    ///
    /// # Errors
    /// Returns `ConfigError` if a present file cannot be read or parsed.
    pub fn load(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path_override
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);

        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        let mut config: Self = toml::from_str(&raw)?;
        config.config = Some(path);
        Ok(config)
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: super::args::CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(bind) = args.bind {
            self.bind = bind;
        }
        if let Some(storage_dir) = args.storage_dir {
            self.storage_dir = Some(storage_dir);
        }
        if let Some(public_base_url) = args.public_base_url {
            self.public_base_url = Some(public_base_url);
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.fetch.timeout_secs = timeout_secs;
        }
        if let Some(max_image_bytes) = args.max_image_bytes {
            self.fetch.max_image_bytes = max_image_bytes;
        }
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Returns the storage root, explicit or derived from the platform
    /// data directory.
    #[must_use]
    pub fn effective_storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
                || {
                    warn!("No platform data directory, storing objects under ./objects");
                    PathBuf::from("objects")
                },
                |dirs| dirs.data_dir().join("objects"),
            )
        })
    }

    /// Fetcher settings in the form the fetcher consumes.
    #[must_use]
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout_secs: self.fetch.timeout_secs,
            max_image_bytes: self.fetch.max_image_bytes,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            bind: default_bind(),
            storage_dir: None,
            public_base_url: None,
            fetch: FetchSettings::default(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}
