use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use super::app_config::LogLevel;

#[derive(Debug, Parser)]
#[command(
    name = "mirrorcord",
    version,
    about = "Mirrors transient Discord CDN images into durable storage behind stable URLs",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Root directory for the filesystem object store.
    #[arg(long, value_name = "PATH")]
    pub storage_dir: Option<PathBuf>,

    /// Base URL used when building cached URLs.
    #[arg(long, value_name = "URL")]
    pub public_base_url: Option<String>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Outbound request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Largest accepted image body in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_image_bytes: Option<u64>,
}
