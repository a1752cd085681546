use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mirrorcord::application::{MirrorImageUseCase, ServeCachedUseCase};
use mirrorcord::domain::services::{SourcePolicy, UrlValidator};
use mirrorcord::infrastructure::{AppConfig, CdnImageFetcher, CliArgs, FsObjectStore};
use mirrorcord::presentation::{AppState, create_router};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stdout_layer = fmt::layer().with_target(true);
        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_logging(&config)?;

    info!(version = mirrorcord::VERSION, "Starting mirrorcord");

    let policy = Arc::new(SourcePolicy::discord());
    let fetcher = Arc::new(CdnImageFetcher::new(policy.clone(), &config.fetcher_config())?);

    let storage_dir = config.effective_storage_dir();
    let store = Arc::new(FsObjectStore::new(storage_dir.clone()).await?);
    info!(path = %storage_dir.display(), "Object storage ready");

    let state = Arc::new(AppState::new(
        MirrorImageUseCase::new(UrlValidator::new(policy), fetcher, store.clone()),
        ServeCachedUseCase::new(store),
        config.public_base_url.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
