use anyhow::{Context, Result};
use clap::Parser;
use mock_interview::{create_router, AppState, Config, HttpInterviewBackend, KvStore, RecordStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mock-interview", about = "Mock interview session service")]
struct Args {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config/mock-interview")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config).context("Failed to load configuration")?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Interview backend: {} (timeout {}s)", cfg.backend.base_url, cfg.backend.timeout_secs);

    let backend = HttpInterviewBackend::new(cfg.backend.base_url.clone(), cfg.backend.timeout())
        .context("Failed to create backend client")?;

    let kv = match &cfg.storage.path {
        Some(path) => KvStore::open(path)
            .await
            .with_context(|| format!("Failed to open store {}", path.display()))?,
        None => {
            info!("No storage path configured, interview records kept in memory");
            KvStore::in_memory()
        }
    };

    let state = AppState::new(Arc::new(backend), RecordStore::new(kv), cfg.backend.timeout());
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP API listening on {}", addr);

    axum::serve(listener, router).await.context("HTTP server failed")?;

    Ok(())
}
