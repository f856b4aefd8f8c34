use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use travel_cms::api::{create_router, AppState};
use travel_cms::config::Config;
use travel_cms::i18n::LocaleRegistry;
use travel_cms::import::Importer;
use travel_cms::store::{ContentStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("travel_cms=info".parse()?),
        )
        .init();

    info!("Starting travel CMS");

    // Load configuration from environment
    let config = Config::from_env()?;
    let registry = LocaleRegistry::standard();
    info!("Supported locales: {}", registry.codes().collect::<Vec<_>>().join(", "));

    match config.database_url.clone() {
        Some(url) => {
            info!("Connecting to PostgreSQL");
            let store = PgStore::connect(&url, config.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            store.migrate().await.context("Failed to run migrations")?;
            serve(store, registry, config).await
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store");
            serve(MemoryStore::new(), registry, config).await
        }
    }
}

async fn serve<S: ContentStore>(store: S, registry: LocaleRegistry, config: Config) -> Result<()> {
    if let Some(path) = &config.seed_file {
        seed(&store, &registry, path, config.max_import_bytes).await?;
    }

    let addr = config.bind_address()?;
    let app = create_router(AppState::new(store, registry, config));

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Load a seed bundle into the store before serving.
async fn seed<S: ContentStore>(
    store: &S,
    registry: &LocaleRegistry,
    path: &str,
    max_bytes: usize,
) -> Result<()> {
    info!("Seeding content from {}", path);
    let payload = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path))?;

    let reports = Importer::new(store, registry, max_bytes)
        .import_bundle(&payload)
        .await
        .with_context(|| format!("Failed to import seed file {}", path))?;

    for (kind, report) in reports {
        info!(
            "Seeded {}: {} created, {} updated, {} skipped",
            kind, report.created, report.updated, report.skipped
        );
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
