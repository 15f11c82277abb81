use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig, StoreBackend};
use migration::MigratorTrait;
use service::{ComicRepository, ComicService, MemoryComicRepository, PgComicRepository};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::{errors::StartupError, routes, state::AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Pick and prepare the configured store. The Postgres store is migrated before use.
pub async fn build_comic_service(cfg: &AppConfig) -> Result<ComicService, StartupError> {
    let repo: Arc<dyn ComicRepository> = match cfg.store.backend() {
        StoreBackend::Postgres => {
            // pool first, then bring the schema up to date
            let db = models::db::connect_with_config(&cfg.database).await?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;
            Arc::new(PgComicRepository::new(db))
        }
        StoreBackend::Memory => Arc::new(MemoryComicRepository::new()),
    };
    info!(event = "store_selected", backend = repo.backend(), "comic store ready");
    let comics = ComicService::new(repo);
    if cfg.store.seed {
        // a failed seed leaves the service usable
        if let Err(e) = comics.seed_if_empty().await {
            warn!(event = "seed_failed", error = %e, "could not seed sample comics");
        }
    }
    Ok(comics)
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(event = "signal_error", error = %e, "failed to listen for Ctrl+C");
        }
    };

    // SIGTERM, unix only
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                error!(event = "signal_error", error = %e, "failed to listen for SIGTERM");
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
    info!(event = "shutdown_signal", "shutdown signal received, draining connections");
}

/// Serve `app` until `shutdown` resolves, then close the store.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    comics: ComicService,
    shutdown: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    // stop accepting, let in-flight requests finish
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    // release store connections only after the last request is done
    match comics.close().await {
        Ok(()) => info!(event = "store_closed", backend = comics.backend(), "store connection closed"),
        Err(e) => warn!(event = "store_close_failed", error = %e, "store did not close cleanly"),
    }
    Ok(())
}

/// Public entry: build the app from `cfg` and run the HTTP server until a shutdown signal.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    // store + seed
    let comics = build_comic_service(&cfg).await?;
    // router with shared state
    let state = AppState::new(comics.clone(), &cfg.server.environment);
    let app = routes::build_router(state, build_cors());

    // bind
    let addr = bind_addr(&cfg.server)?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = %cfg.server.environment,
        backend = comics.backend(),
        "comics api listening"
    );
    serve(listener, app, comics, shutdown_signal()).await
}
