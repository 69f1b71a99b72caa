use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::external::HttpExternalReader;
use crate::index::IndexCompiler;
use crate::store::{PlayerRepository, SqliteContentReader, SqlitePlayerRepository};
use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use playout_db::pool::DbPool;
use playout_smil::sections::SubscriptionTargets;
use playout_smil::{BlockRenderer, ContentResolver, ResolverLimits, SectionRenderer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub mod routes_index;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub players: Arc<dyn PlayerRepository>,
    pub compiler: Arc<IndexCompiler>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppContext {
    /// Wire the compiler and dispatcher from configuration and a database pool
    pub fn from_config(config: Config, db_pool: DbPool) -> Result<Self> {
        let limits = ResolverLimits {
            max_depth: config.content.max_depth,
            max_expansions: config.content.max_expansions,
        };
        let resolver = ContentResolver::new(
            Arc::new(SqliteContentReader::new(db_pool.clone())),
            Arc::new(HttpExternalReader::new(config.content.external_timeout())),
            limits,
        );

        let renderer: Arc<dyn SectionRenderer> = match &config.index.templates_dir {
            Some(dir) => Arc::new(
                BlockRenderer::with_overrides(dir)
                    .with_context(|| format!("Failed to load templates from {:?}", dir))?,
            ),
            None => Arc::new(BlockRenderer::new()),
        };

        let compiler = Arc::new(IndexCompiler::new(
            config.index.index_dir.clone(),
            resolver,
            renderer,
            SubscriptionTargets::new(config.index.public_url.clone(), config.reports.server_url.clone()),
        ));

        let players: Arc<dyn PlayerRepository> = Arc::new(SqlitePlayerRepository::new(db_pool));

        let dispatcher = Arc::new(Dispatcher::new(
            players.clone(),
            compiler.clone(),
            config.index.fixtures_dir.clone(),
            config.index.compile_timeout(),
        ));

        Ok(Self {
            config: Arc::new(config),
            players,
            compiler,
            dispatcher,
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(routes_index::index_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(ctx: AppContext) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
