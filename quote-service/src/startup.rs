//! Application startup and lifecycle management.

use crate::config::QuoteConfig;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::{
    AssetSource, Database, EmbeddedAssets, OpenRouterClient, QuoteGenerator, QuoteMetrics,
    QuoteStore, SchemaMigrator,
};
use axum::{
    body::Body,
    http::{header, HeaderName, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use service_core::observability::make_request_span;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuoteStore>,
    pub generator: Arc<dyn QuoteGenerator>,
    pub metrics: QuoteMetrics,
    pub assets: Arc<dyn AssetSource>,
}

/// Build the HTTP router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    Router::new()
        .route("/api/v1/quote", post(handlers::quotes::create_quote))
        .route("/api/v1/quotes", get(handlers::quotes::list_quotes))
        .route("/api/v1/tags", get(handlers::tags::list_tags))
        .route("/healthz", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route("/", get(handlers::assets::index))
        .route("/style.css", get(handlers::assets::stylesheet))
        .route("/app.js", get(handlers::assets::script))
        .route("/static/*path", get(handlers::assets::static_asset))
        // Innermost first: CORS, metrics, trace span, request id, security headers.
        // Metrics must wrap CORS to count preflight answers.
        .layer(cors)
        .layer(from_fn_with_state(
            state.metrics.clone(),
            http_metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
    database: Option<Database>,
}

impl Application {
    /// Connect to PostgreSQL, apply migrations and bind the listener.
    pub async fn build(config: QuoteConfig) -> Result<Self, AppError> {
        let metrics = QuoteMetrics::new().map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to init metrics: {}", e))
        })?;

        let database = Database::connect(&config.database, metrics.clone())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                e
            })?;

        database.migrate().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        let generator = OpenRouterClient::new(config.openrouter.clone(), metrics.clone())?;
        tracing::info!(model = %generator.model(), "Initialized OpenRouter client");

        let store: Arc<dyn QuoteStore> = Arc::new(database.clone());
        Self::build_internal(config, store, Arc::new(generator), metrics, Some(database)).await
    }

    /// Build around caller-supplied collaborators. No migrations are run.
    pub async fn build_with(
        config: QuoteConfig,
        store: Arc<dyn QuoteStore>,
        generator: Arc<dyn QuoteGenerator>,
        metrics: QuoteMetrics,
    ) -> Result<Self, AppError> {
        Self::build_internal(config, store, generator, metrics, None).await
    }

    async fn build_internal(
        config: QuoteConfig,
        store: Arc<dyn QuoteStore>,
        generator: Arc<dyn QuoteGenerator>,
        metrics: QuoteMetrics,
        database: Option<Database>,
    ) -> Result<Self, AppError> {
        // Port 0 binds a random port for tests.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState {
            store,
            generator,
            metrics,
            assets: Arc::new(EmbeddedAssets),
        };

        Ok(Self {
            port,
            listener,
            state,
            database,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM, then close the pool.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!(
            service = "quote-service",
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.port,
            "Service ready to accept connections"
        );

        let result = axum::serve(
            self.listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        if let Some(database) = self.database {
            database.close().await;
        }

        result.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
