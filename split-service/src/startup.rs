//! Application startup and lifecycle management.

use crate::config::{SplitConfig, StoreKind};
use crate::handlers;
use crate::services::{InMemorySplitStore, MongoSplitStore, SplitStore};
use axum::{
    http::{header, Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state. The store handle is opened once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SplitStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn SplitStore>) -> Self {
        Self { store }
    }
}

/// Any origin may GET or POST, sending only `Content-Type`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    let splits = Router::new()
        .route("/all", get(handlers::splits::list_splits))
        .route("/create", post(handlers::splits::create_split))
        .route("/test", get(handlers::splits::liveness));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/api/splits", splits)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Opens the configured store and binds the listener. A store that
    /// cannot be reached fails here, before anything listens.
    pub async fn build(config: SplitConfig) -> Result<Self, AppError> {
        let store: Arc<dyn SplitStore> = match config.store {
            StoreKind::Mongo => {
                let uri = config.mongodb.uri.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!("MONGO_URI is required"))
                })?;
                let store = MongoSplitStore::connect(
                    uri.expose_secret(),
                    &config.mongodb.database,
                    &config.mongodb.collection,
                )
                .await?;
                store.init_indexes().await?;
                Arc::new(store)
            }
            StoreKind::Memory => {
                tracing::warn!("Using in-memory split store; records are lost on exit");
                Arc::new(InMemorySplitStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Binds the listener around an already opened store.
    pub async fn build_with_store(
        config: SplitConfig,
        store: Arc<dyn SplitStore>,
    ) -> Result<Self, AppError> {
        let addr = config.common.bind_address();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Split service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(store),
        })
    }

    /// The port actually bound (differs from the configured one when that is 0).
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
