//! Application startup and lifecycle management.
//!
//! Builds the router, binds the listener (port 0 supported for tests) and
//! runs the server until a shutdown signal arrives.

use crate::config::{AppConfig, RateLimitSettings};
use crate::handlers::{generate_recipe, health_check};
use crate::services::OpenAiClient;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use recipe_core::error::AppError;
use recipe_core::middleware::rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware};
use recipe_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chef: OpenAiClient,
}

pub fn build_router(state: AppState, rate_limit: &RateLimitSettings) -> Router {
    let limiter = create_ip_rate_limiter(rate_limit.max_requests, rate_limit.window_seconds);

    Router::new()
        .route(
            "/recipe",
            post(generate_recipe)
                .layer(from_fn_with_state(limiter, ip_rate_limit_middleware)),
        )
        .route("/health", get(health_check))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
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
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        let chef = OpenAiClient::new(config.openai.clone())?;
        let state = AppState { chef };
        let router = build_router(state, &config.rate_limit);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            model = %config.openai.model,
            "Recipe relay listening on port {}",
            port
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
