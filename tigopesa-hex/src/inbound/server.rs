//! Webhook server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use tigopesa_types::ChargeConfirmer;

use super::handlers::{self, WebhookState};

/// HTTP server for the provider's webhook callbacks.
pub struct WebhookServer<C: ChargeConfirmer> {
    state: Arc<WebhookState<C>>,
}

impl<C: ChargeConfirmer> WebhookServer<C> {
    /// Creates a new webhook server around the given confirmer.
    ///
    /// `biller_code` must match the prefix the charge worker puts on
    /// outbound references - it is stripped before confirmation.
    pub fn new(confirmer: C, biller_code: impl Into<String>) -> Self {
        Self {
            state: Arc::new(WebhookState {
                confirmer,
                biller_code: biller_code.into(),
            }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/webhooks/tigopesa/debit-mandate",
                post(handlers::debit_mandate::<C>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Webhook server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
