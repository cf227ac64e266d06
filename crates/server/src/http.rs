//! HTTP routes for the delivery endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use contracts::encode_batch;
use pacer::Pacer;

use crate::ServerError;

#[derive(Clone)]
struct AppState {
    pacer: Arc<Pacer>,
}

/// The delivery endpoint server.
///
/// Bind first, then serve; splitting the two lets callers bind port 0 and
/// discover the assigned address before any request arrives.
pub struct DeliveryServer {
    listener: TcpListener,
    state: AppState,
}

impl DeliveryServer {
    /// Bind the listen socket.
    ///
    /// # Errors
    /// [`ServerError::Bind`] when the port is unavailable.
    pub async fn bind(port: u16, pacer: Arc<Pacer>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|source| ServerError::Bind { port, source })?;
        Ok(Self {
            listener,
            state: AppState { pacer },
        })
    }

    /// The bound address (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the shutdown token fires.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        let app = Router::new()
            .route("/v1/next", get(handle_next))
            .route("/v1/status", get(handle_status))
            .with_state(self.state);

        info!(%addr, "delivery endpoint listening");

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;

        info!("delivery endpoint stopped");
        Ok(())
    }
}

// --- GET /v1/next ---

async fn handle_next(State(state): State<AppState>) -> impl IntoResponse {
    let batch = state.pacer.release_next();
    debug!(records = batch.len(), "serving window");
    metrics::counter!("endpoint_windows_served").increment(1);

    ([(CONTENT_TYPE, "application/json")], encode_batch(&batch))
}

// --- GET /v1/status ---

#[derive(Serialize)]
struct StatusBody {
    released: usize,
    total: usize,
    elapsed_secs: u64,
    run_length_secs: u64,
}

async fn handle_status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.pacer.snapshot();
    axum::Json(StatusBody {
        released: snapshot.released,
        total: snapshot.total,
        elapsed_secs: snapshot.elapsed_secs,
        run_length_secs: snapshot.run_length_secs,
    })
}
