//! CSM Audio Generation API server
//!
//! Provides endpoints for:
//! - POST /generate - text-to-speech via the CSM-1B model
//! - POST /run      - serverless invocation envelope around the same contract
//! - GET  /health   - liveness plus model-loaded flag
//! - GET  /         - API information
//!
//! Note: the model runtime is not Send/Sync, so we use channels to
//! communicate with a dedicated inference thread that owns the provider.

use salvo::prelude::*;
use tokio::sync::{mpsc, watch};

mod audio;
mod config;
mod error;
mod handlers;
mod inference;
mod provider;
mod router;
mod state;
mod types;
mod utils;

use config::Config;
use inference::InferenceRequest;
use state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csm_api=info".into()),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Starting CSM API server on port {}", config.port);

    // The channel both serializes synthesis and queues callers that
    // arrive while the model is still loading.
    let (inference_tx, inference_rx) = mpsc::channel::<InferenceRequest>(32);
    let (loaded_tx, loaded_rx) = watch::channel(false);

    // Spawn inference thread (owns the speech provider). The server
    // starts serving immediately; /health reports model_loaded=false
    // until the cold start finishes.
    let config_clone = config.clone();
    std::thread::spawn(move || {
        inference::inference_thread(config_clone, inference_rx, loaded_tx);
    });

    let state = AppState {
        inference_tx,
        model_loaded: loaded_rx,
        synthesis_timeout: config.synthesis_timeout,
    };

    let router = router::build_router(state);

    let listen_addr = format!("0.0.0.0:{}", config.port);
    let acceptor = TcpListener::new(&listen_addr).bind().await;

    tracing::info!("HTTP server listening on http://{}", listen_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /generate");
    tracing::info!("  POST /run");

    Server::new(acceptor).serve(router).await;
}
