use tokio::sync::{mpsc, watch};

use crate::config::Config;
use crate::error::SynthesisError;
use crate::provider::{self, SpeechProvider};

use super::InferenceRequest;

/// Inference thread that owns the speech provider (the model runtime is
/// not Send/Sync, and the accelerator serves one synthesis at a time).
///
/// Initialization runs exactly once, here, before the request loop;
/// callers arriving during the cold start queue on the channel. Once a
/// synthesis is dispatched it runs to completion, even if the HTTP side
/// has already given up on the wait.
pub fn inference_thread(
    config: Config,
    mut rx: mpsc::Receiver<InferenceRequest>,
    loaded_tx: watch::Sender<bool>,
) {
    let mut slot: Option<Box<dyn SpeechProvider>> = None;
    let mut load_error: Option<String> = None;

    match provider::load_provider(&config) {
        Ok(provider) => {
            slot = Some(provider);
            let _ = loaded_tx.send(true);
        }
        Err(e) => {
            tracing::error!("Failed to load speech provider: {e}");
            load_error = Some(e.to_string());
        }
    }

    tracing::info!("Inference thread ready, processing requests...");

    while let Some(request) = rx.blocking_recv() {
        match request {
            InferenceRequest::Synthesize { request, response_tx } => {
                let result = match slot.as_mut() {
                    Some(provider) => provider
                        .synthesize(&request)
                        .map_err(SynthesisError::Provider),
                    None => Err(SynthesisError::ProviderUnavailable(
                        load_error.clone().unwrap_or_else(|| "model not loaded".into()),
                    )),
                };
                let _ = response_tx.send(result);
            }
        }
    }

    tracing::info!("Inference thread shutting down");
}
