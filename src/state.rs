use tokio::sync::{mpsc, watch};

use crate::inference::InferenceRequest;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Channel to send synthesis requests to the inference thread
    pub inference_tx: mpsc::Sender<InferenceRequest>,
    /// Flips to true once the provider has finished loading
    pub model_loaded: watch::Receiver<bool>,
    /// Bounded wait for a single synthesis call
    pub synthesis_timeout: std::time::Duration,
}

impl AppState {
    pub fn model_loaded(&self) -> bool {
        *self.model_loaded.borrow()
    }
}
