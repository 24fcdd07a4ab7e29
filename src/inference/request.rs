use tokio::sync::oneshot;

use crate::audio::AudioClip;
use crate::error::SynthesisError;
use crate::types::SynthesisRequest;

/// Request sent to the inference thread
pub enum InferenceRequest {
    Synthesize {
        request: SynthesisRequest,
        response_tx: oneshot::Sender<Result<AudioClip, SynthesisError>>,
    },
}
