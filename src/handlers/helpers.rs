use salvo::prelude::*;
use tokio::sync::oneshot;
use tokio::time::timeout;

use crate::audio::AudioClip;
use crate::error::SynthesisError;
use crate::inference::InferenceRequest;
use crate::state::AppState;
use crate::types::SynthesisRequest;

pub(crate) fn get_state(depot: &mut Depot) -> Result<&AppState, SynthesisError> {
    depot
        .obtain::<AppState>()
        .map_err(|_| SynthesisError::Provider(eyre::eyre!("application state missing from depot")))
}

/// Validate a request, run it through the inference thread, and wait for
/// the clip with the configured timeout.
///
/// Validation failures never reach the provider. A timeout abandons the
/// wait only; the dispatched synthesis still runs to completion on the
/// inference thread.
pub(crate) async fn synthesize(
    state: &AppState,
    request: SynthesisRequest,
) -> Result<AudioClip, SynthesisError> {
    request.validate()?;

    tracing::info!(
        "Generating audio for text: {:.50}...",
        request.text
    );

    let (response_tx, response_rx) = oneshot::channel();
    state
        .inference_tx
        .send(InferenceRequest::Synthesize { request, response_tx })
        .await
        .map_err(|_| SynthesisError::Provider(eyre::eyre!("inference thread is gone")))?;

    timeout(state.synthesis_timeout, response_rx)
        .await
        .map_err(|_| SynthesisError::ProviderTimeout)?
        .map_err(|_| SynthesisError::Provider(eyre::eyre!("inference thread dropped the request")))?
}
