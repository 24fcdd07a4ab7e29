use salvo::prelude::*;

use crate::audio;
use crate::error::SynthesisError;
use crate::types::SynthesisRequest;

use super::helpers::{get_state, synthesize};

/// POST /generate - Text-to-speech
#[handler]
pub async fn generate(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), SynthesisError> {
    let state = get_state(depot)?.clone();

    let request: SynthesisRequest = req.parse_json().await.map_err(|e| {
        SynthesisError::InvalidInput(format!("malformed request body: {e}"))
    })?;

    let clip = synthesize(&state, request).await?;
    let response = audio::encode_response(&clip).map_err(SynthesisError::Provider)?;

    tracing::info!("Generated audio successfully, duration: {}ms", response.duration_ms);

    res.render(Json(response));
    Ok(())
}
