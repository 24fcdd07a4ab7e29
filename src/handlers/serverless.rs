//! Serverless invocation surface
//!
//! Mirrors the hosting platform's handler convention: the request body
//! wraps the synthesis request as `{"input": {...}}`, and the reply is
//! always HTTP 200 with a `statusCode` field in the body. The platform,
//! not HTTP, carries the status to the caller.

use salvo::prelude::*;

use crate::audio;
use crate::error::SynthesisError;
use crate::types::ServerlessEnvelope;

use super::helpers::{get_state, synthesize};

/// POST /run - Serverless envelope invocation
#[handler]
pub async fn run(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let outcome = handle(req, depot).await;
    match outcome {
        Ok(body) => res.render(Json(body)),
        Err(err) => {
            if let SynthesisError::Provider(ref report) = err {
                tracing::error!("serverless synthesis failed: {report:#}");
            } else {
                tracing::warn!("serverless request failed: {}", err);
            }
            res.render(Json(serde_json::json!({
                "error": err.public_message(),
                "statusCode": err.status_code().as_u16(),
            })));
        }
    }
}

async fn handle(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<serde_json::Value, SynthesisError> {
    let state = get_state(depot)?.clone();

    let envelope: ServerlessEnvelope = req.parse_json().await.map_err(|e| {
        SynthesisError::InvalidInput(format!("malformed invocation envelope: {e}"))
    })?;

    let clip = synthesize(&state, envelope.input).await?;
    let response = audio::encode_response(&clip).map_err(SynthesisError::Provider)?;

    let mut body = serde_json::to_value(response)
        .map_err(|e| SynthesisError::Provider(e.into()))?;
    body["statusCode"] = serde_json::json!(200);
    Ok(body)
}
