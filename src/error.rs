use salvo::http::StatusCode;
use salvo::prelude::*;

use crate::types::{ApiError, ApiErrorDetail};

/// Error taxonomy for a synthesis request.
///
/// Validation problems are echoed back to the caller; provider internals
/// are logged server-side and surfaced as a generic message.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("speech provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("synthesis timed out")]
    ProviderTimeout,
    #[error("audio generation failed")]
    Provider(eyre::Report),
}

impl SynthesisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ProviderTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_request_error",
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::ProviderTimeout => "provider_timeout",
            Self::Provider(_) => "provider_error",
        }
    }

    /// Message safe to return to the caller. Internal provider details
    /// stay server-side; the Display impl is already sanitized.
    pub fn public_message(&self) -> String {
        self.to_string()
    }
}

#[async_trait]
impl Writer for SynthesisError {
    async fn write(mut self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        if let Self::Provider(ref report) = self {
            tracing::error!("synthesis provider error: {report:#}");
        } else {
            tracing::warn!("request failed: {}", self);
        }
        render_error(res, self.status_code(), &self.public_message(), self.error_type());
    }
}

/// Render a standardized error response with proper HTTP status code
pub fn render_error(res: &mut Response, status: StatusCode, message: &str, error_type: &str) {
    res.status_code(status);
    res.render(Json(ApiError {
        error: ApiErrorDetail {
            message: message.to_string(),
            r#type: error_type.to_string(),
            code: None,
        },
    }));
}
