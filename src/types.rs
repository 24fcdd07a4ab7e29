//! Request/response types for the synthesis API
//!
//! The request shape matches the original CSM deployment contract:
//! `text` plus optional `speaker`, `max_audio_length_ms`, and prior
//! conversational `context` turns.

use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;

/// Speaker IDs the CSM-1B checkpoint supports.
pub const SUPPORTED_SPEAKERS: std::ops::RangeInclusive<u32> = 0..=1;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisRequest {
    /// Text to synthesize
    pub text: String,
    /// Speaker/voice ID
    #[serde(default)]
    pub speaker: u32,
    /// Upper bound on generated audio duration
    #[serde(default = "default_max_audio_length_ms")]
    pub max_audio_length_ms: u64,
    /// Prior conversational turns, oldest first
    #[serde(default)]
    pub context: Vec<ContextSegment>,
}

fn default_max_audio_length_ms() -> u64 {
    10_000
}

/// One prior turn used to condition generation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContextSegment {
    pub text: String,
    pub speaker: u32,
}

impl SynthesisRequest {
    /// Validate the request before it reaches the provider.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        if self.text.trim().is_empty() {
            return Err(SynthesisError::InvalidInput("text must not be empty".into()));
        }
        if !SUPPORTED_SPEAKERS.contains(&self.speaker) {
            return Err(SynthesisError::InvalidInput(format!(
                "unsupported speaker {}; supported speakers are {}-{}",
                self.speaker,
                SUPPORTED_SPEAKERS.start(),
                SUPPORTED_SPEAKERS.end()
            )));
        }
        if self.max_audio_length_ms == 0 {
            return Err(SynthesisError::InvalidInput(
                "max_audio_length_ms must be a positive integer".into(),
            ));
        }
        for (i, segment) in self.context.iter().enumerate() {
            if segment.text.trim().is_empty() {
                return Err(SynthesisError::InvalidInput(format!(
                    "context[{i}].text must not be empty"
                )));
            }
            if !SUPPORTED_SPEAKERS.contains(&segment.speaker) {
                return Err(SynthesisError::InvalidInput(format!(
                    "context[{i}].speaker {} is unsupported",
                    segment.speaker
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesisResponse {
    /// Base64-encoded WAV container
    pub audio_base64: String,
    /// Sample rate of the encoded audio in Hz
    pub sample_rate: u32,
    /// Actual duration of the generated clip
    pub duration_ms: u64,
}

/// Serverless invocation envelope: `{"input": SynthesisRequest}`
#[derive(Debug, Deserialize)]
pub struct ServerlessEnvelope {
    pub input: SynthesisRequest,
}

// ============================================================================
// Error body
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
