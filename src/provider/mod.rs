//! Speech synthesis providers
//!
//! The model is an external collaborator behind [`SpeechProvider`]: the
//! real CSM-1B checkpoint lives in a worker subprocess, and a mock
//! variant generates placeholder audio for tests and weight-less
//! deployments.

mod csm;
mod mock;

pub use csm::CsmProvider;
pub use mock::MockProvider;

use eyre::Result;

use crate::audio::AudioClip;
use crate::config::{Config, ProviderKind};
use crate::error::SynthesisError;
use crate::types::SynthesisRequest;

/// A loaded speech synthesis backend.
///
/// `synthesize` takes `&mut self` because the model runtime is
/// stateful and serves one call at a time; the inference thread owns
/// the provider and serializes access.
pub trait SpeechProvider {
    fn synthesize(&mut self, request: &SynthesisRequest) -> Result<AudioClip>;
}

/// Load the provider selected by configuration.
///
/// This is the expensive cold-start step (tens of seconds for the real
/// model); it runs exactly once, on the inference thread.
pub fn load_provider(config: &Config) -> Result<Box<dyn SpeechProvider>, SynthesisError> {
    match config.provider {
        ProviderKind::Mock => {
            tracing::info!("Using mock speech provider");
            Ok(Box::new(MockProvider::new()))
        }
        ProviderKind::Csm => {
            tracing::info!("Loading CSM model: {}", config.model_id);
            let provider = CsmProvider::start(config)?;
            tracing::info!("CSM model loaded successfully");
            Ok(Box::new(provider))
        }
    }
}
