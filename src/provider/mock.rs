//! Placeholder provider generating a sine wave per speaker

use eyre::Result;

use crate::audio::AudioClip;
use crate::types::SynthesisRequest;

/// Sample rate matching the real CSM output
const SAMPLE_RATE: u32 = 24_000;
/// Hard cap on generated samples (10 seconds at 24kHz)
const MAX_SAMPLES: u64 = 240_000;

/// Mock provider: a speaker-keyed sine tone instead of real speech.
///
/// Used for tests and deployments without model weights. Duration
/// honors `max_audio_length_ms` the same way the real model does.
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }
}

impl super::SpeechProvider for MockProvider {
    fn synthesize(&mut self, request: &SynthesisRequest) -> Result<AudioClip> {
        let duration_samples = (request
            .max_audio_length_ms
            .saturating_mul(u64::from(SAMPLE_RATE))
            / 1000)
            .min(MAX_SAMPLES) as usize;

        let frequency = 440.0 + f64::from(request.speaker) * 100.0;
        let samples = (0..duration_samples)
            .map(|i| {
                let t = i as f64 / f64::from(SAMPLE_RATE);
                (0.3 * (2.0 * std::f64::consts::PI * frequency * t).sin()) as f32
            })
            .collect();

        Ok(AudioClip { samples, sample_rate: SAMPLE_RATE })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SpeechProvider;

    fn request(speaker: u32, max_ms: u64) -> SynthesisRequest {
        SynthesisRequest {
            text: "Hello world".to_string(),
            speaker,
            max_audio_length_ms: max_ms,
            context: Vec::new(),
        }
    }

    #[test]
    fn duration_bounded_by_request() {
        let clip = MockProvider::new().synthesize(&request(0, 5000)).unwrap();
        assert_eq!(clip.sample_rate, 24_000);
        assert!(clip.duration_ms() <= 5000);
        assert_eq!(clip.samples.len(), 5000 * 24);
    }

    #[test]
    fn duration_capped_at_ten_seconds() {
        let clip = MockProvider::new().synthesize(&request(1, 60_000)).unwrap();
        assert_eq!(clip.samples.len(), 240_000);
        assert_eq!(clip.duration_ms(), 10_000);
    }

    #[test]
    fn extreme_max_length_saturates_instead_of_overflowing() {
        // u64::MAX passes validation (only positivity is required), so
        // the sample-count math must not overflow.
        let req = request(0, u64::MAX);
        assert!(req.validate().is_ok());
        let clip = MockProvider::new().synthesize(&req).unwrap();
        assert_eq!(clip.samples.len(), 240_000);
    }

    #[test]
    fn samples_stay_in_range() {
        let clip = MockProvider::new().synthesize(&request(1, 100)).unwrap();
        assert!(clip.samples.iter().all(|s| s.abs() <= 0.3 + f32::EPSILON));
    }
}
