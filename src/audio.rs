//! WAV encoding and transport packaging for generated audio

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use eyre::{Context, Result};

use crate::types::SynthesisResponse;

/// Raw audio returned by a speech provider
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / u64::from(self.sample_rate)
    }
}

/// Convert f32 samples to a mono 16-bit PCM WAV container
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let cursor = std::io::Cursor::new(&mut buffer);

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::new(cursor, spec)
        .context("Failed to create WAV writer")?;

    for &sample in samples {
        let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(sample_i16)
            .context("Failed to write sample")?;
    }

    writer.finalize()
        .context("Failed to finalize WAV")?;

    Ok(buffer)
}

/// Package a provider clip as the transport response: WAV container,
/// base64-encoded, with the actual duration computed from sample count.
pub fn encode_response(clip: &AudioClip) -> Result<SynthesisResponse> {
    let wav_bytes = samples_to_wav(&clip.samples, clip.sample_rate)?;
    Ok(SynthesisResponse {
        audio_base64: BASE64.encode(wav_bytes),
        sample_rate: clip.sample_rate,
        duration_ms: clip.duration_ms(),
    })
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::*;

    fn clip(n: usize, sample_rate: u32) -> AudioClip {
        let samples = (0..n)
            .map(|i| (i as f32 * 0.01).sin() * 0.3)
            .collect();
        AudioClip { samples, sample_rate }
    }

    #[test]
    fn duration_from_sample_count() {
        assert_eq!(clip(24_000, 24_000).duration_ms(), 1000);
        assert_eq!(clip(12_000, 24_000).duration_ms(), 500);
        assert_eq!(clip(0, 24_000).duration_ms(), 0);
    }

    #[test]
    fn wav_header_carries_sample_rate() {
        let wav = samples_to_wav(&clip(2400, 24_000).samples, 24_000).unwrap();
        let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 2400);
    }

    #[test]
    fn clipping_is_clamped() {
        let wav = samples_to_wav(&[2.0, -2.0, 0.0], 24_000).unwrap();
        let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![32767, -32768, 0]);
    }

    #[test]
    fn response_base64_decodes_to_wav() {
        let response = encode_response(&clip(4800, 24_000)).unwrap();
        assert_eq!(response.sample_rate, 24_000);
        assert_eq!(response.duration_ms, 200);

        let bytes = BASE64.decode(response.audio_base64).unwrap();
        let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
        assert_eq!(reader.len(), 4800);
    }
}
