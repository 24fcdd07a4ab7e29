//! CSM-1B provider backed by a persistent model-worker subprocess
//!
//! The model runtime itself lives in the worker (spawned from
//! `CSM_WORKER_CMD`). The worker loads the checkpoint once, prints a
//! `ready` handshake line, then serves newline-delimited JSON requests
//! over stdin/stdout. Audio comes back as base64 of little-endian
//! 16-bit PCM.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use eyre::{Context, Result, eyre};
use serde::Deserialize;

use crate::audio::AudioClip;
use crate::config::Config;
use crate::error::SynthesisError;
use crate::types::SynthesisRequest;
use crate::utils::resolve_from_hub_cache;

/// One reply line from the worker
#[derive(Debug, Deserialize)]
struct WorkerReply {
    status: String,
    #[serde(default)]
    sample_rate: Option<u32>,
    #[serde(default)]
    audio_b64: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Handshake line printed by the worker after the model is loaded
#[derive(Debug, Deserialize)]
struct WorkerReady {
    event: String,
    sample_rate: u32,
}

pub struct CsmProvider {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    sample_rate: u32,
}

impl CsmProvider {
    /// Spawn the model worker and block until its model is loaded.
    ///
    /// Fails with `ProviderUnavailable` when the gated weights cannot be
    /// obtained: no cached snapshot and no `HF_TOKEN` to download them.
    pub fn start(config: &Config) -> Result<Self, SynthesisError> {
        let weights_dir = resolve_from_hub_cache(&config.model_id);
        if weights_dir.is_none() && config.hf_token.is_none() {
            return Err(SynthesisError::ProviderUnavailable(format!(
                "model weights for {} are not cached and HF_TOKEN is not set",
                config.model_id
            )));
        }

        let mut parts = config.worker_cmd.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            SynthesisError::ProviderUnavailable("CSM_WORKER_CMD is empty".into())
        })?;

        let mut command = Command::new(program);
        command
            .args(parts)
            .env("CSM_MODEL", &config.model_id)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(dir) = &weights_dir {
            command.env("CSM_WEIGHTS_DIR", dir);
        }
        if let Some(token) = &config.hf_token {
            command.env("HF_TOKEN", token);
        }
        if config.no_torch_compile {
            command.env("NO_TORCH_COMPILE", "1");
        }

        let mut child = command.spawn().map_err(|e| {
            SynthesisError::ProviderUnavailable(format!(
                "failed to spawn model worker `{program}`: {e}"
            ))
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            SynthesisError::ProviderUnavailable("worker stdin unavailable".into())
        })?;
        let mut stdout = BufReader::new(child.stdout.take().ok_or_else(|| {
            SynthesisError::ProviderUnavailable("worker stdout unavailable".into())
        })?);

        // Model load happens here; the read blocks for the cold start.
        let sample_rate = read_ready(&mut stdout).map_err(|e| {
            let _ = child.kill();
            SynthesisError::ProviderUnavailable(format!("model worker failed to start: {e}"))
        })?;

        tracing::info!("Model worker ready, sample rate {sample_rate}Hz");
        Ok(Self { child, stdin, stdout, sample_rate })
    }
}

impl super::SpeechProvider for CsmProvider {
    fn synthesize(&mut self, request: &SynthesisRequest) -> Result<AudioClip> {
        write_request(&mut self.stdin, request)?;
        let clip = read_clip(&mut self.stdout)?;
        if clip.sample_rate != self.sample_rate {
            return Err(eyre!(
                "worker changed sample rate mid-session: {} -> {}",
                self.sample_rate,
                clip.sample_rate
            ));
        }
        Ok(clip)
    }
}

impl Drop for CsmProvider {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Wait for the worker's `{"event":"ready",...}` handshake.
fn read_ready<R: BufRead>(reader: &mut R) -> Result<u32> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .context("reading worker handshake")?;
    if n == 0 {
        return Err(eyre!("worker exited before signaling ready"));
    }
    let ready: WorkerReady =
        serde_json::from_str(line.trim()).context("parsing worker handshake")?;
    if ready.event != "ready" {
        return Err(eyre!("unexpected worker handshake event: {}", ready.event));
    }
    Ok(ready.sample_rate)
}

/// Send one synthesis request as a JSON line.
fn write_request<W: Write>(writer: &mut W, request: &SynthesisRequest) -> Result<()> {
    let mut line = serde_json::to_string(request).context("encoding worker request")?;
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .context("writing to model worker")?;
    writer.flush().context("flushing model worker pipe")?;
    Ok(())
}

/// Read one reply line and decode it into an audio clip.
fn read_clip<R: BufRead>(reader: &mut R) -> Result<AudioClip> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .context("reading from model worker")?;
    if n == 0 {
        return Err(eyre!("model worker closed its output pipe"));
    }

    let reply: WorkerReply =
        serde_json::from_str(line.trim()).context("parsing worker reply")?;
    match reply.status.as_str() {
        "ok" => {
            let sample_rate = reply
                .sample_rate
                .ok_or_else(|| eyre!("worker reply missing sample_rate"))?;
            let audio_b64 = reply
                .audio_b64
                .ok_or_else(|| eyre!("worker reply missing audio_b64"))?;
            let pcm = BASE64
                .decode(audio_b64)
                .context("decoding worker PCM payload")?;
            Ok(AudioClip { samples: decode_pcm16(&pcm)?, sample_rate })
        }
        "error" => Err(eyre!(
            "worker error: {}",
            reply.message.unwrap_or_else(|| "unspecified".into())
        )),
        other => Err(eyre!("unknown worker reply status: {other}")),
    }
}

/// Decode little-endian 16-bit PCM into f32 samples.
fn decode_pcm16(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 2 != 0 {
        return Err(eyre!("PCM payload has odd byte length {}", bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect())
}
