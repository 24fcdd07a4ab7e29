use std::time::Duration;

/// Which speech provider to load at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Real CSM-1B model behind the worker subprocess
    Csm,
    /// Sine-wave placeholder, no model weights needed
    Mock,
}

/// Configuration from environment
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub provider: ProviderKind,
    /// Hub repo id of the model weights
    pub model_id: String,
    /// Command line used to spawn the model worker
    pub worker_cmd: String,
    /// Credential for fetching gated weights, forwarded to the worker
    pub hf_token: Option<String>,
    /// Forwarded to the worker; disables the torch.compile path
    pub no_torch_compile: bool,
    /// Bounded wait for a single synthesis call
    pub synthesis_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            provider: match std::env::var("SPEECH_PROVIDER").as_deref() {
                Ok("mock") => ProviderKind::Mock,
                _ => ProviderKind::Csm,
            },
            model_id: std::env::var("CSM_MODEL")
                .unwrap_or_else(|_| "sesame/csm-1b".to_string()),
            worker_cmd: std::env::var("CSM_WORKER_CMD")
                .unwrap_or_else(|_| "python3 csm_worker.py".to_string()),
            hf_token: std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty()),
            no_torch_compile: std::env::var("NO_TORCH_COMPILE")
                .map(|v| v != "0")
                .unwrap_or(true),
            synthesis_timeout: Duration::from_secs(
                std::env::var("SYNTHESIS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }

    /// A config that always uses the mock provider (tests).
    #[cfg(test)]
    pub fn mock() -> Self {
        Self {
            port: 0,
            provider: ProviderKind::Mock,
            model_id: "sesame/csm-1b".to_string(),
            worker_cmd: String::new(),
            hf_token: None,
            no_torch_compile: true,
            synthesis_timeout: Duration::from_secs(5),
        }
    }
}
