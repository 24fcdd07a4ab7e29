//! Model hub cache resolution

use std::path::PathBuf;

use eyre::Result;

/// Resolve a HuggingFace Hub cache directory to its snapshot path.
///
/// HuggingFace stores models in `<model_dir>/snapshots/<hash>/`. This function
/// checks for that structure and returns the snapshot path, or the original
/// path if no snapshots directory exists.
pub fn resolve_hf_snapshot(model_dir: &PathBuf) -> Result<PathBuf> {
    let snapshots_dir = model_dir.join("snapshots");
    if snapshots_dir.exists() {
        let snapshot = std::fs::read_dir(&snapshots_dir)?
            .filter_map(|e| e.ok())
            .find(|e| e.path().is_dir())
            .ok_or_else(|| eyre::eyre!("No snapshot found in {:?}", snapshots_dir))?;
        Ok(snapshot.path())
    } else {
        Ok(model_dir.clone())
    }
}

/// Resolve a model ID (e.g. "sesame/csm-1b") by searching the standard
/// HuggingFace cache locations.
///
/// Checks the following roots in order:
/// 1. `HUGGINGFACE_HUB_CACHE`
/// 2. `HF_HOME` (with `hub` appended)
/// 3. `~/.cache/huggingface/hub`
///
/// Returns the resolved path with snapshots navigated, or None if the
/// weights have not been downloaded yet.
pub fn resolve_from_hub_cache(model_id: &str) -> Option<PathBuf> {
    let home = dirs::home_dir()?;

    // Cache layout: models--{org}--{model} (slashes become --)
    let hf_dir_name = format!("models--{}", model_id.replace('/', "--"));
    let hf_cache_roots = [
        std::env::var("HUGGINGFACE_HUB_CACHE")
            .map(PathBuf::from)
            .ok(),
        std::env::var("HF_HOME")
            .map(|h| PathBuf::from(h).join("hub"))
            .ok(),
        Some(home.join(".cache/huggingface/hub")),
    ];

    for root in hf_cache_roots.iter().flatten() {
        let model_dir = root.join(&hf_dir_name);
        if model_dir.exists() {
            if let Ok(resolved) = resolve_hf_snapshot(&model_dir) {
                tracing::info!("Found model in HuggingFace cache: {:?}", resolved);
                return Some(resolved);
            }
        }
    }

    None
}
