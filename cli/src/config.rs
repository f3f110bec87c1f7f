use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use gainlog_core::policy::InsightPolicy;

pub struct Config {
    pub store_path: PathBuf,
    pub data_dir: PathBuf,
    pub policy: InsightPolicy,
}

impl Config {
    /// Resolve the data directory and store path, and read `policy.json` if present.
    ///
    /// `store_override` replaces the default `<data_dir>/gainlog.json`.
    pub fn load(store_override: Option<PathBuf>) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "gainlog").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let store_path = store_override.unwrap_or_else(|| data_dir.join("gainlog.json"));
        let policy = load_policy(&data_dir.join("policy.json"))?;

        Ok(Config {
            store_path,
            data_dir,
            policy,
        })
    }
}

/// Read threshold overrides. Missing file or missing fields fall back to defaults.
pub fn load_policy(path: &Path) -> Result<InsightPolicy> {
    if !path.exists() {
        return Ok(InsightPolicy::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file: {}", path.display()))?;
    let policy: InsightPolicy = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid policy file: {}", path.display()))?;
    policy
        .validate()
        .with_context(|| format!("Invalid policy file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?policy, "loaded insight policy");
    Ok(policy)
}
