use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::DEFAULT_DIR_MODE;

/// How Read verifies an existing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadPolicy {
    /// Re-download the URL on every refresh and compare hashes (also re-hashes the file on disk).
    #[default]
    Refetch,
    /// Only re-hash the file on disk; no network I/O.
    Local,
}

/// Provider configuration loaded from `~/.config/utility-provider/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Refresh strategy for Read.
    #[serde(default)]
    pub read_policy: ReadPolicy,
    /// Permission bits for directories created above `filename` (Unix only).
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            read_policy: ReadPolicy::default(),
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("utility-provider")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProviderConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ProviderConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from(path: &Path) -> Result<ProviderConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: ProviderConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ProviderConfig::default();
        assert_eq!(cfg.read_policy, ReadPolicy::Refetch);
        assert_eq!(cfg.dir_mode, 0o755);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ProviderConfig {
            read_policy: ReadPolicy::Local,
            dir_mode: 0o700,
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ProviderConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.read_policy, ReadPolicy::Local);
        assert_eq!(parsed.dir_mode, 0o700);
    }

    #[test]
    fn config_toml_empty_uses_defaults() {
        let cfg: ProviderConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.read_policy, ReadPolicy::Refetch);
        assert_eq!(cfg.dir_mode, DEFAULT_DIR_MODE);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            read_policy = "local"
            dir_mode = 0o750
        "#;
        let cfg: ProviderConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.read_policy, ReadPolicy::Local);
        assert_eq!(cfg.dir_mode, 0o750);
    }

    #[test]
    fn config_toml_rejects_unknown_policy() {
        assert!(toml::from_str::<ProviderConfig>("read_policy = \"sometimes\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "read_policy = \"local\"\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.read_policy, ReadPolicy::Local);
        assert!(load_from(&dir.path().join("missing.toml")).is_err());
    }
}
