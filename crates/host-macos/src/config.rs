use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "DEVTREE_CONFIG";

/// Where registry entries come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrySource {
    /// The running system's IOKit registry.
    #[default]
    Live,
    /// A fresh `ioreg -a -l` archive.
    Ioreg,
    /// A previously captured `ioreg -a` archive on disk.
    Snapshot(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    pub source: RegistrySource,
    pub serial_controller_classes: Vec<String>,
    pub log_level: String,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            source: RegistrySource::Live,
            serial_controller_classes: vec![
                "AppleANS3NVMeController".to_string(),
                "AppleANS2NVMeController".to_string(),
                "IONVMeController".to_string(),
            ],
            log_level: "warn".to_string(),
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<EnumerationConfig> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: EnumerationConfig = serde_json::from_str(&data)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(config)
}

/// Explicit path first, then `DEVTREE_CONFIG`, then defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EnumerationConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => load_config(PathBuf::from(path)),
        _ => Ok(EnumerationConfig::default()),
    }
}
