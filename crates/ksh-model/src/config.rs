use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// When the legacy BGM volume scale applies to `mvol`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyVolumePolicy {
    /// Scale only charts whose header has no `ver=` option
    WhenVersionMissing,
    Always,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConverterConfig {
    pub legacy_bgm_volume_scale: f64,
    pub legacy_bgm_volume_policy: LegacyVolumePolicy,
    /// Re-validate the converted chart against the KSON schema
    pub validate_output: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            legacy_bgm_volume_scale: 0.6,
            legacy_bgm_volume_policy: LegacyVolumePolicy::WhenVersionMissing,
            validate_output: true,
        }
    }
}

impl ConverterConfig {
    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Factor applied to the `mvol` header value.
    pub fn bgm_volume_scale(&self, has_version: bool) -> f64 {
        let scaled = match self.legacy_bgm_volume_policy {
            LegacyVolumePolicy::WhenVersionMissing => !has_version,
            LegacyVolumePolicy::Always => true,
            LegacyVolumePolicy::Never => false,
        };
        if scaled { self.legacy_bgm_volume_scale } else { 1.0 }
    }
}
