//! Configuration file support.
//!
//! This module reads the storage location, mosaic limits and equipment input
//! floor from a TOML file. Every field has a default, so an empty file (or no
//! file at all, via [`SkyMapConfig::default`]) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::equipment::MosaicLimits;
use crate::error::{StoreError, StoreResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyMapConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub mosaic: MosaicSettings,
    #[serde(default)]
    pub equipment: EquipmentSettings,
}

/// Where snapshots live and how they are checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_verify_checksums")]
    pub verify_checksums: bool,
}

/// Mosaic grid and overlap limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicSettings {
    #[serde(default = "default_max_grid")]
    pub max_rows: u32,
    #[serde(default = "default_max_grid")]
    pub max_cols: u32,
    #[serde(default = "default_max_overlap_percent")]
    pub max_overlap_percent: f64,
    #[serde(default = "default_max_overlap_pixels")]
    pub max_overlap_pixels: f64,
}

/// Equipment input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSettings {
    #[serde(default = "default_min_parameter_value")]
    pub min_parameter_value: f64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("skymap")
}

fn default_verify_checksums() -> bool {
    true
}

fn default_max_grid() -> u32 {
    10
}

fn default_max_overlap_percent() -> f64 {
    50.0
}

fn default_max_overlap_pixels() -> f64 {
    500.0
}

fn default_min_parameter_value() -> f64 {
    0.001
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            verify_checksums: default_verify_checksums(),
        }
    }
}

impl Default for MosaicSettings {
    fn default() -> Self {
        Self {
            max_rows: default_max_grid(),
            max_cols: default_max_grid(),
            max_overlap_percent: default_max_overlap_percent(),
            max_overlap_pixels: default_max_overlap_pixels(),
        }
    }
}

impl Default for EquipmentSettings {
    fn default() -> Self {
        Self {
            min_parameter_value: default_min_parameter_value(),
        }
    }
}

impl SkyMapConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SkyMapConfig)` if the file was read, parsed and validated
    /// * `Err(StoreError::Configuration)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            StoreError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> StoreResult<Self> {
        let config: SkyMapConfig = toml::from_str(content).map_err(|e| {
            StoreError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `skymap.toml` in:
    /// 1. Current directory
    /// 2. `skymap_core/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> StoreResult<Self> {
        let search_paths = [
            PathBuf::from("skymap.toml"),
            PathBuf::from("skymap_core/skymap.toml"),
            PathBuf::from("../skymap.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                log::debug!("Loading configuration from {}", path.display());
                return Self::from_file(path);
            }
        }

        Err(StoreError::Configuration(
            "No skymap.toml found in standard locations".to_string(),
        ))
    }

    /// Check the limits for values the stores cannot work with.
    pub fn validate(&self) -> StoreResult<()> {
        if self.mosaic.max_rows < 1 || self.mosaic.max_cols < 1 {
            return Err(StoreError::Configuration(
                "mosaic.max_rows and mosaic.max_cols must be at least 1".to_string(),
            ));
        }

        if !(self.mosaic.max_overlap_percent >= 0.0 && self.mosaic.max_overlap_percent < 100.0) {
            return Err(StoreError::Configuration(format!(
                "mosaic.max_overlap_percent must be in [0, 100), got {}",
                self.mosaic.max_overlap_percent
            )));
        }

        if !(self.mosaic.max_overlap_pixels >= 0.0) {
            return Err(StoreError::Configuration(format!(
                "mosaic.max_overlap_pixels must be non-negative, got {}",
                self.mosaic.max_overlap_pixels
            )));
        }

        if !(self.equipment.min_parameter_value > 0.0) {
            return Err(StoreError::Configuration(format!(
                "equipment.min_parameter_value must be positive, got {}",
                self.equipment.min_parameter_value
            )));
        }

        Ok(())
    }

    /// Mosaic limits derived from the `[mosaic]` section.
    pub fn mosaic_limits(&self) -> MosaicLimits {
        MosaicLimits {
            max_rows: self.mosaic.max_rows,
            max_cols: self.mosaic.max_cols,
            max_overlap_percent: self.mosaic.max_overlap_percent,
            max_overlap_pixels: self.mosaic.max_overlap_pixels,
        }
    }

    /// Clamp raw user input to the configured positive floor.
    ///
    /// Setters on [`crate::EquipmentStore`] do not validate; form handlers
    /// run their input through this first. Non-finite input maps to the floor.
    pub fn clamp_parameter(&self, value: f64) -> f64 {
        let floor = self.equipment.min_parameter_value;
        if value.is_finite() {
            value.max(floor)
        } else {
            floor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SkyMapConfig::from_toml_str("").unwrap();
        assert_eq!(config, SkyMapConfig::default());
        assert_eq!(config.mosaic.max_rows, 10);
        assert_eq!(config.storage.data_dir, PathBuf::from("skymap"));
        assert!(config.storage.verify_checksums);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[storage]
data_dir = "/tmp/skymap-data"
verify_checksums = false

[mosaic]
max_rows = 6
max_cols = 8
max_overlap_percent = 40.0
max_overlap_pixels = 300.0

[equipment]
min_parameter_value = 0.01
"#;

        let config = SkyMapConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/skymap-data"));
        assert!(!config.storage.verify_checksums);

        let limits = config.mosaic_limits();
        assert_eq!(limits.max_rows, 6);
        assert_eq!(limits.max_cols, 8);
        assert_eq!(limits.max_overlap_percent, 40.0);
        assert_eq!(limits.max_overlap_pixels, 300.0);
        assert_eq!(config.equipment.min_parameter_value, 0.01);
    }

    #[test]
    fn test_zero_grid_rejected() {
        let toml = r#"
[mosaic]
max_rows = 0
"#;
        let result = SkyMapConfig::from_toml_str(toml);
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }

    #[test]
    fn test_non_positive_floor_rejected() {
        let toml = r#"
[equipment]
min_parameter_value = 0.0
"#;
        assert!(SkyMapConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = SkyMapConfig::from_toml_str("[mosaic\nmax_rows = 3");
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }

    #[test]
    fn test_clamp_parameter() {
        let config = SkyMapConfig::default();
        assert_eq!(config.clamp_parameter(400.0), 400.0);
        assert_eq!(config.clamp_parameter(0.0), 0.001);
        assert_eq!(config.clamp_parameter(-5.0), 0.001);
        assert_eq!(config.clamp_parameter(f64::NAN), 0.001);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skymap.toml");
        std::fs::write(&path, "[mosaic]\nmax_cols = 4\n").unwrap();

        let config = SkyMapConfig::from_file(&path).unwrap();
        assert_eq!(config.mosaic.max_cols, 4);
        assert_eq!(config.mosaic.max_rows, 10);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SkyMapConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }
}
