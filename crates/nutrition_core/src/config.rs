//! Advisor configuration
//!
//! Loaded from TOML, then overridden from `CATTLE_ADVISOR_*` environment
//! variables. Every section has defaults, so an empty file is valid.

use crate::blend::BlendConfig;
use crate::errors::{NutritionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding [`AdvisorConfig::model_path`]
pub const ENV_MODEL_PATH: &str = "CATTLE_ADVISOR_MODEL_PATH";
/// Environment variable overriding [`LoggingConfig::level`]
pub const ENV_LOG_LEVEL: &str = "CATTLE_ADVISOR_LOG_LEVEL";
/// Environment variable overriding [`BlendConfig::tolerance`]
pub const ENV_TOLERANCE: &str = "CATTLE_ADVISOR_TOLERANCE";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Path to the JSON model bundle
    pub model_path: PathBuf,
    /// Feed blend allocation
    pub blend: BlendConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `RUST_LOG` nor `--verbose` is given
    pub level: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/nutrition_model.json"),
            blend: BlendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let config: AdvisorConfig = toml::from_str(&content)
            .map_err(|e| NutritionError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_MODEL_PATH) {
            self.model_path = PathBuf::from(val);
        }

        if let Some(val) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = val.trim().to_ascii_lowercase();
        }

        if let Some(val) = lookup(ENV_TOLERANCE) {
            self.blend.tolerance = val.trim().parse().map_err(|_| {
                NutritionError::Config(format!("{ENV_TOLERANCE} must be a number, got '{val}'"))
            })?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.model_path.as_os_str().is_empty() {
            return Err(NutritionError::Config("model_path is empty".into()));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(NutritionError::Config(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        self.blend.validate()?;

        if !self.model_path.exists() {
            warn!("Model file {} does not exist yet", self.model_path.display());
        }
        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| NutritionError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let config = AdvisorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.blend, BlendConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        std::fs::write(
            &path,
            "model_path = \"bundle.json\"\n\n[blend]\nforage_fraction = 0.55\n",
        )
        .unwrap();

        let config = AdvisorConfig::load_from_file(&path).unwrap();
        assert_eq!(config.model_path, PathBuf::from("bundle.json"));
        assert_eq!(config.blend.forage_fraction, 0.55);
        assert_eq!(config.blend.energy_fraction, BlendConfig::default().energy_fraction);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn save_load_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("advisor.toml");

        let mut config = AdvisorConfig::default();
        config.blend.tolerance = 0.05;
        config.logging.level = "debug".into();
        config.save_to_file(&path).unwrap();

        assert_eq!(AdvisorConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        std::fs::write(&path, "model_path = [").unwrap();
        assert!(matches!(
            AdvisorConfig::load_from_file(&path),
            Err(NutritionError::Config(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = [
            (ENV_MODEL_PATH, "/srv/models/cattle.json"),
            (ENV_LOG_LEVEL, " WARN "),
            (ENV_TOLERANCE, "0.2"),
        ]
        .into_iter()
        .collect();

        let mut config = AdvisorConfig::default();
        config
            .apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.model_path, PathBuf::from("/srv/models/cattle.json"));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.blend.tolerance, 0.2);
        config.validate().unwrap();
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut config = AdvisorConfig::default();
        let err = config
            .apply_overrides_from(|key| (key == ENV_TOLERANCE).then(|| "ten percent".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TOLERANCE));
    }

    #[test]
    fn zero_mandatory_share_fails_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        std::fs::write(&path, "[blend]\nforage_fraction = 0.0\n").unwrap();

        let config = AdvisorConfig::load_from_file(&path).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, NutritionError::Config(ref msg) if msg.contains("forage_fraction")));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = AdvisorConfig::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());
    }
}
