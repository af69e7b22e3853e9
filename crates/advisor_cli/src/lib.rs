//! Cattle Advisor CLI support
//!
//! Configuration resolution and the interactive adjustment session used by
//! the `cattle-advisor` binary.

pub mod session;

use anyhow::{Context, Result};
use cattle_nutrition_core::AdvisorConfig;
use std::path::{Path, PathBuf};

pub use session::run_session;

/// Resolve configuration: file (or defaults), then environment, then flags.
pub fn load_config(config_path: Option<&Path>, model_override: Option<PathBuf>) -> Result<AdvisorConfig> {
    let mut config = match config_path {
        Some(path) => AdvisorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AdvisorConfig::default(),
    };

    config
        .apply_env_overrides()
        .context("Invalid environment override")?;

    if let Some(model_path) = model_override {
        config.model_path = model_path;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Split a comma-separated ingredient list, dropping blanks
pub fn parse_ingredient_list(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
