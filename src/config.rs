//! Configuration loading
//!
//! Embedded defaults, then optional files, then `BROWSY_` environment
//! variables.

use anyhow::{Context, Result};
use browsy_engine::EngineConfig;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Reference engine settings
    #[serde(default)]
    pub engine: EngineConfig,
    /// Tool listing settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// `[tools]` section
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// Framework printed by `browsy tools` without `--framework`
    #[serde(default = "default_framework")]
    pub default_framework: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            default_framework: default_framework(),
        }
    }
}

fn default_framework() -> String {
    "openai".to_string()
}

/// Load configuration from files and environment
pub fn load_config(extra: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/local").required(false));

    if let Some(path) = extra {
        builder = builder.add_source(File::from(path).required(true));
    }

    // prefix_separator("_") so BROWSY_ENGINE__TIMEOUT_SECS maps to engine.timeout_secs
    let config = builder
        .add_source(
            Environment::with_prefix("BROWSY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults_match_engine_defaults() {
        let config = load_config(None).unwrap();
        let defaults = EngineConfig::default();
        assert_eq!(config.engine.timeout_secs, defaults.timeout_secs);
        assert_eq!(config.engine.search_url, defaults.search_url);
        assert_eq!(config.engine.max_response_bytes, defaults.max_response_bytes);
        assert_eq!(config.tools.default_framework, "openai");
    }

    #[test]
    fn test_extra_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine]\nviewport_width = 800\n\n[tools]\ndefault_framework = \"crewai\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.engine.viewport_width, 800);
        assert_eq!(config.engine.viewport_height, 1080);
        assert_eq!(config.tools.default_framework, "crewai");
    }
}
