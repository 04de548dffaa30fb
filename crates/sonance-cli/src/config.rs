use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use sonance_search::EngineOptions;
use std::path::PathBuf;

/// Configuration for sonance.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (SONANCE_* prefix)
/// 3. Config file (~/.config/sonance/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database holding the track tables.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: SONANCE_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/sonance/sonance.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "sonance_search=debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Result-size limits for queries.
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_recommend_limit")]
    pub recommend_limit: usize,
    #[serde(default = "default_mood_sample_size")]
    pub mood_sample_size: usize,
    #[serde(default = "default_time_machine_limit")]
    pub time_machine_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            log_level: default_log_level(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recommend_limit: default_recommend_limit(),
            mood_sample_size: default_mood_sample_size(),
            time_machine_limit: default_time_machine_limit(),
        }
    }
}

impl EngineConfig {
    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            recommend_limit: self.recommend_limit,
            mood_sample_size: self.mood_sample_size,
            time_machine_limit: self.time_machine_limit,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/sonance/config.toml
    /// Reads environment variables with SONANCE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("sonance");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration, overriding the database path (the --db flag).
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sonance")
        .join("sonance.db")
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_recommend_limit() -> usize {
    10
}

const fn default_mood_sample_size() -> usize {
    20
}

const fn default_time_machine_limit() -> usize {
    20
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/sonance/config.toml
/// - macOS: ~/Library/Application Support/sonance/config.toml
/// - Windows: %APPDATA%\sonance\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sonance")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Sonance Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (SONANCE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite database
#
# Must contain the dim_track, dim_artist, dim_time, fact_music_features,
# and fact_track_popularity tables. The catalog is loaded from it once at
# startup and never written.
#
# Can also be set via:
# - CLI: sonance --db /custom/path.db status
# - Environment: SONANCE_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/sonance.db"

# Log filter, used when RUST_LOG is not set
#log_level = "info"

[engine]
# Similar tracks returned by `sonance recommend`
recommend_limit = 10

# Tracks sampled by `sonance mood`
mood_sample_size = 20

# Tracks returned by `sonance time-machine`
time_machine_limit = 20
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.database_path.as_os_str().is_empty());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.engine.options(), EngineOptions::default());
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_db_path() {
        let custom_path = PathBuf::from("/tmp/test.db");
        let config = Config::load_with_db_path(custom_path.clone());
        assert!(config.is_ok());
        assert_eq!(config.unwrap().database_path, custom_path);
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.engine.options(), EngineOptions::default());
    }
}
