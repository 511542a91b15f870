use crate::{
    CONFIG_DIR_ENV_VAR, CONFIG_DIR_NAME, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    LoggingConfig, StoreConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config for a workspace.
    ///
    /// Loading order:
    /// 1. Check for IDMAP_CONFIG_DIR env var, else use `<workspace>/.idmap/`
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply IDMAP_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load(workspace: &Path) -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir(workspace).join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: IDMAP_CONFIG_DIR env var > `<workspace>/.idmap/`
    pub fn config_dir(workspace: &Path) -> PathBuf {
        match std::env::var(CONFIG_DIR_ENV_VAR) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => workspace.join(CONFIG_DIR_NAME),
        }
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.store.validate()?;

        if let Some(file) = &self.logging.file
            && file.trim().is_empty()
        {
            return Err(ConfigError::logging("logging.file cannot be empty"));
        }

        Ok(())
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  store: on_corrupt={}, profile={}",
            self.store.on_corrupt, self.store.profile_file
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stderr")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Store
        Self::apply_env_parse("IDMAP_STORE_ON_CORRUPT", &mut self.store.on_corrupt);
        Self::apply_env_string("IDMAP_PROFILE_FILE", &mut self.store.profile_file);

        // Logging
        Self::apply_env_parse("IDMAP_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("IDMAP_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("IDMAP_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values.
    /// Unparseable values are ignored and the previous value is kept.
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
