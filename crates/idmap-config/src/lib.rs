mod config;
mod corruption_policy;
mod error;
mod log_level;
mod logging_config;
mod store_config;
mod workspace;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use corruption_policy::CorruptionPolicy;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use store_config::StoreConfig;
pub use workspace::workspace_dir;

/// Environment variable naming the workspace root.
pub const WORKSPACE_ENV_VAR: &str = "IDMAP_WORKSPACE";
/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV_VAR: &str = "IDMAP_CONFIG_DIR";

const CONFIG_DIR_NAME: &str = ".idmap";
const CONFIG_FILENAME: &str = "config.toml";
const DEFAULT_PROFILE_FILE: &str = "USER.md";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;
const DEFAULT_LOG_COLORED: bool = true;
