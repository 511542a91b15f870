use crate::{ConfigError, ConfigErrorResult, CorruptionPolicy, DEFAULT_PROFILE_FILE};

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Policy applied when the identity map cannot be parsed
    pub on_corrupt: CorruptionPolicy,
    /// Owner profile document, relative to the workspace root
    pub profile_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            on_corrupt: CorruptionPolicy::default(),
            profile_file: String::from(DEFAULT_PROFILE_FILE),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.profile_file.trim().is_empty() {
            return Err(ConfigError::store("store.profile_file cannot be empty"));
        }

        let profile = Path::new(&self.profile_file);
        if profile.is_absolute() || self.profile_file.contains("..") {
            return Err(ConfigError::store(
                "store.profile_file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Absolute path of the owner profile document inside `workspace`.
    pub fn profile_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.profile_file)
    }
}
