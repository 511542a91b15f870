use crate::{ConfigError, ConfigErrorResult};

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// What the identity store does when the persisted map cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptionPolicy {
    /// Treat the file as an empty store and log a warning.
    #[default]
    Reset,
    /// Move the corrupt file aside, then treat the store as empty.
    Backup,
    /// Surface the corruption to the caller.
    Fail,
}

impl CorruptionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Backup => "backup",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for CorruptionPolicy {
    type Err = ConfigError;

    #[track_caller]
    fn from_str(s: &str) -> ConfigErrorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "reset" => Ok(Self::Reset),
            "backup" => Ok(Self::Backup),
            "fail" => Ok(Self::Fail),
            other => Err(ConfigError::store(format!(
                "store.on_corrupt must be one of reset, backup, fail; got '{other}'"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for CorruptionPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CorruptionPolicy::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for CorruptionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
