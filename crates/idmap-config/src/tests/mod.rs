mod workspace;

use std::env;

use tempfile::TempDir;

/// Every variable the config layer reads; cleared for the duration of a test.
const IDMAP_ENV_VARS: [&str; 7] = [
    "IDMAP_WORKSPACE",
    "IDMAP_CONFIG_DIR",
    "IDMAP_STORE_ON_CORRUPT",
    "IDMAP_PROFILE_FILE",
    "IDMAP_LOG_LEVEL",
    "IDMAP_LOG_COLORED",
    "IDMAP_LOG_FILE",
];

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Create a temp workspace with a clean IDMAP_* environment
pub(crate) fn setup_workspace() -> (TempDir, Vec<EnvGuard>) {
    let temp = TempDir::new().unwrap();
    let guards = IDMAP_ENV_VARS.iter().map(|key| EnvGuard::remove(key)).collect();
    (temp, guards)
}

/// Write `<workspace>/.idmap/config.toml`
pub(crate) fn write_config(temp: &TempDir, contents: &str) {
    let dir = temp.path().join(".idmap");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}
