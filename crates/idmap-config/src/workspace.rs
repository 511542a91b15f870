use crate::{ConfigError, ConfigErrorResult, WORKSPACE_ENV_VAR};

use std::path::{Path, PathBuf};

/// Resolve the workspace root.
///
/// Priority: explicit path > `IDMAP_WORKSPACE` > current working directory.
/// Relative paths are made absolute against the current directory; the
/// directory itself does not have to exist yet.
pub fn workspace_dir(explicit: Option<&Path>) -> ConfigErrorResult<PathBuf> {
    if let Some(path) = explicit {
        return absolutize(path);
    }

    if let Ok(dir) = std::env::var(WORKSPACE_ENV_VAR)
        && !dir.trim().is_empty()
    {
        return absolutize(Path::new(&dir));
    }

    std::env::current_dir()
        .map_err(|_| ConfigError::workspace("Cannot determine current working directory"))
}

fn absolutize(path: &Path) -> ConfigErrorResult<PathBuf> {
    std::path::absolute(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
