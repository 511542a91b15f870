use std::path::{Path, PathBuf};

const DATA_DIR: &str = "data";
const LEGACY_DIR: &str = "memory";
const MAP_FILENAME: &str = "identity-map.json";

/// `<workspace>/data/identity-map.json`
pub fn primary_map_path(workspace: &Path) -> PathBuf {
    workspace.join(DATA_DIR).join(MAP_FILENAME)
}

/// `<workspace>/memory/identity-map.json`, used by older workspaces.
pub fn legacy_map_path(workspace: &Path) -> PathBuf {
    workspace.join(LEGACY_DIR).join(MAP_FILENAME)
}

/// Pick the identity map for a workspace.
///
/// An existing primary file wins, then an existing legacy file; otherwise the
/// primary path is returned and gets created on first save.
pub fn resolve_map_path(workspace: &Path) -> PathBuf {
    let primary = primary_map_path(workspace);
    if primary.exists() {
        return primary;
    }

    let legacy = legacy_map_path(workspace);
    if legacy.exists() {
        return legacy;
    }

    primary
}
