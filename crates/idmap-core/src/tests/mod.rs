
use crate::{
    ChannelManager, CorruptionPolicy, IdentityResolver, ProfileOwnerDirectory, StoreFile,
    primary_map_path,
};

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub(crate) const TEST_PROFILE: &str = "# USER.md

- **Name:** Test User
- **Contact Numbers:**
  - **WhatsApp:** +1234567890 (primary)
  - **Other:** +9876543210, +5555555555
- **Telegram ID:** 123456789
";

/// Temp workspace; removed on drop.
pub(crate) struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Workspace with `USER.md` containing [`TEST_PROFILE`].
    pub(crate) fn with_profile() -> Self {
        let ws = Self::new();
        std::fs::write(ws.profile_path(), TEST_PROFILE).unwrap();
        ws
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn profile_path(&self) -> PathBuf {
        self.path().join("USER.md")
    }

    pub(crate) fn map_path(&self) -> PathBuf {
        primary_map_path(self.path())
    }

    pub(crate) fn store(&self) -> StoreFile {
        StoreFile::for_workspace(self.path(), CorruptionPolicy::Reset)
    }

    pub(crate) fn store_with(&self, policy: CorruptionPolicy) -> StoreFile {
        StoreFile::for_workspace(self.path(), policy)
    }

    pub(crate) fn resolver(&self) -> IdentityResolver<ProfileOwnerDirectory> {
        IdentityResolver::new(self.store(), ProfileOwnerDirectory::new(self.profile_path()))
    }

    pub(crate) fn channels(&self) -> ChannelManager {
        ChannelManager::new(self.store())
    }

    /// Write raw bytes to the primary map path, creating `data/`.
    pub(crate) fn write_map(&self, contents: &str) {
        let path = self.map_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// File names in the map directory.
    pub(crate) fn data_dir_entries(&self) -> Vec<String> {
        let dir = self.map_path().parent().unwrap().to_path_buf();
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
