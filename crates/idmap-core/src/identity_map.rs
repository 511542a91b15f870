use crate::{ChannelManager, IdentityResolver, ProfileOwnerDirectory, StoreFile};

use std::path::{Path, PathBuf};

use idmap_config::Config;

/// Resolver and channel manager wired to one workspace.
pub struct IdentityMap {
    workspace: PathBuf,
    resolver: IdentityResolver<ProfileOwnerDirectory>,
    channels: ChannelManager,
}

impl IdentityMap {
    /// Bind to the identity map and owner profile of `workspace`.
    ///
    /// Nothing is read until an operation runs.
    pub fn open(workspace: &Path, config: &Config) -> Self {
        let store = StoreFile::for_workspace(workspace, config.store.on_corrupt);
        let profile = ProfileOwnerDirectory::new(config.store.profile_path(workspace));

        Self {
            workspace: workspace.to_path_buf(),
            resolver: IdentityResolver::new(store.clone(), profile),
            channels: ChannelManager::new(store),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn store(&self) -> &StoreFile {
        self.channels.store()
    }

    pub fn profile(&self) -> &ProfileOwnerDirectory {
        self.resolver.directory()
    }

    pub fn resolver(&self) -> &IdentityResolver<ProfileOwnerDirectory> {
        &self.resolver
    }

    pub fn channels(&self) -> &ChannelManager {
        &self.channels
    }
}
