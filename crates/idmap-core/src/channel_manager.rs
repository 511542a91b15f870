//! Explicit channel mappings and read-only queries over the identity map.

use crate::{ChannelId, IdentityRecord, IdentityResult, StoreFile, sanitize};

use std::collections::BTreeMap;

use log::info;

pub struct ChannelManager {
    store: StoreFile,
}

impl ChannelManager {
    pub fn new(store: StoreFile) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StoreFile {
        &self.store
    }

    /// Map `channel:provider_user_id` to `canonical_id`.
    ///
    /// Creates the record (non-owner) if it doesn't exist; `display_name`
    /// only applies to a new record. Adding an existing mapping is a no-op
    /// and doesn't touch the file. Returns the sanitized canonical id.
    pub fn add_channel(
        &self,
        canonical_id: &str,
        channel: &str,
        provider_user_id: &str,
        display_name: Option<&str>,
    ) -> IdentityResult<String> {
        let canonical_id = sanitize(canonical_id)?;
        let channel_id = ChannelId::new(channel, provider_user_id);
        let mut store = self.store.load()?;

        let record = store.entry_or_create(&canonical_id, || {
            IdentityRecord::new(
                canonical_id.clone(),
                display_name.map(str::to_string),
                false,
            )
        });
        let added = record.add_channel(&channel_id);

        if added {
            self.store.save(&store)?;
            info!("Added {channel_id} to {canonical_id}");
        }

        Ok(canonical_id)
    }

    /// Unmap `channel:provider_user_id` from `canonical_id`.
    ///
    /// A missing record or entry is not an error. Returns whether anything
    /// was removed.
    pub fn remove_channel(
        &self,
        canonical_id: &str,
        channel: &str,
        provider_user_id: &str,
    ) -> IdentityResult<bool> {
        let canonical_id = sanitize(canonical_id)?;
        let channel_id = ChannelId::new(channel, provider_user_id);
        let mut store = self.store.load()?;

        let removed = store
            .get_mut(&canonical_id)
            .is_some_and(|record| record.remove_channel(&channel_id));

        if removed {
            self.store.save(&store)?;
            info!("Removed {channel_id} from {canonical_id}");
        }

        Ok(removed)
    }

    /// Snapshot of every record, keyed by canonical id.
    pub fn list_identities(&self) -> IdentityResult<BTreeMap<String, IdentityRecord>> {
        Ok(self.store.load()?.identities)
    }

    /// Channels of one identity; empty if it doesn't exist.
    pub fn get_channels(&self, canonical_id: &str) -> IdentityResult<Vec<String>> {
        let canonical_id = sanitize(canonical_id)?;
        let store = self.store.load()?;

        Ok(store
            .get(&canonical_id)
            .map(|record| record.channels.clone())
            .unwrap_or_default())
    }

    /// Whether the identity is the owner; false if it doesn't exist.
    pub fn check_is_owner(&self, canonical_id: &str) -> IdentityResult<bool> {
        let canonical_id = sanitize(canonical_id)?;
        let store = self.store.load()?;

        Ok(store.get(&canonical_id).is_some_and(|record| record.is_owner))
    }
}
