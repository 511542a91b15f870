//! Channel contact → canonical id resolution with owner auto-registration.

use crate::{
    ChannelId, IdentityRecord, IdentityResult, IdentityStore, OwnerDirectory, StoreFile, sanitize,
    stranger_id,
};

use std::collections::BTreeSet;

use log::{debug, info};

/// Canonical id used for the owner when the profile has no usable name.
pub const DEFAULT_OWNER_ID: &str = "owner";

pub struct IdentityResolver<D> {
    store: StoreFile,
    directory: D,
}

impl<D: OwnerDirectory> IdentityResolver<D> {
    pub fn new(store: StoreFile, directory: D) -> Self {
        Self { store, directory }
    }

    pub fn store(&self) -> &StoreFile {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Resolve a contact using the directory's owner candidates.
    ///
    /// 1. A mapped channel id returns its record's canonical id (read only).
    /// 2. An unmapped owner contact is attached to the owner record, which is
    ///    created on first contact, and the map is saved.
    /// 3. Anything else gets `stranger:<channel>:<provider_user_id>`.
    pub fn resolve(&self, channel: &str, provider_user_id: &str) -> IdentityResult<String> {
        self.resolve_inner(channel, provider_user_id, None)
    }

    /// Like [`resolve`](Self::resolve), with caller-supplied owner candidates.
    ///
    /// The owner's name still comes from the directory.
    pub fn resolve_with_candidates(
        &self,
        channel: &str,
        provider_user_id: &str,
        candidates: &BTreeSet<String>,
    ) -> IdentityResult<String> {
        self.resolve_inner(channel, provider_user_id, Some(candidates))
    }

    fn resolve_inner(
        &self,
        channel: &str,
        provider_user_id: &str,
        candidates: Option<&BTreeSet<String>>,
    ) -> IdentityResult<String> {
        let channel_id = ChannelId::new(channel, provider_user_id);
        let mut store = self.store.load()?;

        if let Some(record) = store.find_by_channel(&channel_id) {
            debug!("Resolved {channel_id} -> {}", record.canonical_id);
            return Ok(record.canonical_id.clone());
        }

        let is_owner_contact = match candidates {
            Some(candidates) => candidates.contains(provider_user_id),
            None => self
                .directory
                .load_owner_candidates()?
                .contains(provider_user_id),
        };

        if !is_owner_contact {
            debug!("No mapping for {channel_id}, treating as stranger");
            return Ok(stranger_id(channel, provider_user_id));
        }

        let owner_id = self.attach_to_owner(&mut store, &channel_id)?;
        Ok(owner_id)
    }

    /// Add `channel_id` to the owner record, creating it if needed, and save.
    fn attach_to_owner(
        &self,
        store: &mut IdentityStore,
        channel_id: &ChannelId,
    ) -> IdentityResult<String> {
        let owner_id = match store.owner() {
            Some(owner) => owner.canonical_id.clone(),
            None => self.register_owner(store)?,
        };

        let changed = store
            .get_mut(&owner_id)
            .is_some_and(|record| record.add_channel(channel_id));

        if changed {
            self.store.save(store)?;
            info!("Attached {channel_id} to owner {owner_id}");
        }

        Ok(owner_id)
    }

    /// Create the owner record (or promote an existing record with the same
    /// id) and return its canonical id. Nothing is saved here.
    fn register_owner(&self, store: &mut IdentityStore) -> IdentityResult<String> {
        let preferred_name = self.directory.preferred_owner_name()?;
        let owner_id = owner_id_from_name(preferred_name.as_deref());

        let record = store.entry_or_create(&owner_id, || {
            IdentityRecord::new(owner_id.clone(), preferred_name.clone(), true)
        });

        if !record.is_owner {
            record.is_owner = true;
            record.touch();
        }

        info!("Registered owner identity {owner_id}");
        Ok(owner_id)
    }
}

/// Owner canonical id from the first word of the preferred name, or
/// [`DEFAULT_OWNER_ID`].
pub fn owner_id_from_name(preferred_name: Option<&str>) -> String {
    preferred_name
        .and_then(|name| name.split_whitespace().next())
        .and_then(|first| sanitize(first).ok())
        .unwrap_or_else(|| String::from(DEFAULT_OWNER_ID))
}
