//! In-memory identity map, loaded and saved whole by
//! [`StoreFile`](crate::StoreFile).

use crate::{ChannelId, IdentityRecord};

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

/// Schema version written by this crate.
pub const STORE_VERSION: &str = "1.0";

fn default_version() -> String {
    String::from(STORE_VERSION)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityStore {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub identities: BTreeMap<String, IdentityRecord>,
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self {
            version: default_version(),
            identities: BTreeMap::new(),
        }
    }
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn contains(&self, canonical_id: &str) -> bool {
        self.identities.contains_key(canonical_id)
    }

    pub fn get(&self, canonical_id: &str) -> Option<&IdentityRecord> {
        self.identities.get(canonical_id)
    }

    pub fn get_mut(&mut self, canonical_id: &str) -> Option<&mut IdentityRecord> {
        self.identities.get_mut(canonical_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &IdentityRecord> {
        self.identities.values()
    }

    /// Record whose channel set contains `channel_id`.
    ///
    /// Records are scanned in key order, so if the uniqueness invariant was
    /// broken by hand-editing the file the lowest canonical id wins.
    pub fn find_by_channel(&self, channel_id: &ChannelId) -> Option<&IdentityRecord> {
        self.identities
            .values()
            .find(|record| record.has_channel(channel_id))
    }

    /// First record flagged as owner, in key order.
    pub fn owner(&self) -> Option<&IdentityRecord> {
        self.identities.values().find(|record| record.is_owner)
    }

    /// Insert or replace the record under its own canonical id.
    pub fn insert_record(&mut self, record: IdentityRecord) -> Option<IdentityRecord> {
        self.identities.insert(record.canonical_id.clone(), record)
    }

    /// Existing record for `canonical_id`, or a freshly inserted one built by `create`.
    pub fn entry_or_create(
        &mut self,
        canonical_id: &str,
        create: impl FnOnce() -> IdentityRecord,
    ) -> &mut IdentityRecord {
        self.identities
            .entry(canonical_id.to_string())
            .or_insert_with(create)
    }

    /// Make every record's `canonical_id` match its map key.
    ///
    /// The key is authoritative: records written without the field get it
    /// filled in, and a mismatching one is overwritten. Returns the keys
    /// whose id was changed.
    pub fn align_canonical_ids(&mut self) -> Vec<String> {
        let mut changed = Vec::new();
        for (key, record) in &mut self.identities {
            if record.canonical_id != *key {
                if !record.canonical_id.is_empty() {
                    warn!(
                        "Identity {key:?} carries canonical_id {:?}; using the map key",
                        record.canonical_id
                    );
                }
                record.canonical_id.clone_from(key);
                changed.push(key.clone());
            }
        }
        changed
    }
}
