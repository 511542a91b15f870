//! One canonical user and the channels that resolve to it.

use crate::{ChannelId, capitalize, models::timestamp};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Filled from the map key on load when missing
    #[serde(default)]
    pub canonical_id: String,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub display_name: String,
    /// `<channel>:<provider_user_id>` entries in insertion order, no duplicates
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Create a record with no channels. `canonical_id` must already be sanitized.
    pub fn new(canonical_id: String, display_name: Option<String>, is_owner: bool) -> Self {
        let now = Utc::now();
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| capitalize(&canonical_id));

        Self {
            canonical_id,
            is_owner,
            display_name,
            channels: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_channel(&self, channel_id: &ChannelId) -> bool {
        self.channels.iter().any(|c| c == channel_id.as_str())
    }

    /// Append `channel_id` if absent. Returns true when the set changed.
    pub fn add_channel(&mut self, channel_id: &ChannelId) -> bool {
        if self.has_channel(channel_id) {
            return false;
        }

        self.channels.push(channel_id.to_string());
        self.touch();
        true
    }

    /// Remove `channel_id` if present. Returns true when the set changed.
    pub fn remove_channel(&mut self, channel_id: &ChannelId) -> bool {
        let before = self.channels.len();
        self.channels.retain(|c| c != channel_id.as_str());

        if self.channels.len() == before {
            return false;
        }

        self.touch();
        true
    }

    /// Advance `updated_at`, never moving it backwards.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}
