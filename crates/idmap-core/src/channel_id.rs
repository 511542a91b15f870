use std::fmt;

use serde::{Deserialize, Serialize};

const STRANGER_PREFIX: &str = "stranger";

/// A `<channel>:<provider_user_id>` pair as stored in a record's channel set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(channel: &str, provider_user_id: &str) -> Self {
        Self(format!("{channel}:{provider_user_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Channel name, i.e. everything before the first `:`.
    pub fn channel(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(channel, _)| channel)
    }

    /// Provider user id, i.e. everything after the first `:`.
    pub fn provider_user_id(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, id)| id)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ChannelId> for String {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

/// Synthetic id for a contact with no mapping. Computed, never stored.
pub fn stranger_id(channel: &str, provider_user_id: &str) -> String {
    format!("{STRANGER_PREFIX}:{channel}:{provider_user_id}")
}

/// Whether `id` was produced by [`stranger_id`].
pub fn is_stranger_id(id: &str) -> bool {
    id.strip_prefix(STRANGER_PREFIX)
        .is_some_and(|rest| rest.starts_with(':'))
}
