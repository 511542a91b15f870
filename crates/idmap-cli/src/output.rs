//! Rendering of command results as plain text or JSON.

use crate::CliResult;

use std::collections::BTreeMap;
use std::path::PathBuf;

use idmap_core::IdentityRecord;
use serde_json::{Value, json};

const OWNER_BADGE: &str = "[OWNER]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    PrettyJson,
}

impl OutputFormat {
    /// `--pretty` wins over `--json`.
    pub fn from_flags(json: bool, pretty: bool) -> Self {
        match (json, pretty) {
            (_, true) => Self::PrettyJson,
            (true, false) => Self::Json,
            (false, false) => Self::Text,
        }
    }

    pub fn is_json(self) -> bool {
        !matches!(self, Self::Text)
    }
}

/// Result of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Initialized {
        path: PathBuf,
        owner_id: Option<String>,
    },
    Resolved {
        canonical_id: String,
    },
    Added {
        canonical_id: String,
        channel_id: String,
    },
    Removed {
        canonical_id: String,
        channel_id: String,
        removed: bool,
    },
    Identities(BTreeMap<String, IdentityRecord>),
    Channels {
        canonical_id: String,
        channels: Vec<String>,
    },
    IsOwner {
        canonical_id: String,
        is_owner: bool,
    },
}

impl Output {
    pub fn render(&self, format: OutputFormat) -> CliResult<String> {
        Ok(match format {
            OutputFormat::Text => self.to_text(),
            OutputFormat::Json => serde_json::to_string(&self.to_json()?)?,
            OutputFormat::PrettyJson => serde_json::to_string_pretty(&self.to_json()?)?,
        })
    }

    pub fn to_json(&self) -> CliResult<Value> {
        Ok(match self {
            Self::Initialized { path, owner_id } => json!({
                "path": path.display().to_string(),
                "owner_id": owner_id,
            }),
            Self::Resolved { canonical_id } => json!({ "canonical_id": canonical_id }),
            Self::Added {
                canonical_id,
                channel_id,
            } => json!({
                "canonical_id": canonical_id,
                "channel": channel_id,
                "added": true,
            }),
            Self::Removed {
                canonical_id,
                channel_id,
                removed,
            } => json!({
                "canonical_id": canonical_id,
                "channel": channel_id,
                "removed": removed,
            }),
            Self::Identities(identities) => json!({ "identities": serde_json::to_value(identities)? }),
            Self::Channels {
                canonical_id,
                channels,
            } => json!({
                "canonical_id": canonical_id,
                "channels": sorted(channels),
            }),
            Self::IsOwner {
                canonical_id,
                is_owner,
            } => json!({
                "canonical_id": canonical_id,
                "is_owner": is_owner,
            }),
        })
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Initialized { path, owner_id } => {
                let mut text = format!("Initialized identity map at {}", path.display());
                if let Some(owner_id) = owner_id {
                    text.push_str(&format!(
                        "\nOwner will register as '{owner_id}' on first contact"
                    ));
                }
                text
            }
            Self::Resolved { canonical_id } => canonical_id.clone(),
            Self::Added {
                canonical_id,
                channel_id,
            } => format!("Added {channel_id} to {canonical_id}"),
            Self::Removed {
                canonical_id,
                channel_id,
                removed: true,
            } => format!("Removed {channel_id} from {canonical_id}"),
            Self::Removed {
                canonical_id,
                channel_id,
                removed: false,
            } => format!("{canonical_id} has no channel {channel_id}; nothing removed"),
            Self::Identities(identities) => identities_text(identities),
            Self::Channels {
                canonical_id,
                channels,
            } => {
                if channels.is_empty() {
                    format!("No channels for {canonical_id}")
                } else {
                    sorted(channels).join("\n")
                }
            }
            Self::IsOwner { is_owner, .. } => String::from(if *is_owner { "yes" } else { "no" }),
        }
    }
}

/// One block per identity in key order:
///
/// ```text
/// alice (Alice)
///   discord:alice#1234
/// test [OWNER] (Test User)
///   telegram:123456789
/// ```
fn identities_text(identities: &BTreeMap<String, IdentityRecord>) -> String {
    if identities.is_empty() {
        return String::from("No identities");
    }

    let mut text = String::new();
    for (canonical_id, record) in identities {
        if !text.is_empty() {
            text.push('\n');
        }

        text.push_str(canonical_id);
        if record.is_owner {
            text.push(' ');
            text.push_str(OWNER_BADGE);
        }
        text.push_str(&format!(" ({})", record.display_name));

        for channel in sorted(&record.channels) {
            text.push_str(&format!("\n  {channel}"));
        }
    }
    text
}

fn sorted(channels: &[String]) -> Vec<&str> {
    let mut channels: Vec<&str> = channels.iter().map(String::as_str).collect();
    channels.sort_unstable();
    channels
}

/// Error document printed on stdout in JSON mode.
pub fn error_json(message: &str, format: OutputFormat) -> String {
    let value = json!({ "error": message });
    match format {
        OutputFormat::PrettyJson => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
        _ => value.to_string(),
    }
}
