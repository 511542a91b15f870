//! Canonical identity map.
//!
//! Maps per-channel contacts (`telegram:123456789`, `discord:alice#1234`) to
//! one canonical id per person, persisted as a JSON file that many processes
//! may read and write concurrently.

pub mod channel_id;
pub mod channel_manager;
pub mod error;
pub mod identity_map;
pub mod models;
pub mod owner_directory;
pub mod resolver;
pub mod sanitize;
mod store;

#[cfg(test)]
mod tests;

pub use channel_id::{ChannelId, is_stranger_id, stranger_id};
pub use channel_manager::ChannelManager;
pub use error::{IdentityError, IdentityResult};
pub use identity_map::IdentityMap;
pub use models::identity_record::IdentityRecord;
pub use models::identity_store::{IdentityStore, STORE_VERSION};
pub use owner_directory::{
    OwnerDirectory, ProfileOwnerDirectory, StaticOwnerDirectory, parse_owner_candidates,
    parse_preferred_name,
};
pub use resolver::{DEFAULT_OWNER_ID, IdentityResolver, owner_id_from_name};
pub use sanitize::{MAX_CANONICAL_ID_LEN, capitalize, sanitize};
pub use store::map_path::{legacy_map_path, primary_map_path, resolve_map_path};
pub use store::store_file::StoreFile;

pub use idmap_config::CorruptionPolicy;
