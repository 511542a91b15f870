pub mod identity_record;
pub mod identity_store;
pub(crate) mod timestamp;
