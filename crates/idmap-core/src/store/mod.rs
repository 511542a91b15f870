pub(crate) mod map_path;
pub(crate) mod store_file;
