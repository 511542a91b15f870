//! Durable identity map file.
//!
//! ## Locking
//!
//! Readers hold a shared advisory lock on the map while reading it. Writers
//! never touch the map in place: the full store is written to a temp file in
//! the same directory under an exclusive lock, synced, and renamed over the
//! map while holding an exclusive lock on the map being replaced. A reader
//! therefore sees either the old map or the new one.
//!
//! Moving a corrupt map aside takes the same exclusive lock and only happens
//! if the file still holds the bytes that failed to parse, so a map that a
//! writer just replaced is never moved, and two readers backing up the same
//! file don't trip over each other.
//!
//! ## Lost updates
//!
//! Load and save are separate steps. Two processes that load the same map,
//! mutate different parts of it and save will race, and the last rename wins.

use crate::store::map_path::resolve_map_path;
use crate::{IdentityError, IdentityResult, IdentityStore, STORE_VERSION};

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use idmap_config::CorruptionPolicy;
use log::{debug, info, warn};
use tempfile::{Builder as TempFileBuilder, PersistError};

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What happened to a corrupt map under [`CorruptionPolicy::Backup`].
#[derive(Debug)]
pub(crate) enum Backup {
    Moved(PathBuf),
    /// Someone else already moved it.
    Gone,
    /// A writer replaced it; holds the current contents.
    Replaced(String),
}

/// Handle to the identity map on disk. Holds no cached state.
#[derive(Debug, Clone)]
pub struct StoreFile {
    path: PathBuf,
    on_corrupt: CorruptionPolicy,
}

impl StoreFile {
    pub fn new(path: impl Into<PathBuf>, on_corrupt: CorruptionPolicy) -> Self {
        Self {
            path: path.into(),
            on_corrupt,
        }
    }

    /// Store for a workspace root, following the primary/legacy lookup.
    pub fn for_workspace(workspace: &Path, on_corrupt: CorruptionPolicy) -> Self {
        Self::new(resolve_map_path(workspace), on_corrupt)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn on_corrupt(&self) -> CorruptionPolicy {
        self.on_corrupt
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the whole map.
    ///
    /// Returns:
    /// - an empty store if the file doesn't exist
    /// - the parsed store otherwise
    /// - for an unparseable file, whatever the corruption policy says
    pub fn load(&self) -> IdentityResult<IdentityStore> {
        let Some(contents) = self.read_shared()? else {
            debug!("No identity map at {:?}, starting empty", self.path);
            return Ok(IdentityStore::new());
        };

        match self.parse(&contents) {
            Ok(store) => Ok(store),
            Err(e) => self.recover(&contents, e.to_string()),
        }
    }

    /// Write the whole map atomically.
    ///
    /// 1. Writes to a temp file next to the map, under an exclusive lock
    /// 2. Syncs to disk (fsync)
    /// 3. Atomic rename over the map
    ///
    /// The temp file is removed if any step fails.
    pub fn save(&self, store: &IdentityStore) -> IdentityResult<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| IdentityError::dir_creation(dir.clone(), e))?;

        // Going through Value sorts every object's keys.
        let value = serde_json::to_value(store)?;
        let mut json = serde_json::to_string_pretty(&value)?;
        json.push('\n');

        let mut temp = TempFileBuilder::new()
            .prefix(&format!(".{}.", self.file_name()))
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| IdentityError::file_write(dir.clone(), e))?;

        FileExt::lock_exclusive(temp.as_file())
            .map_err(|e| IdentityError::lock_unavailable(temp.path().to_path_buf(), e))?;

        temp.write_all(json.as_bytes())
            .map_err(|e| IdentityError::file_write(temp.path().to_path_buf(), e))?;

        temp.as_file()
            .sync_all()
            .map_err(|e| IdentityError::file_write(temp.path().to_path_buf(), e))?;

        FileExt::unlock(temp.as_file())
            .map_err(|e| IdentityError::lock_unavailable(temp.path().to_path_buf(), e))?;

        // Held across the rename so a corrupt-map backup can't move the new file.
        let _replaced = self.lock_current()?;

        temp.persist(&self.path)
            .map_err(|PersistError { error, file }| {
                IdentityError::atomic_rename(file.path().to_path_buf(), self.path.clone(), error)
            })?;

        Self::sync_dir(&dir);

        info!(
            "Saved {} identities to {:?}",
            store.len(),
            self.path
        );
        Ok(())
    }

    /// Read the map under a shared lock. `None` if it doesn't exist.
    fn read_shared(&self) -> IdentityResult<Option<String>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IdentityError::file_read(self.path.clone(), e)),
        };

        FileExt::lock_shared(&file)
            .map_err(|e| IdentityError::lock_unavailable(self.path.clone(), e))?;

        let mut contents = String::new();
        let read = file.read_to_string(&mut contents);

        FileExt::unlock(&file)
            .map_err(|e| IdentityError::lock_unavailable(self.path.clone(), e))?;

        read.map_err(|e| IdentityError::file_read(self.path.clone(), e))?;
        Ok(Some(contents))
    }

    fn parse(&self, contents: &str) -> serde_json::Result<IdentityStore> {
        let mut store = serde_json::from_str::<IdentityStore>(contents)?;

        if store.version != STORE_VERSION {
            warn!(
                "Identity map {:?} has version {}, expected {}; reading as-is",
                self.path, store.version, STORE_VERSION
            );
        }

        let aligned = store.align_canonical_ids();
        if !aligned.is_empty() {
            debug!(
                "Took canonical ids from map keys for {aligned:?} in {:?}",
                self.path
            );
        }

        debug!(
            "Loaded {} identities from {:?}",
            store.len(),
            self.path
        );
        Ok(store)
    }

    /// Open and exclusively lock the map currently at `path`, if any.
    fn lock_current(&self) -> IdentityResult<Option<File>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IdentityError::file_read(self.path.clone(), e)),
        };

        FileExt::lock_exclusive(&file)
            .map_err(|e| IdentityError::lock_unavailable(self.path.clone(), e))?;

        Ok(Some(file))
    }

    fn recover(&self, contents: &str, message: String) -> IdentityResult<IdentityStore> {
        match self.on_corrupt {
            CorruptionPolicy::Reset => {
                warn!(
                    "Identity map corrupted at {:?}: {message}; treating as empty",
                    self.path
                );
                Ok(IdentityStore::new())
            }
            CorruptionPolicy::Backup => {
                warn!("Identity map corrupted at {:?}: {message}", self.path);
                match self.backup_corrupted(contents)? {
                    Backup::Moved(backup_path) => {
                        warn!("Backed up corrupted identity map to {backup_path:?}");
                        Ok(IdentityStore::new())
                    }
                    Backup::Gone => Ok(IdentityStore::new()),
                    Backup::Replaced(current) => match self.parse(&current) {
                        Ok(store) => Ok(store),
                        Err(_) => Ok(IdentityStore::new()),
                    },
                }
            }
            CorruptionPolicy::Fail => Err(IdentityError::store_corrupt(self.path.clone(), message)),
        }
    }

    /// Rename the map to `<name>.corrupted.<timestamp>` in the same directory,
    /// provided it still holds `corrupt`.
    pub(crate) fn backup_corrupted(&self, corrupt: &str) -> IdentityResult<Backup> {
        let Some(_guard) = self.lock_current()? else {
            debug!("Corrupted identity map {:?} already moved", self.path);
            return Ok(Backup::Gone);
        };

        let current = match fs::read_to_string(&self.path) {
            Ok(current) => current,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Backup::Gone),
            Err(e) => return Err(IdentityError::file_read(self.path.clone(), e)),
        };

        if current != corrupt {
            debug!("Identity map {:?} changed since it was read", self.path);
            return Ok(Backup::Replaced(current));
        }

        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let backup_path = self
            .parent_dir()
            .join(format!("{}.corrupted.{timestamp}", self.file_name()));

        match fs::rename(&self.path, &backup_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Backup::Gone),
            Err(e) => return Err(IdentityError::backup_failed(self.path.clone(), e)),
        }

        Ok(Backup::Moved(backup_path))
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("identity-map.json"))
    }

    /// Persist the rename itself. Best-effort.
    #[cfg(unix)]
    fn sync_dir(dir: &Path) {
        if let Ok(handle) = File::open(dir) {
            handle.sync_all().ok();
        }
    }

    #[cfg(not(unix))]
    fn sync_dir(_dir: &Path) {}
}
