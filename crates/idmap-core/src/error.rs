use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors raised by the identity map.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid canonical id '{value}': {message} {location}")]
    InvalidIdentifier {
        value: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Identity map corrupted at {path}: {message} {location}")]
    StoreCorrupt {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to lock {path}: {source} {location}")]
    LockUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to create directory at {path}: {source} {location}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to read {path}: {source} {location}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to write {path}: {source} {location}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Atomic rename failed from {from} to {to}: {source} {location}")]
    AtomicRename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to back up corrupted identity map {path}: {source} {location}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to serialize identity map: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl IdentityError {
    /// Whether this error is recoverable via retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::LockUnavailable { .. }
                | Self::FileRead { .. }
                | Self::FileWrite { .. }
                | Self::AtomicRename { .. }
        )
    }

    /// User-friendly recovery hint.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => {
                "Canonical ids may only contain letters, digits, '-' and '_'."
            }
            Self::StoreCorrupt { .. } => {
                "The identity map could not be parsed. \
                   Restore it from a backup or switch store.on_corrupt to 'backup'."
            }
            Self::LockUnavailable { .. } => {
                "Unable to lock the identity map. \
                   Check that the filesystem supports advisory locks."
            }
            Self::DirCreation { .. } | Self::FileWrite { .. } => {
                "Unable to write to the workspace data directory. \
                   Check disk space and file permissions."
            }
            Self::FileRead { .. } => {
                "Unable to read the file. \
                   Check that it exists and is readable."
            }
            Self::AtomicRename { .. } => {
                "Unable to replace the identity map safely. \
                   Check disk space and try again."
            }
            Self::BackupFailed { .. } => {
                "Unable to move the corrupted identity map aside. \
                   Check file permissions in the data directory."
            }
            Self::Serialization { .. } => {
                "Internal error preparing identity data. \
                   Please report this issue."
            }
        }
    }

    /// Creates InvalidIdentifier error at caller location.
    #[track_caller]
    pub fn invalid_identifier(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            value: value.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates StoreCorrupt error at caller location.
    #[track_caller]
    pub fn store_corrupt(path: PathBuf, message: impl Into<String>) -> Self {
        Self::StoreCorrupt {
            path,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates LockUnavailable error at caller location.
    #[track_caller]
    pub fn lock_unavailable(path: PathBuf, source: std::io::Error) -> Self {
        Self::LockUnavailable {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates DirCreation error at caller location.
    #[track_caller]
    pub fn dir_creation(path: PathBuf, source: std::io::Error) -> Self {
        Self::DirCreation {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates FileRead error at caller location.
    #[track_caller]
    pub fn file_read(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileRead {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates FileWrite error at caller location.
    #[track_caller]
    pub fn file_write(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileWrite {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates AtomicRename error at caller location.
    #[track_caller]
    pub fn atomic_rename(from: PathBuf, to: PathBuf, source: std::io::Error) -> Self {
        Self::AtomicRename {
            from,
            to,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates BackupFailed error at caller location.
    #[track_caller]
    pub fn backup_failed(path: PathBuf, source: std::io::Error) -> Self {
        Self::BackupFailed {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for IdentityError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type IdentityResult<T> = std::result::Result<T, IdentityError>;
