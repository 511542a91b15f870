//! Where owner contact ids and the owner's name come from.

use crate::{IdentityError, IdentityResult};

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

/// Lines mentioning one of these are scanned for contact numbers.
const CONTACT_KEYWORDS: [&str; 6] = ["Contact", "WhatsApp", "Telegram", "Phone", "Mobile", "Other"];

/// `+` optional, then at least seven digits.
static CONTACT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d{7,}").expect("invalid contact number pattern"));

/// `Name: Jane Doe` or the markdown-bold `**Name:** Jane Doe`.
static NAME_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\bName:(?:\*\*)?[ \t]+(\S.*?)[ \t]*$").expect("invalid name field pattern")
});

/// Source of the owner's known channel ids and preferred name.
pub trait OwnerDirectory {
    /// Provider user ids that belong to the owner.
    fn load_owner_candidates(&self) -> IdentityResult<BTreeSet<String>>;

    /// The owner's name, used to seed the owner's canonical id and display name.
    fn preferred_owner_name(&self) -> IdentityResult<Option<String>>;
}

/// Owner data read from a free-form profile document (`USER.md` by default).
///
/// The document is read on every call.
#[derive(Debug, Clone)]
pub struct ProfileOwnerDirectory {
    path: PathBuf,
}

impl ProfileOwnerDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Profile contents, or `None` when there is no profile.
    fn read_profile(&self) -> IdentityResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No owner profile at {:?}", self.path);
                Ok(None)
            }
            Err(e) => Err(IdentityError::file_read(self.path.clone(), e)),
        }
    }
}

impl OwnerDirectory for ProfileOwnerDirectory {
    fn load_owner_candidates(&self) -> IdentityResult<BTreeSet<String>> {
        Ok(self
            .read_profile()?
            .map(|contents| parse_owner_candidates(&contents))
            .unwrap_or_default())
    }

    fn preferred_owner_name(&self) -> IdentityResult<Option<String>> {
        Ok(self
            .read_profile()?
            .and_then(|contents| parse_preferred_name(&contents)))
    }
}

/// Every phone-number-like token on a contact line, deduplicated.
pub fn parse_owner_candidates(contents: &str) -> BTreeSet<String> {
    contents
        .lines()
        .filter(|line| CONTACT_KEYWORDS.iter().any(|kw| line.contains(kw)))
        .flat_map(|line| CONTACT_NUMBER.find_iter(line))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Value of the first `Name:` field, trimmed.
pub fn parse_preferred_name(contents: &str) -> Option<String> {
    NAME_FIELD
        .captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Owner data supplied directly by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticOwnerDirectory {
    candidates: BTreeSet<String>,
    preferred_name: Option<String>,
}

impl StaticOwnerDirectory {
    pub fn new<I, S>(candidates: I, preferred_name: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            preferred_name,
        }
    }

    /// A directory with no owner at all: every unmapped contact is a stranger.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl OwnerDirectory for StaticOwnerDirectory {
    fn load_owner_candidates(&self) -> IdentityResult<BTreeSet<String>> {
        Ok(self.candidates.clone())
    }

    fn preferred_owner_name(&self) -> IdentityResult<Option<String>> {
        Ok(self.preferred_name.clone())
    }
}
