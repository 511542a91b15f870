//! Canonical-id normalization.
//!
//! Canonical ids end up as JSON map keys and in log lines, and callers may
//! use them to build file names, so only `[a-z0-9_-]` survives.

use crate::{IdentityError, IdentityResult};

/// Longest canonical id, in characters.
pub const MAX_CANONICAL_ID_LEN: usize = 64;

const TRIM_CHARS: [char; 2] = ['-', '_'];

/// Normalize a proposed canonical id.
///
/// Lowercases, drops every character outside `[a-z0-9_-]`, trims leading and
/// trailing `-`/`_` and truncates to [`MAX_CANONICAL_ID_LEN`]. The trim runs
/// again after truncation so that `sanitize` is idempotent.
///
/// # Errors
///
/// [`IdentityError::InvalidIdentifier`] when nothing usable is left.
#[track_caller]
pub fn sanitize(raw: &str) -> IdentityResult<String> {
    let filtered: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || TRIM_CHARS.contains(c))
        .collect();

    let trimmed = filtered.trim_matches(TRIM_CHARS.as_slice());
    let truncated: String = trimmed.chars().take(MAX_CANONICAL_ID_LEN).collect();
    let sanitized = truncated.trim_matches(TRIM_CHARS.as_slice()).to_string();

    if sanitized.is_empty() {
        return Err(IdentityError::invalid_identifier(
            raw,
            "nothing left after normalization",
        ));
    }

    Ok(sanitized)
}

/// Uppercase the first character, used for default display names.
pub fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
