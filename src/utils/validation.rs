//! Input validation primitives.
//!
//! Provides ergonomic helpers for common validation patterns:
//! - Validating non-empty strings and collections
//! - Checking that configured paths exist on disk
//!
//! These replace verbose `if ... { return Err(Error::config_missing_key(..)) }` chains.

use std::path::Path;

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, key: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::config_missing_key(key))
    } else {
        Ok(trimmed)
    }
}

/// Require a collection to be non-empty.
pub fn require_non_empty_vec<'a, T>(vec: &'a [T], key: &str) -> Result<&'a [T]> {
    if vec.is_empty() {
        Err(Error::config_missing_key(key))
    } else {
        Ok(vec)
    }
}

/// Require a non-empty path that exists on disk.
pub fn require_existing_path<'a>(value: &'a str, key: &str) -> Result<&'a Path> {
    let trimmed = require_non_empty(value, key)?;
    let path = Path::new(trimmed);
    if path.exists() {
        Ok(path)
    } else {
        Err(Error::config_path_not_found(key, trimmed))
    }
}
