use regex::Regex;
use std::sync::LazyLock;

use crate::error::{GitError, GitResult};

/// Short (7) or long (40) SHA-1, nothing in between
static HASH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{7}([0-9a-f]{33})?$").expect("hash pattern is a valid regex")
});

/// Format checks for commit hashes supplied by callers
pub struct HashValidator;

impl HashValidator {
    /// Trim surrounding whitespace
    pub fn normalize(candidate: &str) -> &str {
        candidate.trim()
    }

    pub fn is_valid(candidate: &str) -> bool {
        HASH_PATTERN.is_match(candidate)
    }

    /// Normalize then validate, returning the normalized hash
    pub fn validate(candidate: &str) -> GitResult<&str> {
        let hash = Self::normalize(candidate);
        if Self::is_valid(hash) {
            Ok(hash)
        } else {
            Err(GitError::InvalidHash(hash.to_string()))
        }
    }
}
