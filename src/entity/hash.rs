use serde::Serialize;
use std::fmt;

use crate::error::GitResult;
use crate::security::HashValidator;

/// A commit identifier, short (7) or long (40) hexadecimal
///
/// Hashes coming from callers go through [`CommitHash::parse`]. Hashes
/// reported by git itself are taken as they are, since `rev-parse --short`
/// may hand back more than 7 characters when a prefix is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommitHash(String);

impl CommitHash {
    /// Normalize and validate a caller-supplied hash
    pub fn parse(candidate: &str) -> GitResult<Self> {
        HashValidator::validate(candidate).map(|hash| CommitHash(hash.to_string()))
    }

    pub(crate) fn from_git(hash: impl Into<String>) -> Self {
        CommitHash(hash.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_short(&self) -> bool {
        self.0.len() < 40
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommitHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
