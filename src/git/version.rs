use crate::error::{GitError, GitResult};
use crate::git::command::GitCommand;
use crate::git::executor::Executor;
use serde::Serialize;

/// Minimum required git version
///
/// Not necessarily the oldest git that works, but the oldest one this crate
/// is tested against.
pub const MIN_GIT_VERSION: GitVersion = GitVersion {
    major: 2,
    minor: 22,
    patch: 0,
};

/// Represents a git version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    /// Detect the installed git version
    pub fn detect<E: Executor + ?Sized>(executor: &E) -> GitResult<Self> {
        let line = executor
            .execute_first(&GitCommand::new("").flag("--version"))
            .map_err(|e| GitError::query("Could not get the git version", e))?;

        Self::parse(&line)
    }

    /// Parse git version from string like "git version 2.39.2"
    ///
    /// Anything after the version number (" (Apple Git-75)", ".windows.1")
    /// is ignored: only the first three dot-separated components are kept,
    /// each reduced to its leading digits. Missing components count as 0.
    pub fn parse(version_str: &str) -> GitResult<Self> {
        let rest = version_str
            .trim()
            .strip_prefix("git version ")
            .ok_or_else(|| {
                GitError::Parse(format!("Unexpected git version format: {}", version_str))
            })?;

        let mut nums = rest.split('.').take(3).map(leading_int);

        let major = nums.next().flatten().ok_or_else(|| {
            GitError::Parse(format!("Invalid version number format: {}", rest))
        })?;
        let minor = nums.next().flatten().unwrap_or(0);
        let patch = nums.next().flatten().unwrap_or(0);

        Ok(GitVersion {
            major,
            minor,
            patch,
        })
    }

    /// Check if this version meets minimum requirements
    pub fn is_supported(&self) -> bool {
        *self >= MIN_GIT_VERSION
    }

    /// Detect the version and fail if it is too old
    pub fn validate<E: Executor + ?Sized>(executor: &E) -> GitResult<Self> {
        let version = Self::detect(executor)?;

        if !version.is_supported() {
            return Err(GitError::VersionUnsupported {
                found: version.to_string(),
                required: MIN_GIT_VERSION.to_string(),
            });
        }

        Ok(version)
    }
}

/// Leading decimal digits of a component, `None` if there are none
fn leading_int(component: &str) -> Option<u32> {
    let trimmed = component.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

impl std::fmt::Display for GitVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
