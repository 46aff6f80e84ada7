use std::io;
use thiserror::Error;

use crate::config::settings::ConfigError;

/// Kind of repository entity a lookup was about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Author,
    Branch,
    Commit,
    Tag,
    Remote,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Author => "author",
            EntityKind::Branch => "branch",
            EntityKind::Commit => "commit",
            EntityKind::Tag => "tag",
            EntityKind::Remote => "remote",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during git operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("The given \"{0}\" is not a valid git command")]
    InvalidCommand(String),

    #[error("The \"{command}\" git command exited with code {code}")]
    CommandExecution { command: String, code: i32 },

    #[error("The \"{command}\" git command timed out after {seconds} seconds")]
    Timeout { command: String, seconds: u64 },

    #[error("\"{0}\" is not a valid SHA-1 hash")]
    InvalidHash(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Could not get {kind} \"{name}\"")]
    NotFound { kind: EntityKind, name: String },

    #[error("HEAD is detached, there is no current branch")]
    DetachedHead,

    #[error("Failed to parse git output: {0}")]
    Parse(String),

    #[error("The minimum required git version \"{required}\" is greater than the current \"{found}\"")]
    VersionUnsupported { found: String, required: String },

    #[error("{context}")]
    Query {
        context: String,
        #[source]
        source: Box<GitError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl GitError {
    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        GitError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Wrap a lower-level failure with what was being fetched
    pub(crate) fn query(context: impl Into<String>, source: GitError) -> Self {
        GitError::Query {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Innermost error, looking through any `Query` wrappers
    pub fn root_cause(&self) -> &GitError {
        match self {
            GitError::Query { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Top-level application error that wraps all module-specific errors
///
/// Used by the `gitinfo` binary. All module errors convert via `From`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
