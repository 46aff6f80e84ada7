//! Typed, read-only access to git repository metadata.
//!
//! Everything goes through the `git` binary: commands are built from typed
//! tokens, validated, run without a shell, and their output parsed into
//! immutable entities.
//!
//! ```no_run
//! use gitinfo::Repository;
//!
//! let repo = Repository::discover()?;
//! let branch = repo.current_branch()?;
//! let commit = branch.last_commit(repo.executor())?;
//! println!("{} {}", commit.short_hash(), commit.author());
//! # Ok::<(), gitinfo::GitError>(())
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod git;
pub mod resolver;
pub mod security;

// Re-export commonly used types for convenience
pub use entity::{Author, Branch, Commit, CommitHash, Remote, Tag};
pub use error::{EntityKind, GitError, GitResult};
pub use git::{GitVersion, Repository};
pub use resolver::RenamedFile;
