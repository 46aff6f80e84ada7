use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::entity::{Author, CommitHash};
use crate::error::{EntityKind, GitError, GitResult};
use crate::git::executor::Executor;
use crate::git::parser;
use crate::resolver::CommitResolver;

/// A commit snapshot: hashes, full message, committer date and author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    long_hash: CommitHash,
    short_hash: CommitHash,
    message: String,
    date: DateTime<FixedOffset>,
    author: Author,
}

impl Commit {
    /// Resolve a commit from a 7 or 40 character hash
    ///
    /// A malformed hash fails with `InvalidHash` before git is called.
    /// A well-formed hash that is not a commit fails with `NotFound`.
    pub fn resolve<E>(executor: &E, hash: &str) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        let hash = CommitHash::parse(hash)?;
        let commits = CommitResolver::new(executor);

        if !commits.exists(hash.as_str()) {
            return Err(GitError::not_found(EntityKind::Commit, hash.as_str()));
        }

        let long_hash = commits.long_hash(hash.as_str())?;
        let short_hash = commits.short_hash(hash.as_str())?;
        let message = commits.message(long_hash.as_str())?;
        let date = parser::parse_commit_date(&commits.date(long_hash.as_str())?)?;

        let line = commits.author_line(long_hash.as_str())?;
        let entry = parser::split_author_line(&line);
        let author = Author::resolve(executor, &entry.email, &entry.name)?;

        Ok(Self {
            long_hash,
            short_hash,
            message,
            date,
            author,
        })
    }

    /// The commit HEAD points at
    pub fn current<E>(executor: &E) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        let head = CommitResolver::new(executor).current()?;
        Self::resolve(executor, head.as_str())
    }

    pub fn long_hash(&self) -> &CommitHash {
        &self.long_hash
    }

    pub fn short_hash(&self) -> &CommitHash {
        &self.short_hash
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    pub fn date(&self) -> DateTime<FixedOffset> {
        self.date
    }

    pub fn author(&self) -> &Author {
        &self.author
    }
}
