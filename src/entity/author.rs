use serde::Serialize;

use crate::entity::{Commit, CommitHash};
use crate::error::GitResult;
use crate::git::executor::Executor;
use crate::git::parser::{self, AuthorEntry};
use crate::resolver::AuthorResolver;

/// A commit author as recorded in history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    email: String,
    name: String,
}

impl Author {
    /// Look up an author by email, name or both
    ///
    /// The stored pair comes from the repository, so `("DEV@EXAMPLE.COM", "")`
    /// resolves to the casing git recorded.
    pub fn resolve<E>(executor: &E, email: &str, name: &str) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        AuthorResolver::new(executor)
            .resolve(email, name)
            .map(Self::from_entry)
    }

    /// Author of the HEAD commit
    pub fn current<E>(executor: &E) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        let line = AuthorResolver::new(executor).current()?;
        let entry = parser::split_author_line(&line);
        Self::resolve(executor, &entry.email, &entry.name)
    }

    pub(crate) fn from_entry(entry: AuthorEntry) -> Self {
        Self {
            email: entry.email,
            name: entry.name,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hashes of this author's commits
    ///
    /// Matching is by substring, see [`AuthorResolver::commits`].
    pub fn commit_hashes<E>(&self, executor: &E) -> GitResult<Vec<CommitHash>>
    where
        E: Executor + ?Sized,
    {
        AuthorResolver::new(executor).commits(&self.email, &self.name)
    }

    /// Every commit by this author, newest first
    ///
    /// Resolves each commit in full, which costs several git calls per commit.
    pub fn commits<E>(&self, executor: &E) -> GitResult<Vec<Commit>>
    where
        E: Executor + ?Sized,
    {
        self.commit_hashes(executor)?
            .iter()
            .map(|hash| Commit::resolve(executor, hash.as_str()))
            .collect()
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
