//! Author lookups over the commit history.
//!
//! Authors are not first-class objects in git: the author list is whatever
//! `email name` pairs appear in `git log`, in traversal order. A query with
//! both email and name must match one entry exactly (case-insensitive). A
//! query with only one of them matches the *first* entry whose email or name
//! equals the given value, so an ambiguous name resolves to whichever author
//! with that name shows up first in history. That tie-break is deterministic
//! but it is not an identity guarantee.

use std::collections::HashSet;
use tracing::debug;

use crate::entity::CommitHash;
use crate::error::{EntityKind, GitError, GitResult};
use crate::git::command::GitCommand;
use crate::git::executor::Executor;
use crate::git::parser::{self, AuthorEntry};
use crate::resolver::commit::CommitResolver;

/// A normalized author query, at least one field non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorQuery {
    email: String,
    name: String,
}

impl AuthorQuery {
    pub fn new(email: &str, name: &str) -> GitResult<Self> {
        let email = email.trim().to_lowercase();
        let name = name.trim().to_lowercase();

        if email.is_empty() && name.is_empty() {
            return Err(GitError::InvalidQuery(
                "One of email or name is required".to_string(),
            ));
        }

        Ok(Self { email, name })
    }

    pub fn matches(&self, entry: &AuthorEntry) -> bool {
        let entry_email = entry.email.to_lowercase();
        let entry_name = entry.name.to_lowercase();

        if !self.email.is_empty() && !self.name.is_empty() {
            return entry_email == self.email && entry_name == self.name;
        }

        let value = if self.email.is_empty() {
            &self.name
        } else {
            &self.email
        };
        entry_email == *value || entry_name == *value
    }

    /// First entry of `list` matching this query
    pub fn find_in<'l>(&self, list: &'l [AuthorEntry]) -> Option<&'l AuthorEntry> {
        list.iter().find(|entry| self.matches(entry))
    }

    fn describe(&self) -> String {
        match (self.email.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{} {}", self.email, self.name),
            (false, true) => self.email.clone(),
            _ => self.name.clone(),
        }
    }
}

pub struct AuthorResolver<'a, E: Executor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: Executor + ?Sized> AuthorResolver<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Whether some author in the history matches the query
    ///
    /// Fails only when both fields are empty; a history that cannot be read
    /// counts as having no authors.
    pub fn exists(&self, email: &str, name: &str) -> GitResult<bool> {
        let query = AuthorQuery::new(email, name)?;

        match self.list() {
            Ok(list) => Ok(query.find_in(&list).is_some()),
            Err(e) => {
                debug!(error = %e, "authors list unavailable, treating author as missing");
                Ok(false)
            }
        }
    }

    /// Canonical email and name of the first matching author
    pub fn resolve(&self, email: &str, name: &str) -> GitResult<AuthorEntry> {
        let query = AuthorQuery::new(email, name)?;
        let list = self.list()?;

        query
            .find_in(&list)
            .cloned()
            .ok_or_else(|| GitError::not_found(EntityKind::Author, query.describe()))
    }

    /// Raw "email name" line of the current commit's author
    pub fn current(&self) -> GitResult<String> {
        let commits = CommitResolver::new(self.executor);
        let head = commits.current()?;
        commits.author_line(head.as_str())
    }

    /// Unique authors in history order
    pub fn list(&self) -> GitResult<Vec<AuthorEntry>> {
        let lines = self
            .executor
            .execute(&GitCommand::new("log").option("--pretty", "%ae %an"))
            .map_err(|e| GitError::query("Could not get the authors list", e))?;

        Ok(parser::parse_author_list(&lines))
    }

    /// Email of the most recent commit whose author matches `name`
    pub fn email_of(&self, name: &str) -> GitResult<String> {
        self.latest_field("%ae", name)
    }

    /// Name of the most recent commit whose author matches `email`
    pub fn name_of(&self, email: &str) -> GitResult<String> {
        self.latest_field("%an", email)
    }

    fn latest_field(&self, format: &str, author: &str) -> GitResult<String> {
        let value = self
            .executor
            .execute_first(&Self::author_log(author).flag("-1").option("--format", format))
            .map_err(|e| {
                GitError::query(format!("Could not get the author of \"{}\"", author), e)
            })?;

        if value.is_empty() {
            return Err(GitError::not_found(EntityKind::Author, author.trim()));
        }
        Ok(value)
    }

    /// Commits attributed to the author
    ///
    /// With one field, that field's commits. With both, only commits found
    /// by the email search *and* by the name search, in email order. This
    /// approximates "commits by this exact person" and can miss commits
    /// made under an older spelling of either field.
    ///
    /// Each search is a substring match against git's `Name <email>`, so
    /// the name "Al" also finds commits by "Alan" and `al@x.com` also finds
    /// `sal@x.com`.
    pub fn commits(&self, email: &str, name: &str) -> GitResult<Vec<CommitHash>> {
        let email = email.trim();
        let name = name.trim();

        if !self.exists(email, name)? {
            let describe = AuthorQuery::new(email, name)?.describe();
            return Err(GitError::not_found(EntityKind::Author, describe));
        }

        let by_email = if email.is_empty() {
            None
        } else {
            Some(self.commits_matching(email)?)
        };
        let by_name = if name.is_empty() {
            None
        } else {
            Some(self.commits_matching(name)?)
        };

        let hashes: Vec<String> = match (by_email, by_name) {
            (Some(by_email), Some(by_name)) => {
                let in_name: HashSet<&String> = by_name.iter().collect();
                let mut seen = HashSet::new();
                by_email
                    .iter()
                    .filter(|hash| in_name.contains(hash))
                    .filter(|hash| seen.insert(*hash))
                    .cloned()
                    .collect()
            }
            (Some(hashes), None) | (None, Some(hashes)) => hashes,
            (None, None) => Vec::new(),
        };

        Ok(hashes.into_iter().map(CommitHash::from_git).collect())
    }

    fn commits_matching(&self, author: &str) -> GitResult<Vec<String>> {
        self.executor
            .execute(&Self::author_log(author).option("--format", "%H"))
            .map_err(|e| {
                GitError::query(
                    format!("Could not get the author \"{}\" commits list", author),
                    e,
                )
            })
    }

    /// `git log` limited to an author, matched as a fixed string
    fn author_log(author: &str) -> GitCommand {
        GitCommand::new("log")
            .flag("--fixed-strings")
            .option("--author", author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockExecutor;

    const AUTHORS: &str = "log --pretty=%ae %an";

    fn two_alices() -> MockExecutor {
        MockExecutor::new().respond(
            AUTHORS,
            [
                "a@x.com Alice",
                "b@x.com Alice",
                "a@x.com Alice",
                "c@x.com Carol Jones",
            ],
        )
    }

    #[test]
    fn test_query_requires_a_field() {
        assert!(matches!(
            AuthorQuery::new("  ", ""),
            Err(GitError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_exists_rejects_empty_query() {
        let executor = two_alices();
        let resolver = AuthorResolver::new(&executor);
        assert!(matches!(
            resolver.exists("", ""),
            Err(GitError::InvalidQuery(_))
        ));
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn test_name_only_takes_first_entry() {
        let executor = two_alices();
        let resolver = AuthorResolver::new(&executor);

        let author = resolver.resolve("", "Alice").unwrap();
        assert_eq!(author.email, "a@x.com");
        assert_eq!(author.name, "Alice");
    }

    #[test]
    fn test_exact_pair_overrides_first_match() {
        let executor = two_alices();
        let resolver = AuthorResolver::new(&executor);

        let first = resolver.resolve("a@x.com", "Alice").unwrap();
        assert_eq!((first.email.as_str(), first.name.as_str()), ("a@x.com", "Alice"));

        let second = resolver.resolve("b@x.com", "Alice").unwrap();
        assert_eq!((second.email.as_str(), second.name.as_str()), ("b@x.com", "Alice"));
    }

    #[test]
    fn test_matching_is_case_insensitive_and_canonicalizes() {
        let executor = two_alices();
        let resolver = AuthorResolver::new(&executor);

        let author = resolver.resolve("  C@X.COM ", "carol jones").unwrap();
        assert_eq!(author.email, "c@x.com");
        assert_eq!(author.name, "Carol Jones");
    }

    #[test]
    fn test_single_value_matches_either_field() {
        let executor = MockExecutor::new().respond(AUTHORS, ["dev@x.com dev@x.com"]);
        let resolver = AuthorResolver::new(&executor);

        // name given, but it equals the entry's email field
        assert!(resolver.exists("", "dev@x.com").unwrap());
    }

    #[test]
    fn test_mismatched_pair_does_not_exist() {
        let executor = two_alices();
        let resolver = AuthorResolver::new(&executor);

        assert!(!resolver.exists("a@x.com", "Carol Jones").unwrap());
        assert!(matches!(
            resolver.resolve("a@x.com", "Carol Jones"),
            Err(GitError::NotFound { kind: EntityKind::Author, .. })
        ));
    }

    #[test]
    fn test_exists_false_when_history_unreadable() {
        let executor = MockExecutor::new();
        let resolver = AuthorResolver::new(&executor);
        assert!(!resolver.exists("a@x.com", "").unwrap());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let executor = two_alices();
        let resolver = AuthorResolver::new(&executor);

        let first = resolver.resolve("", "alice").unwrap();
        let second = resolver.resolve("", "alice").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_commits_intersection() {
        let executor = two_alices()
            .respond(
                "log --fixed-strings --author=a@x.com --format=%H",
                ["c3", "c2", "c1"],
            )
            .respond(
                "log --fixed-strings --author=Alice --format=%H",
                ["c4", "c3", "c1", "c0"],
            );
        let resolver = AuthorResolver::new(&executor);

        let hashes = resolver.commits("a@x.com", "Alice").unwrap();
        let hashes: Vec<&str> = hashes.iter().map(CommitHash::as_str).collect();
        assert_eq!(hashes, vec!["c3", "c1"]);
    }

    #[test]
    fn test_commits_single_field() {
        let executor = two_alices().respond(
            "log --fixed-strings --author=Alice --format=%H",
            ["c4", "c3"],
        );
        let resolver = AuthorResolver::new(&executor);

        let hashes = resolver.commits("", "Alice").unwrap();
        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes[0].as_str(), "c4");
    }

    #[test]
    fn test_commits_unknown_author() {
        let executor = two_alices();
        let resolver = AuthorResolver::new(&executor);

        assert!(matches!(
            resolver.commits("nobody@x.com", ""),
            Err(GitError::NotFound { kind: EntityKind::Author, .. })
        ));
    }

    #[test]
    fn test_email_of_and_name_of() {
        let executor = MockExecutor::new()
            .respond(
                "log --fixed-strings --author=Alice -1 --format=%ae",
                ["a@x.com"],
            )
            .respond(
                "log --fixed-strings --author=b@x.com -1 --format=%an",
                ["Alice"],
            );
        let resolver = AuthorResolver::new(&executor);

        assert_eq!(resolver.email_of("Alice").unwrap(), "a@x.com");
        assert_eq!(resolver.name_of("b@x.com").unwrap(), "Alice");
    }

    #[test]
    fn test_email_of_unknown_is_not_found() {
        let executor = MockExecutor::new().respond(
            "log --fixed-strings --author=Nobody -1 --format=%ae",
            Vec::<String>::new(),
        );
        let resolver = AuthorResolver::new(&executor);

        assert!(matches!(
            resolver.email_of("Nobody"),
            Err(GitError::NotFound { .. })
        ));
    }

    #[test]
    fn test_current_author_line() {
        let head = "abc1234def5678abc1234def5678abc1234def56";
        let executor = MockExecutor::new()
            .respond("rev-parse HEAD", [head])
            .respond(
                &format!("log --format=%ae %an -n 1 {}", head),
                ["dev@example.com Dev One"],
            );
        let resolver = AuthorResolver::new(&executor);

        assert_eq!(resolver.current().unwrap(), "dev@example.com Dev One");
    }
}
