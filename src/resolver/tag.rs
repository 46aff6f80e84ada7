use tracing::debug;

use crate::entity::CommitHash;
use crate::error::{EntityKind, GitError, GitResult};
use crate::git::command::GitCommand;
use crate::git::executor::Executor;
use crate::git::parser;
use crate::resolver::commit::CommitResolver;

pub struct TagResolver<'a, E: Executor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: Executor + ?Sized> TagResolver<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Whether `name` is a tag, checked against both the ref and `git tag`
    pub fn exists(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }

        let verified = self
            .executor
            .execute(
                &GitCommand::new("show-ref")
                    .flag("--verify")
                    .flag("--quiet")
                    .arg(format!("refs/tags/{}", name)),
            )
            .is_ok();

        verified
            && self
                .list()
                .map(|list| list.iter().any(|tag| tag == name))
                .unwrap_or(false)
    }

    pub fn list(&self) -> GitResult<Vec<String>> {
        let lines = self
            .executor
            .execute(&GitCommand::new("tag"))
            .map_err(|e| GitError::query("Could not get the tags list", e))?;

        Ok(parser::parse_name_list(&lines))
    }

    /// Long hash of the commit the tag points at
    pub fn last_commit(&self, name: &str) -> GitResult<CommitHash> {
        if !self.exists(name) {
            return Err(GitError::not_found(EntityKind::Tag, name));
        }

        let command = GitCommand::new("log")
            .option("--format", "%H")
            .option("-n", "1")
            .arg(format!("refs/tags/{}", name));

        let hash = self.executor.execute_first(&command).map_err(|e| {
            GitError::query(format!("Could not get tag \"{}\" last commit", name), e)
        })?;

        Ok(CommitHash::from_git(hash))
    }

    /// First tag, in `git tag` order, pointing at HEAD
    ///
    /// There is no direct query for this, so every tag is resolved in turn:
    /// one process per tag.
    pub fn current(&self) -> GitResult<Option<String>> {
        let head = CommitResolver::new(self.executor).current()?;
        let tags = self.list()?;
        debug!(tags = tags.len(), head = %head, "scanning tags for HEAD");

        for tag in tags {
            let command = GitCommand::new("rev-list")
                .option("-n", "1")
                .arg(format!("refs/tags/{}", tag));

            let commit = self.executor.execute_first(&command).map_err(|e| {
                GitError::query(
                    format!("Could not get the last commit hash for the \"{}\" tag", tag),
                    e,
                )
            })?;

            if commit.is_empty() {
                continue;
            }

            if CommitHash::from_git(commit) == head {
                return Ok(Some(tag));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockExecutor;

    const HEAD: &str = "abc1234def5678abc1234def5678abc1234def56";
    const OLD: &str = "0001234def5678abc1234def5678abc1234def56";

    #[test]
    fn test_current_finds_tag_at_head() {
        let executor = MockExecutor::new()
            .respond("rev-parse HEAD", [HEAD])
            .respond("tag", ["v1.0", "v1.1"])
            .respond("rev-list -n 1 refs/tags/v1.0", [OLD])
            .respond("rev-list -n 1 refs/tags/v1.1", [HEAD]);
        let resolver = TagResolver::new(&executor);

        assert_eq!(resolver.current().unwrap(), Some("v1.1".to_string()));
    }

    #[test]
    fn test_current_first_in_listing_order() {
        let executor = MockExecutor::new()
            .respond("rev-parse HEAD", [HEAD])
            .respond("tag", ["a", "b"])
            .respond("rev-list -n 1 refs/tags/a", [HEAD])
            .respond("rev-list -n 1 refs/tags/b", [HEAD]);
        let resolver = TagResolver::new(&executor);

        assert_eq!(resolver.current().unwrap(), Some("a".to_string()));
        // stops at the first hit
        assert!(!executor.calls().contains(&"rev-list -n 1 refs/tags/b".to_string()));
    }

    #[test]
    fn test_current_without_tags() {
        let executor = MockExecutor::new()
            .respond("rev-parse HEAD", [HEAD])
            .respond("tag", Vec::<String>::new());
        let resolver = TagResolver::new(&executor);

        assert_eq!(resolver.current().unwrap(), None);
    }

    #[test]
    fn test_current_no_tag_at_head() {
        let executor = MockExecutor::new()
            .respond("rev-parse HEAD", [HEAD])
            .respond("tag", ["v1.0"])
            .respond("rev-list -n 1 refs/tags/v1.0", [OLD]);
        let resolver = TagResolver::new(&executor);

        assert_eq!(resolver.current().unwrap(), None);
    }

    #[test]
    fn test_exists_and_last_commit() {
        let executor = MockExecutor::new()
            .respond("tag", ["v1.0"])
            .respond("show-ref --verify --quiet refs/tags/v1.0", Vec::<String>::new())
            .respond("log --format=%H -n 1 refs/tags/v1.0", [OLD]);
        let resolver = TagResolver::new(&executor);

        assert!(resolver.exists("v1.0"));
        assert!(!resolver.exists("no-such-tag-xyz"));
        assert_eq!(resolver.last_commit("v1.0").unwrap().as_str(), OLD);
        assert!(matches!(
            resolver.last_commit("no-such-tag-xyz"),
            Err(GitError::NotFound { kind: EntityKind::Tag, .. })
        ));
    }
}
