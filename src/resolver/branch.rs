use crate::entity::CommitHash;
use crate::error::{EntityKind, GitError, GitResult};
use crate::git::command::GitCommand;
use crate::git::executor::Executor;
use crate::git::parser;

pub struct BranchResolver<'a, E: Executor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: Executor + ?Sized> BranchResolver<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Whether `name` is a local branch
    ///
    /// The ref must verify under `refs/heads/` and the name must also be
    /// listed by `git branch`.
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
                    .arg(format!("refs/heads/{}", name)),
            )
            .is_ok();

        verified
            && self
                .list()
                .map(|list| list.iter().any(|branch| branch == name))
                .unwrap_or(false)
    }

    /// Name of the checked out branch
    pub fn current(&self) -> GitResult<String> {
        let branch = self
            .executor
            .execute_first(&GitCommand::new("branch").flag("--show-current"))
            .map_err(|e| GitError::query("Could not get the current branch", e))?;

        if branch.is_empty() {
            return Err(GitError::DetachedHead);
        }
        Ok(branch)
    }

    pub fn list(&self) -> GitResult<Vec<String>> {
        let lines = self
            .executor
            .execute(&GitCommand::new("branch"))
            .map_err(|e| GitError::query("Could not get the branch list", e))?;

        Ok(parser::parse_branch_list(&lines)
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Long hash of the branch tip
    pub fn last_commit(&self, name: &str) -> GitResult<CommitHash> {
        if !self.exists(name) {
            return Err(GitError::not_found(EntityKind::Branch, name));
        }

        let command = GitCommand::new("log")
            .option("--format", "%H")
            .option("-n", "1")
            .arg(format!("refs/heads/{}", name));

        let hash = self.executor.execute_first(&command).map_err(|e| {
            GitError::query(format!("Could not get branch \"{}\" last commit", name), e)
        })?;

        Ok(CommitHash::from_git(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockExecutor;

    fn repo() -> MockExecutor {
        MockExecutor::new()
            .respond("branch", ["* main", "  feature-x"])
            .respond("show-ref --verify --quiet refs/heads/main", Vec::<String>::new())
            .respond(
                "show-ref --verify --quiet refs/heads/feature-x",
                Vec::<String>::new(),
            )
            .respond(
                "log --format=%H -n 1 refs/heads/main",
                ["abc1234def5678abc1234def5678abc1234def56"],
            )
    }

    #[test]
    fn test_exists() {
        let executor = repo();
        let resolver = BranchResolver::new(&executor);

        assert!(resolver.exists("main"));
        assert!(resolver.exists("feature-x"));
        assert!(!resolver.exists("no-such-branch-xyz"));
        assert!(!resolver.exists(""));
    }

    #[test]
    fn test_exists_needs_both_checks() {
        // ref verifies but the branch list disagrees
        let executor = MockExecutor::new()
            .respond("branch", ["* main"])
            .respond("show-ref --verify --quiet refs/heads/ghost", Vec::<String>::new());
        let resolver = BranchResolver::new(&executor);

        assert!(!resolver.exists("ghost"));
    }

    #[test]
    fn test_current() {
        let executor = MockExecutor::new().respond("branch --show-current", ["main"]);
        let resolver = BranchResolver::new(&executor);
        assert_eq!(resolver.current().unwrap(), "main");
    }

    #[test]
    fn test_current_detached() {
        let executor = MockExecutor::new().respond("branch --show-current", Vec::<String>::new());
        let resolver = BranchResolver::new(&executor);
        assert!(matches!(resolver.current(), Err(GitError::DetachedHead)));
    }

    #[test]
    fn test_list() {
        let executor = repo();
        let resolver = BranchResolver::new(&executor);
        assert_eq!(resolver.list().unwrap(), vec!["main", "feature-x"]);
    }

    #[test]
    fn test_last_commit() {
        let executor = repo();
        let resolver = BranchResolver::new(&executor);

        let hash = resolver.last_commit("main").unwrap();
        assert_eq!(hash.as_str(), "abc1234def5678abc1234def5678abc1234def56");
    }

    #[test]
    fn test_last_commit_missing_branch() {
        let executor = repo();
        let resolver = BranchResolver::new(&executor);

        assert!(matches!(
            resolver.last_commit("no-such-branch-xyz"),
            Err(GitError::NotFound { kind: EntityKind::Branch, .. })
        ));
    }
}
