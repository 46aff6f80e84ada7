use serde::Serialize;

use crate::entity::Commit;
use crate::error::{EntityKind, GitError, GitResult};
use crate::git::executor::Executor;
use crate::resolver::BranchResolver;

/// A local branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    name: String,
}

impl Branch {
    pub fn resolve<E>(executor: &E, name: &str) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        let name = name.trim();
        if !BranchResolver::new(executor).exists(name) {
            return Err(GitError::not_found(EntityKind::Branch, name));
        }

        Ok(Self {
            name: name.to_string(),
        })
    }

    /// The checked out branch; `DetachedHead` when there is none
    pub fn current<E>(executor: &E) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        let name = BranchResolver::new(executor).current()?;
        Self::resolve(executor, &name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Commit at the tip of the branch, resolved afresh on every call
    pub fn last_commit<E>(&self, executor: &E) -> GitResult<Commit>
    where
        E: Executor + ?Sized,
    {
        let hash = BranchResolver::new(executor).last_commit(&self.name)?;
        Commit::resolve(executor, hash.as_str())
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockExecutor;

    fn repo() -> MockExecutor {
        MockExecutor::new()
            .respond("branch", ["* main", "  topic"])
            .respond("branch --show-current", ["main"])
            .respond("show-ref --verify --quiet refs/heads/main", Vec::<String>::new())
    }

    #[test]
    fn test_resolve_trims() {
        let executor = repo();
        assert_eq!(Branch::resolve(&executor, " main ").unwrap().name(), "main");
    }

    #[test]
    fn test_missing_branch() {
        let executor = repo();
        assert!(matches!(
            Branch::resolve(&executor, "no-such-branch-xyz"),
            Err(GitError::NotFound { kind: EntityKind::Branch, .. })
        ));
    }

    #[test]
    fn test_current() {
        let executor = repo();
        assert_eq!(Branch::current(&executor).unwrap().to_string(), "main");
    }
}
