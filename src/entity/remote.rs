use serde::Serialize;

use crate::error::{EntityKind, GitError, GitResult};
use crate::git::executor::Executor;
use crate::resolver::RemoteResolver;

/// A configured remote and its fetch URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    name: String,
    url: String,
}

impl Remote {
    pub fn resolve<E>(executor: &E, name: &str) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        let remotes = RemoteResolver::new(executor);
        let name = name.trim();

        if !remotes.exists(name) {
            return Err(GitError::not_found(EntityKind::Remote, name));
        }

        Ok(Self {
            name: name.to_string(),
            url: remotes.url(name)?,
        })
    }

    /// Remote tracked by the current branch
    pub fn current<E>(executor: &E) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        let name = RemoteResolver::new(executor).current()?;
        Self::resolve(executor, &name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockExecutor;

    #[test]
    fn test_resolve_fetches_url() {
        let executor = MockExecutor::new()
            .respond("remote", ["origin"])
            .respond("remote get-url origin", ["https://example.com/project.git"]);

        let remote = Remote::resolve(&executor, "origin").unwrap();
        assert_eq!(remote.name(), "origin");
        assert_eq!(remote.url(), "https://example.com/project.git");
    }

    #[test]
    fn test_missing_remote() {
        let executor = MockExecutor::new().respond("remote", ["origin"]);
        assert!(matches!(
            Remote::resolve(&executor, "upstream"),
            Err(GitError::NotFound { kind: EntityKind::Remote, .. })
        ));
    }

    #[test]
    fn test_serialize() {
        let executor = MockExecutor::new()
            .respond("remote", ["origin"])
            .respond("remote get-url origin", ["git@example.com:p.git"]);

        let json = serde_json::to_value(Remote::resolve(&executor, "origin").unwrap()).unwrap();
        assert_eq!(json["name"], "origin");
        assert_eq!(json["url"], "git@example.com:p.git");
    }
}
