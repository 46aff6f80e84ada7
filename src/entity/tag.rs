use serde::Serialize;

use crate::entity::Commit;
use crate::error::{EntityKind, GitError, GitResult};
use crate::git::executor::Executor;
use crate::resolver::TagResolver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    name: String,
}

impl Tag {
    pub fn resolve<E>(executor: &E, name: &str) -> GitResult<Self>
    where
        E: Executor + ?Sized,
    {
        let name = name.trim();
        if !TagResolver::new(executor).exists(name) {
            return Err(GitError::not_found(EntityKind::Tag, name));
        }

        Ok(Self {
            name: name.to_string(),
        })
    }

    /// First tag pointing at HEAD, if any
    pub fn current<E>(executor: &E) -> GitResult<Option<Self>>
    where
        E: Executor + ?Sized,
    {
        TagResolver::new(executor)
            .current()?
            .map(|name| Self::resolve(executor, &name))
            .transpose()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_commit<E>(&self, executor: &E) -> GitResult<Commit>
    where
        E: Executor + ?Sized,
    {
        let hash = TagResolver::new(executor).last_commit(&self.name)?;
        Commit::resolve(executor, hash.as_str())
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
