use crate::error::{EntityKind, GitError, GitResult};
use crate::git::command::GitCommand;
use crate::git::executor::Executor;
use crate::git::parser;
use crate::resolver::branch::BranchResolver;

pub struct RemoteResolver<'a, E: Executor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: Executor + ?Sized> RemoteResolver<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.list()
            .map(|list| list.iter().any(|remote| remote == name))
            .unwrap_or(false)
    }

    pub fn list(&self) -> GitResult<Vec<String>> {
        let lines = self
            .executor
            .execute(&GitCommand::new("remote"))
            .map_err(|e| GitError::query("Could not retrieve the remotes list", e))?;

        Ok(parser::parse_name_list(&lines))
    }

    /// Remote the current branch tracks
    pub fn current(&self) -> GitResult<String> {
        let branch = BranchResolver::new(self.executor).current()?;

        let command = GitCommand::new("for-each-ref")
            .option("--format", "%(upstream:remotename)")
            .arg(format!("refs/heads/{}", branch))
            .raw();

        let remote = self
            .executor
            .execute_first(&command)
            .map_err(|e| GitError::query("Could not retrieve the current remote", e))?;

        // an unset upstream comes back as an empty line
        if !self.exists(&remote) {
            return Err(GitError::not_found(EntityKind::Remote, remote));
        }
        Ok(remote)
    }

    pub fn url(&self, name: &str) -> GitResult<String> {
        self.executor
            .execute_first(&GitCommand::new("remote").arg("get-url").arg(name))
            .map_err(|e| {
                GitError::query(
                    format!("Could not retrieve the \"{}\" remote URL", name),
                    e,
                )
            })
    }
}
