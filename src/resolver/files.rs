//! Working-tree file states.
//!
//! Paths come back relative to the repository root (`--full-name`), or
//! absolute when `full_path` is set.

use serde::Serialize;
use tracing::debug;

use crate::error::{GitError, GitResult};
use crate::git::command::GitCommand;
use crate::git::executor::Executor;
use crate::git::parser;

/// A deleted tracked file paired with an untracked file of identical content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedFile {
    pub from: String,
    pub to: String,
}

pub struct FilesResolver<'a, E: Executor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: Executor + ?Sized> FilesResolver<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Absolute path of the working tree root
    pub fn toplevel(&self) -> GitResult<String> {
        let top = self
            .executor
            .execute_first(&GitCommand::new("rev-parse").flag("--show-toplevel"))
            .map_err(|e| GitError::query("Could not get the repository top level", e))?;

        if top.is_empty() {
            return Err(GitError::NotARepository);
        }
        Ok(top)
    }

    pub fn deleted(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.ls_files(&["--deleted"], "deleted", full_path)
    }

    pub fn modified(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.ls_files(&["--modified"], "modified", full_path)
    }

    pub fn unmerged(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.ls_files(&["--unmerged"], "unmerged", full_path)
    }

    /// Everything changed in the working tree but not yet in the index
    pub fn unstaged(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.ls_files(
            &["--modified", "--deleted", "--unmerged", "--killed"],
            "unstaged",
            full_path,
        )
    }

    pub fn untracked(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.ls_files(&["--others"], "untracked", full_path)
    }

    pub fn staged(&self, full_path: bool) -> GitResult<Vec<String>> {
        let lines = self
            .executor
            .execute(&GitCommand::new("diff").flag("--cached").flag("--name-only"))
            .map_err(|e| GitError::query("Could not get the staged files list", e))?;

        let paths = parser::parse_ls_files(&lines);
        self.prefixed(paths, full_path)
    }

    /// Best-effort rename detection for changes not yet staged
    ///
    /// A deleted path is paired with the first untracked path whose blob id
    /// matches the blob the deleted path had at HEAD. Each untracked path is
    /// used at most once.
    pub fn renamed(&self, full_path: bool) -> GitResult<Vec<RenamedFile>> {
        let deleted = self.deleted(false)?;
        let untracked = self.untracked(false)?;
        if deleted.is_empty() || untracked.is_empty() {
            return Ok(Vec::new());
        }

        let top = self.toplevel()?;
        let untracked_ids = self.blob_ids(&top, &untracked)?;
        debug!(
            deleted = deleted.len(),
            untracked = untracked.len(),
            "matching deleted files against untracked ones"
        );

        let mut used = vec![false; untracked.len()];
        let mut renamed = Vec::new();

        for from in deleted {
            // a path that never made it into HEAD has nothing to compare
            let Some(id) = self.head_blob_id(&from) else {
                continue;
            };

            let hit = untracked_ids
                .iter()
                .enumerate()
                .find(|(i, candidate)| !used[*i] && candidate.as_deref() == Some(id.as_str()))
                .map(|(i, _)| i);

            if let Some(i) = hit {
                used[i] = true;
                renamed.push(RenamedFile {
                    from: with_prefix(&top, from, full_path),
                    to: with_prefix(&top, untracked[i].clone(), full_path),
                });
            }
        }

        Ok(renamed)
    }

    fn ls_files(&self, flags: &[&str], what: &str, full_path: bool) -> GitResult<Vec<String>> {
        let mut command = GitCommand::new("ls-files");
        for flag in flags {
            command = command.flag(*flag);
        }
        let command = command.flag("--exclude-standard").flag("--full-name");

        let lines = self.executor.execute(&command).map_err(|e| {
            GitError::query(format!("Could not get the {} files list", what), e)
        })?;

        let paths = parser::parse_ls_files(&lines);
        self.prefixed(paths, full_path)
    }

    fn prefixed(&self, paths: Vec<String>, full_path: bool) -> GitResult<Vec<String>> {
        if !full_path || paths.is_empty() {
            return Ok(paths);
        }

        let top = self.toplevel()?;
        Ok(paths
            .into_iter()
            .map(|path| with_prefix(&top, path, true))
            .collect())
    }

    fn head_blob_id(&self, path: &str) -> Option<String> {
        self.executor
            .execute_first(&GitCommand::new("rev-parse").arg(format!("HEAD:{}", path)))
            .ok()
            .filter(|id| !id.is_empty())
    }

    /// Blob ids of working-tree files, one per path and in the same order
    ///
    /// Hashes everything in one call. If that fails, each file is hashed on
    /// its own and files git cannot hash get `None`.
    fn blob_ids(&self, top: &str, paths: &[String]) -> GitResult<Vec<Option<String>>> {
        let mut command = GitCommand::new("hash-object");
        for path in paths {
            command = command.arg(format!("{}/{}", top, path));
        }

        let ids = match self.executor.execute(&command) {
            Ok(ids) => ids,
            Err(e) => {
                debug!(error = %e, "batch hashing failed, hashing files one by one");
                return Ok(paths
                    .iter()
                    .map(|path| self.blob_id(top, path))
                    .collect());
            }
        };

        if ids.len() != paths.len() {
            return Err(GitError::Parse(format!(
                "hash-object returned {} ids for {} files",
                ids.len(),
                paths.len()
            )));
        }
        Ok(ids.into_iter().map(Some).collect())
    }

    fn blob_id(&self, top: &str, path: &str) -> Option<String> {
        self.executor
            .execute_first(&GitCommand::new("hash-object").arg(format!("{}/{}", top, path)))
            .ok()
            .filter(|id| !id.is_empty())
    }
}

fn with_prefix(top: &str, path: String, full_path: bool) -> String {
    if full_path {
        format!("{}/{}", top, path)
    } else {
        path
    }
}
