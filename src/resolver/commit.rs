use crate::entity::CommitHash;
use crate::error::{GitError, GitResult};
use crate::git::command::GitCommand;
use crate::git::executor::Executor;
use crate::security::HashValidator;

/// Length requested from `rev-parse --short`
const SHORT_HASH_LEN: &str = "7";

pub struct CommitResolver<'a, E: Executor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: Executor + ?Sized> CommitResolver<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Whether `hash` names an object of type commit
    ///
    /// Trees, blobs and unknown objects all answer false.
    pub fn exists(&self, hash: &str) -> bool {
        self.executor
            .execute_first(&GitCommand::new("cat-file").flag("-t").arg(hash))
            .map(|kind| kind == "commit")
            .unwrap_or(false)
    }

    pub fn long_hash(&self, rev: &str) -> GitResult<CommitHash> {
        self.hash(rev, false)
    }

    pub fn short_hash(&self, rev: &str) -> GitResult<CommitHash> {
        self.hash(rev, true)
    }

    /// Long hash of HEAD
    pub fn current(&self) -> GitResult<CommitHash> {
        self.long_hash("HEAD")
    }

    /// Long hashes of every commit reachable from HEAD, newest first
    pub fn list(&self) -> GitResult<Vec<CommitHash>> {
        let lines = self
            .executor
            .execute(&GitCommand::new("log").option("--format", "%H"))
            .map_err(|e| GitError::query("Could not retrieve the commits list", e))?;

        Ok(lines.into_iter().map(CommitHash::from_git).collect())
    }

    /// Full commit message, trailing blank lines removed
    pub fn message(&self, hash: &str) -> GitResult<String> {
        let hash = HashValidator::validate(hash)?;

        let lines = self
            .executor
            .execute(&Self::log_one(hash, "%B"))
            .map_err(|e| {
                GitError::query(
                    format!("Could not retrieve the commit message from \"{}\"", hash),
                    e,
                )
            })?;

        Ok(lines.join("\n").trim_end().to_string())
    }

    /// Author as an "email name" line
    pub fn author_line(&self, hash: &str) -> GitResult<String> {
        let hash = HashValidator::validate(hash)?;

        self.executor
            .execute_first(&Self::log_one(hash, "%ae %an"))
            .map_err(|e| {
                GitError::query(
                    format!("Could not retrieve the commit author from \"{}\"", hash),
                    e,
                )
            })
    }

    /// Committer date in `YYYY-MM-DD HH:MM:SS ±HHMM` form
    pub fn date(&self, hash: &str) -> GitResult<String> {
        let hash = HashValidator::validate(hash)?;

        let command = GitCommand::new("show")
            .flag("-s")
            .option("--format", "%ci")
            .option("-n", "1")
            .arg(hash);

        self.executor.execute_first(&command).map_err(|e| {
            GitError::query(
                format!("Could not retrieve the commit date from \"{}\"", hash),
                e,
            )
        })
    }

    fn log_one(hash: &str, format: &str) -> GitCommand {
        GitCommand::new("log")
            .option("--format", format)
            .option("-n", "1")
            .arg(hash)
    }

    fn hash(&self, rev: &str, short: bool) -> GitResult<CommitHash> {
        let mut command = GitCommand::new("rev-parse");
        if short {
            command = command.option("--short", SHORT_HASH_LEN);
        }

        let hash = self
            .executor
            .execute_first(&command.arg(rev))
            .map_err(|e| {
                GitError::query(
                    format!("Could not get a valid hash from revision \"{}\"", rev),
                    e,
                )
            })?;

        if hash.is_empty() {
            return Err(GitError::Parse(format!(
                "rev-parse returned no hash for \"{}\"",
                rev
            )));
        }

        Ok(CommitHash::from_git(hash))
    }
}
