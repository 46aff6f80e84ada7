use crate::config::Config;
use crate::entity::{Author, Branch, Commit, CommitHash, Remote, Tag};
use crate::error::{GitError, GitResult};
use crate::git::executor::{Executor, GitExecutor};
use crate::git::version::GitVersion;
use crate::resolver::{
    AuthorQuery, AuthorResolver, BranchResolver, CommitResolver, FilesResolver, RemoteResolver,
    RenamedFile, TagResolver,
};
use crate::security::HashValidator;
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only view of a git repository
///
/// Construction checks the installed git version once. Every getter after
/// that runs fresh queries; nothing is cached between calls.
#[derive(Debug)]
pub struct Repository<E: Executor = GitExecutor> {
    path: PathBuf,
    executor: E,
    version: GitVersion,
}

impl Repository<GitExecutor> {
    /// Detect git repository from current working directory
    pub fn discover() -> GitResult<Self> {
        let current_dir = env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Detect git repository starting from a specific directory
    pub fn discover_from<P: AsRef<Path>>(start_path: P) -> GitResult<Self> {
        Self::discover_with(start_path, &Config::default())
    }

    /// Like [`Repository::discover_from`], with explicit settings
    pub fn discover_with<P: AsRef<Path>>(start_path: P, config: &Config) -> GitResult<Self> {
        let mut current = start_path.as_ref().to_path_buf();

        loop {
            // a worktree or submodule has a .git file instead of a directory
            if current.join(".git").exists() {
                return Self::with_config(current, config);
            }

            // Move up to parent directory
            if !current.pop() {
                return Err(GitError::NotARepository);
            }
        }
    }

    /// Open a repository at a known path
    pub fn open<P: AsRef<Path>>(path: P) -> GitResult<Self> {
        Self::with_config(path, &Config::default())
    }

    pub fn with_config<P: AsRef<Path>>(path: P, config: &Config) -> GitResult<Self> {
        let executor = GitExecutor::new(path.as_ref())
            .with_program(config.git.program.clone())
            .with_timeout(config.timeout());

        Self::with_executor(path, executor)
    }
}

impl<E: Executor> Repository<E> {
    /// Wrap any executor, running the version gate through it
    pub fn with_executor<P: AsRef<Path>>(path: P, executor: E) -> GitResult<Self> {
        let version = GitVersion::validate(&executor)?;
        debug!(path = %path.as_ref().display(), %version, "opened repository");

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            executor,
            version,
        })
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Git version found at construction
    pub fn version(&self) -> GitVersion {
        self.version
    }

    /// Get the git executor for this repository
    pub fn executor(&self) -> &E {
        &self.executor
    }

    // Authors

    pub fn author(&self, email: &str, name: &str) -> GitResult<Author> {
        Author::resolve(&self.executor, email, name)
    }

    pub fn current_author(&self) -> GitResult<Author> {
        Author::current(&self.executor)
    }

    /// Unique authors in history order
    ///
    /// Entries that differ only by letter case collapse into the first
    /// spelling seen.
    pub fn authors(&self) -> GitResult<Vec<Author>> {
        let list = AuthorResolver::new(&self.executor).list()?;
        let mut seen = HashSet::new();
        let mut authors = Vec::new();

        for entry in &list {
            let query = AuthorQuery::new(&entry.email, &entry.name)?;
            let Some(canonical) = query.find_in(&list) else {
                continue;
            };

            if seen.insert((canonical.email.clone(), canonical.name.clone())) {
                authors.push(Author::from_entry(canonical.clone()));
            }
        }

        Ok(authors)
    }

    pub fn has_author(&self, email: &str, name: &str) -> GitResult<bool> {
        AuthorResolver::new(&self.executor).exists(email, name)
    }

    // Branches

    pub fn branch(&self, name: &str) -> GitResult<Branch> {
        Branch::resolve(&self.executor, name)
    }

    pub fn current_branch(&self) -> GitResult<Branch> {
        Branch::current(&self.executor)
    }

    pub fn branches(&self) -> GitResult<Vec<Branch>> {
        BranchResolver::new(&self.executor)
            .list()?
            .iter()
            .map(|name| Branch::resolve(&self.executor, name))
            .collect()
    }

    pub fn has_branch(&self, name: &str) -> bool {
        BranchResolver::new(&self.executor).exists(name)
    }

    // Commits

    pub fn commit(&self, hash: &str) -> GitResult<Commit> {
        Commit::resolve(&self.executor, hash)
    }

    pub fn current_commit(&self) -> GitResult<Commit> {
        Commit::current(&self.executor)
    }

    /// Long hashes of every commit reachable from HEAD, newest first
    pub fn commit_hashes(&self) -> GitResult<Vec<CommitHash>> {
        CommitResolver::new(&self.executor).list()
    }

    /// Every commit reachable from HEAD, fully resolved
    pub fn commits(&self) -> GitResult<Vec<Commit>> {
        self.commit_hashes()?
            .iter()
            .map(|hash| Commit::resolve(&self.executor, hash.as_str()))
            .collect()
    }

    /// Whether `hash` is a well-formed hash naming a commit
    pub fn has_commit(&self, hash: &str) -> bool {
        match HashValidator::validate(hash) {
            Ok(hash) => CommitResolver::new(&self.executor).exists(hash),
            Err(_) => false,
        }
    }

    // Tags

    pub fn tag(&self, name: &str) -> GitResult<Tag> {
        Tag::resolve(&self.executor, name)
    }

    /// First tag pointing at HEAD, if any
    pub fn current_tag(&self) -> GitResult<Option<Tag>> {
        Tag::current(&self.executor)
    }

    pub fn tags(&self) -> GitResult<Vec<Tag>> {
        TagResolver::new(&self.executor)
            .list()?
            .iter()
            .map(|name| Tag::resolve(&self.executor, name))
            .collect()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        TagResolver::new(&self.executor).exists(name)
    }

    // Remotes

    pub fn remote(&self, name: &str) -> GitResult<Remote> {
        Remote::resolve(&self.executor, name)
    }

    pub fn current_remote(&self) -> GitResult<Remote> {
        Remote::current(&self.executor)
    }

    pub fn remotes(&self) -> GitResult<Vec<Remote>> {
        RemoteResolver::new(&self.executor)
            .list()?
            .iter()
            .map(|name| Remote::resolve(&self.executor, name))
            .collect()
    }

    pub fn has_remote(&self, name: &str) -> bool {
        RemoteResolver::new(&self.executor).exists(name)
    }

    // Working tree

    pub fn files(&self) -> FilesResolver<'_, E> {
        FilesResolver::new(&self.executor)
    }

    pub fn deleted_files(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.files().deleted(full_path)
    }

    pub fn modified_files(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.files().modified(full_path)
    }

    pub fn renamed_files(&self, full_path: bool) -> GitResult<Vec<RenamedFile>> {
        self.files().renamed(full_path)
    }

    pub fn staged_files(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.files().staged(full_path)
    }

    pub fn unmerged_files(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.files().unmerged(full_path)
    }

    pub fn unstaged_files(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.files().unstaged(full_path)
    }

    pub fn untracked_files(&self, full_path: bool) -> GitResult<Vec<String>> {
        self.files().untracked(full_path)
    }
}
