use clap::{Parser, Subcommand, ValueEnum};
use gitinfo::config::Config;
use gitinfo::error::AppResult;
use gitinfo::git::Repository;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Query git repository metadata as JSON
#[derive(Debug, Parser)]
#[command(name = "gitinfo", version)]
struct Cli {
    /// Repository to inspect; discovered from the current directory if absent
    #[arg(long, global = true, env = "GITINFO_REPO")]
    repo: Option<PathBuf>,

    /// Config file to use instead of ~/.config/gitinfo/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Installed git version
    Version,
    /// One author, or the author of HEAD when no filter is given
    Author {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Print the author's commit hashes instead
        #[arg(long)]
        commits: bool,
    },
    Authors,
    /// One branch, or the checked out one
    Branch {
        name: Option<String>,
        /// Print the commit at the branch tip instead
        #[arg(long)]
        last_commit: bool,
    },
    Branches,
    /// One commit, or HEAD
    Commit { hash: Option<String> },
    /// Hashes of every commit reachable from HEAD
    Commits,
    /// One tag, or the first tag on HEAD
    Tag {
        name: Option<String>,
        #[arg(long)]
        last_commit: bool,
    },
    Tags,
    /// One remote, or the one the current branch tracks
    Remote { name: Option<String> },
    Remotes,
    /// Working tree file states
    Files {
        #[arg(value_enum)]
        kind: FileKind,
        /// Print absolute paths
        #[arg(long)]
        full_path: bool,
    },
    /// Existence checks, printed as true or false
    Has {
        #[command(subcommand)]
        entity: HasCommand,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FileKind {
    Deleted,
    Modified,
    Renamed,
    Staged,
    Unmerged,
    Unstaged,
    Untracked,
}

#[derive(Debug, Subcommand)]
enum HasCommand {
    Author {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    Branch { name: String },
    Commit { hash: String },
    Tag { name: String },
    Remote { name: String },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the config file
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &Config) -> AppResult<()> {
    let repo = match &cli.repo {
        Some(path) => Repository::with_config(path, config)?,
        None => {
            let current_dir = std::env::current_dir()?;
            Repository::discover_with(current_dir, config)?
        }
    };
    debug!(path = %repo.path().display(), "repository ready");

    match cli.command {
        Command::Version => print_json(&json!({ "git": repo.version().to_string() })),
        Command::Author {
            email,
            name,
            commits,
        } => {
            let author = match (email, name) {
                (None, None) => repo.current_author()?,
                (email, name) => {
                    repo.author(&email.unwrap_or_default(), &name.unwrap_or_default())?
                }
            };

            if commits {
                print_json(&author.commit_hashes(repo.executor())?)
            } else {
                print_json(&author)
            }
        }
        Command::Authors => print_json(&repo.authors()?),
        Command::Branch { name, last_commit } => {
            let branch = match name {
                Some(name) => repo.branch(&name)?,
                None => repo.current_branch()?,
            };

            if last_commit {
                print_json(&branch.last_commit(repo.executor())?)
            } else {
                print_json(&branch)
            }
        }
        Command::Branches => print_json(&repo.branches()?),
        Command::Commit { hash } => match hash {
            Some(hash) => print_json(&repo.commit(&hash)?),
            None => print_json(&repo.current_commit()?),
        },
        Command::Commits => print_json(&repo.commit_hashes()?),
        Command::Tag { name, last_commit } => {
            let tag = match name {
                Some(name) => Some(repo.tag(&name)?),
                None => repo.current_tag()?,
            };

            match tag {
                Some(tag) if last_commit => print_json(&tag.last_commit(repo.executor())?),
                tag => print_json(&tag),
            }
        }
        Command::Tags => print_json(&repo.tags()?),
        Command::Remote { name } => match name {
            Some(name) => print_json(&repo.remote(&name)?),
            None => print_json(&repo.current_remote()?),
        },
        Command::Remotes => print_json(&repo.remotes()?),
        Command::Files { kind, full_path } => match kind {
            FileKind::Deleted => print_json(&repo.deleted_files(full_path)?),
            FileKind::Modified => print_json(&repo.modified_files(full_path)?),
            FileKind::Renamed => print_json(&repo.renamed_files(full_path)?),
            FileKind::Staged => print_json(&repo.staged_files(full_path)?),
            FileKind::Unmerged => print_json(&repo.unmerged_files(full_path)?),
            FileKind::Unstaged => print_json(&repo.unstaged_files(full_path)?),
            FileKind::Untracked => print_json(&repo.untracked_files(full_path)?),
        },
        Command::Has { entity } => {
            let found = match entity {
                HasCommand::Author { email, name } => repo.has_author(&email, &name)?,
                HasCommand::Branch { name } => repo.has_branch(&name),
                HasCommand::Commit { hash } => repo.has_commit(&hash),
                HasCommand::Tag { name } => repo.has_tag(&name),
                HasCommand::Remote { name } => repo.has_remote(&name),
            };
            print_json(&found)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
