#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

pub const DEV_EMAIL: &str = "dev@example.com";
pub const DEV_NAME: &str = "Dev One";

/// Run git in `repo_path`, panicking on failure, and return trimmed stdout
pub fn git(repo_path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git");

    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to create an empty test repository on branch `main`
pub fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    git(repo_path, &["init", "--quiet"]);
    git(repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(repo_path, &["config", "user.name", DEV_NAME]);
    git(repo_path, &["config", "user.email", DEV_EMAIL]);
    git(repo_path, &["config", "commit.gpgsign", "false"]);
    git(repo_path, &["config", "tag.gpgsign", "false"]);

    temp_dir
}

/// Repository with two commits on `main`
pub fn create_fixture_repo() -> TempDir {
    let temp_dir = create_test_repo();
    create_commit(temp_dir.path(), "README.md", "# fixture\n", "Initial commit");
    create_commit(
        temp_dir.path(),
        "src.txt",
        "fn main() {}\n",
        "Add source\n\nWith a body line.",
    );
    temp_dir
}

/// Helper to create a commit
pub fn create_commit(repo_path: &Path, file: &str, content: &str, message: &str) {
    fs::write(repo_path.join(file), content).expect("Failed to write file");
    git(repo_path, &["add", file]);
    git(repo_path, &["commit", "--quiet", "-m", message]);
}

/// Commit under a different author identity
pub fn create_commit_as(
    repo_path: &Path,
    author: &str,
    file: &str,
    content: &str,
    message: &str,
) {
    fs::write(repo_path.join(file), content).expect("Failed to write file");
    git(repo_path, &["add", file]);
    git(
        repo_path,
        &["commit", "--quiet", "--author", author, "-m", message],
    );
}

pub fn head(repo_path: &Path) -> String {
    git(repo_path, &["rev-parse", "HEAD"])
}
