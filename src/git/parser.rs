use crate::error::{GitError, GitResult};
use chrono::{DateTime, FixedOffset};
use std::collections::HashSet;

/// Format of `%ci`: "2024-01-15 10:30:00 +0100"
pub const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Parse `git log --pretty='%ae %an'` output into unique authors
///
/// Lines are deduplicated as raw text, so the same person written with a
/// different letter case shows up twice. Order is first-seen.
pub fn parse_author_list(lines: &[String]) -> Vec<AuthorEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut authors = Vec::new();

    for line in lines {
        if line.is_empty() || !seen.insert(line.as_str()) {
            continue;
        }
        authors.push(split_author_line(line));
    }

    authors
}

/// Split an "email name" line on its first space
pub fn split_author_line(line: &str) -> AuthorEntry {
    match line.split_once(' ') {
        Some((email, name)) => AuthorEntry {
            email: email.to_string(),
            name: name.to_string(),
        },
        None => AuthorEntry {
            email: line.to_string(),
            name: String::new(),
        },
    }
}

/// Parse `git branch` output
pub fn parse_branch_list(lines: &[String]) -> Vec<BranchEntry> {
    let mut branches = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        // Two-column marker: "* " checked out here, "+ " checked out in
        // another worktree, "  " otherwise
        let is_current = line.starts_with("* ");
        let line = line
            .strip_prefix("* ")
            .or_else(|| line.strip_prefix("+ "))
            .unwrap_or(line)
            .trim();

        // "(HEAD detached at abc1234)" is not a branch
        if line.starts_with('(') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        branches.push(BranchEntry {
            name: parts[0].to_string(),
            is_current,
        });
    }

    branches
}

/// Parse one-name-per-line output such as `git tag` or `git remote`
pub fn parse_name_list(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Reduce `git ls-files` output to unique paths
///
/// Plain listings are one path per line. Listings with stage information
/// ("100644 <blob> 1\tpath") keep only what follows the tab. Paths git
/// quoted are unquoted.
pub fn parse_ls_files(lines: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for line in lines {
        let path = match line.split_once('\t') {
            Some((_, path)) => path,
            None => line.trim(),
        };

        if path.is_empty() {
            continue;
        }

        let path = unquote_path(path);
        if seen.insert(path.clone()) {
            paths.push(path);
        }
    }

    paths
}

/// Undo git's C-style path quoting
///
/// With `core.quotePath` on (the default) git wraps paths holding control
/// characters, `"`, `\` or non-ASCII bytes in double quotes and writes
/// those bytes as escapes, e.g. `"caf\303\251.txt"`. Anything not wrapped
/// in quotes is returned unchanged.
pub fn unquote_path(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut input = inner.bytes().peekable();

    while let Some(b) = input.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }

        match input.next() {
            Some(b'a') => bytes.push(0x07),
            Some(b'b') => bytes.push(0x08),
            Some(b't') => bytes.push(b'\t'),
            Some(b'n') => bytes.push(b'\n'),
            Some(b'v') => bytes.push(0x0b),
            Some(b'f') => bytes.push(0x0c),
            Some(b'r') => bytes.push(b'\r'),
            Some(d @ b'0'..=b'3') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match input.peek() {
                        Some(&o @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(o - b'0');
                            input.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(value as u8);
            }
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Parse a `%ci` commit date, keeping its offset
pub fn parse_commit_date(raw: &str) -> GitResult<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw.trim(), COMMIT_DATE_FORMAT).map_err(|e| {
        GitError::Parse(format!(
            "Could not parse a valid date from \"{}\": {}",
            raw, e
        ))
    })
}

/// Represents an author line from git log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorEntry {
    pub email: String,
    pub name: String,
}

/// Represents a branch from git branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchEntry {
    pub name: String,
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn lines(output: &str) -> Vec<String> {
        output.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_author_list_dedup_first_seen() {
        let output = lines(
            "dev@example.com Dev One\nother@example.com Other Person\ndev@example.com Dev One",
        );
        let authors = parse_author_list(&output);

        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].email, "dev@example.com");
        assert_eq!(authors[0].name, "Dev One");
        assert_eq!(authors[1].email, "other@example.com");
        assert_eq!(authors[1].name, "Other Person");
    }

    #[test]
    fn test_parse_author_list_keeps_case_variants() {
        let output = lines("dev@example.com Dev\nDEV@example.com Dev");
        assert_eq!(parse_author_list(&output).len(), 2);
    }

    #[test]
    fn test_split_author_line_multi_word_name() {
        let entry = split_author_line("jd@example.com John Ronald Doe");
        assert_eq!(entry.email, "jd@example.com");
        assert_eq!(entry.name, "John Ronald Doe");
    }

    #[test]
    fn test_split_author_line_no_name() {
        let entry = split_author_line("jd@example.com");
        assert_eq!(entry.email, "jd@example.com");
        assert_eq!(entry.name, "");
    }

    #[test]
    fn test_parse_branch_current() {
        let branches = parse_branch_list(&lines("* main\n  feature-x"));

        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].name, "main");
        assert!(branches[0].is_current);
        assert_eq!(branches[1].name, "feature-x");
        assert!(!branches[1].is_current);
    }

    #[test]
    fn test_parse_branch_checked_out_in_other_worktree() {
        let branches = parse_branch_list(&lines("+ feature\n* main\n  topic"));

        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["feature", "main", "topic"]);
        assert!(!branches[0].is_current);
        assert!(branches[1].is_current);
    }

    #[test]
    fn test_parse_branch_skips_detached_head() {
        let branches = parse_branch_list(&lines("* (HEAD detached at abc1234)\n  main"));

        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].name, "main");
    }

    #[test]
    fn test_parse_name_list() {
        let names = parse_name_list(&lines("v1.0\n  v1.1  \n\nv2.0"));
        assert_eq!(names, vec!["v1.0", "v1.1", "v2.0"]);
    }

    #[test]
    fn test_parse_ls_files_plain() {
        let paths = parse_ls_files(&lines("src/lib.rs\nmy file.txt\nsrc/lib.rs"));
        assert_eq!(paths, vec!["src/lib.rs", "my file.txt"]);
    }

    #[test]
    fn test_parse_ls_files_staged_format() {
        let output = lines(
            "100644 3937ae8a391ca34c321f916496a2f261f266976f 1\tsrc/a.rs\n\
             100644 4937ae8a391ca34c321f916496a2f261f266976f 2\tsrc/a.rs\n\
             100644 5937ae8a391ca34c321f916496a2f261f266976f 3\tsrc/a.rs",
        );
        assert_eq!(parse_ls_files(&output), vec!["src/a.rs"]);
    }

    #[test]
    fn test_parse_ls_files_unquotes() {
        let output = lines("\"caf\\303\\251.txt\"\nplain.txt\n100644 3937ae8a391ca34c321f916496a2f261f266976f 0\t\"tab\\there\"");
        assert_eq!(parse_ls_files(&output), vec!["café.txt", "plain.txt", "tab\there"]);
    }

    #[test]
    fn test_unquote_path_escapes() {
        assert_eq!(unquote_path(r#""say \"hi\".txt""#), "say \"hi\".txt");
        assert_eq!(unquote_path(r#""back\\slash""#), "back\\slash");
        assert_eq!(unquote_path(r#""line\nbreak""#), "line\nbreak");
        assert_eq!(unquote_path(r#""\346\227\245.md""#), "日.md");
    }

    #[test]
    fn test_unquote_path_leaves_plain_paths() {
        assert_eq!(unquote_path("src/lib.rs"), "src/lib.rs");
        assert_eq!(unquote_path("my file.txt"), "my file.txt");
        assert_eq!(unquote_path("\""), "\"");
    }

    #[test]
    fn test_parse_commit_date() {
        let date = parse_commit_date("2024-01-15 10:30:45 +0130").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
        assert_eq!(date.hour(), 10);
        assert_eq!(date.second(), 45);
        assert_eq!(date.offset().local_minus_utc(), 90 * 60);
    }

    #[test]
    fn test_parse_commit_date_negative_offset() {
        let date = parse_commit_date("2023-12-31 23:59:59 -0500").unwrap();
        assert_eq!(date.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_parse_commit_date_invalid() {
        assert!(matches!(
            parse_commit_date("2024-01-15T10:30:45Z"),
            Err(GitError::Parse(_))
        ));
        assert!(parse_commit_date("").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_author_list(&[]).is_empty());
        assert!(parse_branch_list(&[]).is_empty());
        assert!(parse_name_list(&[]).is_empty());
        assert!(parse_ls_files(&[]).is_empty());
    }
}
