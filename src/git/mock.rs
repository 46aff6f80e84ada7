//! Canned-output executor for tests.
//!
//! Responses are keyed by the argument vector joined with single spaces,
//! e.g. `"log --format=%H -n 1 main"`. A command with no registered response
//! behaves like git exiting with code 128.
//!
//! ```
//! use gitinfo::git::mock::MockExecutor;
//! use gitinfo::git::{Executor, GitCommand};
//!
//! let executor = MockExecutor::new().respond("branch --show-current", ["main"]);
//! let lines = executor
//!     .execute(&GitCommand::new("branch").flag("--show-current"))
//!     .unwrap();
//! assert_eq!(lines, vec!["main"]);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{GitError, GitResult};
use crate::git::executor::Executor;

#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    responses: HashMap<String, Vec<String>>,
    /// Argument strings of every command run, in order
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the output lines for a command
    pub fn respond<I, S>(mut self, args: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses
            .insert(args.to_string(), lines.into_iter().map(Into::into).collect());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl Executor for MockExecutor {
    fn program(&self) -> &str {
        "git"
    }

    fn run(&self, line: &str, args: &[String]) -> GitResult<Vec<String>> {
        let key = args.join(" ");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }

        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| GitError::CommandExecution {
                command: line.to_string(),
                code: 128,
            })
    }
}
