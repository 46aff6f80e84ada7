use crate::error::{GitError, GitResult};
use crate::git::command::GitCommand;
use crate::security::CommandValidator;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs git invocations and returns their standard output as lines
///
/// Implementors only provide `run`; `execute` assembles and validates the
/// command line before anything is spawned.
pub trait Executor: Send + Sync {
    /// Program name every command line must start with
    fn program(&self) -> &str;

    /// Run an already validated invocation
    ///
    /// `line` is the display form used in errors and logs, `args` is what the
    /// process actually receives.
    fn run(&self, line: &str, args: &[String]) -> GitResult<Vec<String>>;

    fn execute(&self, command: &GitCommand) -> GitResult<Vec<String>> {
        let line = command.to_command_line(self.program());
        CommandValidator::new(self.program()).validate(&line)?;
        self.run(&line, &command.to_args())
    }

    /// First output line, or an empty string when there was no output
    fn execute_first(&self, command: &GitCommand) -> GitResult<String> {
        Ok(self.execute(command)?.into_iter().next().unwrap_or_default())
    }
}

/// Executes git commands within a repository
#[derive(Debug, Clone)]
pub struct GitExecutor {
    repo_path: PathBuf,
    program: String,
    timeout: Duration,
}

impl GitExecutor {
    /// Create a new GitExecutor for the given repository path
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            program: "git".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different git binary
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the repository path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for the child, killing it once the timeout has elapsed
    ///
    /// stdout and stderr are drained on their own threads so a chatty
    /// command cannot block on a full pipe while we poll. Collecting the
    /// output shares the same deadline, since a process git started in the
    /// background can hold the pipe open after git itself has exited.
    fn wait_with_timeout(&self, mut child: Child, line: &str) -> GitResult<(ExitStatus, Vec<u8>)> {
        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.timeout;
        let remaining = || deadline.saturating_duration_since(Instant::now());
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() > deadline {
                warn!(command = %line, "git command timed out, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.timed_out(line));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = match stdout_reader {
            Some(rx) => match rx.recv_timeout(remaining()) {
                Ok(read) => read?,
                Err(RecvTimeoutError::Timeout) => {
                    warn!(command = %line, "git exited but its output stayed open");
                    return Err(self.timed_out(line));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(std::io::Error::other("stdout reader panicked").into());
                }
            },
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = stderr_reader
                .and_then(|rx| rx.recv_timeout(remaining()).ok())
                .and_then(Result::ok);
            if let Some(stderr) = stderr {
                debug!(
                    command = %line,
                    stderr = %String::from_utf8_lossy(&stderr).trim(),
                    "git command failed"
                );
            }
        }

        Ok((status, stdout))
    }

    fn timed_out(&self, line: &str) -> GitError {
        GitError::Timeout {
            command: line.to_string(),
            seconds: self.timeout.as_secs(),
        }
    }
}

/// Read a pipe to the end on a background thread
fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<std::io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = tx.send(pipe.read_to_end(&mut buf).map(|_| buf));
    });
    rx
}

impl Executor for GitExecutor {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, line: &str, args: &[String]) -> GitResult<Vec<String>> {
        debug!(command = %line, "executing git command");

        let child = Command::new(&self.program)
            .args(args)
            .current_dir(&self.repo_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (status, stdout) = self.wait_with_timeout(child, line)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            warn!(command = %line, code, "git command exited with an error");
            return Err(GitError::CommandExecution {
                command: line.to_string(),
                code,
            });
        }

        let lines: Vec<String> = String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::to_string)
            .collect();
        trace!(command = %line, lines = lines.len(), "git command succeeded");

        Ok(lines)
    }
}
