use crate::error::{GitError, GitResult};

/// Characters that get a backslash in front of them when a line is sanitized
const SHELL_METACHARACTERS: &[char] = &[
    '#', '&', ';', '`', '|', '*', '?', '~', '<', '>', '^', '(', ')', '[', ']', '{', '}', '$',
    '\\', '\n', '\r', '\u{ff}',
];

/// Structural checks for assembled git command lines
#[derive(Debug, Clone)]
pub struct CommandValidator {
    program: String,
}

impl CommandValidator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the line is a runnable invocation of the program
    ///
    /// The line must start with the program name and carry something after
    /// it; the bare program name is a no-op and is rejected.
    pub fn is_valid(&self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }

        if !line.starts_with(self.program.as_str()) {
            return false;
        }

        line.trim() != self.program
    }

    /// Validate a line, returning it unchanged on success
    pub fn validate<'a>(&self, line: &'a str) -> GitResult<&'a str> {
        if self.is_valid(line) {
            Ok(line)
        } else {
            Err(GitError::InvalidCommand(line.to_string()))
        }
    }

    /// Neutralize shell metacharacters in an assembled line
    ///
    /// Every metacharacter and control character is backslash-escaped.
    /// Quotes are left alone when they have a matching partner later in the
    /// line and escaped otherwise, so quoted tokens stay intact and the token
    /// count does not change.
    pub fn sanitize(line: &str) -> String {
        let chars: Vec<char> = line.trim().chars().collect();
        let mut out = String::with_capacity(chars.len() + 8);
        let mut open_quote: Option<char> = None;

        for (i, &c) in chars.iter().enumerate() {
            match c {
                '\'' | '"' => {
                    match open_quote {
                        Some(q) if q == c => open_quote = None,
                        None if chars[i + 1..].contains(&c) => open_quote = Some(c),
                        _ => out.push('\\'),
                    }
                    out.push(c);
                }
                c if SHELL_METACHARACTERS.contains(&c) => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }

        out
    }
}

impl Default for CommandValidator {
    fn default() -> Self {
        Self::new("git")
    }
}
