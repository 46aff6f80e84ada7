use crate::security::CommandValidator;

/// A single option token of a git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOption {
    /// Bare flag such as `--quiet` or `-1`
    Flag(String),
    /// Option carrying one or more values, such as `--format=%H` or `-n 1`
    Valued { name: String, values: Vec<String> },
}

impl CommandOption {
    fn separator(name: &str) -> &'static str {
        if name.starts_with("--") { "=" } else { " " }
    }
}

/// A git invocation described as typed tokens
///
/// Rendering to a display line and to an argument vector both walk the same
/// tokens in the same order: verb, options in insertion order, then
/// positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    verb: String,
    options: Vec<CommandOption>,
    args: Vec<String>,
    escape: bool,
}

impl GitCommand {
    /// Start a command; an empty verb gives a bare invocation like `git --version`
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            options: Vec::new(),
            args: Vec::new(),
            escape: true,
        }
    }

    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.options.push(CommandOption::Flag(name.into()));
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(CommandOption::Valued {
            name: name.into(),
            values: vec![value.into()],
        });
        self
    }

    /// Option with several values; an empty list degrades to a flag
    pub fn option_values<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.options.push(CommandOption::Flag(name));
        } else {
            self.options.push(CommandOption::Valued { name, values });
        }
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Turn off per-token quoting and the sanitizing pass for the display line
    pub fn raw(mut self) -> Self {
        self.escape = false;
        self
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    pub fn positional(&self) -> &[String] {
        &self.args
    }

    pub fn escapes(&self) -> bool {
        self.escape
    }

    /// Assemble the full command line as it would be typed in a shell
    ///
    /// The program name is written as given; only what follows it goes
    /// through the sanitizing pass.
    pub fn to_command_line(&self, program: &str) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.verb.is_empty() {
            parts.push(self.token(&self.verb));
        }

        for option in &self.options {
            match option {
                CommandOption::Flag(name) => parts.push(name.clone()),
                CommandOption::Valued { name, values } => {
                    let rendered: Vec<String> = values.iter().map(|v| self.token(v)).collect();
                    parts.push(format!(
                        "{}{}{}",
                        name,
                        CommandOption::separator(name),
                        rendered.join(" ")
                    ));
                }
            }
        }

        parts.extend(self.args.iter().map(|a| self.token(a)));

        let rest = parts.join(" ");
        let rest = if self.escape {
            CommandValidator::sanitize(&rest)
        } else {
            rest
        };

        if rest.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, rest)
        }
    }

    /// Argument vector handed to the process, without the program name
    ///
    /// `--name` options carry their first value after `=`; short options
    /// take their values as separate arguments. Extra values follow as
    /// their own arguments in both cases.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if !self.verb.is_empty() {
            args.push(self.verb.clone());
        }

        for option in &self.options {
            match option {
                CommandOption::Flag(name) => args.push(name.clone()),
                CommandOption::Valued { name, values } => {
                    let mut values = values.iter();
                    if name.starts_with("--") {
                        match values.next() {
                            Some(first) => args.push(format!("{}={}", name, first)),
                            None => args.push(name.clone()),
                        }
                    } else {
                        args.push(name.clone());
                    }
                    args.extend(values.cloned());
                }
            }
        }

        args.extend(self.args.iter().cloned());
        args
    }

    fn token(&self, value: &str) -> String {
        if self.escape {
            quote(value)
        } else {
            value.to_string()
        }
    }
}

/// Single-quote a token for a POSIX shell
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
