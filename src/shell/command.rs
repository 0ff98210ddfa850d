//! External command execution.
//!
//! Every package manager, `java`, `unzip`, `git` and `pip` invocation goes
//! through the [`CommandRunner`] trait so steps can be exercised against
//! [`MockRunner`](super::MockRunner) in tests.

use crate::error::Result;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Last non-empty line of stderr, falling back to stdout.
    pub fn last_output_line(&self) -> Option<&str> {
        fn last_line(s: &str) -> Option<&str> {
            s.lines().rev().find(|l| !l.trim().is_empty())
        }
        last_line(&self.stderr)
            .or_else(|| last_line(&self.stdout))
            .map(str::trim)
    }
}

/// A program invocation: no shell is involved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,

    /// Arguments.
    pub args: Vec<String>,

    /// Extra environment variables (merged with the process env).
    pub env: Vec<(String, String)>,

    /// Always capture output, even when the runner streams by default.
    pub capture: bool,
}

impl CommandSpec {
    /// Start a spec for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        let arg = path.to_string_lossy().into_owned();
        self.arg(arg)
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Force output capture.
    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs external commands.
pub trait CommandRunner {
    /// Run a command to completion.
    ///
    /// A non-zero exit is reported through [`CommandResult::success`];
    /// `Err` means the program could not be started at all.
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult>;
}

/// Runs commands on the host.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    stream_output: bool,
}

impl SystemRunner {
    /// Create a runner. With `stream_output`, uncaptured children inherit
    /// stdout/stderr; otherwise their output is collected and discarded.
    pub fn new(stream_output: bool) -> Self {
        Self { stream_output }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        let start = Instant::now();
        let capture = spec.capture || !self.stream_output;

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        if capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        tracing::debug!("Running: {}", spec);
        let output = cmd.output()?;
        let duration = start.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            tracing::debug!("{} exited with {:?}", spec.program, output.status.code());
            Ok(CommandResult::failure(
                output.status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}
