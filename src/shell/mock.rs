//! Scripted command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning anything.
//! It records every invocation and answers from a list of responders
//! matched against the rendered command line.
//!
//! # Example
//!
//! ```
//! use perch::shell::{CommandRunner, CommandSpec, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.fail("apt-get install", 100);
//!
//! assert!(runner.run(&CommandSpec::new("apt-get").arg("update")).unwrap().success);
//! let result = runner.run(&CommandSpec::new("apt-get").args(["install", "-y", "unzip"])).unwrap();
//! assert_eq!(result.exit_code, Some(100));
//! assert_eq!(runner.commands(), vec!["apt-get update", "apt-get install -y unzip"]);
//! ```

use std::cell::RefCell;
use std::time::Duration;

use crate::error::Result;

use super::command::{CommandResult, CommandRunner, CommandSpec};

type Responder = Box<dyn Fn(&CommandSpec) -> CommandResult>;

/// Mock runner that records commands and returns scripted results.
///
/// Responders are checked newest first; the first one whose prefix matches
/// the rendered command wins. Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct MockRunner {
    responders: RefCell<Vec<(String, Responder)>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` using `responder`.
    pub fn respond<F>(&self, prefix: &str, responder: F)
    where
        F: Fn(&CommandSpec) -> CommandResult + 'static,
    {
        self.responders
            .borrow_mut()
            .push((prefix.to_string(), Box::new(responder)));
    }

    /// Make commands starting with `prefix` exit with `code`.
    pub fn fail(&self, prefix: &str, code: i32) {
        self.respond(prefix, move |_| {
            CommandResult::failure(
                Some(code),
                String::new(),
                format!("mock failure ({})", code),
                Duration::ZERO,
            )
        });
    }

    /// Make commands starting with `prefix` succeed and print `stderr`.
    pub fn succeed_with_stderr(&self, prefix: &str, stderr: &str) {
        let stderr = stderr.to_string();
        self.respond(prefix, move |_| {
            CommandResult::success(String::new(), stderr.clone(), Duration::ZERO)
        });
    }

    /// Rendered command lines in call order.
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }

    /// Full specs in call order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded command starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.calls.borrow_mut().push(spec.clone());
        let line = spec.to_string();
        let responders = self.responders.borrow();
        let result = responders
            .iter()
            .rev()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, responder)| responder(spec))
            .unwrap_or_else(|| CommandResult::success(String::new(), String::new(), Duration::ZERO));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_responder_wins() {
        let runner = MockRunner::new();
        runner.fail("git", 1);
        runner.fail("git clone", 128);

        let result = runner.run(&CommandSpec::new("git").arg("clone")).unwrap();

        assert_eq!(result.exit_code, Some(128));
    }

    #[test]
    fn responder_sees_spec() {
        let runner = MockRunner::new();
        runner.respond("echo", |spec| {
            CommandResult::success(spec.args.join(" "), String::new(), Duration::ZERO)
        });

        let result = runner.run(&CommandSpec::new("echo").args(["a", "b"])).unwrap();

        assert_eq!(result.stdout, "a b");
    }

    #[test]
    fn ran_checks_prefix() {
        let runner = MockRunner::new();
        runner.run(&CommandSpec::new("dnf").arg("makecache")).unwrap();
        assert!(runner.ran("dnf makecache"));
        assert!(!runner.ran("yum"));
    }
}
