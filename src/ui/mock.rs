//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use perch::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Starting");
//! ui.warning("PATH does not include /usr/local/bin");
//!
//! assert!(ui.has_message("Starting"));
//! assert!(ui.has_warning("/usr/local/bin"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, SpinnerHandle, TransferHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    steps: Vec<(usize, usize, String)>,
    details: Vec<(String, String)>,
    spinners: Vec<String>,
    spinner_results: Rc<RefCell<Vec<String>>>,
    transferred: Rc<RefCell<u64>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all step lines as (current, total, title).
    pub fn steps(&self) -> &[(usize, usize, String)] {
        &self.steps
    }

    /// Get all key/value details.
    pub fn details(&self) -> &[(String, String)] {
        &self.details
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Final spinner lines, prefixed with `ok:` or `err:`.
    pub fn spinner_results(&self) -> Vec<String> {
        self.spinner_results.borrow().clone()
    }

    /// Total bytes reported through transfer handles.
    pub fn bytes_transferred(&self) -> u64 {
        *self.transferred.borrow()
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown (directly or via a spinner).
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
            || self
                .spinner_results
                .borrow()
                .iter()
                .any(|m| m.starts_with("ok:") && m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific hint was shown.
    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        self.steps.push((current, total, title.to_string()));
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn show_detail(&mut self, key: &str, value: &str) {
        self.details.push((key.to_string(), value.to_string()));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            results: Rc::clone(&self.spinner_results),
        })
    }

    fn start_transfer(&mut self, _message: &str, _total: Option<u64>) -> Box<dyn TransferHandle> {
        Box::new(MockTransfer {
            total: Rc::clone(&self.transferred),
        })
    }
}

/// Mock spinner that records its final state.
#[derive(Debug)]
pub struct MockSpinner {
    results: Rc<RefCell<Vec<String>>>,
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.results.borrow_mut().push(format!("ok: {}", msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.results.borrow_mut().push(format!("err: {}", msg));
    }
}

struct MockTransfer {
    total: Rc<RefCell<u64>>,
}

impl TransferHandle for MockTransfer {
    fn advance(&mut self, bytes: u64) {
        *self.total.borrow_mut() += bytes;
    }

    fn finish(&mut self) {}
}
