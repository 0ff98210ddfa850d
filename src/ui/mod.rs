//! Console user interface.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for real terminals and redirected output
//! - [`MockUI`] for tests
//! - Spinners and a byte progress bar for downloads
//!
//! # Example
//!
//! ```
//! use perch::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(OutputMode::Quiet);
//! ui.show_header("Ghidra");
//! ui.success("Provisioning complete");
//! ```

pub mod mock;
pub mod output;
pub mod progress;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use output::OutputMode;
pub use progress::{format_bytes, format_duration};
pub use spinner::{ProgressSpinner, TransferBar};
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, PerchTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a step line (e.g., "[3/6] Verifying Java runtime").
    fn show_step(&mut self, current: usize, total: usize, title: &str);

    /// Show an actionable hint below a warning or error.
    fn show_hint(&mut self, hint: &str);

    /// Show an aligned key/value line.
    fn show_detail(&mut self, key: &str, value: &str);

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Start a byte-count progress display.
    fn start_transfer(&mut self, message: &str, total: Option<u64>) -> Box<dyn TransferHandle>;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// Handle for a byte transfer.
pub trait TransferHandle {
    /// Record `bytes` more transferred.
    fn advance(&mut self, bytes: u64);

    /// Remove the display.
    fn finish(&mut self);
}

/// Create the terminal UI for `mode`.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}
