//! Progress spinners and transfer bars.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::PerchTheme;
use super::{SpinnerHandle, TransferHandle};

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: PerchTheme,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str, theme: PerchTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar, theme }
    }

    /// Create a spinner that doesn't draw (quiet and verbose modes).
    pub fn hidden(theme: PerchTheme) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme,
        }
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }
}

/// Byte-count progress bar for downloads.
pub struct TransferBar {
    bar: ProgressBar,
}

impl TransferBar {
    /// Create a bar. Without a known length it degrades to a byte spinner.
    pub fn new(message: &str, total: Option<u64>) -> Self {
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{msg} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                ) {
                    bar.set_style(style.progress_chars("█▓░"));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} {bytes}")
                {
                    bar.set_style(style);
                }
                bar
            }
        };
        bar.set_message(message.to_string());
        Self { bar }
    }

    /// Create a bar that doesn't draw.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl TransferHandle for TransferBar {
    fn advance(&mut self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}
