//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{
    should_use_colors, OutputMode, PerchTheme, ProgressSpinner, SpinnerHandle, TransferBar,
    TransferHandle, UserInterface,
};

/// Terminal UI implementation.
///
/// Status lines go to stdout; warnings and errors go to stderr so they
/// survive `--quiet` and output redirection.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: PerchTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            PerchTheme::new()
        } else {
            PerchTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }

    fn animated(&self) -> bool {
        self.mode.shows_spinners() && self.out.is_term()
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_step(current, total, title)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        writeln!(self.err, "  {}", self.theme.hint.apply_to(hint)).ok();
    }

    fn show_detail(&mut self, key: &str, value: &str) {
        if self.mode.shows_status() {
            writeln!(
                self.out,
                "  {:<16} {}",
                self.theme.key.apply_to(key),
                self.theme.dim.apply_to(value)
            )
            .ok();
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.animated() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            if self.mode.shows_status() {
                writeln!(self.out, "  {}", self.theme.dim.apply_to(message)).ok();
            }
            Box::new(LineSpinner {
                out: self.out.clone(),
                theme: self.theme.clone(),
                show: self.mode.shows_status(),
            })
        }
    }

    fn start_transfer(&mut self, message: &str, total: Option<u64>) -> Box<dyn TransferHandle> {
        if self.animated() {
            Box::new(TransferBar::new(message, total))
        } else {
            Box::new(TransferBar::hidden())
        }
    }
}

/// Spinner stand-in for non-TTY output: prints only the final line.
struct LineSpinner {
    out: Term,
    theme: PerchTheme,
    show: bool,
}

impl SpinnerHandle for LineSpinner {
    fn finish_success(&mut self, msg: &str) {
        if self.show {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn finish_error(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_error(msg)).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_terminal_does_not_panic() {
        let mut ui = TerminalUI::new(OutputMode::Quiet);
        ui.message("hidden");
        ui.show_step(1, 2, "hidden");
        let mut spinner = ui.start_spinner("working");
        spinner.finish_success("done");
        let mut transfer = ui.start_transfer("downloading", Some(10));
        transfer.advance(10);
        transfer.finish();
    }

    #[test]
    fn output_mode_is_reported() {
        let ui = TerminalUI::new(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
