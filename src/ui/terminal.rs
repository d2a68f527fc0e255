//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_user, should_use_colors, BrickTheme, NonInteractiveUI, OutputMode, ProgressSpinner,
    Prompt, PromptResult, SpinnerHandle, UserInterface,
};

/// Interactive terminal UI implementation.
///
/// Normal output goes to stdout; warnings and errors go to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: BrickTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self::with_colors(mode, should_use_colors())
    }

    pub fn with_colors(mode: OutputMode, colors: bool) -> Self {
        let theme = if colors {
            BrickTheme::new()
        } else {
            BrickTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
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
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.err)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.err.is_term()
    }
}

/// Create the UI for this process.
///
/// Falls back to [`NonInteractiveUI`] when `interactive` is false or stdin
/// and stderr are not both terminals.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    create_ui_with_colors(interactive, mode, should_use_colors())
}

/// Like [`create_ui`] with explicit color control (`--no-color`).
pub fn create_ui_with_colors(
    interactive: bool,
    mode: OutputMode,
    colors: bool,
) -> Box<dyn UserInterface> {
    let attended = Term::stderr().is_term() && console::user_attended_stderr();
    if interactive && attended {
        Box::new(TerminalUI::with_colors(mode, colors))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
