//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for scripts, pipes and CI
//! - [`MockUI`] for tests
//! - Prompts, spinners and tables
//!
//! # Example
//!
//! ```
//! use brick::ui::{create_ui, OutputMode};
//!
//! // Non-interactive mode never blocks on input
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("brick");
//! ui.success("Saved template");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use table::Table;
pub use terminal::{create_ui, create_ui_with_colors, TerminalUI};
pub use theme::{should_use_colors, BrickTheme};

use crate::error::Result;

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

    /// Show a prompt and get user input.
    ///
    /// Returns [`BrickError::Cancelled`](crate::error::BrickError::Cancelled)
    /// when the user aborts the prompt.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key, also used for `BRICK_PROMPT_<KEY>` overrides.
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    pub fn confirm(key: &str, question: impl Into<String>, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            prompt_type: PromptType::Confirm,
            default: Some(default.to_string()),
        }
    }

    pub fn input(key: &str, question: impl Into<String>, default: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            prompt_type: PromptType::Input,
            default: default.map(String::from),
        }
    }

    pub fn select(
        key: &str,
        question: impl Into<String>,
        options: Vec<PromptOption>,
        default: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            prompt_type: PromptType::Select { options },
            default: Some(default.to_string()),
        }
    }
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

impl PromptOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or select.
    String(String),
}

impl PromptResult {
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Interpret as a yes/no answer.
    ///
    /// String answers such as `"yes"`, `"y"` and `"true"` count as yes.
    pub fn is_yes(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => parse_yes(s),
        }
    }
}

pub(crate) fn parse_yes(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}
