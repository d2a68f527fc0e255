//! Non-interactive UI for scripts, pipes and CI.

use std::collections::HashMap;

use crate::error::{BrickError, Result};

use super::{parse_yes, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Environment prefix for prompt answers, e.g. `BRICK_PROMPT_CONFLICT=overwrite`.
pub const PROMPT_ENV_PREFIX: &str = "BRICK_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `BRICK_PROMPT_<KEY>` environment variables,
/// then from the prompt's default. A prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn env_key(prompt_key: &str) -> String {
        let normalized: String = prompt_key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{}{}", PROMPT_ENV_PREFIX, normalized)
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self
            .env_overrides
            .get(&Self::env_key(&prompt.key))
            .or(prompt.default.as_ref())
            .cloned()
            .ok_or_else(|| BrickError::InvalidArgument {
                message: format!(
                    "cannot ask '{}' in non-interactive mode; set {}",
                    prompt.question,
                    Self::env_key(&prompt.key)
                ),
            })?;

        match prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(parse_yes(&answer))),
            _ => Ok(PromptResult::String(answer)),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            eprintln!("{}", message);
        }
        Box::new(NoopSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints only the final line.
struct NoopSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::PromptOption;

    fn ui_with(pairs: &[(&str, &str)]) -> NonInteractiveUI {
        let overrides = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NonInteractiveUI::with_overrides(OutputMode::Silent, overrides)
    }

    #[test]
    fn default_answers_prompt() {
        let mut ui = ui_with(&[]);
        let prompt = Prompt::confirm("delete", "Delete?", false);
        assert_eq!(ui.prompt(&prompt).unwrap(), PromptResult::Bool(false));
    }

    #[test]
    fn env_override_wins() {
        let mut ui = ui_with(&[("BRICK_PROMPT_CONFLICT", "overwrite")]);
        let prompt = Prompt::select(
            "conflict",
            "File exists",
            vec![PromptOption::new("Skip", "skip"), PromptOption::new("Overwrite", "overwrite")],
            "skip",
        );
        assert_eq!(
            ui.prompt(&prompt).unwrap(),
            PromptResult::String("overwrite".into())
        );
    }

    #[test]
    fn keys_are_normalized_for_env() {
        let mut ui = ui_with(&[("BRICK_PROMPT_NEW_NAME", "other")]);
        let prompt = Prompt::input("new-name", "New name", None);
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "other");
    }

    #[test]
    fn confirm_override_is_parsed() {
        let mut ui = ui_with(&[("BRICK_PROMPT_OVERWRITE", "yes")]);
        let prompt = Prompt::confirm("overwrite", "Overwrite?", false);
        assert!(ui.prompt(&prompt).unwrap().is_yes());
    }

    #[test]
    fn no_answer_is_error() {
        let mut ui = ui_with(&[]);
        let prompt = Prompt::input("name", "Name", None);
        assert!(ui.prompt(&prompt).is_err());
    }
}
