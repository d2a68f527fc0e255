//! Interactive prompts.

use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::io::ErrorKind;

use crate::error::{BrickError, Result};

use super::{parse_yes, Prompt, PromptOption, PromptResult, PromptType};

/// Convert dialoguer errors; an interrupted prompt is a cancellation.
fn map_dialoguer_err(e: dialoguer::Error) -> BrickError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == ErrorKind::Interrupted => BrickError::Cancelled,
        other => BrickError::Io(other.into()),
    }
}

/// Prompt the user on `term`.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let theme = ColorfulTheme::default();
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term, &theme),
        PromptType::Input => prompt_input(prompt, term, &theme),
        PromptType::Select { options } => prompt_select(prompt, options, term, &theme),
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term, theme: &ColorfulTheme) -> Result<PromptResult> {
    let default = prompt.default.as_deref().map(parse_yes).unwrap_or(false);

    let result = Confirm::with_theme(theme)
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_input(prompt: &Prompt, term: &Term, theme: &ColorfulTheme) -> Result<PromptResult> {
    let input = Input::<String>::with_theme(theme).with_prompt(&prompt.question);

    let result: String = match &prompt.default {
        Some(default) => input
            .default(default.clone())
            .interact_on(term)
            .map_err(map_dialoguer_err)?,
        None => input.interact_on(term).map_err(map_dialoguer_err)?,
    };

    Ok(PromptResult::String(result))
}

fn prompt_select(
    prompt: &Prompt,
    options: &[PromptOption],
    term: &Term,
    theme: &ColorfulTheme,
) -> Result<PromptResult> {
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let selection = Select::with_theme(theme)
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    options
        .get(selection)
        .map(|o| PromptResult::String(o.value.clone()))
        .ok_or(BrickError::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn interrupted_prompt_is_cancellation() {
        let err = map_dialoguer_err(dialoguer::Error::IO(io::Error::new(
            ErrorKind::Interrupted,
            "ctrl-c",
        )));
        assert!(matches!(err, BrickError::Cancelled));
    }

    #[test]
    fn other_prompt_errors_are_io() {
        let err = map_dialoguer_err(dialoguer::Error::IO(io::Error::new(
            ErrorKind::BrokenPipe,
            "closed",
        )));
        assert!(matches!(err, BrickError::Io(_)));
    }
}
