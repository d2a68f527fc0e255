//! Interactive answers for the engines' decision points.
//!
//! The engines never talk to the console. Commands hand them a
//! [`PromptResolver`], which turns each conflict into a UI prompt.

use std::path::Path;

use crate::archive::{ImportConflictResolver, ImportDecision};
use crate::error::{BrickError, Result};
use crate::store::validate_name;
use crate::template::{ConflictDecision, ConflictResolver};
use crate::ui::{Prompt, PromptOption, UserInterface};

/// Prompt key for per-file apply conflicts.
pub const CONFLICT_KEY: &str = "conflict";

/// Prompt key for import name collisions.
pub const IMPORT_CONFLICT_KEY: &str = "import-conflict";

/// Prompt key for the replacement name after choosing rename.
pub const NEW_NAME_KEY: &str = "new-name";

/// Resolves conflicts by asking the user.
pub struct PromptResolver<'u> {
    ui: &'u mut dyn UserInterface,
}

impl<'u> PromptResolver<'u> {
    pub fn new(ui: &'u mut dyn UserInterface) -> Self {
        Self { ui }
    }
}

impl ConflictResolver for PromptResolver<'_> {
    fn decide(&mut self, relative: &str, destination: &Path) -> Result<ConflictDecision> {
        let prompt = Prompt::select(
            CONFLICT_KEY,
            format!("{} already exists in {}", relative, destination.display()),
            vec![
                PromptOption::new("Skip", "skip"),
                PromptOption::new("Overwrite", "overwrite"),
                PromptOption::new("Cancel remaining", "cancel"),
            ],
            "skip",
        );

        Ok(match self.ui.prompt(&prompt)?.as_string().as_str() {
            "overwrite" => ConflictDecision::Overwrite,
            "cancel" => ConflictDecision::Cancel,
            _ => ConflictDecision::Skip,
        })
    }
}

impl ImportConflictResolver for PromptResolver<'_> {
    fn on_conflict(&mut self, name: &str) -> Result<ImportDecision> {
        let prompt = Prompt::select(
            IMPORT_CONFLICT_KEY,
            format!("A template named '{}' already exists", name),
            vec![
                PromptOption::new("Overwrite", "overwrite"),
                PromptOption::new("Import under another name", "rename"),
                PromptOption::new("Cancel", "cancel"),
            ],
            "cancel",
        );

        match self.ui.prompt(&prompt)?.as_string().as_str() {
            "overwrite" => Ok(ImportDecision::Overwrite),
            "rename" => {
                let answer = self
                    .ui
                    .prompt(&Prompt::input(NEW_NAME_KEY, "New name", None))?
                    .as_string();
                let new_name = answer.trim().to_string();
                validate_name(&new_name)?;
                Ok(ImportDecision::Rename(new_name))
            }
            _ => Ok(ImportDecision::Cancel),
        }
    }
}

/// Ask a yes/no question; `--yes` answers without prompting.
pub fn confirm(
    ui: &mut dyn UserInterface,
    assume_yes: bool,
    key: &str,
    question: &str,
) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(ui.prompt(&Prompt::confirm(key, question, false))?.is_yes())
}

/// Like [`confirm`], but a "no" becomes [`BrickError::Cancelled`].
pub fn require_confirmation(
    ui: &mut dyn UserInterface,
    assume_yes: bool,
    key: &str,
    question: &str,
) -> Result<()> {
    if confirm(ui, assume_yes, key, question)? {
        Ok(())
    } else {
        Err(BrickError::Cancelled)
    }
}
