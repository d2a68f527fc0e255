//! Tag command implementation.
//!
//! The `brick tag` command edits tags and the description. Without any
//! edit flags it prints the current tags.

use crate::cli::args::TagArgs;
use crate::error::Result;
use crate::template::{DetailsUpdate, LocalTemplateEngine};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::{format_tags, resolve};

/// The tag command implementation.
pub struct TagCommand {
    context: Context,
    args: TagArgs,
}

impl TagCommand {
    pub fn new(context: &Context, args: TagArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }

    fn has_edits(&self) -> bool {
        !self.args.add.is_empty() || !self.args.remove.is_empty() || self.args.description.is_some()
    }
}

impl Command for TagCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        if !self.has_edits() {
            let entry = store.entry(&name)?;
            ui.message(&format_tags(&entry.tags));
            return Ok(CommandResult::success());
        }

        let entry = LocalTemplateEngine::new(&mut store).update_details(
            &name,
            DetailsUpdate {
                add_tags: self.args.add.clone(),
                remove_tags: self.args.remove.clone(),
                description: self.args.description.clone(),
            },
        )?;
        ui.success(&format!("Updated '{}' (tags: {})", name, format_tags(&entry.tags)));
        Ok(CommandResult::success())
    }
}
