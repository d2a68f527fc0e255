//! Clone and rename commands.

use crate::cli::args::CopyArgs;
use crate::error::Result;
use crate::template::LocalTemplateEngine;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::resolve;

/// The clone command implementation.
pub struct CloneCommand {
    context: Context,
    args: CopyArgs,
}

impl CloneCommand {
    pub fn new(context: &Context, args: CopyArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for CloneCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        LocalTemplateEngine::new(&mut store).clone_template(&name, &self.args.new_name)?;
        ui.success(&format!("Cloned '{}' as '{}'", name, self.args.new_name));
        Ok(CommandResult::success())
    }
}

/// The rename command implementation.
pub struct RenameCommand {
    context: Context,
    args: CopyArgs,
}

impl RenameCommand {
    pub fn new(context: &Context, args: CopyArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for RenameCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        LocalTemplateEngine::new(&mut store).rename(&name, &self.args.new_name)?;
        ui.success(&format!("Renamed '{}' to '{}'", name, self.args.new_name));
        Ok(CommandResult::success())
    }
}
