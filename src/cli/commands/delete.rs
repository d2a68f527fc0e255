//! Delete command implementation.

use crate::cli::args::DeleteArgs;
use crate::cli::decisions::require_confirmation;
use crate::error::Result;
use crate::template::LocalTemplateEngine;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::resolve;

/// The delete command implementation.
pub struct DeleteCommand {
    context: Context,
    args: DeleteArgs,
}

impl DeleteCommand {
    pub fn new(context: &Context, args: DeleteArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for DeleteCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        require_confirmation(
            ui,
            self.args.force || self.context.assume_yes(),
            "delete",
            &format!("Delete template '{}'?", name),
        )?;

        let entry = LocalTemplateEngine::new(&mut store).delete(&name)?;
        ui.success(&format!("Deleted {} template '{}'", entry.kind(), name));
        Ok(CommandResult::success())
    }
}
