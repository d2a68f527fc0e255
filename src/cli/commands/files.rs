//! Add and remove commands.
//!
//! Both edit a local template's manifest; remote templates are read-only
//! until pulled.

use crate::cli::args::{AddArgs, RemoveArgs};
use crate::error::Result;
use crate::template::LocalTemplateEngine;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::{resolve, show_batch_failures};

/// The add command implementation.
pub struct AddCommand {
    context: Context,
    args: AddArgs,
}

impl AddCommand {
    pub fn new(context: &Context, args: AddArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for AddCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;
        let source_dir = match &self.args.from {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let report =
            LocalTemplateEngine::new(&mut store).add_files(&name, &source_dir, &self.args.paths)?;

        if ui.output_mode().shows_details() {
            for file in &report.succeeded {
                ui.message(&format!("  + {}", file));
            }
        }
        show_batch_failures(ui, &report.failed);
        ui.success(&format!("Added {} file(s) to '{}'", report.succeeded.len(), name));

        Ok(CommandResult::from_batch(report.has_failures()))
    }
}

/// The remove command implementation.
pub struct RemoveCommand {
    context: Context,
    args: RemoveArgs,
}

impl RemoveCommand {
    pub fn new(context: &Context, args: RemoveArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        let report = LocalTemplateEngine::new(&mut store).remove_files(&name, &self.args.paths)?;

        if ui.output_mode().shows_details() {
            for file in &report.removed {
                ui.message(&format!("  - {}", file));
            }
        }
        for path in &report.unmatched {
            ui.warning(&format!("{} is not part of '{}'", path, name));
        }
        show_batch_failures(ui, &report.failed);
        ui.success(&format!("Removed {} file(s) from '{}'", report.removed.len(), name));

        Ok(CommandResult::from_batch(report.has_failures()))
    }
}
