//! Pull and refresh commands for remote templates.

use crate::cli::args::TemplateArgs;
use crate::error::Result;
use crate::remote::RemoteFetcher;
use crate::template::LocalTemplateEngine;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::resolve;

/// The pull command implementation.
pub struct PullCommand {
    context: Context,
    args: TemplateArgs,
}

impl PullCommand {
    pub fn new(context: &Context, args: TemplateArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }

    /// Pull with an explicit fetcher.
    pub fn run_with(
        &self,
        ui: &mut dyn UserInterface,
        fetcher: &dyn RemoteFetcher,
    ) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        let mut spinner = ui.start_spinner(&format!("Pulling {}", name));
        match LocalTemplateEngine::new(&mut store).pull(&name, fetcher) {
            Ok(metadata) => {
                spinner.finish_success(&format!(
                    "Pulled '{}' ({} file(s)); it is now local",
                    name,
                    metadata.files.len()
                ));
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error(&format!("Pull of '{}' failed", name));
                Err(e)
            }
        }
    }
}

impl Command for PullCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let fetcher = self.context.fetcher()?;
        self.run_with(ui, &fetcher)
    }
}

/// The refresh command implementation.
pub struct RefreshCommand {
    context: Context,
    args: TemplateArgs,
}

impl RefreshCommand {
    pub fn new(context: &Context, args: TemplateArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }

    /// Refresh with an explicit fetcher.
    pub fn run_with(
        &self,
        ui: &mut dyn UserInterface,
        fetcher: &dyn RemoteFetcher,
    ) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        let sha = LocalTemplateEngine::new(&mut store).refresh(&name, fetcher)?;
        ui.success(&format!("Pinned '{}' to {}", name, sha));
        Ok(CommandResult::success())
    }
}

impl Command for RefreshCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let fetcher = self.context.fetcher()?;
        self.run_with(ui, &fetcher)
    }
}
