//! Link command implementation.
//!
//! The `brick link` command registers a GitHub directory as a remote
//! template without downloading anything.

use crate::cli::args::LinkArgs;
use crate::cli::decisions::confirm;
use crate::error::{BrickError, Result};
use crate::remote::RemoteRef;
use crate::template::{LinkRequest, LocalTemplateEngine};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};

/// The link command implementation.
pub struct LinkCommand {
    context: Context,
    args: LinkArgs,
}

impl LinkCommand {
    pub fn new(context: &Context, args: LinkArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for LinkCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut remote = RemoteRef::parse(&self.args.source)?;
        if let Some(sha) = &self.args.commit {
            remote = remote.with_commit(sha.clone());
        }

        let mut store = self.context.open_store()?;
        let mut overwrite = self.args.force;
        if !overwrite && store.registry().contains(&self.args.name) {
            overwrite = confirm(
                ui,
                self.context.assume_yes(),
                "overwrite",
                &format!("Template '{}' already exists. Replace it?", self.args.name),
            )?;
            if !overwrite {
                return Err(BrickError::AlreadyExists {
                    name: self.args.name.clone(),
                });
            }
        }

        let display = remote.to_string();
        LocalTemplateEngine::new(&mut store).link(LinkRequest {
            name: self.args.name.clone(),
            remote,
            description: self.args.description.clone(),
            tags: self.args.tags.clone(),
            overwrite,
        })?;

        ui.success(&format!("Linked '{}' to {}", self.args.name, display));
        Ok(CommandResult::success())
    }
}
