//! List command implementation.
//!
//! The `brick list` command shows registered templates in registry order.
//! Numbers in the first column are the 1-based indexes other commands
//! accept in place of a name; filtering never renumbers.

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::store::{RegistryEntry, TemplateKind};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult, Context};
use super::display::{format_tags, to_json};

/// The list command implementation.
pub struct ListCommand {
    context: Context,
    args: ListArgs,
}

#[derive(Serialize)]
struct Listed<'a> {
    index: usize,
    name: &'a str,
    #[serde(flatten)]
    entry: &'a RegistryEntry,
}

impl ListCommand {
    pub fn new(context: &Context, args: ListArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }

    fn matches(&self, entry: &RegistryEntry) -> bool {
        if self.args.local && entry.kind() != TemplateKind::Local {
            return false;
        }
        if self.args.remote && entry.kind() != TemplateKind::Remote {
            return false;
        }
        match &self.args.tag {
            Some(tag) => entry.tags.contains(tag),
            None => true,
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = self.context.open_store()?;
        let listed: Vec<Listed<'_>> = store
            .registry()
            .list()
            .enumerate()
            .filter(|(_, (_, entry))| self.matches(entry))
            .map(|(i, (name, entry))| Listed {
                index: i + 1,
                name,
                entry,
            })
            .collect();

        if self.args.json {
            ui.message(&to_json(&listed)?);
            return Ok(CommandResult::success());
        }

        if listed.is_empty() {
            if store.registry().is_empty() {
                ui.message("No templates yet. Save one with `brick save <name>`.");
            } else {
                ui.message("No templates match.");
            }
            return Ok(CommandResult::success());
        }

        let mut table = Table::new(&["#", "Name", "Type", "Tags", "Description"]);
        for item in &listed {
            table.add_row(&[
                item.index.to_string(),
                item.name.to_string(),
                item.entry.kind().to_string(),
                format_tags(&item.entry.tags),
                item.entry.description.clone(),
            ]);
        }
        ui.message(&table.render());

        Ok(CommandResult::success())
    }
}
