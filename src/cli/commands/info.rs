//! Info and tree commands.
//!
//! `brick info` shows a template's registry entry and metadata, plus any
//! disagreement between the registry, `brick.json` and the files on disk.
//! `brick tree` prints the manifest as a directory tree.

use serde::Serialize;

use crate::cli::args::{InfoArgs, TemplateArgs};
use crate::error::Result;
use crate::remote::RemoteFetcher;
use crate::store::{RegistryEntry, Storage, TemplateMetadata};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::{format_tags, location, render_tree, resolve, theme, to_json};

/// The info command implementation.
pub struct InfoCommand {
    context: Context,
    args: InfoArgs,
}

#[derive(Serialize)]
struct InfoJson<'a> {
    name: &'a str,
    entry: &'a RegistryEntry,
    metadata: Option<&'a TemplateMetadata>,
    issues: Vec<String>,
}

impl InfoCommand {
    pub fn new(context: &Context, args: InfoArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;
        let info = store.inspect(&name)?;

        if self.args.json {
            let json = InfoJson {
                name: &info.name,
                entry: &info.entry,
                metadata: info.metadata.as_ref(),
                issues: info.issues.iter().map(ToString::to_string).collect(),
            };
            ui.message(&to_json(&json)?);
            return Ok(CommandResult::success());
        }

        let theme = theme();
        let entry = &info.entry;
        ui.show_header(&info.name);
        ui.message(&theme.format_field("Type", &entry.kind().to_string()));
        ui.message(&theme.format_field("Location", &location(entry)));
        if let Storage::Remote(remote) = &entry.storage {
            ui.message(&theme.format_field("Revision", remote.revision()));
        }
        if !entry.description.is_empty() {
            ui.message(&theme.format_field("Description", &entry.description));
        }
        ui.message(&theme.format_field("Tags", &format_tags(&entry.tags)));
        ui.message(&theme.format_field("Created", &entry.created_at.to_rfc3339()));
        ui.message(&theme.format_field("Updated", &entry.updated_at.to_rfc3339()));

        if let Some(metadata) = &info.metadata {
            ui.message(&theme.format_field("Version", &metadata.version));
            let source = if metadata.source.path.is_empty() {
                metadata.source.origin.clone()
            } else {
                format!("{} ({})", metadata.source.origin, metadata.source.path)
            };
            ui.message(&theme.format_field("Source", &source));
            ui.message(&theme.format_field("Files", &metadata.files.len().to_string()));
            for file in &metadata.files {
                ui.message(&format!("  {}", file));
            }
            for (label, deps) in [
                ("Dependencies", &metadata.dependencies),
                ("Dev dependencies", &metadata.dev_dependencies),
            ] {
                if deps.is_empty() {
                    continue;
                }
                ui.message(&theme.format_field(label, &deps.len().to_string()));
                for (package, version) in deps {
                    ui.message(&format!("  {}@{}", package, version));
                }
            }
        }

        for issue in &info.issues {
            ui.warning(&issue.to_string());
        }

        Ok(CommandResult::success())
    }
}

/// The tree command implementation.
pub struct TreeCommand {
    context: Context,
    args: TemplateArgs,
}

impl TreeCommand {
    pub fn new(context: &Context, args: TemplateArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for TreeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        let files = match &store.entry(&name)?.storage {
            Storage::Local { .. } => store.load_metadata(&name)?.files,
            Storage::Remote(remote) => {
                let fetcher = self.context.fetcher()?;
                let mut spinner = ui.start_spinner(&format!("Listing {}", remote));
                match fetcher.list_files(remote) {
                    Ok(files) => {
                        spinner.finish_success(&format!("{} file(s)", files.len()));
                        files
                    }
                    Err(e) => {
                        spinner.finish_error("Listing failed");
                        return Err(e);
                    }
                }
            }
        };

        ui.message(&format!("{}/", name));
        for line in render_tree(&files) {
            ui.message(&format!("  {}", line));
        }
        Ok(CommandResult::success())
    }
}
