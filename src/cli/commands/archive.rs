//! Export and import commands.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use crate::archive::{ArchiveBridge, ImportRequest, TarGzCodec};
use crate::cli::args::{ExportArgs, ImportArgs};
use crate::cli::decisions::PromptResolver;
use crate::error::Result;
use crate::store::atomic::temp_path_for;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::resolve;

/// The export command implementation.
pub struct ExportCommand {
    context: Context,
    args: ExportArgs,
}

impl ExportCommand {
    pub fn new(context: &Context, args: ExportArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for ExportCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;
        let output = self
            .args
            .output
            .clone()
            .unwrap_or_else(|| format!("{}.tar.gz", name).into());

        let codec = TarGzCodec::new();
        let bridge = ArchiveBridge::new(&mut store, &codec);

        // A failed export leaves no partial archive behind.
        let partial = temp_path_for(&output);
        let mut writer = BufWriter::new(File::create(&partial)?);
        let exported = bridge.export(&name, &mut writer).and_then(|summary| {
            writer.flush()?;
            Ok(summary)
        });
        drop(writer);
        let summary = match exported {
            Ok(summary) => summary,
            Err(e) => {
                let _ = std::fs::remove_file(&partial);
                return Err(e);
            }
        };
        std::fs::rename(&partial, &output)?;

        for file in &summary.missing {
            ui.warning(&format!("{} is missing on disk and was not exported", file));
        }
        ui.success(&format!(
            "Exported '{}' ({} file(s)) to {}",
            name,
            summary.files.len(),
            output.display()
        ));
        Ok(CommandResult::success())
    }
}

/// The import command implementation.
pub struct ImportCommand {
    context: Context,
    args: ImportArgs,
}

impl ImportCommand {
    pub fn new(context: &Context, args: ImportArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for ImportCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let label = self
            .args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.args.file.display().to_string());
        let mut reader = BufReader::new(File::open(&self.args.file)?);

        let codec = TarGzCodec::new();
        let summary = {
            let mut bridge = ArchiveBridge::new(&mut store, &codec);
            let mut resolver = PromptResolver::new(ui);
            bridge.import(
                &mut reader,
                ImportRequest {
                    name: self.args.name.clone(),
                    label,
                },
                &mut resolver,
            )?
        };

        let verb = if summary.replaced { "Replaced" } else { "Imported" };
        ui.success(&format!(
            "{} '{}' ({} file(s))",
            verb,
            summary.name,
            summary.files.len()
        ));
        Ok(CommandResult::success())
    }
}
