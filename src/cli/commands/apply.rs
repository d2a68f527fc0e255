//! Apply command implementation.
//!
//! The `brick apply` command writes a template's files into a directory.
//! Conflicts are resolved by `--force`/`--skip-existing` or, without
//! either, by asking per file.

use crate::cli::args::ApplyArgs;
use crate::cli::decisions::PromptResolver;
use crate::error::Result;
use crate::template::{ApplyEngine, ApplyOptions, ApplyReport, FileAction};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::resolve;

/// The apply command implementation.
pub struct ApplyCommand {
    context: Context,
    args: ApplyArgs,
}

impl ApplyCommand {
    pub fn new(context: &Context, args: ApplyArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }

    fn show_report(&self, ui: &mut dyn UserInterface, report: &ApplyReport) {
        let verbose = ui.output_mode().shows_details() || report.dry_run;
        for outcome in &report.files {
            match &outcome.action {
                FileAction::Failed(error) => {
                    ui.warning(&format!("{}: {}", outcome.path, error));
                }
                action if verbose || outcome.conflict => {
                    ui.message(&format!("  {:<11} {}", label(action), outcome.path));
                }
                _ => {}
            }
        }

        let verb = if report.dry_run { "Would write" } else { "Wrote" };
        let summary = format!(
            "{} {} file(s) to {}",
            verb,
            report.written(),
            report.destination.display()
        );
        if report.cancelled {
            ui.warning(&format!("{} (cancelled, remaining conflicts untouched)", summary));
        } else {
            ui.success(&summary);
        }
    }
}

fn label(action: &FileAction) -> &'static str {
    match action {
        FileAction::Created => "create",
        FileAction::Overwritten => "overwrite",
        FileAction::Skipped => "skip",
        FileAction::Cancelled => "cancelled",
        FileAction::Pending => "conflict",
        FileAction::Failed(_) => "failed",
    }
}

impl Command for ApplyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let options =
            ApplyOptions::from_flags(self.args.force, self.args.skip_existing, self.args.dry_run)?;
        let destination = match &self.args.destination {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;
        let fetcher = self.context.fetcher()?;
        let engine = ApplyEngine::new(&store, &fetcher);

        let report = {
            let mut resolver = PromptResolver::new(ui);
            engine.apply(&name, &destination, options, &mut resolver)?
        };

        self.show_report(ui, &report);
        Ok(CommandResult::from_batch(report.has_failures()))
    }
}
