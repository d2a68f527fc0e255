//! Clean command implementation.
//!
//! The `brick clean` command strips project-relative import lines from a
//! local template's files.

use crate::cli::args::CleanArgs;
use crate::error::Result;
use crate::template::{CleanRules, LocalTemplateEngine};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::resolve;

/// The clean command implementation.
pub struct CleanCommand {
    context: Context,
    args: CleanArgs,
}

impl CleanCommand {
    pub fn new(context: &Context, args: CleanArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for CleanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let name = resolve(&store, &self.args.template)?;

        let report = LocalTemplateEngine::new(&mut store).clean(
            &name,
            &CleanRules::builtin(),
            self.args.dry_run,
        )?;

        if report.files.is_empty() {
            ui.message(&format!("Nothing to clean in '{}'", name));
            return Ok(CommandResult::success());
        }

        for file in &report.files {
            ui.message(&file.path);
            for line in &file.dropped {
                ui.message(&format!("  - {}", line.trim()));
            }
        }

        let verb = if report.dry_run { "Would remove" } else { "Removed" };
        ui.success(&format!(
            "{} {} import line(s) from {} file(s)",
            verb,
            report.dropped_lines(),
            report.files.len()
        ));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::template::SaveRequest;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dry_run_lists_lines_without_writing() {
        let root = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        fs::write(
            src.path().join("app.py"),
            "from .models import User\nimport os\n",
        )
        .unwrap();
        let mut store = Store::open(root.path()).unwrap();
        LocalTemplateEngine::new(&mut store)
            .save(SaveRequest {
                name: "py".into(),
                source_dir: src.path().to_path_buf(),
                ..SaveRequest::default()
            })
            .unwrap();

        let mut ui = MockUI::new();
        CleanCommand::new(
            &Context::new(root.path(), false),
            CleanArgs {
                template: "py".into(),
                dry_run: true,
            },
        )
        .execute(&mut ui)
        .unwrap();

        assert!(ui.has_message("- from .models import User"));
        assert!(ui.has_success("Would remove 1 import line(s)"));
        let saved = fs::read_to_string(root.path().join("templates/py/app.py")).unwrap();
        assert!(saved.contains("from .models"));
    }
}
