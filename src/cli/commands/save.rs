//! Save command implementation.
//!
//! The `brick save` command copies files from a directory into a new
//! local template.

use crate::cli::args::SaveArgs;
use crate::cli::decisions::confirm;
use crate::error::{BrickError, Result};
use crate::template::{LocalTemplateEngine, SaveRequest};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::show_batch_failures;

/// The save command implementation.
pub struct SaveCommand {
    context: Context,
    args: SaveArgs,
}

impl SaveCommand {
    pub fn new(context: &Context, args: SaveArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for SaveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = self.context.open_store()?;
        let settings = self.context.settings()?;
        let source_dir = match &self.args.path {
            Some(path) => path.clone(),
            None => std::env::current_dir()?,
        };

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

        let mut ignore = settings.ignore_names();
        ignore.extend(self.args.ignore.iter().cloned());

        let report = LocalTemplateEngine::new(&mut store).save(SaveRequest {
            name: self.args.name.clone(),
            source_dir: source_dir.clone(),
            files: self.args.files.clone(),
            description: self.args.description.clone(),
            tags: self.args.tags.clone(),
            ignore,
            overwrite,
        })?;

        if ui.output_mode().shows_details() {
            for file in &report.succeeded {
                ui.message(&format!("  + {}", file));
            }
        }
        show_batch_failures(ui, &report.failed);
        ui.success(&format!(
            "Saved '{}' from {} ({} file(s))",
            self.args.name,
            source_dir.display(),
            report.succeeded.len()
        ));

        Ok(CommandResult::from_batch(report.has_failures()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.ts"), "a").unwrap();
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.ts"), "b").unwrap();
        temp
    }

    fn args(name: &str, dir: &TempDir) -> SaveArgs {
        SaveArgs {
            name: name.to_string(),
            path: Some(dir.path().to_path_buf()),
            ..SaveArgs::default()
        }
    }

    #[test]
    fn save_registers_template() {
        let root = TempDir::new().unwrap();
        let src = project();
        let mut ui = MockUI::new();

        let result = SaveCommand::new(&Context::new(root.path(), false), args("demo", &src))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_success("Saved 'demo'"));
        let store = Store::open(root.path()).unwrap();
        assert_eq!(store.load_metadata("demo").unwrap().files, vec!["a.ts", "sub/b.ts"]);
    }

    #[test]
    fn existing_name_declined_is_error() {
        let root = TempDir::new().unwrap();
        let src = project();
        let ctx = Context::new(root.path(), false);
        SaveCommand::new(&ctx, args("demo", &src))
            .execute(&mut MockUI::new())
            .unwrap();

        let mut ui = MockUI::new();
        ui.set_prompt_response("overwrite", "no");
        let err = SaveCommand::new(&ctx, args("demo", &src))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, BrickError::AlreadyExists { .. }));
        assert_eq!(ui.prompts_shown(), ["overwrite"]);
    }

    #[test]
    fn existing_name_confirmed_is_replaced() {
        let root = TempDir::new().unwrap();
        let src = project();
        let ctx = Context::new(root.path(), false);
        SaveCommand::new(&ctx, args("demo", &src))
            .execute(&mut MockUI::new())
            .unwrap();

        let mut only_a = args("demo", &src);
        only_a.files = vec!["a.ts".into()];
        let mut ui = MockUI::new();
        ui.set_prompt_response("overwrite", "yes");
        SaveCommand::new(&ctx, only_a).execute(&mut ui).unwrap();

        let store = Store::open(root.path()).unwrap();
        assert_eq!(store.load_metadata("demo").unwrap().files, vec!["a.ts"]);
    }
}
