//! Config command implementation.
//!
//! The `brick config` command reads and writes `config.json` in the
//! storage root. Unknown keys are kept as they are.

use std::collections::BTreeMap;

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::error::Result;
use crate::store::Settings;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Context};
use super::display::to_json;

/// The config command implementation.
pub struct ConfigCommand {
    context: Context,
    args: ConfigArgs,
}

impl ConfigCommand {
    pub fn new(context: &Context, args: ConfigArgs) -> Self {
        Self {
            context: context.clone(),
            args,
        }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut settings = self.context.settings()?;

        match &self.args.action {
            ConfigAction::Show { json } => {
                let shown: BTreeMap<&str, String> = settings
                    .iter()
                    .map(|(key, value)| (key, Settings::display_value(key, value)))
                    .collect();
                if *json {
                    ui.message(&to_json(&shown)?);
                } else if shown.is_empty() {
                    ui.message(&format!("No settings in {}", settings.path().display()));
                } else {
                    for (key, value) in &shown {
                        ui.message(&format!("{} = {}", key, value));
                    }
                }
                Ok(CommandResult::success())
            }
            ConfigAction::Get { key } => match settings.get(key) {
                Some(value) => {
                    ui.message(&Settings::display_value(key, value));
                    Ok(CommandResult::success())
                }
                None => {
                    ui.error(&format!("{} is not set", key));
                    Ok(CommandResult::failure(1))
                }
            },
            ConfigAction::Set { key, value } => {
                settings.set(key, value);
                settings.save()?;
                ui.success(&format!("Set {}", key));
                Ok(CommandResult::success())
            }
            ConfigAction::Unset { key } => {
                if settings.unset(key).is_some() {
                    settings.save()?;
                    ui.success(&format!("Removed {}", key));
                } else {
                    ui.warning(&format!("{} was not set", key));
                }
                Ok(CommandResult::success())
            }
        }
    }
}
