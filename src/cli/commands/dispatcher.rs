//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`Context`] for the state every command shares
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::remote::GitHubFetcher;
use crate::store::{Settings, Store, StorePaths};
use crate::ui::UserInterface;

/// Environment variable overriding the GitHub API base URL.
pub const API_URL_ENV: &str = "BRICK_GITHUB_API_URL";

/// Environment variable consulted for a token when settings have none.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Exit code for a batch that finished with per-file failures.
    pub const PARTIAL_FAILURE: i32 = 2;

    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success, or [`Self::PARTIAL_FAILURE`] when `has_failures` is set.
    pub fn from_batch(has_failures: bool) -> Self {
        if has_failures {
            Self::failure(Self::PARTIAL_FAILURE)
        } else {
            Self::success()
        }
    }
}

/// Shared state for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    root: PathBuf,
    assume_yes: bool,
}

impl Context {
    pub fn new(root: impl Into<PathBuf>, assume_yes: bool) -> Self {
        Self {
            root: root.into(),
            assume_yes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `--yes` was given.
    pub fn assume_yes(&self) -> bool {
        self.assume_yes
    }

    pub fn open_store(&self) -> Result<Store> {
        Store::open(&self.root)
    }

    pub fn settings(&self) -> Result<Settings> {
        Settings::load(&StorePaths::new(&self.root))
    }

    /// GitHub client using the configured token and base URL.
    ///
    /// The token comes from `githubToken` in settings, then `GITHUB_TOKEN`.
    pub fn fetcher(&self) -> Result<GitHubFetcher> {
        let settings = self.settings()?;
        let token = settings
            .github_token()
            .map(String::from)
            .or_else(|| std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()));

        let fetcher = GitHubFetcher::with_timeout(token, Duration::from_secs(30))?;
        Ok(match std::env::var(API_URL_ENV) {
            Ok(url) if !url.is_empty() => fetcher.with_base_url(url),
            _ => fetcher,
        })
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: Context,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given storage root.
    pub fn new(root: PathBuf, assume_yes: bool) -> Self {
        Self {
            context: Context::new(root, assume_yes),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = &self.context;
        match &cli.command {
            Commands::Save(args) => super::save::SaveCommand::new(ctx, args.clone()).execute(ui),
            Commands::Link(args) => super::link::LinkCommand::new(ctx, args.clone()).execute(ui),
            Commands::List(args) => super::list::ListCommand::new(ctx, args.clone()).execute(ui),
            Commands::Info(args) => super::info::InfoCommand::new(ctx, args.clone()).execute(ui),
            Commands::Tree(args) => super::info::TreeCommand::new(ctx, args.clone()).execute(ui),
            Commands::Apply(args) => {
                super::apply::ApplyCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Add(args) => super::files::AddCommand::new(ctx, args.clone()).execute(ui),
            Commands::Remove(args) => {
                super::files::RemoveCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Delete(args) => {
                super::delete::DeleteCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Clone(args) => {
                super::identity::CloneCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Rename(args) => {
                super::identity::RenameCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Tag(args) => super::tag::TagCommand::new(ctx, args.clone()).execute(ui),
            Commands::Pull(args) => super::remote::PullCommand::new(ctx, args.clone()).execute(ui),
            Commands::Refresh(args) => {
                super::remote::RefreshCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Export(args) => {
                super::archive::ExportCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Import(args) => {
                super::archive::ImportCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Clean(args) => super::clean::CleanCommand::new(ctx, args.clone()).execute(ui),
            Commands::Config(args) => {
                super::config::ConfigCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
