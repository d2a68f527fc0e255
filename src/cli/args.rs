//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// brick - Save, organize and apply reusable file templates.
#[derive(Debug, Parser)]
#[command(name = "brick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct Cli {
    /// Storage root (defaults to ~/.brick)
    #[arg(long, global = true, env = "BRICK_HOME", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Assume yes for confirmations and never prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save files from a directory as a local template
    Save(SaveArgs),

    /// Register a GitHub directory as a remote template
    Link(LinkArgs),

    /// List templates
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show details for a template
    Info(InfoArgs),

    /// Show a template's files as a tree
    Tree(TemplateArgs),

    /// Write a template's files into a directory
    Apply(ApplyArgs),

    /// Add files to a local template
    Add(AddArgs),

    /// Remove files from a local template
    Remove(RemoveArgs),

    /// Delete a template
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Copy a template under a new name
    Clone(CopyArgs),

    /// Rename a template
    #[command(visible_alias = "mv")]
    Rename(CopyArgs),

    /// Edit tags and description
    Tag(TagArgs),

    /// Download a remote template into local storage
    Pull(TemplateArgs),

    /// Pin a remote template to the current commit of its ref
    Refresh(TemplateArgs),

    /// Write a template to a .tar.gz archive
    Export(ExportArgs),

    /// Register a template from an archive
    Import(ImportArgs),

    /// Strip project-relative imports from template files
    Clean(CleanArgs),

    /// Read and write settings
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// A single template selector (name or 1-based list index).
#[derive(Debug, Clone, clap::Args)]
pub struct TemplateArgs {
    /// Template name or list number
    pub template: String,
}

/// Arguments for the `save` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SaveArgs {
    /// Name for the new template
    pub name: String,

    /// Directory to save from (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Only save these files or directories (comma-separated, relative to --path)
    #[arg(long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Tags (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Extra file or directory names to skip (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Replace an existing template without asking
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `link` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LinkArgs {
    /// Name for the new template
    pub name: String,

    /// GitHub URL or owner/repo[/path][@ref]
    pub source: String,

    /// Pin to a commit SHA
    #[arg(long, value_name = "SHA")]
    pub commit: Option<String>,

    /// Description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Tags (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Replace an existing template without asking
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only templates with this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only local templates
    #[arg(long, conflicts_with = "remote")]
    pub local: bool,

    /// Only remote templates
    #[arg(long)]
    pub remote: bool,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InfoArgs {
    /// Template name or list number
    pub template: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `apply` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ApplyArgs {
    /// Template name or list number
    pub template: String,

    /// Destination directory (defaults to the current directory)
    pub destination: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(short, long, conflicts_with = "skip_existing")]
    pub force: bool,

    /// Keep existing files
    #[arg(short, long)]
    pub skip_existing: bool,

    /// Show what would be written without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `add` command.
#[derive(Debug, Clone, clap::Args)]
pub struct AddArgs {
    /// Template name or list number
    pub template: String,

    /// Files or directories to add
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Directory the paths are relative to (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub from: Option<PathBuf>,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RemoveArgs {
    /// Template name or list number
    pub template: String,

    /// Files or directories to remove
    #[arg(required = true)]
    pub paths: Vec<String>,
}

/// Arguments for the `delete` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DeleteArgs {
    /// Template name or list number
    pub template: String,

    /// Delete without asking
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for `clone` and `rename`.
#[derive(Debug, Clone, clap::Args)]
pub struct CopyArgs {
    /// Template name or list number
    pub template: String,

    /// New name
    pub new_name: String,
}

/// Arguments for the `tag` command.
#[derive(Debug, Clone, clap::Args)]
pub struct TagArgs {
    /// Template name or list number
    pub template: String,

    /// Tags to add (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub add: Vec<String>,

    /// Tags to remove (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub remove: Vec<String>,

    /// Replace the description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Arguments for the `export` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ExportArgs {
    /// Template name or list number
    pub template: String,

    /// Output file (defaults to <name>.tar.gz)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `import` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ImportArgs {
    /// Archive file
    pub file: PathBuf,

    /// Register under this name instead of the archived one
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for the `clean` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CleanArgs {
    /// Template name or list number
    pub template: String,

    /// Show what would be removed without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Settings operations.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show all settings
    #[command(visible_alias = "list")]
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one setting
    Get { key: String },
    /// Set a setting (JSON values are parsed, anything else is a string)
    Set { key: String, value: String },
    /// Remove a setting
    Unset { key: String },
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["brick", "list", "--json", "--root", "/tmp/b", "-y"]);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/b")));
        assert!(cli.yes);
        match cli.command {
            Commands::List(args) => assert!(args.json),
            other => panic!("Expected List, got {:?}", other),
        }
    }

    #[test]
    fn save_splits_comma_lists() {
        let cli = Cli::parse_from([
            "brick", "save", "demo", "--files", "a.ts,sub", "-t", "react,ui",
        ]);
        match cli.command {
            Commands::Save(args) => {
                assert_eq!(args.files, vec!["a.ts", "sub"]);
                assert_eq!(args.tags, vec!["react", "ui"]);
            }
            other => panic!("Expected Save, got {:?}", other),
        }
    }

    #[test]
    fn apply_rejects_force_with_skip() {
        let result = Cli::try_parse_from(["brick", "apply", "demo", "--force", "--skip-existing"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_set_takes_key_and_value() {
        let cli = Cli::parse_from(["brick", "config", "set", "githubToken", "abc"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Set { key, value },
            }) => {
                assert_eq!(key, "githubToken");
                assert_eq!(value, "abc");
            }
            other => panic!("Expected config set, got {:?}", other),
        }
    }
}
