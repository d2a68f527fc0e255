//! brick CLI entry point.

use std::process::ExitCode;

use brick::cli::{Cli, CommandDispatcher};
use brick::store::StorePaths;
use brick::ui::{create_ui_with_colors, should_use_colors, OutputMode};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("brick=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brick=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("brick starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    let colors = !cli.no_color && should_use_colors();
    if !colors {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let root = cli.root.clone().unwrap_or_else(StorePaths::default_root);
    tracing::debug!("Using storage root {}", root.display());

    // --yes never prompts
    let mut ui = create_ui_with_colors(!cli.yes, output_mode, colors);

    let dispatcher = CommandDispatcher::new(root, cli.yes);
    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
