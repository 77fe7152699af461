//! rtfdoc CLI - RTF documentation renderer.
//!
//! Provides commands for:
//! - `render`: Render a JSON documentation tree to RTF
//! - `styles`: Print the effective RTF stylesheet

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, StylesArgs};
use output::Output;

/// rtfdoc - RTF documentation renderer.
#[derive(Parser)]
#[command(name = "rtfdoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a documentation tree to RTF.
    Render(RenderArgs),
    /// Print the stylesheet group with all overrides applied.
    Styles(StylesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = match &cli.command {
        Commands::Render(args) => args.verbose,
        Commands::Styles(args) => args.verbose,
    };
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Styles(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
