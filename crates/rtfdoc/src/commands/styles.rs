//! `rtfdoc styles` command implementation.

use std::path::PathBuf;

use clap::Args;
use console::Term;
use rtfdoc_config::Config;
use rtfdoc_render::write_stylesheet;

use super::load_styles;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the styles command.
#[derive(Args)]
pub(crate) struct StylesArgs {
    /// Stylesheet to apply (overrides config).
    #[arg(long)]
    stylesheet: Option<PathBuf>,

    /// Write to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover rtfdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl StylesArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let stylesheet = self
            .stylesheet
            .or_else(|| config.style_resolved.stylesheet.clone());
        let styles = load_styles(stylesheet.as_deref(), &output)?;

        let mut rtf = String::new();
        write_stylesheet(&mut rtf, &styles);

        match self.output {
            Some(path) => {
                std::fs::write(&path, rtf)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => Term::stdout().write_str(&rtf)?,
        }
        Ok(())
    }
}
