//! `rtfdoc render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use rtfdoc_config::{CliSettings, Config};
use rtfdoc_render::{RenderError, Services, render_document, render_standalone};
use rtfdoc_tree::DocNode;

use super::{format_config, rasterizer};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Documentation tree in JSON form.
    input: PathBuf,

    /// Output file (default: <output dir>/<input stem>.rtf).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write only the body fragment, without document header and tables.
    #[arg(long)]
    fragment: bool,

    /// Directory for diagram sources and images (overrides config).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Render cross-references as bold text instead of hyperlinks.
    #[arg(long)]
    no_hyperlinks: bool,

    /// Keep intermediate diagram source files.
    #[arg(long)]
    keep_intermediate: bool,

    /// Image format for dot graphs (overrides config).
    #[arg(long)]
    image_format: Option<String>,

    /// Language of code without an explicit one (overrides config).
    #[arg(long)]
    language: Option<String>,

    /// Path to configuration file (default: auto-discover rtfdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir.clone(),
            hyperlinks: self.no_hyperlinks.then_some(false),
            cleanup: self.keep_intermediate.then_some(false),
            image_format: self.image_format.clone(),
            language: self.language.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let format = format_config(&config, &output)?;
        let services = Services::default().with_rasterizer(rasterizer(&config));

        let content = std::fs::read_to_string(&self.input)?;
        let tree: DocNode = serde_json::from_str(&content)?;
        tracing::info!(
            input = %self.input.display(),
            nodes = tree.node_count(),
            "Loaded documentation tree"
        );

        let mut rtf = String::new();
        let result = if self.fragment {
            render_document(&tree, &mut rtf, &format, &services)?
        } else {
            render_standalone(&tree, &mut rtf, &format, &services)?
        };

        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        let target = self
            .output
            .unwrap_or_else(|| default_output(&config.output_dir, &self.input));
        write_output(&target, &rtf)?;

        if !result.images.is_empty() {
            output.info(&format!("Generated {} diagram image(s)", result.images.len()));
        }
        output.success(&format!("Wrote {}", target.display()));
        Ok(())
    }
}

/// `<output_dir>/<input stem>.rtf`.
fn default_output(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "refman".into(), |s| s.to_string_lossy());
    output_dir.join(format!("{stem}.rtf"))
}

fn write_output(path: &Path, rtf: &str) -> Result<(), RenderError> {
    let io_error = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, rtf).map_err(io_error)
}
