//! CLI error types.

use rtfdoc_config::ConfigError;
use rtfdoc_render::RenderError;
use rtfdoc_style::StyleError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Style(#[from] StyleError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("Invalid documentation tree: {0}")]
    Tree(#[from] serde_json::Error),
}
