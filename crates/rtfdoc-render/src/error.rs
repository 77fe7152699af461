//! Fatal render errors.
//!
//! Content problems (unknown symbols, missing highlighters, failed diagram
//! tools) are not errors: they end up in [`RenderResult::warnings`] and the
//! render continues. The variants here abort the render because the output
//! would be structurally wrong.
//!
//! [`RenderResult::warnings`]: crate::RenderResult::warnings

use std::path::PathBuf;

use rtfdoc_style::StyleName;

use crate::state::StateDepth;

/// Error that aborts a render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The style table lacks an entry the renderer needs.
    #[error("No RTF style {name} at indent level {level}")]
    MissingStyle {
        /// Style name.
        name: StyleName,
        /// Indent level at the time of the lookup.
        level: usize,
    },
    /// More hidden-region pops than pushes.
    #[error("Hidden stack underflow")]
    HiddenStackUnderflow,
    /// More indent pops than pushes.
    #[error("Indent stack underflow")]
    IndentStackUnderflow,
    /// A compound node left the traversal state different from how it found it.
    #[error("Unbalanced {kind} node: state {before:?} before enter, {after:?} after exit")]
    Unbalanced {
        /// Node kind name.
        kind: &'static str,
        /// State depth before `enter`.
        before: StateDepth,
        /// State depth after `exit`.
        after: StateDepth,
    },
    /// A leaf was handed to `enter`/`exit`, or a compound node to `visit`.
    #[error("{kind} node dispatched to the wrong handler")]
    Dispatch {
        /// Node kind name.
        kind: &'static str,
    },
    /// Writing the finished document failed.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}
