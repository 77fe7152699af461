//! RTF style/indent table.
//!
//! Maps a [`StyleName`] and an indent level to the RTF control words that
//! apply the style in the document body. The default table covers every
//! indent level below [`MAX_INDENT_LEVELS`] for every indexed style, so a
//! lookup only fails when a caller asks for a level outside that range.
//!
//! Two optional text files customize the output:
//!
//! - a stylesheet (`Name = \sN ...` lines) replacing individual styles, see
//!   [`StyleTable::apply_stylesheet`]
//! - an extensions file (`Title = ...` lines) filling the document info
//!   group, see [`DocumentInfo::apply_extensions`]

mod info;
mod sheet;
mod table;

pub use info::DocumentInfo;
pub use table::{MAX_INDENT_LEVELS, PAGE_WIDTH, STYLE_RESET, StyleData, StyleName, StyleTable};

use std::path::PathBuf;

/// Style table error.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// The table has no entry for the requested style at this level.
    #[error("No RTF style {name} at indent level {level}")]
    Missing {
        /// Style name.
        name: StyleName,
        /// Indent level requested.
        level: usize,
    },
    /// A style value lacks the `\sN` clause naming its stylesheet slot.
    #[error("Style {name} contains no \\s clause: {value}")]
    NoStyleClause {
        /// Style key as written in the stylesheet.
        name: String,
        /// Offending value.
        value: String,
    },
    /// Reading a stylesheet or extensions file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}
