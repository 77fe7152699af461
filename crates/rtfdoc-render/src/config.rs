//! Render options.

use std::path::PathBuf;

use rtfdoc_style::{DocumentInfo, MAX_INDENT_LEVELS, StyleTable};

/// Options for one RTF render.
#[derive(Clone, Debug)]
pub struct FormatConfig {
    /// Emit live hyperlink fields instead of bold text.
    pub hyperlinks: bool,
    /// Delete intermediate diagram sources after rasterizing.
    pub cleanup: bool,
    /// Bitmap format for Dot images.
    pub image_format: String,
    /// Number of usable indent levels, at most [`MAX_INDENT_LEVELS`].
    pub max_indent_level: usize,
    /// Directory receiving diagram sources and images.
    pub output_dir: PathBuf,
    /// Source language for code without an explicit one.
    pub language: String,
    pub styles: StyleTable,
    pub info: DocumentInfo,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            hyperlinks: true,
            cleanup: true,
            image_format: "png".to_owned(),
            max_indent_level: MAX_INDENT_LEVELS,
            output_dir: PathBuf::from("rtf"),
            language: "cpp".to_owned(),
            styles: StyleTable::rtf_defaults(),
            info: DocumentInfo::default(),
        }
    }
}
