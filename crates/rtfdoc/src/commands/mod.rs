//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod styles;

use std::path::Path;

use rtfdoc_config::Config;
use rtfdoc_render::{CommandRasterizer, FormatConfig};
use rtfdoc_style::{DocumentInfo, StyleTable};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use render::RenderArgs;
pub(crate) use styles::StylesArgs;

/// Built-in styles with the stylesheet at `path` applied.
fn load_styles(path: Option<&Path>, output: &Output) -> Result<StyleTable, CliError> {
    let mut styles = StyleTable::rtf_defaults();
    if let Some(path) = path {
        for warning in styles.load_stylesheet(path)? {
            output.warning(&format!("Warning: {warning}"));
        }
    }
    Ok(styles)
}

/// Render options for `config`, with stylesheet and extensions loaded.
fn format_config(config: &Config, output: &Output) -> Result<FormatConfig, CliError> {
    let styles = load_styles(config.style_resolved.stylesheet.as_deref(), output)?;

    let mut info = DocumentInfo::default();
    if let Some(path) = &config.style_resolved.extensions {
        for warning in info.load_extensions(path)? {
            output.warning(&format!("Warning: {warning}"));
        }
    }

    Ok(FormatConfig {
        hyperlinks: config.render.hyperlinks,
        cleanup: config.render.cleanup,
        image_format: config.render.image_format.clone(),
        max_indent_level: config.render.max_indent_level,
        output_dir: config.output_dir.clone(),
        language: config.render.language.clone(),
        styles,
        info,
    })
}

/// Diagram tools from the `[tools]` section.
fn rasterizer(config: &Config) -> CommandRasterizer {
    let tools = &config.tools_resolved;
    CommandRasterizer {
        dot: tools.dot.clone(),
        mscgen: tools.mscgen.clone(),
        dia: tools.dia.clone(),
        java: tools.java.clone(),
        plantuml_jar: tools.plantuml_jar.clone(),
        plantuml_include_path: tools.plantuml_include_path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rtfdoc_style::StyleName;

    #[test]
    fn test_format_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("style.cfg"),
            "Heading1 = \\s1\\b\\fs48 \\sbasedon0 \\snext0 heading 1\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("ext.cfg"), "Title = Manual\n").unwrap();
        let config_path = dir.path().join("rtfdoc.toml");
        std::fs::write(
            &config_path,
            r#"
[render]
hyperlinks = false
language = "py"

[output]
dir = "out"

[style]
stylesheet = "style.cfg"
extensions = "ext.cfg"

[tools]
dot = "/opt/graphviz/bin/dot"
plantuml_include_path = "uml"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();
        let format = format_config(&config, &Output::new()).unwrap();

        assert!(!format.hyperlinks);
        assert!(format.cleanup);
        assert_eq!(format.language, "py");
        assert_eq!(format.output_dir, dir.path().join("out"));
        assert_eq!(format.info.title, "Manual");
        assert_eq!(
            format.styles.reference(StyleName::Heading1, 0).unwrap(),
            "\\s1\\b\\fs48 "
        );

        let tools = rasterizer(&config);
        assert_eq!(tools.dot, Path::new("/opt/graphviz/bin/dot"));
        assert_eq!(tools.mscgen, Path::new("mscgen"));
        assert_eq!(tools.plantuml_include_path, Some(dir.path().join("uml")));
    }
}
