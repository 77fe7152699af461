//! Complete RTF documents: header tables, document info and cover.

use std::fmt::Write;

use rtfdoc_style::{STYLE_RESET, StyleName, StyleTable};
use rtfdoc_tree::DocNode;

use crate::escape::push_escaped;
use crate::{FormatConfig, RenderError, RenderResult, Services, render_document};

const HEADER: &str = "{\\rtf1\\ansi\\ansicpg1252\\uc1 \\deff0\\deflang1033\\deflangfe1033\n";

const FONT_TABLE: &str = "{\\fonttbl \
    {\\f0\\froman\\fcharset0\\fprq2 Times New Roman;}\
    {\\f1\\fswiss\\fcharset0\\fprq2 Arial;}\
    {\\f2\\fmodern\\fcharset0\\fprq1 Courier New;}\
    {\\f3\\froman\\fcharset2\\fprq2 Symbol;}\
    }\n";

/// Palette referenced by index from the styles: 2 is the hyperlink blue,
/// 8 the code background, 15 and 16 the table border and heading shades.
const COLORS: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (0, 0, 255),
    (0, 255, 255),
    (0, 255, 0),
    (255, 0, 255),
    (255, 0, 0),
    (255, 255, 0),
    (255, 255, 255),
    (0, 0, 128),
    (0, 128, 128),
    (0, 128, 0),
    (128, 0, 128),
    (128, 0, 0),
    (128, 128, 0),
    (128, 128, 128),
    (192, 192, 192),
];

/// Render `root` as a complete RTF document appended to `out`.
///
/// # Errors
///
/// Same as [`render_document`], plus [`RenderError::MissingStyle`] when the
/// cover page needs a title style the table lacks.
pub fn render_standalone(
    root: &DocNode,
    out: &mut String,
    config: &FormatConfig,
    services: &Services,
) -> Result<RenderResult, RenderError> {
    out.push_str(HEADER);
    out.push_str(FONT_TABLE);
    write_color_table(out);
    write_stylesheet(out, &config.styles);
    write_info(out, config);
    write_cover(out, config)?;

    let result = render_document(root, out, config, services)?;
    out.push_str("}\n");
    Ok(result)
}

fn write_color_table(out: &mut String) {
    out.push_str("{\\colortbl;");
    for (red, green, blue) in COLORS {
        write!(out, "\\red{red}\\green{green}\\blue{blue};").unwrap();
    }
    out.push_str("}\n");
}

/// Write the `\stylesheet` group declaring every style in `styles`.
pub fn write_stylesheet(out: &mut String, styles: &StyleTable) {
    out.push_str("{\\stylesheet\n");
    out.push_str("{\\widctlpar\\adjustright \\fs20\\cgrid \\snext0 Normal;}\n");
    out.push_str("{\\*\\cs10 \\additive Default Paragraph Font;}\n");
    out.push_str("{\\*\\cs37\\additive \\ul\\cf2 Hyperlink;}\n");
    for (_, data) in styles.iter() {
        writeln!(out, "{{{}{};}}", data.reference, data.definition).unwrap();
    }
    out.push_str("}\n");
}

fn write_info(out: &mut String, config: &FormatConfig) {
    let info = &config.info;
    out.push_str("{\\info \n");
    for (tag, value) in [
        ("title", &info.title),
        ("subject", &info.subject),
        ("comment", &info.comments),
        ("company", &info.company),
        ("author", &info.author),
        ("manager", &info.manager),
        ("keywords", &info.keywords),
    ] {
        if !value.is_empty() {
            write!(out, "{{\\{tag} ").unwrap();
            push_escaped(out, value, false);
            out.push_str("}\n");
        }
    }
    out.push_str("}\n");
}

fn write_cover(out: &mut String, config: &FormatConfig) -> Result<(), RenderError> {
    let info = &config.info;
    if info.title.is_empty() && info.logo_filename.is_empty() {
        return Ok(());
    }

    if !info.logo_filename.is_empty() {
        out.push_str("{\\pard\\qc { \\field\\flddirty {\\*\\fldinst  INCLUDEPICTURE \"");
        out.push_str(&info.logo_filename);
        out.push_str("\" \\\\d \\\\*MERGEFORMAT}{\\fldrslt Image}}\\par}\n");
    }
    for (name, text) in [
        (StyleName::Title, &info.title),
        (StyleName::SubTitle, &info.subject),
        (StyleName::BodyText, &info.document_type),
        (StyleName::BodyText, &info.document_id),
    ] {
        if text.is_empty() {
            continue;
        }
        let reference = config
            .styles
            .reference(name, 0)
            .map_err(|_| RenderError::MissingStyle { name, level: 0 })?;
        write!(out, "{{{STYLE_RESET}{reference}\\qc ").unwrap();
        push_escaped(out, text, false);
        out.push_str("\\par}\n");
    }
    out.push_str("\\page\n");
    Ok(())
}
