//! RTF visitor.

use std::path::{Path, PathBuf};

use rtfdoc_style::{STYLE_RESET, StyleName};
use rtfdoc_tree::{
    CellAlign, DocNode, ImageKind, IncOpKind, IncludeKind, LinkTarget, NodeKind,
    ParamSectionKind, ParamToken, SimpleSectionKind, Style, VerbatimKind,
};

use crate::diagram::{DiagramKind, InlineDiagram, RasterRequest};
use crate::escape::push_escaped;
use crate::link::{bookmark, close_link, open_link, open_url};
use crate::services::{CodeFragment, TranslationKey, extract_block, language_of_file, line_block};
use crate::state::{RenderState, StateDepth};
use crate::symbol::{push_rtf_char, push_symbol};
use crate::table::{column_stops, param_column_stops};
use crate::walk::{DocVisitor, walk_children};
use crate::{FormatConfig, RenderError, RenderResult, Services};

const CODE_BLOCK_OPEN: &str = "{\n\\par\n";

const HORIZONTAL_RULE: &str =
    "{\\pard\\widctlpar\\brdrb\\brdrs\\brdrw5\\brsp20 \\adjustright \\par}\n";

const ROW_OPEN: &str = "\\trowd \\trgaph108\\trleft-108\
    \\trbrdrt\\brdrs\\brdrw10 \
    \\trbrdrl\\brdrs\\brdrw10 \
    \\trbrdrb\\brdrs\\brdrw10 \
    \\trbrdrr\\brdrs\\brdrw10 \
    \\trbrdrh\\brdrs\\brdrw10 \
    \\trbrdrv\\brdrs\\brdrw10 \n";

const CELL_BORDERS: &str = "\\clvertalt\\clbrdrt\\brdrs\\brdrw10 \
    \\clbrdrl\\brdrs\\brdrw10 \
    \\clbrdrb\\brdrs\\brdrw10 \
    \\clbrdrr \\brdrs\\brdrw10 \
    \\cltxlrtb ";

const PARAM_ROW_OPEN: &str = "\\trowd \\trgaph108\\trleft426\\tblind426\
    \\trbrdrt\\brdrs\\brdrw10\\brdrcf15 \
    \\trbrdrl\\brdrs\\brdrw10\\brdrcf15 \
    \\trbrdrb\\brdrs\\brdrw10\\brdrcf15 \
    \\trbrdrr\\brdrs\\brdrw10\\brdrcf15 \
    \\trbrdrh\\brdrs\\brdrw10\\brdrcf15 \
    \\trbrdrv\\brdrs\\brdrw10\\brdrcf15 \n";

const PARAM_CELL_BORDERS: &str = "\\clvertalt\\clbrdrt\\brdrs\\brdrw10\\brdrcf15 \
    \\clbrdrl\\brdrs\\brdrw10\\brdrcf15 \
    \\clbrdrb\\brdrs\\brdrw10\\brdrcf15 \
    \\clbrdrr \\brdrs\\brdrw10\\brdrcf15 \
    \\cltxlrtb ";

const IN_TABLE: &str = "\\pard \\widctlpar\\intbl\\adjustright\n";


/// Renders a documentation tree as an RTF body fragment.
///
/// Output goes through [`put`](Self::put), which drops everything while the
/// hidden flag is set. Indent and hidden stack operations happen regardless
/// of the flag so enter/exit pairs stay balanced inside hidden regions.
pub(crate) struct RtfVisitor<'a> {
    out: &'a mut String,
    config: &'a FormatConfig,
    services: &'a Services,
    state: RenderState,
    warnings: Vec<String>,
    images: Vec<PathBuf>,
}

impl<'a> RtfVisitor<'a> {
    pub(crate) fn new(out: &'a mut String, config: &'a FormatConfig, services: &'a Services) -> Self {
        Self {
            out,
            config,
            services,
            state: RenderState::new(config.max_indent_level),
            warnings: Vec::new(),
            images: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> RenderResult {
        RenderResult {
            warnings: self.warnings,
            images: self.images,
        }
    }

    fn hidden(&self) -> bool {
        self.state.hidden.is_hidden()
    }

    fn put(&mut self, text: &str) {
        if !self.hidden() {
            self.out.push_str(text);
        }
    }

    fn put_escaped(&mut self, text: &str, verbatim: bool) {
        if !self.hidden() {
            push_escaped(self.out, text, verbatim);
        }
    }

    fn set_para(&mut self, value: bool) {
        if !self.hidden() {
            self.state.last_is_para = value;
        }
    }

    fn par_unless_para(&mut self) {
        if !self.state.last_is_para {
            self.put("\\par\n");
        }
    }

    fn put_style(&mut self, name: StyleName) -> Result<(), RenderError> {
        if self.hidden() {
            return Ok(());
        }
        let level = self.state.indent.level();
        let config = self.config;
        let reference = config
            .styles
            .reference(name, level)
            .map_err(|_| RenderError::MissingStyle { name, level })?;
        self.out.push_str(reference);
        Ok(())
    }

    fn reset_style(&mut self, name: StyleName) -> Result<(), RenderError> {
        self.put(STYLE_RESET);
        self.put_style(name)
    }

    fn push_indent(&mut self) {
        if !self.state.indent.push() {
            let max = self.state.indent.max();
            tracing::warn!(max, "Maximum indent level exceeded");
            self.warnings.push(format!(
                "Maximum indent level ({max}) exceeded while generating RTF output"
            ));
        }
    }

    fn pop_indent(&mut self) -> Result<(), RenderError> {
        self.state.indent.pop()
    }

    fn start_link(&mut self, reference: &str, file: &str, anchor: &str) {
        let markup = open_link(self.config.hyperlinks, reference, file, anchor);
        self.put(&markup);
        self.set_para(false);
    }

    fn end_link(&mut self, reference: &str) {
        self.put(close_link(self.config.hyperlinks, reference));
    }

    fn translated(&mut self, key: TranslationKey) {
        let services = self.services;
        self.put_escaped(services.translator.translate(key), false);
    }

    fn highlight(&mut self, fragment: &CodeFragment<'_>) {
        if self.hidden() {
            return;
        }
        let services = self.services;
        if let Some(highlighter) = services.highlighters.get(fragment.language) {
            highlighter.highlight(self.out, fragment);
            return;
        }
        tracing::warn!(language = %fragment.language, "No highlighter, emitting code verbatim");
        self.warnings.push(format!(
            "No code highlighter for language '{}', code emitted verbatim",
            fragment.language
        ));
        push_escaped(self.out, fragment.text, true);
    }

    /// Item marker at the current level: `N.\tab` or a bullet style.
    fn list_marker(&mut self) -> Result<(), RenderError> {
        if self.hidden() {
            return Ok(());
        }
        let level = self.state.indent.level();
        match self.state.lists.next_marker(level) {
            Some(number) => {
                self.put_style(StyleName::ListEnum)?;
                self.put(&format!("\n{number}.\\tab "));
            }
            None => {
                self.put_style(StyleName::ListBullet)?;
                self.put("\n");
            }
        }
        Ok(())
    }

    fn start_list(&mut self, ordered: bool) {
        if !self.hidden() {
            let level = self.state.indent.level();
            self.state.lists.start(level, ordered);
        }
    }

    fn style_change(&mut self, style: Style, enable: bool) -> Result<(), RenderError> {
        self.set_para(false);
        let open = match style {
            Style::Bold => "{\\b ",
            Style::Strike | Style::Del | Style::S => "{\\strike ",
            Style::Underline | Style::Ins => "{\\ul ",
            Style::Italic | Style::Cite => "{\\i ",
            Style::Code => "{\\f2 ",
            Style::Subscript | Style::Small => "{\\sub ",
            Style::Superscript => "{\\super ",
            Style::Center => "{\\qc ",
            Style::Preformatted => {
                if enable {
                    self.put(CODE_BLOCK_OPEN);
                    self.reset_style(StyleName::CodeExample)?;
                    self.state.inside_pre = true;
                } else {
                    self.state.inside_pre = false;
                    self.put("\\par}\n");
                }
                self.set_para(true);
                return Ok(());
            }
            Style::Details => {
                self.put(if enable { CODE_BLOCK_OPEN } else { "\\par}\n" });
                self.set_para(true);
                return Ok(());
            }
            Style::Summary => {
                self.put(if enable { "{\\b " } else { "}\\par " });
                return Ok(());
            }
            Style::Span | Style::Div => return Ok(()),
        };
        self.put(if enable { open } else { "} " });
        Ok(())
    }

    fn verbatim(&mut self, node: &DocNode) -> Result<(), RenderError> {
        let NodeKind::Verbatim {
            kind,
            text,
            language,
            context,
            is_example,
            example_file,
        } = &node.kind
        else {
            return Err(RenderError::Dispatch {
                kind: node.kind.name(),
            });
        };
        let config = self.config;
        let language = if language.is_empty() {
            config.language.as_str()
        } else {
            language.as_str()
        };

        match kind {
            VerbatimKind::Code => {
                self.put(CODE_BLOCK_OPEN);
                self.reset_style(StyleName::CodeExample)?;
                self.highlight(&CodeFragment {
                    language,
                    text,
                    context,
                    is_example: *is_example,
                    example_file,
                    file: None,
                    line_numbers: None,
                });
                self.put("}\n");
            }
            VerbatimKind::Verbatim => {
                self.put(CODE_BLOCK_OPEN);
                self.reset_style(StyleName::CodeExample)?;
                self.put_escaped(text, true);
                self.put("}\n");
            }
            VerbatimKind::RtfOnly => self.put(text),
            VerbatimKind::HtmlOnly
            | VerbatimKind::LatexOnly
            | VerbatimKind::ManOnly
            | VerbatimKind::XmlOnly
            | VerbatimKind::DocbookOnly => {}
            VerbatimKind::Dot => self.inline_diagram(InlineDiagram::Dot, text, "", node)?,
            VerbatimKind::Msc => self.inline_diagram(InlineDiagram::Msc, text, "", node)?,
            VerbatimKind::PlantUml => {
                self.inline_diagram(InlineDiagram::PlantUml, text, example_file, node)?;
            }
        }
        self.set_para(false);
        Ok(())
    }

    /// Write `text` to a numbered source file, rasterize it and include the image.
    fn inline_diagram(
        &mut self,
        diagram: InlineDiagram,
        text: &str,
        example_file: &str,
        node: &DocNode,
    ) -> Result<(), RenderError> {
        let config = self.config;
        let base_name = match Path::new(example_file).file_stem() {
            Some(stem) if diagram == InlineDiagram::PlantUml => {
                stem.to_string_lossy().into_owned()
            }
            _ => format!("{}{}", diagram.prefix(), self.services.counters.next(diagram)),
        };
        let kind = diagram.kind();
        let source = config
            .output_dir
            .join(format!("{base_name}.{}", diagram.source_extension()));

        let written = std::fs::create_dir_all(&config.output_dir)
            .and_then(|()| std::fs::write(&source, diagram.wrap_source(text)));
        match written {
            Ok(()) => self.rasterize(kind, &source, &base_name),
            Err(e) => {
                tracing::warn!(path = %source.display(), error = %e, "Could not write diagram source");
                self.warnings.push(format!(
                    "Could not open file {} for writing: {e}",
                    source.display()
                ));
            }
        }

        let image = format!(
            "{base_name}.{}",
            kind.image_extension(&config.image_format)
        );
        self.picture_pre(&image, true, node.has_caption(), false);
        walk_children(self, node)?;
        self.picture_post(true, node.has_caption(), false)?;

        if config.cleanup && source.exists() {
            if let Err(e) = std::fs::remove_file(&source) {
                tracing::debug!(path = %source.display(), error = %e, "Failed to remove diagram source");
            }
        }
        Ok(())
    }

    /// Rasterize a diagram file named by a `DotFile`/`MscFile`/`DiaFile` node.
    fn diagram_file(&mut self, kind: DiagramKind, file: &str, node: &DocNode) {
        if self.hidden() {
            return;
        }
        let config = self.config;
        let base_name = Path::new(file)
            .file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
        self.rasterize(kind, Path::new(file), &base_name);
        let image = format!(
            "{base_name}.{}",
            kind.image_extension(&config.image_format)
        );
        self.picture_pre(&image, true, node.has_caption(), false);
    }

    fn rasterize(&mut self, kind: DiagramKind, source: &Path, base_name: &str) {
        let config = self.config;
        let request = RasterRequest {
            kind,
            source,
            output_dir: &config.output_dir,
            base_name,
            image_format: &config.image_format,
        };
        match self.services.rasterizer.rasterize(&request) {
            Ok(()) => self.images.push(request.image_path()),
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "Diagram rasterization failed");
                self.warnings
                    .push(format!("Failed to render {}: {e}", source.display()));
            }
        }
    }

    /// Opening markup of a picture.
    ///
    /// Non-RTF pictures and captions of inline pictures are hidden until the
    /// matching [`picture_post`](Self::picture_post).
    fn picture_pre(&mut self, name: &str, is_rtf: bool, has_caption: bool, inline: bool) {
        if !is_rtf {
            self.state.hidden.push_and_hide();
            return;
        }
        if !inline {
            self.put("\\par\n{\n");
            self.put(STYLE_RESET);
            self.put("\n");
            if has_caption || self.state.last_is_para {
                self.put("\\par\n");
            }
            self.put("\\pard \\qc ");
        }
        self.put("{ \\field\\flddirty {\\*\\fldinst  INCLUDEPICTURE \"");
        self.put(name);
        self.put("\" \\\\d \\\\*MERGEFORMAT}{\\fldrslt Image}}\n");
        if inline {
            if has_caption {
                self.state.hidden.push_and_hide();
            }
            return;
        }
        self.put("\\par\n");
        if has_caption {
            self.put("\\pard \\qc \\b");
            self.put(&caption_number("Image"));
        }
        self.set_para(true);
    }

    fn picture_post(&mut self, is_rtf: bool, has_caption: bool, inline: bool) -> Result<(), RenderError> {
        if !is_rtf {
            return self.state.hidden.pop();
        }
        if inline {
            if has_caption {
                self.state.hidden.pop()?;
            }
            return Ok(());
        }
        self.put(if has_caption { "}\n\\par}\n" } else { "}\n" });
        Ok(())
    }

    fn include(&mut self, node: &DocNode) -> Result<(), RenderError> {
        let NodeKind::Include {
            kind,
            file,
            text,
            extension,
            block_id,
            context,
            is_example,
            example_file,
        } = &node.kind
        else {
            return Err(RenderError::Dispatch {
                kind: node.kind.name(),
            });
        };
        let config = self.config;
        let language = if extension.is_empty() {
            language_of_file(file, &config.language)
        } else {
            extension.trim_start_matches('.')
        };
        let fragment = CodeFragment {
            language,
            text,
            context,
            is_example: *is_example,
            example_file,
            file: Some(file.as_str()),
            line_numbers: None,
        };

        match kind {
            IncludeKind::Include | IncludeKind::IncWithLines => {
                self.put(CODE_BLOCK_OPEN);
                self.reset_style(StyleName::CodeExample)?;
                self.highlight(&CodeFragment {
                    line_numbers: (*kind == IncludeKind::IncWithLines).then_some(1),
                    ..fragment
                });
                self.put("\\par}\n");
            }
            IncludeKind::VerbInclude => {
                self.put(CODE_BLOCK_OPEN);
                self.reset_style(StyleName::CodeExample)?;
                self.put_escaped(text, true);
                self.put("\\par}\n");
            }
            IncludeKind::RtfInclude => self.put(text),
            IncludeKind::Snippet | IncludeKind::SnipWithLines => {
                self.put("{\n");
                self.par_unless_para();
                self.reset_style(StyleName::CodeExample)?;
                self.highlight(&CodeFragment {
                    text: extract_block(text, block_id),
                    line_numbers: (*kind == IncludeKind::SnipWithLines)
                        .then(|| line_block(text, block_id)),
                    ..fragment
                });
                self.put("}");
            }
            IncludeKind::DontInclude
            | IncludeKind::DontIncWithLines
            | IncludeKind::HtmlInclude
            | IncludeKind::LatexInclude
            | IncludeKind::ManInclude
            | IncludeKind::XmlInclude
            | IncludeKind::DocbookInclude => return Ok(()),
            IncludeKind::IncludeDoc | IncludeKind::SnippetDoc => {
                tracing::warn!(file = %file, "Unexpanded documentation include");
                self.warnings.push(format!(
                    "Documentation include of {file} was not expanded before rendering"
                ));
                return Ok(());
            }
        }
        self.set_para(true);
        Ok(())
    }

    /// One segment of an include-operator sequence.
    ///
    /// The first segment opens the code block and hides output; every
    /// non-skip segment unhides just long enough to emit its text; the last
    /// segment unhides and closes the block. Runs even while hidden.
    fn include_operator(&mut self, node: &DocNode) -> Result<(), RenderError> {
        let NodeKind::IncludeOperator {
            kind,
            text,
            is_first,
            is_last,
            include_file,
            context,
            is_example,
            example_file,
        } = &node.kind
        else {
            return Err(RenderError::Dispatch {
                kind: node.kind.name(),
            });
        };
        let config = self.config;

        if *is_first {
            self.put(CODE_BLOCK_OPEN);
            self.reset_style(StyleName::CodeExample)?;
            self.state.hidden.push_and_hide();
        }
        if *kind != IncOpKind::Skip {
            self.state.hidden.pop()?;
            self.highlight(&CodeFragment {
                language: language_of_file(include_file, &config.language),
                text,
                context,
                is_example: *is_example,
                example_file,
                file: Some(include_file.as_str()),
                line_numbers: None,
            });
            self.state.hidden.push_and_hide();
        }
        if *is_last {
            self.state.hidden.pop()?;
            self.put("\\par}\n");
            self.set_para(true);
        } else {
            self.put("\n");
            self.set_para(false);
        }
        Ok(())
    }

    fn formula(&mut self, name: &str, rel_path: &str, text: &str, inline: bool) {
        if !inline {
            self.put("\\par{\\pard\\plain\\pard\\qc");
        }
        self.put("{ \\field\\flddirty {\\*\\fldinst  INCLUDEPICTURE \"");
        self.put(rel_path);
        self.put(name);
        self.put(".png\" \\\\d \\\\*MERGEFORMAT}{\\fldrslt ");
        self.put_escaped(text, false);
        self.put("}}");
        if !inline {
            self.put("\\par}");
        }
        self.set_para(false);
    }

    fn url(&mut self, url: &str, is_email: bool) {
        if self.config.hyperlinks {
            let target = if is_email {
                format!("mailto:{url}")
            } else {
                url.to_owned()
            };
            self.put(&open_url(&target));
            self.put_escaped(url, false);
            self.put("}}}");
        } else {
            self.put("{\\f2 ");
            self.put_escaped(url, false);
            self.put("}");
        }
        self.set_para(false);
    }

    fn emoji(&mut self, name: &str, code_points: &[u32]) {
        if code_points.is_empty() {
            self.put_escaped(name, false);
            return;
        }
        let mut encoded = String::new();
        for &cp in code_points {
            match char::from_u32(cp) {
                Some(c) => push_rtf_char(&mut encoded, c),
                None => {
                    tracing::warn!(emoji = %name, code_point = cp, "Invalid emoji code point");
                    self.warnings
                        .push(format!("Emoji {name} has invalid code point {cp:#x}"));
                }
            }
        }
        self.put(&encoded);
    }

    fn param_token(&mut self, token: &ParamToken) {
        match token {
            ParamToken::Word { text } => self.put_escaped(text, false),
            ParamToken::LinkedWord { text, target } => {
                self.start_link(&target.reference, &target.file, &target.anchor);
                self.put_escaped(text, false);
                self.end_link(&target.reference);
            }
            ParamToken::Separator { chars } => {
                self.put(" ");
                self.put(chars);
                self.put(" ");
            }
        }
    }

    fn simple_section_enter(&mut self, kind: SimpleSectionKind) -> Result<(), RenderError> {
        self.par_unless_para();
        self.put("{");
        self.put("{");
        self.put_style(StyleName::Heading5)?;
        self.put("\n");
        if let Some(key) = section_title(kind) {
            self.translated(key);
        }
        // User sections get their title from a Title child, which closes
        // the heading group itself.
        self.push_indent();
        if !kind.has_custom_title() {
            self.put("\\par}");
            self.reset_style(StyleName::DescContinue)?;
            self.put("{\\s17 \\sa60 \\sb30\n");
        }
        self.set_para(false);
        Ok(())
    }

    fn simple_section_exit(&mut self, kind: SimpleSectionKind) -> Result<(), RenderError> {
        self.par_unless_para();
        self.pop_indent()?;
        if !kind.has_custom_title() {
            self.put("}");
        }
        self.put("}");
        self.set_para(true);
        Ok(())
    }

    fn section_enter(&mut self, level: u8, title: &str, file: &str, anchor: &str) -> Result<(), RenderError> {
        self.par_unless_para();
        self.put(&bookmark(file, anchor));
        self.put("{{");
        self.put(STYLE_RESET);
        let level = (usize::from(level) + 1).min(4);
        self.put_style(StyleName::heading(level))?;
        self.put("\n");
        self.put_escaped(title, false);
        self.put("\n\\par}\n");
        self.put(&format!("{{\\tc\\tcl{level} \\v "));
        self.put_escaped(title, false);
        self.put("}\n");
        self.set_para(true);
        Ok(())
    }

    fn table_enter(&mut self, node: &DocNode) {
        self.par_unless_para();
        self.set_para(true);
        let Some(caption) = node.html_caption() else {
            return;
        };
        self.put("\\pard \\qc \\b");
        if let NodeKind::HtmlCaption { file, anchor } = &caption.kind {
            if !file.is_empty() {
                self.put(&bookmark(file, anchor));
            }
        }
        self.put(&caption_number("Table"));
    }

    fn row_enter(&mut self, num_cells: usize, is_heading: bool) {
        self.put(ROW_OPEN);
        for stop in column_stops(num_cells) {
            if is_heading {
                self.put("\\clcbpat16");
            }
            self.put(CELL_BORDERS);
            self.put(&format!("\\cellx{stop}\n"));
        }
        self.put(IN_TABLE);
        self.set_para(false);
    }

    fn param_section_enter(&mut self, kind: ParamSectionKind) -> Result<(), RenderError> {
        self.put("{");
        self.par_unless_para();
        self.put("{");
        self.put_style(StyleName::Heading5)?;
        self.put("\n");
        self.translated(match kind {
            ParamSectionKind::Param => TranslationKey::Parameters,
            ParamSectionKind::RetVal => TranslationKey::ReturnValues,
            ParamSectionKind::Exception => TranslationKey::Exceptions,
            ParamSectionKind::TemplateParam => TranslationKey::TemplateParameters,
        });
        self.put("\\par}\n");
        self.reset_style(StyleName::DescContinue)?;
        self.set_para(true);
        Ok(())
    }

    fn param_list_enter(&mut self, node: &DocNode, parent: Option<&DocNode>) {
        let NodeKind::ParamList {
            direction,
            types,
            params,
        } = &node.kind
        else {
            return;
        };
        let (has_in_out, has_type) = match parent.map(|p| &p.kind) {
            Some(NodeKind::ParamSection {
                has_in_out,
                has_type,
                ..
            }) => (*has_in_out, *has_type),
            _ => (false, false),
        };

        self.put(PARAM_ROW_OPEN);
        for stop in param_column_stops(has_in_out, has_type) {
            self.put(PARAM_CELL_BORDERS);
            self.put(&format!("\\cellx{stop}\n"));
        }
        self.put(IN_TABLE);

        if has_in_out {
            self.put("{");
            if let Some(label) = direction.label() {
                self.put(label);
            }
            self.put("\\cell }");
        }
        if has_type {
            self.put("{");
            for token in types {
                self.param_token(token);
            }
            self.put("\\cell }");
        }
        self.put("{{\\i ");
        for (i, token) in params.iter().enumerate() {
            if i > 0 {
                self.put(",");
            }
            self.param_token(token);
        }
        self.put("} \\cell }{");
        self.set_para(true);
    }

    fn cross_ref_enter(&mut self, title: &str, file: &str, anchor: &str) -> Result<(), RenderError> {
        if title.is_empty() {
            self.state.hidden.push_and_hide();
            return Ok(());
        }
        if !self.state.last_is_para {
            self.put("\\par\n");
            self.set_para(true);
        }
        self.put("{");
        self.put("{");
        self.put_style(StyleName::Heading5)?;
        self.put("\n");
        // "@" marks an anonymous scope with nothing to link to.
        if self.config.hyperlinks && file != "@" {
            self.put(&open_link(true, "", file, anchor));
            self.put_escaped(title, false);
            self.put("}}}\n");
        } else {
            self.put_escaped(title, false);
        }
        self.put(":\\par}");
        self.push_indent();
        self.reset_style(StyleName::DescContinue)?;
        self.set_para(false);
        Ok(())
    }

    fn cross_ref_exit(&mut self, title: &str) -> Result<(), RenderError> {
        if title.is_empty() {
            return self.state.hidden.pop();
        }
        self.put("\\par\n");
        self.pop_indent()?;
        self.put("}\n");
        self.set_para(true);
        Ok(())
    }
}

/// Numbered caption prefix, e.g. `Table 1`, kept as an updatable field.
fn caption_number(sequence: &str) -> String {
    format!(
        "{{{sequence} \\field\\flddirty{{\\*\\fldinst {{ SEQ {sequence} \\\\*Arabic }}}}{{\\fldrslt {{\\noproof 1}}}} "
    )
}

fn section_title(kind: SimpleSectionKind) -> Option<TranslationKey> {
    let key = match kind {
        SimpleSectionKind::See => TranslationKey::SeeAlso,
        SimpleSectionKind::Return => TranslationKey::Returns,
        SimpleSectionKind::Author => TranslationKey::Author,
        SimpleSectionKind::Authors => TranslationKey::Authors,
        SimpleSectionKind::Version => TranslationKey::Version,
        SimpleSectionKind::Since => TranslationKey::Since,
        SimpleSectionKind::Date => TranslationKey::Date,
        SimpleSectionKind::Note => TranslationKey::Note,
        SimpleSectionKind::Warning => TranslationKey::Warning,
        SimpleSectionKind::Copyright => TranslationKey::Copyright,
        SimpleSectionKind::Pre => TranslationKey::Precondition,
        SimpleSectionKind::Post => TranslationKey::Postcondition,
        SimpleSectionKind::Invar => TranslationKey::Invariant,
        SimpleSectionKind::Remark => TranslationKey::Remarks,
        SimpleSectionKind::Attention => TranslationKey::Attention,
        SimpleSectionKind::Unknown | SimpleSectionKind::User | SimpleSectionKind::Rcs => {
            return None;
        }
    };
    Some(key)
}

/// Whether a `Ref` renders as a link.
fn ref_links(target: &LinkTarget, is_sub_page: bool) -> bool {
    is_sub_page || !target.file.is_empty()
}

impl DocVisitor for RtfVisitor<'_> {
    fn visit(&mut self, node: &DocNode, _parent: Option<&DocNode>) -> Result<(), RenderError> {
        let kind = &node.kind;
        // Include operators manage the hidden stack themselves.
        if self.hidden() && !matches!(kind, NodeKind::IncludeOperator { .. }) {
            return Ok(());
        }

        match kind {
            NodeKind::Word { text } => {
                self.put_escaped(text, false);
                self.set_para(false);
            }
            NodeKind::LinkedWord { text, target } => {
                self.start_link(&target.reference, &target.file, &target.anchor);
                self.put_escaped(text, false);
                self.end_link(&target.reference);
                self.set_para(false);
            }
            NodeKind::WhiteSpace { chars } => {
                if self.state.inside_pre {
                    self.put(chars);
                } else {
                    self.put(" ");
                }
                self.set_para(false);
            }
            NodeKind::Symbol { name } => {
                if !push_symbol(self.out, name) {
                    tracing::warn!(symbol = %name, "Unsupported symbol");
                    self.warnings
                        .push(format!("Unsupported symbol &{name}; in RTF output"));
                }
                self.set_para(false);
            }
            NodeKind::Emoji { name, code_points } => {
                self.emoji(name, code_points);
                self.set_para(false);
            }
            NodeKind::Url { url, is_email } => self.url(url, *is_email),
            NodeKind::LineBreak => {
                self.put("\\par\n");
                self.set_para(true);
            }
            NodeKind::HorizontalRule => {
                self.put(HORIZONTAL_RULE);
                self.set_para(true);
            }
            NodeKind::StyleChange { style, enable } => self.style_change(*style, *enable)?,
            NodeKind::Verbatim { .. } => self.verbatim(node)?,
            NodeKind::Anchor { file, anchor } => {
                self.put(&bookmark(file, anchor));
                self.set_para(false);
            }
            NodeKind::Include { .. } => self.include(node)?,
            NodeKind::IncludeOperator { .. } => self.include_operator(node)?,
            NodeKind::Formula {
                name,
                rel_path,
                text,
                inline,
            } => self.formula(name, rel_path, text, *inline),
            NodeKind::IndexEntry { entry } => {
                self.put("{\\xe \\v ");
                self.put_escaped(entry, false);
                self.put("}\n");
                self.set_para(false);
            }
            NodeKind::SectionSeparator => {}
            NodeKind::Citation { text, target } => {
                let linked = !target.file.is_empty();
                if linked {
                    self.start_link(&target.reference, &target.file, &target.anchor);
                } else {
                    self.put("{\\b ");
                }
                self.put_escaped(text, false);
                if linked {
                    self.end_link(&target.reference);
                } else {
                    self.put("}");
                }
                self.set_para(false);
            }
            NodeKind::AutoList { .. }
            | NodeKind::AutoListItem
            | NodeKind::Paragraph { .. }
            | NodeKind::Root { .. }
            | NodeKind::SimpleSection { .. }
            | NodeKind::Title
            | NodeKind::SimpleList
            | NodeKind::SimpleListItem
            | NodeKind::Section { .. }
            | NodeKind::HtmlList { .. }
            | NodeKind::HtmlListItem
            | NodeKind::HtmlDescList
            | NodeKind::HtmlDescTitle
            | NodeKind::HtmlDescData
            | NodeKind::HtmlTable
            | NodeKind::HtmlCaption { .. }
            | NodeKind::HtmlRow { .. }
            | NodeKind::HtmlCell { .. }
            | NodeKind::Internal
            | NodeKind::HyperlinkRef { .. }
            | NodeKind::HtmlHeader { .. }
            | NodeKind::Image { .. }
            | NodeKind::DotFile { .. }
            | NodeKind::MscFile { .. }
            | NodeKind::DiaFile { .. }
            | NodeKind::Link { .. }
            | NodeKind::Ref { .. }
            | NodeKind::SectionRefItem
            | NodeKind::SectionRefList
            | NodeKind::ParamSection { .. }
            | NodeKind::ParamList { .. }
            | NodeKind::CrossRefItem { .. }
            | NodeKind::InternalRef { .. }
            | NodeKind::Copy
            | NodeKind::Text
            | NodeKind::HtmlBlockQuote
            | NodeKind::ParBlock => {
                return Err(RenderError::Dispatch { kind: kind.name() });
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn enter(&mut self, node: &DocNode, parent: Option<&DocNode>) -> Result<(), RenderError> {
        match &node.kind {
            NodeKind::AutoList { ordered } | NodeKind::HtmlList { ordered } => {
                self.put("{\n");
                self.start_list(*ordered);
                self.set_para(false);
            }
            NodeKind::AutoListItem => {
                self.par_unless_para();
                self.put(STYLE_RESET);
                self.list_marker()?;
                self.push_indent();
                self.set_para(false);
            }
            NodeKind::HtmlListItem => {
                self.put("\\par\n");
                self.put(STYLE_RESET);
                self.list_marker()?;
                self.push_indent();
                self.set_para(false);
            }
            NodeKind::Root { indent, .. } => {
                if *indent {
                    self.push_indent();
                }
                self.put("{");
                self.put_style(StyleName::BodyText)?;
                self.put("\n");
            }
            NodeKind::SimpleSection { kind } => self.simple_section_enter(*kind)?,
            NodeKind::SimpleList => {
                self.put("{\n");
                self.start_list(false);
                self.set_para(false);
            }
            NodeKind::SimpleListItem => {
                self.put("\\par");
                self.reset_style(StyleName::ListBullet)?;
                self.put("\n");
                self.push_indent();
                self.set_para(false);
            }
            NodeKind::Section {
                level,
                title,
                file,
                anchor,
            } => self.section_enter(*level, title, file, anchor)?,
            NodeKind::HtmlDescTitle => {
                self.put("{");
                self.put_style(StyleName::Heading5)?;
                self.put("\n");
                self.set_para(false);
            }
            NodeKind::HtmlDescData => {
                self.push_indent();
                self.put("{");
                self.reset_style(StyleName::DescContinue)?;
                self.set_para(false);
            }
            NodeKind::HtmlTable => self.table_enter(node),
            NodeKind::HtmlRow {
                num_cells,
                is_heading,
            } => self.row_enter(*num_cells, *is_heading),
            NodeKind::HtmlCell { align } => {
                self.put("{");
                match align {
                    CellAlign::Center => self.put("\\qc "),
                    CellAlign::Right => self.put("\\qr "),
                    CellAlign::Left => {}
                }
                self.set_para(false);
            }
            NodeKind::HyperlinkRef { url } => {
                if self.config.hyperlinks {
                    self.put(&open_url(url));
                } else {
                    self.put("{\\f2 ");
                }
                self.set_para(false);
            }
            NodeKind::HtmlHeader { level } => {
                let level = usize::from(*level).clamp(1, 5);
                self.put("{");
                self.put(STYLE_RESET);
                self.put_style(StyleName::heading(level))?;
                self.put(&format!("{{\\tc\\tcl{level} "));
                self.set_para(false);
            }
            NodeKind::Image { kind, name, inline } => {
                self.picture_pre(name, *kind == ImageKind::Rtf, node.has_caption(), *inline);
            }
            NodeKind::DotFile { file } => self.diagram_file(DiagramKind::Dot, file, node),
            NodeKind::MscFile { file } => self.diagram_file(DiagramKind::Msc, file, node),
            NodeKind::DiaFile { file } => self.diagram_file(DiagramKind::Dia, file, node),
            NodeKind::Link { target } => {
                self.start_link(&target.reference, &target.file, &target.anchor);
            }
            NodeKind::Ref {
                target,
                is_sub_page,
                has_link_text,
                target_title,
            } => {
                if *is_sub_page {
                    self.start_link(&target.reference, "", &target.anchor);
                } else if ref_links(target, *is_sub_page) {
                    self.start_link(&target.reference, &target.file, &target.anchor);
                }
                if !has_link_text {
                    self.put_escaped(target_title, false);
                }
            }
            NodeKind::SectionRefList => {
                self.put("{\n");
                self.push_indent();
                self.reset_style(StyleName::LatexToc)?;
                self.put("\n\\par\n");
                self.set_para(true);
            }
            NodeKind::ParamSection { kind, .. } => self.param_section_enter(*kind)?,
            NodeKind::ParamList { .. } => self.param_list_enter(node, parent),
            NodeKind::CrossRefItem {
                title,
                file,
                anchor,
            } => self.cross_ref_enter(title, file, anchor)?,
            NodeKind::InternalRef { file, anchor } => self.start_link("", file, anchor),
            NodeKind::HtmlBlockQuote => {
                self.par_unless_para();
                self.put("{");
                self.push_indent();
                self.reset_style(StyleName::DescContinue)?;
                self.set_para(false);
            }
            NodeKind::Paragraph { .. }
            | NodeKind::Title
            | NodeKind::HtmlDescList
            | NodeKind::HtmlCaption { .. }
            | NodeKind::Internal
            | NodeKind::SectionRefItem
            | NodeKind::Copy
            | NodeKind::Text
            | NodeKind::ParBlock => {}
            leaf => return Err(RenderError::Dispatch { kind: leaf.name() }),
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn exit(&mut self, node: &DocNode, parent: Option<&DocNode>) -> Result<(), RenderError> {
        match &node.kind {
            NodeKind::AutoList { .. } => {
                if !self.state.last_is_para {
                    self.put("\\par");
                }
                self.put("}\n");
                self.set_para(true);
                if self.state.indent.level() == 0 {
                    self.put("\\par\n");
                }
            }
            NodeKind::AutoListItem
            | NodeKind::HtmlListItem
            | NodeKind::SimpleListItem => self.pop_indent()?,
            NodeKind::Paragraph { is_last } => {
                let in_param_section =
                    matches!(parent.map(|p| &p.kind), Some(NodeKind::ParamSection { .. }));
                if !self.state.last_is_para && !is_last && !in_param_section {
                    self.put("\\par\n");
                    self.set_para(true);
                }
            }
            NodeKind::Root {
                indent,
                single_line,
            } => {
                if !self.state.last_is_para && !single_line {
                    self.put("\\par\n");
                }
                self.put("}");
                self.set_para(true);
                if *indent {
                    self.pop_indent()?;
                }
            }
            NodeKind::SimpleSection { kind } => self.simple_section_exit(*kind)?,
            NodeKind::Title => {
                self.put("\\par\n}");
                self.reset_style(StyleName::DescContinue)?;
                self.set_para(false);
            }
            NodeKind::SimpleList => {
                self.par_unless_para();
                self.put("}\n");
                self.set_para(true);
            }
            NodeKind::Section { .. } | NodeKind::HtmlList { .. } => {
                self.put("\\par}\n");
                self.set_para(true);
            }
            NodeKind::HtmlDescTitle => {
                self.put("\\par\n}\n");
                self.set_para(true);
            }
            NodeKind::HtmlDescData => {
                self.put("\\par}\n");
                self.pop_indent()?;
                self.set_para(true);
            }
            NodeKind::HtmlTable => {
                self.put("\\pard\\plain\n\\par\n");
                self.set_para(true);
            }
            NodeKind::HtmlCaption { .. } => self.put("}\n\\par\n"),
            NodeKind::HtmlRow { .. } => {
                self.put("\n");
                self.put(IN_TABLE);
                self.put("{\\row }\n");
                self.set_para(false);
            }
            NodeKind::HtmlCell { .. } => {
                self.put("\\cell }");
                self.set_para(false);
            }
            NodeKind::HyperlinkRef { .. } => {
                self.put(if self.config.hyperlinks { "}}}" } else { "}" });
            }
            NodeKind::HtmlHeader { .. } => {
                self.put("} \\par}\n");
                self.set_para(true);
            }
            NodeKind::Image { kind, inline, .. } => {
                self.picture_post(*kind == ImageKind::Rtf, node.has_caption(), *inline)?;
            }
            NodeKind::DotFile { .. } | NodeKind::MscFile { .. } | NodeKind::DiaFile { .. } => {
                self.picture_post(true, node.has_caption(), false)?;
            }
            NodeKind::Link { target } => self.end_link(&target.reference),
            NodeKind::Ref {
                target,
                is_sub_page,
                ..
            } => {
                if ref_links(target, *is_sub_page) {
                    self.end_link(&target.reference);
                }
            }
            NodeKind::SectionRefList => {
                self.pop_indent()?;
                self.put("\\par}\n");
                self.set_para(true);
            }
            NodeKind::ParamSection { .. } => {
                self.put("}\n");
                self.set_para(true);
            }
            NodeKind::ParamList { .. } => {
                self.put("\\cell }\n{\\row }\n");
                self.set_para(true);
            }
            NodeKind::CrossRefItem { title, .. } => self.cross_ref_exit(title)?,
            NodeKind::InternalRef { .. } => {
                self.end_link("");
                self.put(" ");
            }
            NodeKind::HtmlBlockQuote => {
                self.par_unless_para();
                self.pop_indent()?;
                self.put("}");
                self.set_para(true);
            }
            NodeKind::HtmlDescList
            | NodeKind::Internal
            | NodeKind::SectionRefItem
            | NodeKind::Copy
            | NodeKind::Text
            | NodeKind::ParBlock => {}
            leaf => return Err(RenderError::Dispatch { kind: leaf.name() }),
        }
        Ok(())
    }

    fn depth(&self) -> StateDepth {
        self.state.depth()
    }
}
