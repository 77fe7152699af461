//! RTF rendering of documentation trees.
//!
//! [`render_document`] walks a [`DocNode`] tree and appends an RTF body
//! fragment to a string; [`render_standalone`] wraps it in a complete
//! document with font, color and style tables. [`render_text`] renders the
//! same tree as plain text for tooltips and index entries.
//!
//! Rendering never fails on content: unknown symbols, languages without a
//! highlighter and failing diagram tools produce warnings in the returned
//! [`RenderResult`]. Only structural faults are errors (see [`RenderError`]).
//!
//! # Example
//!
//! ```
//! use rtfdoc_render::{FormatConfig, Services, render_document};
//! use rtfdoc_tree::DocNode;
//!
//! let tree = DocNode::root(vec![DocNode::paragraph(vec![
//!     DocNode::word("Hello"),
//!     DocNode::whitespace(),
//!     DocNode::word("{world}"),
//! ])]);
//! let mut out = String::new();
//! let result = render_document(&tree, &mut out, &FormatConfig::default(), &Services::default())
//!     .unwrap();
//! assert!(out.contains("Hello \\{world\\}"));
//! assert!(result.warnings.is_empty());
//! ```

mod config;
mod diagram;
mod document;
mod error;
mod escape;
mod link;
mod rtf;
mod services;
mod state;
mod symbol;
mod table;
mod text;
mod walk;

use std::path::PathBuf;

use rtfdoc_tree::DocNode;

pub use config::FormatConfig;
pub use diagram::{
    CommandRasterizer, DiagramCounters, DiagramError, DiagramKind, DiagramRasterizer,
    InlineDiagram, RasterRequest,
};
pub use document::{render_standalone, write_stylesheet};
pub use error::RenderError;
pub use escape::{escape_rtf, format_bookmark, join_anchor, push_escaped, strip_path};
pub use link::{bookmark, close_link, open_link, open_url};
pub use services::{
    CodeFragment, CodeHighlighter, EnglishTranslator, Highlighters, PlainHighlighter, Services,
    TranslationKey, Translator, extract_block, language_of_file, line_block,
};
pub use state::StateDepth;
pub use symbol::{push_rtf_char, push_symbol, symbol_text};
pub use table::{cell_width, column_stops, param_column_percentages, param_column_stops};
pub use walk::{DocVisitor, walk, walk_children};

/// Non-fatal outcome of a render.
#[derive(Debug, Default)]
pub struct RenderResult {
    /// Content problems, in document order.
    pub warnings: Vec<String>,
    /// Diagram images produced during the render.
    pub images: Vec<PathBuf>,
}

/// Render `root` as an RTF body fragment appended to `out`.
///
/// # Errors
///
/// Returns [`RenderError`] on a structural fault: unbalanced state, a node
/// kind reaching the wrong handler, or a missing style. `out` may then hold
/// a partial fragment.
pub fn render_document(
    root: &DocNode,
    out: &mut String,
    config: &FormatConfig,
    services: &Services,
) -> Result<RenderResult, RenderError> {
    let mut visitor = rtf::RtfVisitor::new(out, config, services);
    walk(&mut visitor, root, None)?;
    Ok(visitor.finish())
}

/// Render `root` as plain text appended to `out`.
///
/// # Errors
///
/// Same structural faults as [`render_document`].
pub fn render_text(root: &DocNode, out: &mut String) -> Result<RenderResult, RenderError> {
    let mut visitor = text::TextVisitor::new(out);
    walk(&mut visitor, root, None)?;
    Ok(visitor.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rtfdoc_style::StyleName;
    use rtfdoc_tree::{
        CellAlign, ImageKind, IncOpKind, LinkTarget, NodeKind, SimpleSectionKind, VerbatimKind,
    };

    fn render(tree: &DocNode) -> (String, RenderResult) {
        let mut out = String::new();
        let result =
            render_document(tree, &mut out, &FormatConfig::default(), &Services::default())
                .unwrap();
        (out, result)
    }

    fn style(name: StyleName, level: usize) -> String {
        FormatConfig::default()
            .styles
            .reference(name, level)
            .unwrap()
            .to_owned()
    }

    fn node(kind: NodeKind, children: Vec<DocNode>) -> DocNode {
        DocNode::new(kind, children)
    }

    fn list(ordered: bool, items: Vec<DocNode>) -> DocNode {
        node(NodeKind::AutoList { ordered }, items)
    }

    fn item(children: Vec<DocNode>) -> DocNode {
        node(NodeKind::AutoListItem, children)
    }

    fn markers(out: &str) -> Vec<u32> {
        out.split(".\\tab ")
            .filter_map(|part| {
                let digits: String = part
                    .chars()
                    .rev()
                    .take_while(char::is_ascii_digit)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                digits.parse().ok()
            })
            .collect()
    }

    /// A tree using every compound kind.
    fn kitchen_sink() -> DocNode {
        let caption = |text: &str| vec![DocNode::word(text)];
        DocNode::root(vec![
            node(
                NodeKind::Section {
                    level: 1,
                    title: "Intro".into(),
                    file: "index".into(),
                    anchor: "intro".into(),
                },
                vec![
                    DocNode::paragraph(vec![DocNode::word("Text")]),
                    list(true, vec![item(vec![list(false, vec![item(vec![DocNode::word("x")])])])]),
                    node(
                        NodeKind::SimpleSection { kind: SimpleSectionKind::Note },
                        vec![DocNode::paragraph(vec![DocNode::word("n")])],
                    ),
                    node(
                        NodeKind::SimpleSection { kind: SimpleSectionKind::User },
                        vec![
                            node(NodeKind::Title, vec![DocNode::word("Custom")]),
                            DocNode::paragraph(vec![DocNode::word("u")]),
                        ],
                    ),
                    node(
                        NodeKind::SimpleList,
                        vec![node(NodeKind::SimpleListItem, vec![DocNode::word("s")])],
                    ),
                    node(
                        NodeKind::HtmlList { ordered: true },
                        vec![node(NodeKind::HtmlListItem, vec![DocNode::word("h")])],
                    ),
                    node(
                        NodeKind::HtmlDescList,
                        vec![
                            node(NodeKind::HtmlDescTitle, vec![DocNode::word("t")]),
                            node(NodeKind::HtmlDescData, vec![DocNode::word("d")]),
                        ],
                    ),
                    node(
                        NodeKind::HtmlTable,
                        vec![
                            node(
                                NodeKind::HtmlCaption {
                                    file: "index".into(),
                                    anchor: "tbl".into(),
                                },
                                caption("Table caption"),
                            ),
                            node(
                                NodeKind::HtmlRow { num_cells: 2, is_heading: true },
                                vec![
                                    node(NodeKind::HtmlCell { align: CellAlign::Left }, caption("a")),
                                    node(NodeKind::HtmlCell { align: CellAlign::Right }, caption("b")),
                                ],
                            ),
                        ],
                    ),
                    node(NodeKind::Internal, vec![DocNode::word("i")]),
                    node(
                        NodeKind::HyperlinkRef { url: "https://example.com".into() },
                        caption("site"),
                    ),
                    node(NodeKind::HtmlHeader { level: 2 }, caption("Header")),
                    node(
                        NodeKind::Image {
                            kind: ImageKind::Rtf,
                            name: "pic.png".into(),
                            inline: false,
                        },
                        caption("Picture"),
                    ),
                    node(
                        NodeKind::Image {
                            kind: ImageKind::Html,
                            name: "pic.png".into(),
                            inline: false,
                        },
                        caption("Hidden"),
                    ),
                    node(
                        NodeKind::Link { target: LinkTarget::local("classA", "a1") },
                        caption("A"),
                    ),
                    node(
                        NodeKind::Ref {
                            target: LinkTarget::local("classB", ""),
                            is_sub_page: false,
                            has_link_text: false,
                            target_title: "B".into(),
                        },
                        vec![],
                    ),
                    node(
                        NodeKind::SectionRefList,
                        vec![node(NodeKind::SectionRefItem, caption("item"))],
                    ),
                    node(
                        NodeKind::CrossRefItem {
                            title: "Todo".into(),
                            file: "todo".into(),
                            anchor: "t1".into(),
                        },
                        caption("fix"),
                    ),
                    node(
                        NodeKind::CrossRefItem {
                            title: String::new(),
                            file: "todo".into(),
                            anchor: "t2".into(),
                        },
                        caption("invisible"),
                    ),
                    node(
                        NodeKind::InternalRef { file: "page".into(), anchor: "p1".into() },
                        caption("p"),
                    ),
                    node(NodeKind::Copy, vec![]),
                    node(NodeKind::Text, caption("txt")),
                    node(NodeKind::HtmlBlockQuote, caption("quote")),
                    node(NodeKind::ParBlock, vec![DocNode::paragraph(caption("pb"))]),
                ],
            ),
        ])
    }

    #[test]
    fn test_hello_world_has_single_paragraph_break() {
        let tree = DocNode::root(vec![node(
            NodeKind::Paragraph { is_last: true },
            vec![DocNode::word("Hello"), DocNode::whitespace(), DocNode::word("World")],
        )]);
        let (out, result) = render(&tree);
        assert_eq!(
            out,
            format!("{{{}\nHello World\\par\n}}", style(StyleName::BodyText, 0))
        );
        assert_eq!(out.matches("\\par").count(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_every_compound_kind_is_balanced() {
        let tree = kitchen_sink();
        let (out, result) = render(&tree);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert!(out.starts_with('{'));
        assert!(out.ends_with('}'));
        assert!(!out.contains("Hidden"));
        assert!(!out.contains("invisible"));
    }

    #[test]
    fn test_hidden_region_emits_nothing() {
        let secret = node(
            NodeKind::Image {
                kind: ImageKind::Latex,
                name: "f.eps".into(),
                inline: false,
            },
            vec![
                DocNode::word("SECRET"),
                list(true, vec![item(vec![DocNode::word("deep")])]),
                node(
                    NodeKind::Verbatim {
                        kind: VerbatimKind::RtfOnly,
                        text: "RAW".into(),
                        language: String::new(),
                        context: String::new(),
                        is_example: false,
                        example_file: String::new(),
                    },
                    vec![],
                ),
            ],
        );
        let (with_secret, _) = render(&DocNode::root(vec![secret]));
        let (empty, _) = render(&DocNode::root(vec![]));
        assert_eq!(with_secret, empty);
    }

    #[test]
    fn test_inline_rtf_image_hides_caption() {
        let tree = DocNode::root(vec![DocNode::paragraph(vec![node(
            NodeKind::Image {
                kind: ImageKind::Rtf,
                name: "icon.png".into(),
                inline: true,
            },
            vec![DocNode::word("caption")],
        )])]);
        let (out, _) = render(&tree);
        assert!(out.contains("INCLUDEPICTURE \"icon.png\""));
        assert!(!out.contains("caption"));
    }

    #[test]
    fn test_ordered_list_output() {
        let tree = DocNode::root(vec![list(
            true,
            vec![item(vec![DocNode::word("a")]), item(vec![DocNode::word("b")])],
        )]);
        let (out, _) = render(&tree);
        let enumerated = style(StyleName::ListEnum, 0);
        assert_eq!(
            out,
            format!(
                "{{{body}\n{{\n\\par\n\\pard\\plain {enumerated}\n1.\\tab a\\par\n\\pard\\plain {enumerated}\n2.\\tab b\\par}}\n\\par\n}}",
                body = style(StyleName::BodyText, 0),
            )
        );
    }

    #[test]
    fn test_nested_list_numbering() {
        let tree = DocNode::root(vec![list(
            true,
            vec![
                item(vec![
                    DocNode::paragraph(vec![DocNode::word("a")]),
                    list(
                        false,
                        vec![item(vec![
                            DocNode::word("b"),
                            list(
                                true,
                                vec![
                                    item(vec![DocNode::word("c1")]),
                                    item(vec![DocNode::word("c2")]),
                                ],
                            ),
                        ])],
                    ),
                ]),
                item(vec![DocNode::word("d")]),
            ],
        )]);
        let (out, _) = render(&tree);
        assert_eq!(markers(&out), vec![1, 1, 2, 2]);
        assert!(out.contains(&style(StyleName::ListBullet, 1)));
        assert!(out.contains(&style(StyleName::ListEnum, 2)));
    }

    #[test]
    fn test_indent_overflow_warns_and_saturates() {
        let mut tree = DocNode::word("leaf");
        for _ in 0..12 {
            tree = list(false, vec![item(vec![tree])]);
        }
        let (out, result) = render(&DocNode::root(vec![tree]));
        assert!(out.contains("leaf"));
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w == "Maximum indent level (10) exceeded while generating RTF output")
        );
    }

    #[test]
    fn test_include_operator_sequence() {
        let op = |kind, text: &str, is_first, is_last| {
            DocNode::leaf(NodeKind::IncludeOperator {
                kind,
                text: text.into(),
                is_first,
                is_last,
                include_file: String::new(),
                context: String::new(),
                is_example: false,
                example_file: String::new(),
            })
        };
        let tree = DocNode::root(vec![node(
            NodeKind::Paragraph { is_last: true },
            vec![
                op(IncOpKind::Skip, "skipped one", true, false),
                op(IncOpKind::Line, "X", false, false),
                op(IncOpKind::Skip, "skipped two", false, true),
            ],
        )]);
        let (out, _) = render(&tree);
        assert_eq!(
            out,
            format!(
                "{{{}\n{{\n\\par\n\\pard\\plain {}X\\par}}\n}}",
                style(StyleName::BodyText, 0),
                style(StyleName::CodeExample, 0)
            )
        );
    }

    #[test]
    fn test_rtf_only_passthrough() {
        let tree = DocNode::root(vec![DocNode::leaf(NodeKind::Verbatim {
            kind: VerbatimKind::RtfOnly,
            text: "{\\b raw}".into(),
            language: String::new(),
            context: String::new(),
            is_example: false,
            example_file: String::new(),
        })]);
        let (out, _) = render(&tree);
        assert!(out.contains("{\\b raw}"));

        let mut text = String::new();
        render_text(&tree, &mut text).unwrap();
        assert!(!text.contains("raw"));
    }

    #[test]
    fn test_table_column_stops() {
        let cell = || node(NodeKind::HtmlCell { align: CellAlign::Center }, vec![]);
        let tree = DocNode::root(vec![node(
            NodeKind::HtmlTable,
            vec![node(
                NodeKind::HtmlRow { num_cells: 3, is_heading: false },
                vec![cell(), cell(), cell()],
            )],
        )]);
        let (out, _) = render(&tree);
        for stop in ["\\cellx2916\n", "\\cellx5832\n", "\\cellx8748\n"] {
            assert!(out.contains(stop), "missing {stop:?}");
        }
        assert_eq!(out.matches("{\\qc \\cell }").count(), 3);
        assert!(!out.contains("\\clcbpat16"));
    }

    #[test]
    fn test_escaping_identity() {
        let text = "a{b}c\\d";
        let tree = DocNode::root(vec![DocNode::paragraph(vec![DocNode::word(text)])]);
        let (out, _) = render(&tree);
        assert!(out.contains(&escape_rtf(text, false)));
        assert!(out.contains("a\\{b\\}c\\\\d"));
    }
}
