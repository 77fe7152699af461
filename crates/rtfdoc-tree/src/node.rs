//! Tree nodes.

use crate::kinds::{
    CellAlign, ImageKind, IncOpKind, IncludeKind, LinkTarget, ParamDirection, ParamSectionKind,
    ParamToken, SimpleSectionKind, Style, VerbatimKind,
};

/// A node of the documentation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocNode {
    /// What this node represents, with its payload.
    pub kind: NodeKind,
    /// Ordered children. Always empty for leaf kinds.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<DocNode>,
}

/// Closed set of node kinds.
///
/// Leaf kinds come first, compound kinds follow. See [`NodeKind::is_compound`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // Leaves
    Word {
        text: String,
    },
    LinkedWord {
        text: String,
        target: LinkTarget,
    },
    WhiteSpace {
        chars: String,
    },
    /// Named entity such as `copy`, `alpha` or `BSlash`.
    Symbol {
        name: String,
    },
    Emoji {
        name: String,
        /// Resolved Unicode code points, empty if the name is unknown.
        #[cfg_attr(feature = "serde", serde(default))]
        code_points: Vec<u32>,
    },
    Url {
        url: String,
        #[cfg_attr(feature = "serde", serde(default))]
        is_email: bool,
    },
    LineBreak,
    HorizontalRule,
    StyleChange {
        style: Style,
        enable: bool,
    },
    /// Verbatim block. Diagram kinds own their caption as children.
    Verbatim {
        kind: VerbatimKind,
        text: String,
        /// Explicit source language, empty for the document default.
        #[cfg_attr(feature = "serde", serde(default))]
        language: String,
        #[cfg_attr(feature = "serde", serde(default))]
        context: String,
        #[cfg_attr(feature = "serde", serde(default))]
        is_example: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        example_file: String,
    },
    Anchor {
        file: String,
        anchor: String,
    },
    Include {
        kind: IncludeKind,
        file: String,
        text: String,
        /// Language extension of the included file, e.g. `.cpp`.
        #[cfg_attr(feature = "serde", serde(default))]
        extension: String,
        /// Snippet marker for `Snippet` and `SnipWithLines`.
        #[cfg_attr(feature = "serde", serde(default))]
        block_id: String,
        #[cfg_attr(feature = "serde", serde(default))]
        context: String,
        #[cfg_attr(feature = "serde", serde(default))]
        is_example: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        example_file: String,
    },
    /// One segment of an incrementally revealed include file.
    IncludeOperator {
        kind: IncOpKind,
        text: String,
        is_first: bool,
        is_last: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        include_file: String,
        #[cfg_attr(feature = "serde", serde(default))]
        context: String,
        #[cfg_attr(feature = "serde", serde(default))]
        is_example: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        example_file: String,
    },
    Formula {
        /// Image base name of the pre-rendered formula.
        name: String,
        #[cfg_attr(feature = "serde", serde(default))]
        rel_path: String,
        /// Formula source text.
        text: String,
        inline: bool,
    },
    IndexEntry {
        entry: String,
    },
    SectionSeparator,
    Citation {
        text: String,
        target: LinkTarget,
    },

    // Compounds
    AutoList {
        ordered: bool,
    },
    AutoListItem,
    Paragraph {
        /// Last paragraph of its parent.
        #[cfg_attr(feature = "serde", serde(default))]
        is_last: bool,
    },
    Root {
        /// Render the whole block one indent level deeper.
        #[cfg_attr(feature = "serde", serde(default))]
        indent: bool,
        /// Block is a single line, no closing paragraph break.
        #[cfg_attr(feature = "serde", serde(default))]
        single_line: bool,
    },
    SimpleSection {
        kind: SimpleSectionKind,
    },
    Title,
    SimpleList,
    SimpleListItem,
    Section {
        level: u8,
        title: String,
        file: String,
        anchor: String,
    },
    HtmlList {
        ordered: bool,
    },
    HtmlListItem,
    HtmlDescList,
    HtmlDescTitle,
    HtmlDescData,
    HtmlTable,
    HtmlCaption {
        #[cfg_attr(feature = "serde", serde(default))]
        file: String,
        #[cfg_attr(feature = "serde", serde(default))]
        anchor: String,
    },
    HtmlRow {
        /// Cell count, precomputed by the tree builder.
        num_cells: usize,
        #[cfg_attr(feature = "serde", serde(default))]
        is_heading: bool,
    },
    HtmlCell {
        #[cfg_attr(feature = "serde", serde(default))]
        align: CellAlign,
    },
    Internal,
    HyperlinkRef {
        url: String,
    },
    HtmlHeader {
        level: u8,
    },
    /// Image; children form the caption.
    Image {
        kind: ImageKind,
        name: String,
        #[cfg_attr(feature = "serde", serde(default))]
        inline: bool,
    },
    DotFile {
        file: String,
    },
    MscFile {
        file: String,
    },
    DiaFile {
        file: String,
    },
    Link {
        target: LinkTarget,
    },
    Ref {
        target: LinkTarget,
        #[cfg_attr(feature = "serde", serde(default))]
        is_sub_page: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        has_link_text: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        target_title: String,
    },
    SectionRefItem,
    SectionRefList,
    ParamSection {
        kind: ParamSectionKind,
        #[cfg_attr(feature = "serde", serde(default))]
        has_in_out: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        has_type: bool,
    },
    ParamList {
        #[cfg_attr(feature = "serde", serde(default))]
        direction: ParamDirection,
        #[cfg_attr(feature = "serde", serde(default))]
        types: Vec<ParamToken>,
        params: Vec<ParamToken>,
    },
    CrossRefItem {
        title: String,
        file: String,
        anchor: String,
    },
    InternalRef {
        file: String,
        anchor: String,
    },
    Copy,
    Text,
    HtmlBlockQuote,
    ParBlock,
}

impl NodeKind {
    /// Whether nodes of this kind are visited with an enter/exit pair.
    #[must_use]
    pub fn is_compound(&self) -> bool {
        match self {
            Self::Word { .. }
            | Self::LinkedWord { .. }
            | Self::WhiteSpace { .. }
            | Self::Symbol { .. }
            | Self::Emoji { .. }
            | Self::Url { .. }
            | Self::LineBreak
            | Self::HorizontalRule
            | Self::StyleChange { .. }
            | Self::Verbatim { .. }
            | Self::Anchor { .. }
            | Self::Include { .. }
            | Self::IncludeOperator { .. }
            | Self::Formula { .. }
            | Self::IndexEntry { .. }
            | Self::SectionSeparator
            | Self::Citation { .. } => false,
            Self::AutoList { .. }
            | Self::AutoListItem
            | Self::Paragraph { .. }
            | Self::Root { .. }
            | Self::SimpleSection { .. }
            | Self::Title
            | Self::SimpleList
            | Self::SimpleListItem
            | Self::Section { .. }
            | Self::HtmlList { .. }
            | Self::HtmlListItem
            | Self::HtmlDescList
            | Self::HtmlDescTitle
            | Self::HtmlDescData
            | Self::HtmlTable
            | Self::HtmlCaption { .. }
            | Self::HtmlRow { .. }
            | Self::HtmlCell { .. }
            | Self::Internal
            | Self::HyperlinkRef { .. }
            | Self::HtmlHeader { .. }
            | Self::Image { .. }
            | Self::DotFile { .. }
            | Self::MscFile { .. }
            | Self::DiaFile { .. }
            | Self::Link { .. }
            | Self::Ref { .. }
            | Self::SectionRefItem
            | Self::SectionRefList
            | Self::ParamSection { .. }
            | Self::ParamList { .. }
            | Self::CrossRefItem { .. }
            | Self::InternalRef { .. }
            | Self::Copy
            | Self::Text
            | Self::HtmlBlockQuote
            | Self::ParBlock => true,
        }
    }

    /// Short kind name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Word { .. } => "Word",
            Self::LinkedWord { .. } => "LinkedWord",
            Self::WhiteSpace { .. } => "WhiteSpace",
            Self::Symbol { .. } => "Symbol",
            Self::Emoji { .. } => "Emoji",
            Self::Url { .. } => "Url",
            Self::LineBreak => "LineBreak",
            Self::HorizontalRule => "HorizontalRule",
            Self::StyleChange { .. } => "StyleChange",
            Self::Verbatim { .. } => "Verbatim",
            Self::Anchor { .. } => "Anchor",
            Self::Include { .. } => "Include",
            Self::IncludeOperator { .. } => "IncludeOperator",
            Self::Formula { .. } => "Formula",
            Self::IndexEntry { .. } => "IndexEntry",
            Self::SectionSeparator => "SectionSeparator",
            Self::Citation { .. } => "Citation",
            Self::AutoList { .. } => "AutoList",
            Self::AutoListItem => "AutoListItem",
            Self::Paragraph { .. } => "Paragraph",
            Self::Root { .. } => "Root",
            Self::SimpleSection { .. } => "SimpleSection",
            Self::Title => "Title",
            Self::SimpleList => "SimpleList",
            Self::SimpleListItem => "SimpleListItem",
            Self::Section { .. } => "Section",
            Self::HtmlList { .. } => "HtmlList",
            Self::HtmlListItem => "HtmlListItem",
            Self::HtmlDescList => "HtmlDescList",
            Self::HtmlDescTitle => "HtmlDescTitle",
            Self::HtmlDescData => "HtmlDescData",
            Self::HtmlTable => "HtmlTable",
            Self::HtmlCaption { .. } => "HtmlCaption",
            Self::HtmlRow { .. } => "HtmlRow",
            Self::HtmlCell { .. } => "HtmlCell",
            Self::Internal => "Internal",
            Self::HyperlinkRef { .. } => "HyperlinkRef",
            Self::HtmlHeader { .. } => "HtmlHeader",
            Self::Image { .. } => "Image",
            Self::DotFile { .. } => "DotFile",
            Self::MscFile { .. } => "MscFile",
            Self::DiaFile { .. } => "DiaFile",
            Self::Link { .. } => "Link",
            Self::Ref { .. } => "Ref",
            Self::SectionRefItem => "SectionRefItem",
            Self::SectionRefList => "SectionRefList",
            Self::ParamSection { .. } => "ParamSection",
            Self::ParamList { .. } => "ParamList",
            Self::CrossRefItem { .. } => "CrossRefItem",
            Self::InternalRef { .. } => "InternalRef",
            Self::Copy => "Copy",
            Self::Text => "Text",
            Self::HtmlBlockQuote => "HtmlBlockQuote",
            Self::ParBlock => "ParBlock",
        }
    }
}

impl DocNode {
    /// Create a node with children.
    #[must_use]
    pub fn new(kind: NodeKind, children: Vec<DocNode>) -> Self {
        Self { kind, children }
    }

    /// Create a node without children.
    #[must_use]
    pub fn leaf(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Plain word.
    #[must_use]
    pub fn word(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Word { text: text.into() })
    }

    /// Single space.
    #[must_use]
    pub fn whitespace() -> Self {
        Self::leaf(NodeKind::WhiteSpace {
            chars: " ".to_owned(),
        })
    }

    /// Paragraph that is not the last one of its parent.
    #[must_use]
    pub fn paragraph(children: Vec<DocNode>) -> Self {
        Self::new(NodeKind::Paragraph { is_last: false }, children)
    }

    /// Top-level documentation block.
    #[must_use]
    pub fn root(children: Vec<DocNode>) -> Self {
        Self::new(
            NodeKind::Root {
                indent: false,
                single_line: false,
            },
            children,
        )
    }

    /// Whether the node carries a caption (any child at all).
    ///
    /// Meaningful for images, diagram files and diagram verbatim blocks.
    #[must_use]
    pub fn has_caption(&self) -> bool {
        !self.children.is_empty()
    }

    /// The `HtmlCaption` child of a table, if any.
    #[must_use]
    pub fn html_caption(&self) -> Option<&DocNode> {
        self.children
            .iter()
            .find(|c| matches!(c.kind, NodeKind::HtmlCaption { .. }))
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DocNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_leaf_and_compound_split() {
        assert!(!NodeKind::LineBreak.is_compound());
        assert!(!NodeKind::Word { text: "x".into() }.is_compound());
        assert!(NodeKind::Paragraph { is_last: true }.is_compound());
        assert!(NodeKind::HtmlRow {
            num_cells: 2,
            is_heading: false
        }
        .is_compound());
    }

    #[test]
    fn test_subtree_len() {
        let tree = DocNode::root(vec![DocNode::paragraph(vec![
            DocNode::word("a"),
            DocNode::whitespace(),
            DocNode::word("b"),
        ])]);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_html_caption() {
        let table = DocNode::new(
            NodeKind::HtmlTable,
            vec![
                DocNode::new(
                    NodeKind::HtmlCaption {
                        file: "a.rtf".into(),
                        anchor: "t1".into(),
                    },
                    vec![DocNode::word("Caption")],
                ),
                DocNode::new(
                    NodeKind::HtmlRow {
                        num_cells: 0,
                        is_heading: false,
                    },
                    vec![],
                ),
            ],
        );
        let caption = table.html_caption().unwrap();
        assert_eq!(caption.children, vec![DocNode::word("Caption")]);
        assert!(DocNode::new(NodeKind::HtmlTable, vec![]).html_caption().is_none());
    }

    #[test]
    fn test_has_caption() {
        let bare = DocNode::leaf(NodeKind::DotFile {
            file: "g.dot".into(),
        });
        assert!(!bare.has_caption());
        let captioned = DocNode::new(
            NodeKind::DotFile {
                file: "g.dot".into(),
            },
            vec![DocNode::word("Graph")],
        );
        assert!(captioned.has_caption());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_json_tree() {
        let json = r#"{
            "kind": {"Root": {}},
            "children": [
                {"kind": {"Paragraph": {"is_last": true}}, "children": [
                    {"kind": {"Word": {"text": "Hello"}}},
                    {"kind": "LineBreak"},
                    {"kind": {"Verbatim": {"kind": "Code", "text": "int x;", "language": "cpp"}}}
                ]}
            ]
        }"#;
        let tree: DocNode = serde_json::from_str(json).unwrap();
        assert_eq!(
            tree.kind,
            NodeKind::Root {
                indent: false,
                single_line: false
            }
        );
        let para = &tree.children[0];
        assert_eq!(para.children[0], DocNode::word("Hello"));
        assert_eq!(para.children[1].kind, NodeKind::LineBreak);
        match &para.children[2].kind {
            NodeKind::Verbatim {
                kind,
                language,
                is_example,
                ..
            } => {
                assert_eq!(*kind, VerbatimKind::Code);
                assert_eq!(language, "cpp");
                assert!(!is_example);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
