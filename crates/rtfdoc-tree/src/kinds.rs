//! Payload types carried by [`NodeKind`](crate::NodeKind) variants.

/// Target of a cross-reference.
///
/// `reference` is non-empty when the target lives in an externally resolved
/// documentation set; such links are never rendered as live hyperlinks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkTarget {
    /// External documentation set tag.
    pub reference: String,
    /// Output file holding the target.
    pub file: String,
    /// Anchor inside `file`.
    pub anchor: String,
}

impl LinkTarget {
    /// Target inside the current documentation set.
    #[must_use]
    pub fn local(file: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            reference: String::new(),
            file: file.into(),
            anchor: anchor.into(),
        }
    }

    /// Target in an external documentation set.
    #[must_use]
    pub fn external(
        reference: impl Into<String>,
        file: impl Into<String>,
        anchor: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            file: file.into(),
            anchor: anchor.into(),
        }
    }

    /// Whether the target resolves outside this documentation set.
    #[must_use]
    pub fn is_external(&self) -> bool {
        !self.reference.is_empty()
    }
}

/// Inline or block style toggled by a `StyleChange` node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Style {
    Bold,
    Italic,
    Code,
    Center,
    Small,
    Subscript,
    Superscript,
    Preformatted,
    Span,
    Div,
    Strike,
    Underline,
    Del,
    Ins,
    S,
    Cite,
    Details,
    Summary,
}

/// Kind of a verbatim block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerbatimKind {
    /// Source code, rendered through a highlighter.
    Code,
    /// Preformatted text, escaped.
    Verbatim,
    HtmlOnly,
    LatexOnly,
    RtfOnly,
    ManOnly,
    XmlOnly,
    DocbookOnly,
    /// Inline graphviz graph.
    Dot,
    /// Inline message sequence chart.
    Msc,
    /// Inline `PlantUML` diagram.
    PlantUml,
}

impl VerbatimKind {
    /// Whether the text is only meant for one output format.
    #[must_use]
    pub fn is_format_only(self) -> bool {
        matches!(
            self,
            Self::HtmlOnly
                | Self::LatexOnly
                | Self::RtfOnly
                | Self::ManOnly
                | Self::XmlOnly
                | Self::DocbookOnly
        )
    }
}

/// Kind of an include command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IncludeKind {
    Include,
    IncWithLines,
    DontInclude,
    DontIncWithLines,
    VerbInclude,
    HtmlInclude,
    LatexInclude,
    RtfInclude,
    ManInclude,
    XmlInclude,
    DocbookInclude,
    Snippet,
    SnipWithLines,
    /// Documentation include, expanded by the parser before rendering.
    IncludeDoc,
    /// Documentation snippet, expanded by the parser before rendering.
    SnippetDoc,
}

/// Segment type of an include-operator sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IncOpKind {
    Line,
    SkipLine,
    Skip,
    Until,
}

/// Output format an image is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageKind {
    Html,
    Latex,
    Rtf,
    DocBook,
}

/// Kind of a simple section (`@see`, `@return`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimpleSectionKind {
    Unknown,
    See,
    Return,
    Author,
    Authors,
    Version,
    Since,
    Date,
    Note,
    Warning,
    Copyright,
    Pre,
    Post,
    Invar,
    Remark,
    Attention,
    /// User-defined section; the title comes from a `Title` child.
    User,
    /// Revision control keyword; the title comes from a `Title` child.
    Rcs,
}

impl SimpleSectionKind {
    /// Whether the section title is supplied by a `Title` child.
    #[must_use]
    pub fn has_custom_title(self) -> bool {
        matches!(self, Self::User | Self::Rcs)
    }
}

/// Kind of a parameter section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamSectionKind {
    Param,
    RetVal,
    Exception,
    TemplateParam,
}

/// Data flow direction of a documented parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamDirection {
    #[default]
    Unspecified,
    In,
    Out,
    InOut,
}

impl ParamDirection {
    /// Label shown in the direction column, `None` when unspecified.
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::In => Some("in"),
            Self::Out => Some("out"),
            Self::InOut => Some("in,out"),
        }
    }
}

/// One token of a parameter name list or type list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamToken {
    Word { text: String },
    LinkedWord { text: String, target: LinkTarget },
    /// Separator between alternative types, e.g. `|`.
    Separator { chars: String },
}

/// Horizontal alignment of a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellAlign {
    #[default]
    Left,
    Center,
    Right,
}
