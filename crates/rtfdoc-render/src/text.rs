//! Plain-text rendering, used for tooltips, bookmarks and index terms.

use rtfdoc_tree::{DocNode, IncOpKind, IncludeKind, NodeKind, VerbatimKind};

use crate::services::extract_block;
use crate::state::{HiddenStack, StateDepth};
use crate::symbol::symbol_text;
use crate::walk::DocVisitor;
use crate::{RenderError, RenderResult};

pub(crate) struct TextVisitor<'a> {
    out: &'a mut String,
    hidden: HiddenStack,
    warnings: Vec<String>,
}

impl<'a> TextVisitor<'a> {
    pub(crate) fn new(out: &'a mut String) -> Self {
        Self {
            out,
            hidden: HiddenStack::default(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> RenderResult {
        RenderResult {
            warnings: self.warnings,
            images: Vec::new(),
        }
    }

    /// Append `text` with line breaks folded into spaces.
    fn put(&mut self, text: &str) {
        if self.hidden.is_hidden() {
            return;
        }
        for c in text.chars() {
            self.out.push(if c == '\n' { ' ' } else { c });
        }
    }
}

impl DocVisitor for TextVisitor<'_> {
    fn visit(&mut self, node: &DocNode, _parent: Option<&DocNode>) -> Result<(), RenderError> {
        if self.hidden.is_hidden() {
            return Ok(());
        }
        match &node.kind {
            NodeKind::Word { text }
            | NodeKind::LinkedWord { text, .. }
            | NodeKind::Formula { text, .. }
            | NodeKind::Citation { text, .. } => self.put(text),
            NodeKind::Url { url, .. } => self.put(url),
            NodeKind::WhiteSpace { .. } | NodeKind::LineBreak => self.put(" "),
            NodeKind::Symbol { name } => match symbol_text(name) {
                Some(text) => self.put(text),
                None => {
                    tracing::warn!(symbol = %name, "Unsupported symbol");
                    self.warnings
                        .push(format!("Unsupported symbol &{name}; in text output"));
                }
            },
            NodeKind::Emoji { name, code_points } => {
                let text: String = code_points.iter().filter_map(|&cp| char::from_u32(cp)).collect();
                self.put(if text.is_empty() { name } else { &text });
            }
            NodeKind::Verbatim { kind, text, .. } => {
                if matches!(kind, VerbatimKind::Code | VerbatimKind::Verbatim) {
                    self.put(text);
                }
            }
            NodeKind::Include {
                kind,
                text,
                block_id,
                ..
            } => match kind {
                IncludeKind::Include | IncludeKind::IncWithLines | IncludeKind::VerbInclude => {
                    self.put(text);
                }
                IncludeKind::Snippet | IncludeKind::SnipWithLines => {
                    self.put(extract_block(text, block_id));
                }
                _ => {}
            },
            NodeKind::IncludeOperator { kind, text, .. } => {
                if *kind != IncOpKind::Skip {
                    self.put(text);
                }
            }
            NodeKind::HorizontalRule
            | NodeKind::StyleChange { .. }
            | NodeKind::Anchor { .. }
            | NodeKind::IndexEntry { .. }
            | NodeKind::SectionSeparator => {}
            compound => return Err(RenderError::Dispatch { kind: compound.name() }),
        }
        Ok(())
    }

    fn enter(&mut self, node: &DocNode, _parent: Option<&DocNode>) -> Result<(), RenderError> {
        match &node.kind {
            NodeKind::Section { title, .. } => {
                self.put(title);
                self.put(" ");
            }
            NodeKind::Ref {
                has_link_text,
                target_title,
                ..
            } => {
                if !has_link_text {
                    self.put(target_title);
                }
            }
            NodeKind::CrossRefItem { title, .. } => {
                if title.is_empty() {
                    self.hidden.push_and_hide();
                } else {
                    self.put(title);
                    self.put(": ");
                }
            }
            NodeKind::Image { .. }
            | NodeKind::DotFile { .. }
            | NodeKind::MscFile { .. }
            | NodeKind::DiaFile { .. } => self.hidden.push_and_hide(),
            kind if !kind.is_compound() => {
                return Err(RenderError::Dispatch { kind: kind.name() });
            }
            _ => {}
        }
        Ok(())
    }

    fn exit(&mut self, node: &DocNode, _parent: Option<&DocNode>) -> Result<(), RenderError> {
        match &node.kind {
            NodeKind::Paragraph { is_last } => {
                if !is_last {
                    self.put(" ");
                }
            }
            NodeKind::CrossRefItem { title, .. } => {
                if title.is_empty() {
                    self.hidden.pop()?;
                }
            }
            NodeKind::Image { .. }
            | NodeKind::DotFile { .. }
            | NodeKind::MscFile { .. }
            | NodeKind::DiaFile { .. } => self.hidden.pop()?,
            kind if !kind.is_compound() => {
                return Err(RenderError::Dispatch { kind: kind.name() });
            }
            _ => {}
        }
        Ok(())
    }

    fn depth(&self) -> StateDepth {
        StateDepth {
            indent: 0,
            hidden: self.hidden.depth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_text;
    use pretty_assertions::assert_eq;
    use rtfdoc_tree::{ImageKind, LinkTarget};

    fn text_of(tree: &DocNode) -> (String, RenderResult) {
        let mut out = String::new();
        let result = render_text(tree, &mut out).unwrap();
        (out, result)
    }

    #[test]
    fn test_words_and_paragraphs() {
        let tree = DocNode::root(vec![
            DocNode::paragraph(vec![
                DocNode::word("Hello"),
                DocNode::whitespace(),
                DocNode::leaf(NodeKind::LinkedWord {
                    text: "Foo".into(),
                    target: LinkTarget::local("classFoo", ""),
                }),
            ]),
            DocNode::new(
                NodeKind::Paragraph { is_last: true },
                vec![DocNode::leaf(NodeKind::Symbol { name: "copy".into() })],
            ),
        ]);
        let (out, result) = text_of(&tree);
        assert_eq!(out, "Hello Foo \u{a9}");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_image_caption_is_hidden() {
        let tree = DocNode::root(vec![DocNode::new(
            NodeKind::Image {
                kind: ImageKind::Rtf,
                name: "a.png".into(),
                inline: false,
            },
            vec![DocNode::word("caption")],
        )]);
        let (out, _) = text_of(&tree);
        assert_eq!(out, "");
    }

    #[test]
    fn test_code_newlines_fold() {
        let tree = DocNode::root(vec![DocNode::leaf(NodeKind::Verbatim {
            kind: VerbatimKind::Code,
            text: "int a;\nint b;".into(),
            language: String::new(),
            context: String::new(),
            is_example: false,
            example_file: String::new(),
        })]);
        let (out, _) = text_of(&tree);
        assert_eq!(out, "int a; int b;");
    }

    #[test]
    fn test_unknown_symbol_warns() {
        let tree = DocNode::root(vec![DocNode::leaf(NodeKind::Symbol {
            name: "bogus".into(),
        })]);
        let (out, result) = text_of(&tree);
        assert_eq!(out, "");
        assert_eq!(result.warnings, vec!["Unsupported symbol &bogus; in text output"]);
    }

    #[test]
    fn test_cross_ref_item_title() {
        let tree = DocNode::root(vec![DocNode::new(
            NodeKind::CrossRefItem {
                title: "Todo".into(),
                file: "todo".into(),
                anchor: "t1".into(),
            },
            vec![DocNode::word("fix it")],
        )]);
        let (out, _) = text_of(&tree);
        assert_eq!(out, "Todo: fix it");
    }
}
