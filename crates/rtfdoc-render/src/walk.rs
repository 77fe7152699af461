//! Depth-first traversal shared by every renderer.

use rtfdoc_tree::DocNode;

use crate::RenderError;
use crate::state::StateDepth;

/// Node handlers of one output format.
///
/// Leaves get a single [`visit`](Self::visit). Compound nodes get
/// [`enter`](Self::enter), their children in order, then
/// [`exit`](Self::exit). `parent` is the node whose child list holds `node`.
pub trait DocVisitor {
    fn visit(&mut self, node: &DocNode, parent: Option<&DocNode>) -> Result<(), RenderError>;

    fn enter(&mut self, node: &DocNode, parent: Option<&DocNode>) -> Result<(), RenderError>;

    fn exit(&mut self, node: &DocNode, parent: Option<&DocNode>) -> Result<(), RenderError>;

    /// Current stack depths, used to check enter/exit symmetry.
    fn depth(&self) -> StateDepth;
}

/// Render `node` and its subtree with `visitor`.
///
/// # Errors
///
/// Propagates handler errors, and returns [`RenderError::Unbalanced`] when
/// a compound node leaves the indent or hidden stack at a different depth
/// than it found it.
pub fn walk<V: DocVisitor + ?Sized>(
    visitor: &mut V,
    node: &DocNode,
    parent: Option<&DocNode>,
) -> Result<(), RenderError> {
    if !node.kind.is_compound() {
        return visitor.visit(node, parent);
    }

    let before = visitor.depth();
    visitor.enter(node, parent)?;
    walk_children(visitor, node)?;
    visitor.exit(node, parent)?;
    let after = visitor.depth();

    if before != after {
        return Err(RenderError::Unbalanced {
            kind: node.kind.name(),
            before,
            after,
        });
    }
    Ok(())
}

/// Render the children of `node` in order.
///
/// Leaves that own children (diagram captions on verbatim blocks) call this
/// from their `visit` handler.
pub fn walk_children<V: DocVisitor + ?Sized>(
    visitor: &mut V,
    node: &DocNode,
) -> Result<(), RenderError> {
    for child in &node.children {
        walk(visitor, child, Some(node))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rtfdoc_tree::NodeKind;

    /// Records the call sequence; optionally leaks a push on one node kind.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        pushes: usize,
        leak_on: Option<&'static str>,
    }

    impl DocVisitor for Recorder {
        fn visit(&mut self, node: &DocNode, parent: Option<&DocNode>) -> Result<(), RenderError> {
            let parent = parent.map_or("-", |p| p.kind.name());
            self.calls.push(format!("visit {} in {parent}", node.kind.name()));
            Ok(())
        }

        fn enter(&mut self, node: &DocNode, _parent: Option<&DocNode>) -> Result<(), RenderError> {
            self.calls.push(format!("enter {}", node.kind.name()));
            if self.leak_on == Some(node.kind.name()) {
                self.pushes += 1;
            }
            Ok(())
        }

        fn exit(&mut self, node: &DocNode, _parent: Option<&DocNode>) -> Result<(), RenderError> {
            self.calls.push(format!("exit {}", node.kind.name()));
            Ok(())
        }

        fn depth(&self) -> StateDepth {
            StateDepth {
                indent: self.pushes,
                hidden: 0,
            }
        }
    }

    #[test]
    fn test_walk_order() {
        let tree = DocNode::root(vec![DocNode::paragraph(vec![
            DocNode::word("a"),
            DocNode::leaf(NodeKind::LineBreak),
        ])]);
        let mut recorder = Recorder::default();
        walk(&mut recorder, &tree, None).unwrap();
        assert_eq!(
            recorder.calls,
            vec![
                "enter Root",
                "enter Paragraph",
                "visit Word in Paragraph",
                "visit LineBreak in Paragraph",
                "exit Paragraph",
                "exit Root",
            ]
        );
    }

    #[test]
    fn test_unbalanced_node_reported() {
        let tree = DocNode::root(vec![DocNode::new(NodeKind::AutoListItem, vec![])]);
        let mut recorder = Recorder {
            leak_on: Some("AutoListItem"),
            ..Recorder::default()
        };
        let err = walk(&mut recorder, &tree, None).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Unbalanced {
                kind: "AutoListItem",
                ..
            }
        ));
    }
}
