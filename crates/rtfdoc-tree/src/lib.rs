//! Documentation tree shared by all rtfdoc renderers.
//!
//! A [`DocNode`] owns its ordered children and carries a [`NodeKind`] with the
//! kind-specific payload. The set of kinds is closed: renderers `match` on it
//! exhaustively, so adding a kind is a compile error everywhere it has to be
//! handled.
//!
//! Trees are built once by an upstream parser (or deserialized from JSON with
//! the `serde` feature) and are read-only during rendering. Nodes do not point
//! back at their parents; traversals hand the parent to each handler instead.
//!
//! # Example
//!
//! ```
//! use rtfdoc_tree::DocNode;
//!
//! let tree = DocNode::root(vec![DocNode::paragraph(vec![
//!     DocNode::word("Hello"),
//!     DocNode::whitespace(),
//!     DocNode::word("World"),
//! ])]);
//!
//! assert_eq!(tree.children.len(), 1);
//! assert!(tree.kind.is_compound());
//! ```

mod kinds;
mod node;

pub use kinds::{
    CellAlign, ImageKind, IncOpKind, IncludeKind, LinkTarget, ParamDirection, ParamSectionKind,
    ParamToken, SimpleSectionKind, Style, VerbatimKind,
};
pub use node::{DocNode, NodeKind};
