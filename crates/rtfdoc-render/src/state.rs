//! Traversal state carried across a render.
//!
//! Indentation and suppression are stacks: every push made when entering a
//! node is undone by exactly one pop when leaving it, and [`StateDepth`]
//! lets the walker check that after every compound node.

use rtfdoc_style::MAX_INDENT_LEVELS;

use crate::RenderError;

/// Snapshot of stack depths, compared before and after each compound node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateDepth {
    /// Saved indent levels.
    pub indent: usize,
    /// Saved hidden flags.
    pub hidden: usize,
}

/// Indent level with save/restore discipline.
#[derive(Debug)]
pub(crate) struct IndentStack {
    level: usize,
    max: usize,
    saved: Vec<usize>,
}

impl IndentStack {
    /// Stack whose level never reaches `max`.
    pub(crate) fn new(max: usize) -> Self {
        Self {
            level: 0,
            max: max.clamp(1, MAX_INDENT_LEVELS),
            saved: Vec::new(),
        }
    }

    pub(crate) fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn max(&self) -> usize {
        self.max
    }

    /// Save the level and go one deeper.
    ///
    /// Returns `false` when the level is already at the maximum; the level
    /// then stays put but the save still happens so the pop stays paired.
    pub(crate) fn push(&mut self) -> bool {
        self.saved.push(self.level);
        if self.level + 1 < self.max {
            self.level += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn pop(&mut self) -> Result<(), RenderError> {
        self.level = self.saved.pop().ok_or(RenderError::IndentStackUnderflow)?;
        Ok(())
    }

    pub(crate) fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// Output suppression flag with save/restore discipline.
#[derive(Debug, Default)]
pub(crate) struct HiddenStack {
    hidden: bool,
    saved: Vec<bool>,
}

impl HiddenStack {
    pub(crate) fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Save the current flag and start suppressing output.
    pub(crate) fn push_and_hide(&mut self) {
        self.saved.push(self.hidden);
        self.hidden = true;
    }

    /// Restore the flag saved by the matching [`push_and_hide`](Self::push_and_hide).
    pub(crate) fn pop(&mut self) -> Result<(), RenderError> {
        self.hidden = self.saved.pop().ok_or(RenderError::HiddenStackUnderflow)?;
        Ok(())
    }

    pub(crate) fn depth(&self) -> usize {
        self.saved.len()
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ListLevel {
    ordered: bool,
    number: u32,
}

/// Per-indent-level list numbering.
///
/// Each level has its own slot, so a nested list never touches the counter
/// of the list around it.
#[derive(Debug, Default)]
pub(crate) struct ListContext {
    levels: [ListLevel; MAX_INDENT_LEVELS],
}

impl ListContext {
    /// Start a list at `level`, numbering from 1 if `ordered`.
    pub(crate) fn start(&mut self, level: usize, ordered: bool) {
        self.levels[Self::slot(level)] = ListLevel { ordered, number: 1 };
    }

    /// Number for the next item at `level`, or `None` for a bullet.
    pub(crate) fn next_marker(&mut self, level: usize) -> Option<u32> {
        let slot = &mut self.levels[Self::slot(level)];
        if !slot.ordered {
            return None;
        }
        let number = slot.number;
        slot.number += 1;
        Some(number)
    }

    fn slot(level: usize) -> usize {
        level.min(MAX_INDENT_LEVELS - 1)
    }
}

/// Mutable state of one render.
#[derive(Debug)]
pub(crate) struct RenderState {
    pub(crate) indent: IndentStack,
    pub(crate) hidden: HiddenStack,
    pub(crate) lists: ListContext,
    /// Inside a preformatted region, where whitespace is kept as written.
    pub(crate) inside_pre: bool,
    /// The last emission ended a paragraph.
    pub(crate) last_is_para: bool,
}

impl RenderState {
    pub(crate) fn new(max_indent_level: usize) -> Self {
        Self {
            indent: IndentStack::new(max_indent_level),
            hidden: HiddenStack::default(),
            lists: ListContext::default(),
            inside_pre: false,
            last_is_para: false,
        }
    }

    pub(crate) fn depth(&self) -> StateDepth {
        StateDepth {
            indent: self.indent.depth(),
            hidden: self.hidden.depth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_push_pop_restores() {
        let mut indent = IndentStack::new(10);
        assert!(indent.push());
        assert!(indent.push());
        assert_eq!(indent.level(), 2);
        indent.pop().unwrap();
        assert_eq!(indent.level(), 1);
        indent.pop().unwrap();
        assert_eq!(indent.level(), 0);
        assert!(matches!(
            indent.pop(),
            Err(RenderError::IndentStackUnderflow)
        ));
    }

    #[test]
    fn test_indent_saturates_at_max() {
        let mut indent = IndentStack::new(3);
        assert!(indent.push());
        assert!(indent.push());
        assert!(!indent.push());
        assert_eq!(indent.level(), 2);
        assert_eq!(indent.depth(), 3);
        indent.pop().unwrap();
        assert_eq!(indent.level(), 2);
        indent.pop().unwrap();
        assert_eq!(indent.level(), 1);
    }

    #[test]
    fn test_indent_max_clamped_to_table() {
        assert_eq!(IndentStack::new(0).max(), 1);
        assert_eq!(IndentStack::new(50).max(), MAX_INDENT_LEVELS);
    }

    #[test]
    fn test_hidden_nesting() {
        let mut hidden = HiddenStack::default();
        assert!(!hidden.is_hidden());
        hidden.push_and_hide();
        hidden.push_and_hide();
        hidden.pop().unwrap();
        assert!(hidden.is_hidden());
        hidden.pop().unwrap();
        assert!(!hidden.is_hidden());
        assert!(matches!(hidden.pop(), Err(RenderError::HiddenStackUnderflow)));
    }

    #[test]
    fn test_list_levels_independent() {
        let mut lists = ListContext::default();
        lists.start(0, true);
        assert_eq!(lists.next_marker(0), Some(1));
        lists.start(1, false);
        assert_eq!(lists.next_marker(1), None);
        lists.start(2, true);
        assert_eq!(lists.next_marker(2), Some(1));
        assert_eq!(lists.next_marker(2), Some(2));
        assert_eq!(lists.next_marker(0), Some(2));
    }

    #[test]
    fn test_depth_snapshot() {
        let mut state = RenderState::new(10);
        let before = state.depth();
        state.indent.push();
        state.hidden.push_and_hide();
        assert_eq!(
            state.depth(),
            StateDepth {
                indent: 1,
                hidden: 1
            }
        );
        state.hidden.pop().unwrap();
        state.indent.pop().unwrap();
        assert_eq!(state.depth(), before);
    }
}
