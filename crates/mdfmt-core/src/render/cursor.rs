use crate::ast::Node;
use crate::options::Options;

/// Position of the node being rendered.
///
/// Nodes have no parent pointers; the walker hands every rule a cursor
/// with the chain of ancestors from the root down to the node's parent.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    node: &'a Node,
    ancestors: &'a [&'a Node],
    index: usize,
    options: &'a Options,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(node: &'a Node, ancestors: &'a [&'a Node], index: usize, options: &'a Options) -> Self {
        Self {
            node,
            ancestors,
            index,
            options,
        }
    }

    /// Cursor for a node without ancestors
    pub fn root(node: &'a Node, options: &'a Options) -> Self {
        Self::new(node, &[], 0, options)
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.ancestors.last().copied()
    }

    /// Ancestors, innermost first
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Node> + 'a {
        self.ancestors.iter().rev().copied()
    }

    /// Check if some ancestor has the given kind name
    pub fn within(&self, kind: &str) -> bool {
        self.ancestors().any(|n| n.name() == kind)
    }

    /// Number of ancestors
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Position among the parent's children
    pub fn index(&self) -> usize {
        self.index
    }

    /// The parent's children, or the node alone at the root
    pub fn siblings(&self) -> &'a [Node] {
        match self.parent() {
            Some(parent) => &parent.children,
            None => std::slice::from_ref(self.node),
        }
    }

    pub fn previous_sibling(&self) -> Option<&'a Node> {
        self.index.checked_sub(1).and_then(|i| self.siblings().get(i))
    }

    pub fn next_sibling(&self) -> Option<&'a Node> {
        self.siblings().get(self.index + 1)
    }
}
