//! Tree walker and renderer.
//!
//! The [`Renderer`] visits every node twice, on [`Phase::Enter`] and on
//! [`Phase::Leave`], and dispatches each visit to the rule registered for the
//! node's kind. Block separators between siblings are written by the walker
//! itself, so rules only deal with their own markup.

mod cursor;
mod output;

pub use cursor::Cursor;
pub use output::Output;

use std::borrow::Cow;
use std::io::Write;

use tracing::warn;

use crate::ast::{Node, NodeKind};
use crate::options::{Options, UnknownKindPolicy};
use crate::rules::Registry;
use crate::writers::TrimWriter;
use crate::{FormatError, Result};

/// Which side of a node is being visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Leave,
}

/// Returned by a rule on [`Phase::Enter`] to control the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Do not visit the children of this node; the leave visit still happens
    SkipChildren,
}

/// Render a tree with the default registry
pub fn render(root: &Node, options: &Options) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    Renderer::new(Registry::default_registry(), options).render(root, &mut buf)?;
    Ok(buf)
}

/// Renders document trees with a registry and options
pub struct Renderer<'r> {
    registry: Cow<'r, Registry>,
    options: &'r Options,
}

impl<'r> Renderer<'r> {
    /// Create a renderer; the terminal rules and the overrides of `options`
    /// are applied on top of `registry`
    pub fn new(registry: &'r Registry, options: &'r Options) -> Self {
        Self {
            registry: registry.resolve(options),
            options,
        }
    }

    /// Render `root` into `sink`.
    ///
    /// Leading and trailing newlines of the rendering are dropped and exactly
    /// one newline is written at the end.
    pub fn render(&self, root: &Node, sink: &mut dyn Write) -> Result<()> {
        let mut trimmed = TrimWriter::new(&mut *sink, "\n");
        {
            let mut out = Output::new(&mut trimmed);
            self.walk(root, &mut out)?;
        }
        let sink = trimmed.into_inner();
        sink.write_all(b"\n")?;
        sink.flush()?;
        Ok(())
    }

    fn walk(&self, root: &Node, out: &mut Output<'_>) -> Result<()> {
        let mut frames = vec![Frame::new(root, 0)];
        // ancestors of the node on top of `frames`
        let mut path: Vec<&Node> = Vec::new();

        while let Some(frame) = frames.last_mut() {
            let node = frame.node;

            if !frame.entered {
                frame.entered = true;
                frame.start = out.written();
                let cursor = Cursor::new(node, &path, frame.index, self.options);
                if self.dispatch(out, &cursor, Phase::Enter)? == Walk::SkipChildren {
                    frame.next_child = node.children.len();
                }
                continue;
            }

            if let Some(child) = node.children.get(frame.next_child) {
                let index = frame.next_child;
                frame.next_child += 1;
                path.push(node);
                frames.push(Frame::new(child, index));
                continue;
            }

            let index = frame.index;
            let start = frame.start;
            frames.pop();
            let cursor = Cursor::new(node, &path, index, self.options);
            self.dispatch(out, &cursor, Phase::Leave)?;
            // a node that rendered nothing gets no separator
            let empty = out.written() == start;

            if let Some(parent) = path.pop() {
                if let Some(next) = parent.children.get(index + 1).filter(|_| !empty) {
                    out.write_str(separator(parent, node, next))?;
                }
            }
        }

        Ok(())
    }

    fn dispatch(&self, out: &mut Output<'_>, cursor: &Cursor<'_>, phase: Phase) -> Result<Walk> {
        let node = cursor.node();
        if let Some(rule) = self.registry.get(node.name()) {
            return (rule.render)(out, cursor, phase);
        }

        match self.options.unknown_kinds {
            UnknownKindPolicy::Strict => Err(FormatError::UnsupportedNodeKind(node.name().to_string())),
            UnknownKindPolicy::Lenient => {
                if phase == Phase::Enter {
                    warn!(kind = node.name(), "no rule for node kind, rendering its children only");
                }
                Ok(Walk::Continue)
            }
        }
    }
}

struct Frame<'t> {
    node: &'t Node,
    /// Position among the parent's children
    index: usize,
    next_child: usize,
    entered: bool,
    /// Output position when the node was entered
    start: usize,
}

impl<'t> Frame<'t> {
    fn new(node: &'t Node, index: usize) -> Self {
        Self {
            node,
            index,
            next_child: 0,
            entered: false,
            start: 0,
        }
    }
}

/// Text between two adjacent children of `parent`
fn separator(parent: &Node, prev: &Node, next: &Node) -> &'static str {
    match parent.kind {
        NodeKind::TableHead | NodeKind::TableRow => return "",
        NodeKind::Table { .. } => return "\n",
        NodeKind::List { .. } if is_loose_item(prev) => return "\n\n",
        NodeKind::List { .. } => return "\n",
        _ => {}
    }

    // lists of the same type would merge into one when parsed again
    if let (NodeKind::List { ordered: a, .. }, NodeKind::List { ordered: b, .. }) = (&prev.kind, &next.kind) {
        if a == b {
            return "\n\n<!-- -->\n\n";
        }
    }

    match (prev.is_block(), next.is_block()) {
        (false, false) => "",
        (true, true) if !matches!(prev.kind, NodeKind::TextBlock) => "\n\n",
        _ => "\n",
    }
}

/// An item with several blocks of which the first is a paragraph
fn is_loose_item(item: &Node) -> bool {
    let first_is_tight = matches!(item.children.first().map(|c| &c.kind), Some(NodeKind::TextBlock));
    !first_is_tight && item.children.iter().filter(|c| c.is_block()).count() > 1
}
