//! Markdown parsing into a document tree.
//!
//! Parsing is delegated to `pulldown-cmark`. Its event stream is folded into
//! a [`Node`] tree. Text nodes keep the exact source slice they were parsed
//! from, so escapes and entities survive a round trip unchanged.

use std::ops::Range;

use mdfmt_core::{Alignment, CustomNode, EmphasisLevel, Node, NodeKind};
use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};
use tracing::debug;

/// Parser extensions enabled for every document
pub fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options
}

/// Parse Markdown into a document tree
pub fn parse(src: &str) -> Node {
    let mut builder = TreeBuilder::new(src);
    for (event, range) in Parser::new_ext(src, parser_options()).into_offset_iter() {
        builder.event(event, range);
    }
    builder.finish()
}

/// Folds parser events into nested nodes
struct TreeBuilder<'s> {
    src: &'s str,
    /// Open nodes; the document is at the bottom
    stack: Vec<Node>,
}

impl<'s> TreeBuilder<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            stack: vec![Node::document(Vec::new())],
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                let node = Node::new(start_kind(tag));
                self.stack.push(node);
            }
            Event::End(_) => self.close(),
            Event::Text(text) => {
                if let Some(top) = self.stack.last_mut() {
                    match &mut top.kind {
                        NodeKind::CodeBlock { code, .. } => return code.push_str(&text),
                        NodeKind::MetadataBlock(yaml) => return yaml.push_str(&text),
                        _ => {}
                    }
                }
                let raw = self.raw_text(range).unwrap_or(&*text);
                self.attach(Node::text(raw));
            }
            Event::Html(html) => {
                if let Some(Node {
                    kind: NodeKind::HtmlBlock(block),
                    ..
                }) = self.stack.last_mut()
                {
                    block.push_str(&html);
                } else {
                    self.attach(Node::new(NodeKind::InlineHtml(html.to_string())));
                }
            }
            Event::InlineHtml(html) => self.attach(Node::new(NodeKind::InlineHtml(html.to_string()))),
            Event::Code(code) => self.attach(Node::new(NodeKind::Code(code.to_string()))),
            Event::InlineMath(_) | Event::DisplayMath(_) => {
                let raw = self.src.get(range).unwrap_or_default();
                self.attach(Node::text(raw));
            }
            Event::FootnoteReference(label) => {
                self.attach(Node::new(NodeKind::FootnoteReference(label.to_string())))
            }
            Event::SoftBreak => self.attach(Node::new(NodeKind::SoftBreak)),
            Event::HardBreak => self.attach(Node::new(NodeKind::HardBreak)),
            Event::Rule => self.attach(Node::new(NodeKind::ThematicBreak)),
            Event::TaskListMarker(checked) => self.attach(Node::new(NodeKind::TaskListMarker(checked))),
        }
    }

    /// The source slice of a text event, including a backslash that escapes
    /// its first character
    fn raw_text(&self, range: Range<usize>) -> Option<&'s str> {
        let mut start = range.start;
        let rest = self.src.get(start..range.end)?;
        if rest.is_empty() {
            return None;
        }
        let escaped = start > 0
            && self.src.as_bytes()[start - 1] == b'\\'
            && rest.starts_with(|c: char| c.is_ascii_punctuation());
        if escaped {
            start -= 1;
        }
        self.src.get(start..range.end)
    }

    /// Close the innermost open node
    fn close(&mut self) {
        if self.stack.len() < 2 {
            debug!("unbalanced end event ignored");
            return;
        }
        if let Some(node) = self.stack.pop() {
            self.attach(node);
        }
    }

    /// Append a finished node to the innermost open node
    fn attach(&mut self, child: Node) {
        let Some(parent) = self.stack.last_mut() else {
            return;
        };

        // inline content directly inside a list item belongs to a text block
        if matches!(parent.kind, NodeKind::ListItem) && !child.is_block() {
            if !matches!(parent.children.last().map(|n| &n.kind), Some(NodeKind::TextBlock)) {
                parent.push(Node::new(NodeKind::TextBlock));
            }
            if let Some(block) = parent.children.last_mut() {
                attach_inline(block, child);
            }
            return;
        }

        attach_inline(parent, child);
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().unwrap_or_else(|| Node::document(Vec::new()))
    }
}

/// Append `child`, dropping the whitespace a parser may leave between a task
/// marker and the item text
fn attach_inline(parent: &mut Node, mut child: Node) {
    let after_marker = matches!(
        parent.children.last().map(|n| &n.kind),
        Some(NodeKind::TaskListMarker(_))
    );
    if after_marker {
        if let NodeKind::Text(text) = &mut child.kind {
            let trimmed = text.trim_start();
            if trimmed.len() != text.len() {
                *text = trimmed.to_string();
            }
        }
    }
    parent.push(child);
}

fn start_kind(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => {
            let (info, fenced) = match kind {
                CodeBlockKind::Fenced(info) if !info.trim().is_empty() => (Some(info.to_string()), true),
                CodeBlockKind::Fenced(_) => (None, true),
                CodeBlockKind::Indented => (None, false),
            };
            NodeKind::CodeBlock {
                info,
                fenced,
                code: String::new(),
            }
        }
        Tag::HtmlBlock => NodeKind::HtmlBlock(String::new()),
        Tag::List(start) => NodeKind::List {
            ordered: start.is_some(),
            start: start.unwrap_or(1),
        },
        Tag::Item => NodeKind::ListItem,
        Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition(label.to_string()),
        Tag::Table(alignments) => NodeKind::Table {
            alignments: alignments.into_iter().map(alignment).collect(),
        },
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis(EmphasisLevel::Italic),
        Tag::Strong => NodeKind::Emphasis(EmphasisLevel::Bold),
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        } => NodeKind::Link {
            url: dest_url.to_string(),
            title: non_empty(&title),
            autolink: matches!(link_type, LinkType::Autolink | LinkType::Email),
        },
        Tag::Image { dest_url, title, .. } => NodeKind::Image {
            url: dest_url.to_string(),
            title: non_empty(&title),
        },
        Tag::MetadataBlock(_) => NodeKind::MetadataBlock(String::new()),
        other => {
            let name = format!("{other:?}").to_lowercase();
            debug!(kind = %name, "no tree kind for parser tag");
            NodeKind::Custom(CustomNode::new(name).block())
        }
    }
}

fn alignment(alignment: pulldown_cmark::Alignment) -> Alignment {
    match alignment {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
