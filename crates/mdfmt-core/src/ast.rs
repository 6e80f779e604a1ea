//! Document tree
//!
//! This module defines the nodes the renderer walks. A tree is either built by
//! the Markdown parser in `mdfmt` or assembled directly by an adapter for some
//! external content format. Leaf text is stored literally, so rendering needs
//! no access to the original source bytes.

use indexmap::IndexMap;

/// A node of the document tree. Children are owned, so every node has
/// exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

/// Emphasis strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmphasisLevel {
    Italic,
    Bold,
    BoldItalic,
    /// Markdown has no underline; rendered like `BoldItalic`
    Underline,
}

/// Column alignment of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// A node kind that is not part of the base grammar
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomNode {
    /// Registry key of this kind
    pub name: String,
    /// Whether the node takes part in block separation
    pub block: bool,
    pub attrs: IndexMap<String, String>,
    /// Optional literal payload
    pub value: Option<String>,
}

impl CustomNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn block(mut self) -> Self {
        self.block = true;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

/// The role of a node, together with its kind-specific attributes
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root of every tree
    Document,

    Paragraph,

    /// Inline content placed directly in a tight list item
    TextBlock,

    /// Heading with level 1-6
    Heading { level: u8 },

    BlockQuote,

    List { ordered: bool, start: u64 },

    ListItem,

    /// Code block; the content is kept as a leaf payload
    CodeBlock {
        info: Option<String>,
        fenced: bool,
        code: String,
    },

    ThematicBreak,

    /// Raw HTML block, written back unchanged
    HtmlBlock(String),

    /// YAML front matter without its delimiters
    MetadataBlock(String),

    Table { alignments: Vec<Alignment> },
    TableHead,
    TableRow,
    TableCell,

    FootnoteDefinition(String),
    FootnoteReference(String),

    /// Literal text, including any escapes it was written with
    Text(String),

    /// Code span content
    Code(String),

    Emphasis(EmphasisLevel),

    Strikethrough,

    Link {
        url: String,
        title: Option<String>,
        autolink: bool,
    },

    Image { url: String, title: Option<String> },

    SoftBreak,
    HardBreak,

    /// Raw inline HTML, written back unchanged
    InlineHtml(String),

    TaskListMarker(bool),

    Custom(CustomNode),
}

impl NodeKind {
    /// Registry key of this kind
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Paragraph => "paragraph",
            NodeKind::TextBlock => "text_block",
            NodeKind::Heading { .. } => "heading",
            NodeKind::BlockQuote => "blockquote",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem => "list_item",
            NodeKind::CodeBlock { .. } => "code_block",
            NodeKind::ThematicBreak => "thematic_break",
            NodeKind::HtmlBlock(_) => "html_block",
            NodeKind::MetadataBlock(_) => "metadata_block",
            NodeKind::Table { .. } => "table",
            NodeKind::TableHead => "table_head",
            NodeKind::TableRow => "table_row",
            NodeKind::TableCell => "table_cell",
            NodeKind::FootnoteDefinition(_) => "footnote_definition",
            NodeKind::FootnoteReference(_) => "footnote_reference",
            NodeKind::Text(_) => "text",
            NodeKind::Code(_) => "code",
            NodeKind::Emphasis(_) => "emphasis",
            NodeKind::Strikethrough => "strikethrough",
            NodeKind::Link { .. } => "link",
            NodeKind::Image { .. } => "image",
            NodeKind::SoftBreak => "soft_break",
            NodeKind::HardBreak => "hard_break",
            NodeKind::InlineHtml(_) => "inline_html",
            NodeKind::TaskListMarker(_) => "task_list_marker",
            NodeKind::Custom(custom) => &custom.name,
        }
    }

    /// Check if this kind is block-level
    pub fn is_block(&self) -> bool {
        match self {
            NodeKind::Document
            | NodeKind::Paragraph
            | NodeKind::TextBlock
            | NodeKind::Heading { .. }
            | NodeKind::BlockQuote
            | NodeKind::List { .. }
            | NodeKind::ListItem
            | NodeKind::CodeBlock { .. }
            | NodeKind::ThematicBreak
            | NodeKind::HtmlBlock(_)
            | NodeKind::MetadataBlock(_)
            | NodeKind::Table { .. }
            | NodeKind::TableHead
            | NodeKind::TableRow
            | NodeKind::FootnoteDefinition(_) => true,
            NodeKind::Custom(custom) => custom.block,
            _ => false,
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn document(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Document, children)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Paragraph, children)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(text.into()))
    }

    pub fn custom(custom: CustomNode) -> Self {
        Self::new(NodeKind::Custom(custom))
    }

    /// Wrap `child` in a new node of the given kind
    pub fn wrap(kind: NodeKind, child: Node) -> Self {
        Self::with_children(kind, vec![child])
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn is_block(&self) -> bool {
        self.kind.is_block()
    }

    /// Check if this node renders no visible content
    pub fn is_blank(&self) -> bool {
        match &self.kind {
            NodeKind::Text(text) => text.trim().is_empty(),
            NodeKind::Code(code) => code.is_empty(),
            NodeKind::CodeBlock { .. }
            | NodeKind::ThematicBreak
            | NodeKind::Image { .. }
            | NodeKind::HardBreak
            | NodeKind::TaskListMarker(_) => false,
            NodeKind::HtmlBlock(html) | NodeKind::InlineHtml(html) => html.trim().is_empty(),
            NodeKind::MetadataBlock(yaml) => yaml.trim().is_empty(),
            NodeKind::Custom(custom) if custom.value.is_some() => false,
            _ => self.children.iter().all(Node::is_blank),
        }
    }

    /// Concatenated literal text of this subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
            NodeKind::SoftBreak | NodeKind::HardBreak => out.push(' '),
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }
}
