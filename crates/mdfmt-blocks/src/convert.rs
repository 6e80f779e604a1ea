//! Convert content blocks to a document tree
//!
//! Consecutive list item blocks are grouped into one list node; a change
//! between bulleted and numbered items starts a new list. Kinds the base
//! grammar lacks become custom nodes, see [`crate::rules`].

use mdfmt_core::{CustomNode, EmphasisLevel, Node, NodeKind};
use tracing::debug;

use crate::block::{Annotations, Block, Color, Equation, Mention, RichText, RichTextBlock, Text};

/// Custom kind wrapping colored content
pub const COLOR: &str = "color";
/// Custom kind of an equation; the expression is its text child
pub const EQUATION: &str = "equation";
/// Custom kind of a mentioned user
pub const USER: &str = "user";
/// Custom kind of a bookmark block; the caption is its children
pub const BOOKMARK: &str = "bookmark";
/// Custom kind of a link preview block
pub const LINK_PREVIEW: &str = "link_preview";
/// Custom kind of a block type without a conversion
pub const UNSUPPORTED: &str = "unsupported";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bulleted,
    Numbered,
}

fn list_kind(block: &Block) -> Option<ListKind> {
    match block.kind.as_str() {
        "bulleted_list_item" | "to_do" => Some(ListKind::Bulleted),
        "numbered_list_item" => Some(ListKind::Numbered),
        _ => None,
    }
}

fn list_node((kind, items): (ListKind, Vec<Node>)) -> Node {
    Node::with_children(
        NodeKind::List {
            ordered: kind == ListKind::Numbered,
            start: 1,
        },
        items,
    )
}

/// Convert a sequence of sibling blocks
pub fn blocks_to_nodes(blocks: &[Block]) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(blocks.len());
    let mut list: Option<(ListKind, Vec<Node>)> = None;

    for block in blocks {
        let Some(kind) = list_kind(block) else {
            if let Some(done) = list.take() {
                nodes.push(list_node(done));
            }
            nodes.push(block.node());
            continue;
        };

        let same = matches!(&list, Some((current, _)) if *current == kind);
        if !same {
            if let Some(done) = list.take() {
                nodes.push(list_node(done));
            }
        }
        list.get_or_insert_with(|| (kind, Vec::new())).1.push(block.node());
    }

    if let Some(done) = list {
        nodes.push(list_node(done));
    }
    nodes
}

impl Block {
    /// The tree of this block.
    ///
    /// List item blocks become list item nodes; [`blocks_to_nodes`] puts
    /// them into lists.
    pub fn node(&self) -> Node {
        self.convert().unwrap_or_else(|| {
            debug!(id = %self.id, kind = %self.kind, "no conversion for block type");
            Node::custom(
                CustomNode::new(UNSUPPORTED)
                    .block()
                    .with_attr("type", self.kind.as_str()),
            )
        })
    }

    fn convert(&self) -> Option<Node> {
        let node = match self.kind.as_str() {
            "paragraph" => text_block(NodeKind::Paragraph, self.paragraph.as_ref()?),
            "heading_1" => text_block(NodeKind::Heading { level: 1 }, self.heading_1.as_ref()?),
            "heading_2" => text_block(NodeKind::Heading { level: 2 }, self.heading_2.as_ref()?),
            "heading_3" => text_block(NodeKind::Heading { level: 3 }, self.heading_3.as_ref()?),
            "bulleted_list_item" => {
                let item = self.bulleted_list_item.as_ref()?;
                list_item(&item.rich_text, &item.color, None, &item.children)
            }
            "numbered_list_item" => {
                let item = self.numbered_list_item.as_ref()?;
                list_item(&item.rich_text, &item.color, None, &item.children)
            }
            "to_do" => {
                let item = self.to_do.as_ref()?;
                list_item(&item.rich_text, &item.color, Some(item.checked), &item.children)
            }
            "quote" => {
                let quote = self.quote.as_ref()?;
                let mut children = vec![Node::paragraph(rich_text_nodes(&quote.rich_text))];
                children.extend(blocks_to_nodes(&quote.children));
                color_block(&quote.color, Node::with_children(NodeKind::BlockQuote, children))
            }
            "code" => {
                let code = self.code.as_ref()?;
                let language = code.language.trim();
                Node::new(NodeKind::CodeBlock {
                    info: (!language.is_empty() && language != "plain text").then(|| language.to_string()),
                    fenced: true,
                    code: plain_text(&code.rich_text),
                })
            }
            "divider" => Node::new(NodeKind::ThematicBreak),
            "image" => {
                let image = self.image.as_ref()?;
                let image = Node::with_children(
                    NodeKind::Image {
                        url: image.url().to_string(),
                        title: None,
                    },
                    rich_text_nodes(&image.caption),
                );
                Node::paragraph(vec![image])
            }
            "bookmark" => {
                let bookmark = self.bookmark.as_ref()?;
                Node::with_children(
                    NodeKind::Custom(CustomNode::new(BOOKMARK).block().with_attr("url", bookmark.url.as_str())),
                    rich_text_nodes(&bookmark.caption),
                )
            }
            "link_preview" => {
                let preview = self.link_preview.as_ref()?;
                Node::custom(
                    CustomNode::new(LINK_PREVIEW)
                        .block()
                        .with_attr("url", preview.url.as_str()),
                )
            }
            "equation" => {
                let equation = self.equation.as_ref()?;
                Node::wrap(
                    NodeKind::Custom(CustomNode::new(EQUATION).block()),
                    Node::text(equation.expression.as_str()),
                )
            }
            "link_to_page" => Node::paragraph(vec![page_link(self.link_to_page.as_ref()?.id()?)]),
            _ => return None,
        };
        Some(node)
    }
}

/// A block of rich text, followed by its nested blocks
fn text_block(kind: NodeKind, block: &RichTextBlock) -> Node {
    let node = color_block(
        &block.color,
        Node::with_children(kind, rich_text_nodes(&block.rich_text)),
    );
    if block.children.is_empty() {
        return node;
    }

    let mut group = vec![node];
    group.extend(blocks_to_nodes(&block.children));
    Node::document(group)
}

fn list_item(rich_text: &[RichText], color: &Color, checked: Option<bool>, children: &[Block]) -> Node {
    let mut text = Vec::new();
    if let Some(checked) = checked {
        text.push(Node::new(NodeKind::TaskListMarker(checked)));
    }
    text.extend(color_inline(color, rich_text_nodes(rich_text)));

    let mut item = Node::wrap(NodeKind::ListItem, Node::with_children(NodeKind::TextBlock, text));
    item.children.extend(blocks_to_nodes(children));
    item
}

fn color_node(color: &Color) -> CustomNode {
    CustomNode::new(COLOR).with_attr("color", color.as_str())
}

fn color_block(color: &Color, node: Node) -> Node {
    if color.is_default() {
        return node;
    }
    Node::wrap(NodeKind::Custom(color_node(color).block()), node)
}

fn color_inline(color: &Color, nodes: Vec<Node>) -> Vec<Node> {
    if color.is_default() || nodes.is_empty() {
        return nodes;
    }
    vec![Node::with_children(NodeKind::Custom(color_node(color)), nodes)]
}

/// Concatenated plain text of rich text runs
pub fn plain_text(rich_text: &[RichText]) -> String {
    rich_text
        .iter()
        .map(|rt| match &rt.text {
            Some(text) if rt.plain_text.is_empty() => text.content.as_str(),
            _ => rt.plain_text.as_str(),
        })
        .collect()
}

pub fn rich_text_nodes(rich_text: &[RichText]) -> Vec<Node> {
    rich_text.iter().map(RichText::node).collect()
}

fn page_link(id: &str) -> Node {
    Node::wrap(
        NodeKind::Link {
            url: format!("/{id}"),
            title: None,
            autolink: false,
        },
        Node::text(""),
    )
}

impl RichText {
    /// The tree of this run, wrapped in its annotations
    pub fn node(&self) -> Node {
        let content = match self.kind.as_str() {
            "text" => self.text.as_ref().map(Text::node),
            "equation" => self.equation.as_ref().map(Equation::node),
            "mention" => self.mention.as_ref().and_then(Mention::node),
            other => {
                debug!(kind = other, "unknown rich text type, using its plain text");
                None
            }
        };
        let content = content.unwrap_or_else(|| Node::text(self.plain_text.as_str()));
        self.annotations.wrap(content)
    }
}

impl Text {
    pub fn node(&self) -> Node {
        let text = Node::text(self.content.as_str());
        match &self.link {
            Some(link) => Node::wrap(
                NodeKind::Link {
                    url: link.url.clone(),
                    title: None,
                    autolink: false,
                },
                text,
            ),
            None => text,
        }
    }
}

impl Equation {
    /// Inline equation
    pub fn node(&self) -> Node {
        Node::wrap(
            NodeKind::Custom(CustomNode::new(EQUATION)),
            Node::text(self.expression.as_str()),
        )
    }
}

impl Mention {
    pub fn node(&self) -> Option<Node> {
        match self.kind.as_str() {
            "user" => {
                let user = self.user.as_ref()?;
                let mut custom = CustomNode::new(USER).with_attr("id", user.id.as_str());
                if let Some(name) = &user.name {
                    custom = custom.with_attr("name", name.as_str());
                }
                Some(Node::custom(custom))
            }
            "page" => Some(page_link(&self.page.as_ref()?.id)),
            "database" => Some(page_link(&self.database.as_ref()?.id)),
            "date" => Some(Node::text(self.date.as_ref()?.display())),
            "link_preview" => {
                let url = &self.link_preview.as_ref()?.url;
                Some(Node::wrap(
                    NodeKind::Link {
                        url: url.clone(),
                        title: None,
                        autolink: true,
                    },
                    Node::text(url.as_str()),
                ))
            }
            _ => None,
        }
    }
}

impl Annotations {
    /// Wrap `node` in the nodes its annotations call for; the innermost
    /// is code, then bold, italic, strikethrough, underline and color
    pub fn wrap(&self, mut node: Node) -> Node {
        if self.code {
            if let NodeKind::Text(text) = &node.kind {
                node = Node::new(NodeKind::Code(text.clone()));
            }
        }
        if self.bold {
            node = Node::wrap(NodeKind::Emphasis(EmphasisLevel::Bold), node);
        }
        if self.italic {
            node = Node::wrap(NodeKind::Emphasis(EmphasisLevel::Italic), node);
        }
        if self.strikethrough {
            node = Node::wrap(NodeKind::Strikethrough, node);
        }
        if self.underline {
            node = Node::wrap(NodeKind::Emphasis(EmphasisLevel::Underline), node);
        }
        if !self.color.is_default() {
            node = Node::wrap(NodeKind::Custom(color_node(&self.color)), node);
        }
        node
    }
}
