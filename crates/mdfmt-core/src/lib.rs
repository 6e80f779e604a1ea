//! mdfmt-core - document tree, stream writers and renderer
//!
//! This crate holds everything needed to turn a document tree into canonical
//! Markdown. It is used by `mdfmt` (for trees parsed from Markdown) and by
//! `mdfmt-blocks` (for trees built from content blocks).
//!
//! # Architecture
//!
//! ```text
//! Markdown ──parse──▶ ┌──────┐    ┌──────────┐    ┌────────────┐
//!                     │ Node │ ──▶│ Renderer │ ──▶│ Output     │ ──▶ sink
//! Blocks ──convert──▶ └──────┘    └──────────┘    │ (writers)  │
//!                                      ▲          └────────────┘
//!                                  Registry
//! ```
//!
//! # Example
//!
//! ```rust
//! use mdfmt_core::{render, EmphasisLevel, Node, NodeKind, Options};
//!
//! let doc = Node::document(vec![
//!     Node::with_children(NodeKind::Heading { level: 1 }, vec![Node::text("Hello")]),
//!     Node::paragraph(vec![
//!         Node::text("This is "),
//!         Node::wrap(NodeKind::Emphasis(EmphasisLevel::Bold), Node::text("bold")),
//!         Node::text(" text."),
//!     ]),
//! ]);
//!
//! let markdown = render(&doc, &Options::default()).unwrap();
//! assert_eq!(markdown, b"# Hello\n\nThis is **bold** text.\n");
//! ```

mod ast;
mod error;
mod options;
pub mod render;
pub mod rules;
pub mod writers;

pub use ast::{Alignment, CustomNode, EmphasisLevel, Node, NodeKind};
pub use error::{FormatError, Result};
pub use options::{CodeFormatError, CodeFormatter, Options, UnknownKindPolicy};
pub use render::{render, Cursor, Output, Phase, Renderer, Walk};
pub use rules::{commonmark_rules, terminal_rules, Registry, RegistryBuilder, Rule};
