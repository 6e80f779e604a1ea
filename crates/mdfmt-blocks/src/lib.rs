//! # mdfmt-blocks
//!
//! Render Notion-style content blocks as canonical Markdown.
//!
//! Blocks are decoded from their JSON form with `serde`, converted to a
//! `mdfmt-core` document tree and rendered by the same renderer that
//! formats Markdown files, so both produce identical output for the same
//! content.
//!
//! ## Example
//!
//! ```rust
//! use mdfmt_blocks::BlocksService;
//!
//! let json = r#"[
//!   {"type": "heading_1", "heading_1": {"rich_text": [{"type": "text", "text": {"content": "Notes"}}]}},
//!   {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [{"type": "text", "text": {"content": "one"}}]}},
//!   {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [{"type": "text", "text": {"content": "two"}}]}}
//! ]"#;
//!
//! let markdown = BlocksService::new().render_json(json).unwrap();
//! assert_eq!(markdown, "# Notes\n\n- one\n- two\n");
//! ```

pub mod block;
mod cache;
mod convert;
pub mod rules;
mod service;

pub use block::{Annotations, Block, Color, RichText};
pub use cache::{CachedSource, PageSource};
pub use convert::{blocks_to_nodes, plain_text, rich_text_nodes, BOOKMARK, COLOR, EQUATION, LINK_PREVIEW, UNSUPPORTED, USER};
pub use rules::block_rules;
pub use service::BlocksService;

use mdfmt_core::FormatError;

/// Error type for block rendering
#[derive(Debug, thiserror::Error)]
pub enum BlocksError {
    #[error("decoding blocks: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("fetching page {id}: {message}")]
    Fetch { id: String, message: String },

    #[error(transparent)]
    Render(#[from] FormatError),
}

pub type Result<T> = std::result::Result<T, BlocksError>;
