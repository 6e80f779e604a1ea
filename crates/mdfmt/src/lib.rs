//! # mdfmt
//!
//! Canonical Markdown formatting.
//!
//! Markdown is parsed into a document tree and written back in one canonical
//! style: ATX headings, `-` bullets, renumbered ordered lists, tab indented
//! nested blocks, fenced code and inlined reference links.
//!
//! ## Design
//!
//! Parsing is done by `pulldown-cmark`; rendering by `mdfmt-core`. The same
//! renderer serves trees built by other front ends, so everything about the
//! output style lives in the rule registry:
//!
//! - **Rules per node kind**: override any of them with [`Formatter::add_rule`]
//! - **Terminal mode**: emphasis as ANSI escape sequences
//! - **Code formatters**: reformat fenced code by language, e.g. YAML
//!
//! ## Example
//!
//! ```rust
//! let formatted = mdfmt::format_str("Title\n=====\n\n* one\n* two").unwrap();
//! assert_eq!(formatted, "# Title\n\n- one\n- two\n");
//! ```
//!
//! ## Example (terminal)
//!
//! ```rust
//! use mdfmt::Formatter;
//!
//! let formatter = Formatter::new().terminal();
//! let rendered = formatter.format_str("some **bold** text").unwrap();
//! assert_eq!(rendered, "some \x1b[1mbold\x1b[0m text\n");
//! ```

mod parse;
mod service;
#[cfg(feature = "yaml")]
pub mod yaml;

pub use mdfmt_core::{
    CodeFormatError, CodeFormatter, CustomNode, EmphasisLevel, FormatError, Node, NodeKind, Options, Phase,
    Result, Rule, UnknownKindPolicy, Walk,
};
pub use parse::{parse, parser_options};
pub use service::{format, format_str, format_with, Formatter};
