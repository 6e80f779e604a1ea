//! Rules for rendering to a terminal.
//!
//! Emphasis is written as ANSI SGR escape sequences instead of Markdown
//! markers. Every other kind keeps its Markdown rendering.

use super::Rule;
use crate::ast::{EmphasisLevel, NodeKind};
use crate::render::{Phase, Walk};

const RESET: &str = "\x1b[0m";

/// Create the terminal rules
pub fn terminal_rules() -> Vec<Rule> {
    vec![emphasis_rule()]
}

fn sgr(level: EmphasisLevel) -> &'static str {
    match level {
        EmphasisLevel::Italic => "\x1b[3m",
        EmphasisLevel::Bold => "\x1b[1m",
        EmphasisLevel::BoldItalic => "\x1b[1;3m",
        EmphasisLevel::Underline => "\x1b[4m",
    }
}

fn emphasis_rule() -> Rule {
    Rule::new("emphasis", |out, cursor, phase| {
        if let NodeKind::Emphasis(level) = cursor.node().kind {
            out.write_str(match phase {
                Phase::Enter => sgr(level),
                Phase::Leave => RESET,
            })?;
        }
        Ok(Walk::Continue)
    })
}
