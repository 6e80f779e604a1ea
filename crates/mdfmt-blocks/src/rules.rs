//! Rules for the custom kinds produced by the block converter.

use mdfmt_core::{Cursor, NodeKind, Output, Phase, Result, Rule, Walk};

use crate::convert::{BOOKMARK, COLOR, EQUATION, LINK_PREVIEW, USER};

/// Create the rules for block content.
///
/// Colors and equations render their children, users render nothing.
/// Unsupported blocks have no rule and are left to the unknown kind policy.
pub fn block_rules() -> Vec<Rule> {
    vec![
        Rule::transparent(COLOR),
        Rule::transparent(EQUATION),
        Rule::noop(USER),
        Rule::new(BOOKMARK, bookmark),
        Rule::new(LINK_PREVIEW, link_preview),
    ]
}

fn url<'c>(cursor: &Cursor<'c>) -> &'c str {
    match &cursor.node().kind {
        NodeKind::Custom(custom) => custom.attr("url").unwrap_or_default(),
        _ => "",
    }
}

/// `[caption](url)`, or an autolink without a caption
fn bookmark(out: &mut Output<'_>, cursor: &Cursor<'_>, phase: Phase) -> Result<Walk> {
    let url = url(cursor);
    if cursor.node().is_blank() {
        if phase == Phase::Enter {
            out.write_str(&format!("<{url}>"))?;
        }
        return Ok(Walk::SkipChildren);
    }

    match phase {
        Phase::Enter => out.write_str("[")?,
        Phase::Leave => out.write_str(&format!("]({url})"))?,
    }
    Ok(Walk::Continue)
}

fn link_preview(out: &mut Output<'_>, cursor: &Cursor<'_>, phase: Phase) -> Result<Walk> {
    if phase == Phase::Enter {
        out.write_str(&format!("<{}>", url(cursor)))?;
    }
    Ok(Walk::SkipChildren)
}
