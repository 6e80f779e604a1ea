//! CommonMark rules for canonical Markdown output.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::Rule;
use crate::ast::{Alignment, EmphasisLevel, Node, NodeKind};
use crate::options::Options;
use crate::render::{Output, Phase, Walk};
use crate::Result;

/// Fence lines inside code block content
static FENCE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*(`{3,}|~{3,})").expect("valid regex"));

/// Create all CommonMark rules
pub fn commonmark_rules() -> Vec<Rule> {
    vec![
        Rule::transparent("document"),
        Rule::transparent("paragraph"),
        Rule::transparent("text_block"),
        heading_rule(),
        blockquote_rule(),
        Rule::transparent("list"),
        list_item_rule(),
        code_block_rule(),
        Rule::wrap("thematic_break", "---", ""),
        html_block_rule(),
        metadata_block_rule(),
        Rule::transparent("table"),
        table_head_rule(),
        Rule::wrap("table_row", "|", ""),
        Rule::wrap("table_cell", " ", " |"),
        footnote_definition_rule(),
        footnote_reference_rule(),
        text_rule(),
        code_rule(),
        emphasis_rule(),
        Rule::wrap("strikethrough", "~~", "~~"),
        link_rule(),
        image_rule(),
        soft_break_rule(),
        Rule::wrap("hard_break", "\\\n", ""),
        inline_html_rule(),
        task_list_marker_rule(),
    ]
}

/// Markdown delimiter for an emphasis level
fn emphasis_marker(level: EmphasisLevel) -> &'static str {
    match level {
        EmphasisLevel::Italic => "*",
        EmphasisLevel::Bold => "**",
        EmphasisLevel::BoldItalic | EmphasisLevel::Underline => "***",
    }
}

/// Write a leaf payload on enter
fn leaf(out: &mut Output<'_>, phase: Phase, text: &str) -> Result<Walk> {
    if phase == Phase::Enter {
        out.write_str(text)?;
    }
    Ok(Walk::SkipChildren)
}

fn heading_rule() -> Rule {
    Rule::new("heading", |out, cursor, phase| {
        let node = cursor.node();
        if let (Phase::Enter, NodeKind::Heading { level }) = (phase, &node.kind) {
            out.write_str(&"#".repeat(usize::from(*level).clamp(1, 6)))?;
            if !node.is_blank() {
                out.write_str(" ")?;
            }
        }
        Ok(Walk::Continue)
    })
}

fn blockquote_rule() -> Rule {
    Rule::new("blockquote", |out, cursor, phase| {
        match phase {
            Phase::Enter => {
                if cursor.node().children.is_empty() {
                    out.write_str(">")?;
                }
                out.push_blockquote();
            }
            Phase::Leave => out.pop_layer(),
        }
        Ok(Walk::Continue)
    })
}

fn list_item_rule() -> Rule {
    Rule::new("list_item", |out, cursor, phase| {
        if phase == Phase::Leave {
            out.pop_layer();
            return Ok(Walk::Continue);
        }

        let marker = match cursor.parent().map(|p| &p.kind) {
            Some(NodeKind::List {
                ordered: true,
                start,
            }) => {
                let index = cursor.index() as u64;
                let number = if cursor.options().preserve_list_start {
                    start.saturating_add(index)
                } else {
                    index + 1
                };
                format!("{number}. ")
            }
            _ => "- ".to_string(),
        };
        out.write_str(&marker)?;
        // content must start at or past the marker's width
        let unit = match marker.len() {
            0..=4 => "\t".to_string(),
            width => format!("\t{}", " ".repeat(width - 4)),
        };
        out.push_continuing_indent(&unit, 1);
        Ok(Walk::Continue)
    })
}

/// Run the formatter registered for `language`, keeping `code` when there is
/// none or it fails
fn format_code<'c>(options: &Options, language: Option<&str>, code: &'c str) -> Cow<'c, str> {
    let Some(language) = language else {
        return Cow::Borrowed(code);
    };
    let Some(formatter) = options.formatter(language) else {
        return Cow::Borrowed(code);
    };

    match formatter.format(code.as_bytes()) {
        Ok(formatted) => match String::from_utf8(formatted) {
            Ok(formatted) => Cow::Owned(formatted),
            Err(err) => {
                warn!(language, error = %err, "code formatter returned invalid UTF-8, keeping original");
                Cow::Borrowed(code)
            }
        },
        Err(err) => {
            warn!(language, error = %err, "code formatter failed, keeping original");
            Cow::Borrowed(code)
        }
    }
}

/// A fence of `marker` characters longer than any such fence line in `code`
fn code_fence(code: &str, marker: char) -> String {
    let longest = FENCE_LINE
        .captures_iter(code)
        .filter_map(|c| c.get(1))
        .filter(|m| m.as_str().starts_with(marker))
        .map(|m| m.len())
        .max()
        .unwrap_or(0);
    marker.to_string().repeat(longest.max(2) + 1)
}

fn code_block_rule() -> Rule {
    Rule::new("code_block", |out, cursor, phase| {
        let NodeKind::CodeBlock { info, code, .. } = &cursor.node().kind else {
            return Ok(Walk::SkipChildren);
        };
        if phase == Phase::Leave {
            return Ok(Walk::SkipChildren);
        }

        let info = info.as_deref().map(str::trim).unwrap_or_default();
        let language = info.split_whitespace().next();
        let code = format_code(cursor.options(), language, code);
        // a backtick fence cannot carry an info string with a backtick
        let marker = if info.contains('`') { '~' } else { '`' };
        let fence = code_fence(&code, marker);

        out.write_str(&fence)?;
        out.write_str(info)?;
        out.write_str("\n")?;
        if !code.is_empty() {
            out.write_str(&code)?;
            if !code.ends_with('\n') {
                out.write_str("\n")?;
            }
        }
        out.write_str(&fence)?;
        Ok(Walk::SkipChildren)
    })
}

fn html_block_rule() -> Rule {
    Rule::new("html_block", |out, cursor, phase| match &cursor.node().kind {
        NodeKind::HtmlBlock(html) => leaf(out, phase, html.trim_end_matches('\n')),
        _ => Ok(Walk::SkipChildren),
    })
}

fn metadata_block_rule() -> Rule {
    Rule::new("metadata_block", |out, cursor, phase| {
        let NodeKind::MetadataBlock(yaml) = &cursor.node().kind else {
            return Ok(Walk::SkipChildren);
        };
        if phase == Phase::Leave {
            return Ok(Walk::SkipChildren);
        }

        let yaml = format_code(cursor.options(), Some("yaml"), yaml);
        out.write_str("---\n")?;
        if !yaml.is_empty() {
            out.write_str(&yaml)?;
            if !yaml.ends_with('\n') {
                out.write_str("\n")?;
            }
        }
        out.write_str("---")?;
        Ok(Walk::SkipChildren)
    })
}

fn alignment_marker(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::None => "---",
        Alignment::Left => ":--",
        Alignment::Right => "--:",
        Alignment::Center => ":-:",
    }
}

fn table_head_rule() -> Rule {
    Rule::new("table_head", |out, cursor, phase| {
        if phase == Phase::Enter {
            out.write_str("|")?;
            return Ok(Walk::Continue);
        }

        let alignments = match cursor.parent().map(|p| &p.kind) {
            Some(NodeKind::Table { alignments }) if !alignments.is_empty() => alignments.clone(),
            _ => vec![Alignment::None; cursor.node().children.len()],
        };
        out.write_str("\n|")?;
        for alignment in alignments {
            out.write_str(" ")?;
            out.write_str(alignment_marker(alignment))?;
            out.write_str(" |")?;
        }
        Ok(Walk::Continue)
    })
}

fn footnote_definition_rule() -> Rule {
    Rule::new("footnote_definition", |out, cursor, phase| {
        match (phase, &cursor.node().kind) {
            (Phase::Enter, NodeKind::FootnoteDefinition(label)) => {
                out.write_str(&format!("[^{label}]: "))?;
                out.push_continuing_indent("\t", 1);
            }
            (Phase::Leave, _) => out.pop_layer(),
            _ => {}
        }
        Ok(Walk::Continue)
    })
}

fn footnote_reference_rule() -> Rule {
    Rule::new("footnote_reference", |out, cursor, phase| match &cursor.node().kind {
        NodeKind::FootnoteReference(label) => leaf(out, phase, &format!("[^{label}]")),
        _ => Ok(Walk::SkipChildren),
    })
}

fn text_rule() -> Rule {
    Rule::new("text", |out, cursor, phase| match &cursor.node().kind {
        NodeKind::Text(text) => leaf(out, phase, text),
        _ => Ok(Walk::SkipChildren),
    })
}

/// Wrap code span content in a backtick run that does not occur inside it
fn code_span(code: &str) -> String {
    let longest = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest + 1);

    let pad = code.starts_with('`')
        || code.ends_with('`')
        || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
    if pad {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

fn code_rule() -> Rule {
    Rule::new("code", |out, cursor, phase| match &cursor.node().kind {
        NodeKind::Code(code) => leaf(out, phase, &code_span(code)),
        _ => Ok(Walk::SkipChildren),
    })
}

fn emphasis_rule() -> Rule {
    Rule::new("emphasis", |out, cursor, _| {
        if let NodeKind::Emphasis(level) = cursor.node().kind {
            out.write_str(emphasis_marker(level))?;
        }
        Ok(Walk::Continue)
    })
}

/// Link destination and optional title, as written inside `(...)`
fn destination(url: &str, title: Option<&str>) -> String {
    let mut dest = if url.contains([' ', '(', ')']) {
        format!("<{url}>")
    } else {
        url.to_string()
    };
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        dest.push_str(" \"");
        dest.push_str(&title.replace('\\', "\\\\").replace('"', "\\\""));
        dest.push('"');
    }
    dest
}

fn link_rule() -> Rule {
    Rule::new("link", |out, cursor, phase| {
        let NodeKind::Link {
            url,
            title,
            autolink,
        } = &cursor.node().kind
        else {
            return Ok(Walk::Continue);
        };

        match (phase, *autolink) {
            (Phase::Enter, true) => out.write_str("<")?,
            (Phase::Leave, true) => out.write_str(">")?,
            (Phase::Enter, false) => out.write_str("[")?,
            (Phase::Leave, false) => {
                out.write_str("](")?;
                out.write_str(&destination(url, title.as_deref()))?;
                out.write_str(")")?;
            }
        }
        Ok(Walk::Continue)
    })
}

fn image_rule() -> Rule {
    Rule::new("image", |out, cursor, phase| {
        let NodeKind::Image { url, title } = &cursor.node().kind else {
            return Ok(Walk::Continue);
        };

        match phase {
            Phase::Enter => out.write_str("![")?,
            Phase::Leave => {
                out.write_str("](")?;
                out.write_str(&destination(url, title.as_deref()))?;
                out.write_str(")")?;
            }
        }
        Ok(Walk::Continue)
    })
}

fn soft_break_rule() -> Rule {
    Rule::new("soft_break", |out, cursor, phase| {
        // headings are a single line
        let text = if cursor.within("heading") { " " } else { "\n" };
        leaf(out, phase, text)
    })
}

fn inline_html_rule() -> Rule {
    Rule::new("inline_html", |out, cursor, phase| match &cursor.node().kind {
        NodeKind::InlineHtml(html) => leaf(out, phase, html),
        _ => Ok(Walk::SkipChildren),
    })
}

fn task_list_marker_rule() -> Rule {
    Rule::new("task_list_marker", |out, cursor, phase| match cursor.node().kind {
        NodeKind::TaskListMarker(true) => leaf(out, phase, "[x] "),
        _ => leaf(out, phase, "[ ] "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CodeFormatError;
    use crate::render::render;
    use crate::CustomNode;
    use pretty_assertions::assert_eq;

    fn render_str(root: &Node, options: &Options) -> String {
        String::from_utf8(render(root, options).unwrap()).unwrap()
    }

    fn para(children: Vec<Node>) -> Node {
        Node::document(vec![Node::paragraph(children)])
    }

    fn code_block(info: Option<&str>, code: &str) -> Node {
        Node::document(vec![Node::new(NodeKind::CodeBlock {
            info: info.map(str::to_string),
            fenced: true,
            code: code.to_string(),
        })])
    }

    #[test]
    fn test_code_fence() {
        assert_eq!(code_fence("plain", '`'), "```");
        assert_eq!(code_fence("```\nnested\n```\n", '`'), "````");
        assert_eq!(code_fence("  `````rust\n", '`'), "``````");
        assert_eq!(code_fence("inline ``` is fine", '`'), "```");
        assert_eq!(code_fence("~~~~\n```\n", '~'), "~~~~~");
        assert_eq!(code_fence("~~~~\n", '`'), "```");
    }

    #[test]
    fn test_code_span() {
        assert_eq!(code_span("nano"), "`nano`");
        assert_eq!(code_span("Use `code` here."), "``Use `code` here.``");
        assert_eq!(code_span("`tick"), "`` `tick ``");
        assert_eq!(code_span(" a "), "`  a  `");
    }

    #[test]
    fn test_destination() {
        assert_eq!(destination("https://eff.org", None), "https://eff.org");
        assert_eq!(destination("a b", Some("t")), "<a b> \"t\"");
        assert_eq!(destination("/x", Some("say \"hi\"")), "/x \"say \\\"hi\\\"\"");
        assert_eq!(destination("/u", Some("a\\")), "/u \"a\\\\\"");
    }

    #[test]
    fn test_heading() {
        let doc = Node::document(vec![Node::with_children(
            NodeKind::Heading { level: 2 },
            vec![Node::text("Two"), Node::new(NodeKind::SoftBreak), Node::text("lines")],
        )]);
        assert_eq!(render_str(&doc, &Options::default()), "## Two lines\n");

        let empty = Node::document(vec![Node::new(NodeKind::Heading { level: 1 })]);
        assert_eq!(render_str(&empty, &Options::default()), "#\n");
    }

    #[test]
    fn test_emphasis_levels() {
        let doc = para(vec![
            Node::wrap(NodeKind::Emphasis(EmphasisLevel::Italic), Node::text("i")),
            Node::wrap(
                NodeKind::Emphasis(EmphasisLevel::Bold),
                Node::wrap(NodeKind::Emphasis(EmphasisLevel::Italic), Node::text("bi")),
            ),
            Node::wrap(NodeKind::Emphasis(EmphasisLevel::Underline), Node::text("u")),
            Node::wrap(NodeKind::Strikethrough, Node::text("s")),
        ]);
        assert_eq!(render_str(&doc, &Options::default()), "*i****bi******u***~~s~~\n");
    }

    #[test]
    fn test_code_block_formatter() {
        let options = Options::default().with_language_formatter("shout", |code: &[u8]| {
            Ok::<_, CodeFormatError>(code.to_ascii_uppercase())
        });
        assert_eq!(
            render_str(&code_block(Some("shout"), "hello\n"), &options),
            "```shout\nHELLO\n```\n"
        );
        assert_eq!(
            render_str(&code_block(Some("other"), "hello"), &options),
            "```other\nhello\n```\n"
        );
    }

    #[test]
    fn test_failing_formatter_keeps_code() {
        let options = Options::default().with_language_formatter("go", |_: &[u8]| {
            Err::<Vec<u8>, CodeFormatError>("syntax error".into())
        });
        assert_eq!(
            render_str(&code_block(Some("go"), "var v int =     3\n"), &options),
            "```go\nvar v int =     3\n```\n"
        );
    }

    #[test]
    fn test_info_with_backtick_uses_tildes() {
        assert_eq!(
            render_str(&code_block(Some("a`b"), "code\n~~~\n"), &Options::default()),
            "~~~~a`b\ncode\n~~~\n~~~~\n"
        );
    }

    #[test]
    fn test_wide_marker_indents_to_content() {
        let list = |start: u64| {
            Node::document(vec![Node::with_children(
                NodeKind::List { ordered: true, start },
                vec![Node::with_children(
                    NodeKind::ListItem,
                    vec![Node::paragraph(vec![Node::text("x")]), Node::paragraph(vec![Node::text("y")])],
                )],
            )])
        };
        let options = Options::default().with_preserve_list_start(true);
        assert_eq!(render_str(&list(10), &options), "10. x\n\n\ty\n");
        assert_eq!(render_str(&list(100), &options), "100. x\n\n\t y\n");
        assert_eq!(render_str(&list(1000), &options), "1000. x\n\n\t  y\n");
    }

    #[test]
    fn test_empty_code_block() {
        assert_eq!(render_str(&code_block(None, ""), &Options::default()), "```\n```\n");
    }

    #[test]
    fn test_links_and_images() {
        let image = Node::with_children(
            NodeKind::Image {
                url: "/shiprock.jpg".into(),
                title: Some("Shiprock".into()),
            },
            vec![Node::text("An old rock")],
        );
        let doc = para(vec![
            Node::with_children(
                NodeKind::Link {
                    url: "https://flickr.com".into(),
                    title: None,
                    autolink: false,
                },
                vec![image],
            ),
            Node::text(" "),
            Node::with_children(
                NodeKind::Link {
                    url: "mailto:fake@example.com".into(),
                    title: None,
                    autolink: true,
                },
                vec![Node::text("fake@example.com")],
            ),
        ]);
        assert_eq!(
            render_str(&doc, &Options::default()),
            "[![An old rock](/shiprock.jpg \"Shiprock\")](https://flickr.com) <fake@example.com>\n"
        );
    }

    #[test]
    fn test_table() {
        let cell = |text: &str| Node::wrap(NodeKind::TableCell, Node::text(text));
        let table = Node::with_children(
            NodeKind::Table {
                alignments: vec![Alignment::None, Alignment::Left, Alignment::Center],
            },
            vec![
                Node::with_children(NodeKind::TableHead, vec![cell("a"), cell("b"), cell("c")]),
                Node::with_children(NodeKind::TableRow, vec![cell("1"), cell("2"), cell("3")]),
            ],
        );
        assert_eq!(
            render_str(&Node::document(vec![table]), &Options::default()),
            "| a | b | c |\n| --- | :-- | :-: |\n| 1 | 2 | 3 |\n"
        );
    }

    #[test]
    fn test_front_matter_and_html() {
        let doc = Node::document(vec![
            Node::new(NodeKind::MetadataBlock("draft: true".into())),
            Node::new(NodeKind::HtmlBlock("<!-- asf -->\n".into())),
            Node::paragraph(vec![Node::text("some text")]),
        ]);
        assert_eq!(
            render_str(&doc, &Options::default()),
            "---\ndraft: true\n---\n\n<!-- asf -->\n\nsome text\n"
        );
    }

    #[test]
    fn test_footnotes() {
        let doc = Node::document(vec![
            Node::paragraph(vec![
                Node::text("Hi"),
                Node::new(NodeKind::FootnoteReference("1".into())),
                Node::text("."),
            ]),
            Node::with_children(
                NodeKind::FootnoteDefinition("1".into()),
                vec![Node::paragraph(vec![Node::text("First\nsecond")])],
            ),
        ]);
        assert_eq!(
            render_str(&doc, &Options::default()),
            "Hi[^1].\n\n[^1]: First\n\tsecond\n"
        );
    }

    #[test]
    fn test_task_items() {
        let item = |checked: bool, text: &str| {
            Node::wrap(
                NodeKind::ListItem,
                Node::with_children(
                    NodeKind::TextBlock,
                    vec![Node::new(NodeKind::TaskListMarker(checked)), Node::text(text)],
                ),
            )
        };
        let list = Node::with_children(
            NodeKind::List {
                ordered: false,
                start: 0,
            },
            vec![item(true, "done"), item(false, "todo")],
        );
        assert_eq!(
            render_str(&Node::document(vec![list]), &Options::default()),
            "- [x] done\n- [ ] todo\n"
        );
    }

    #[test]
    fn test_hard_break_and_inline_html() {
        let doc = para(vec![
            Node::text("First line"),
            Node::new(NodeKind::InlineHtml("<br>".into())),
            Node::new(NodeKind::SoftBreak),
            Node::text("next"),
            Node::new(NodeKind::HardBreak),
            Node::text("last"),
        ]);
        assert_eq!(
            render_str(&doc, &Options::default()),
            "First line<br>\nnext\\\nlast\n"
        );
    }

    #[test]
    fn test_custom_inline_without_rule_keeps_children() {
        let doc = para(vec![Node::with_children(
            NodeKind::Custom(CustomNode::new("color").with_attr("color", "red")),
            vec![Node::text("red text")],
        )]);
        assert_eq!(render_str(&doc, &Options::default()), "red text\n");
    }
}
