//! BlocksService - render content blocks as Markdown.

use mdfmt_core::rules::DEFAULT_PRIORITY;
use mdfmt_core::{FormatError, Node, Options, Registry, Renderer, Rule, UnknownKindPolicy};

use crate::block::Block;
use crate::cache::PageSource;
use crate::convert::blocks_to_nodes;
use crate::rules::block_rules;
use crate::Result;

/// The main service for rendering content blocks
#[derive(Debug, Clone)]
pub struct BlocksService {
    options: Options,
}

impl BlocksService {
    /// Create a BlocksService with default options
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a BlocksService on top of custom options; the block rules are
    /// added at the default priority, so overrides already present at the
    /// same or a higher priority are kept
    pub fn with_options(mut options: Options) -> Self {
        options.overrides.insert(0, (DEFAULT_PRIORITY, block_rules()));
        Self { options }
    }

    /// Fail on unsupported blocks instead of skipping them
    pub fn strict(mut self) -> Self {
        self.options.unknown_kinds = UnknownKindPolicy::Strict;
        self
    }

    /// Add a rule, e.g. to give colors or users a rendering
    pub fn add_rule(&mut self, priority: i32, rule: Rule) -> &mut Self {
        self.options.overrides.push((priority, vec![rule]));
        self
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Render blocks as Markdown
    pub fn render(&self, blocks: &[Block]) -> Result<String> {
        let doc = Node::document(blocks_to_nodes(blocks));
        let mut out = Vec::new();
        Renderer::new(Registry::default_registry(), &self.options).render(&doc, &mut out)?;
        String::from_utf8(out).map_err(|e| FormatError::ParseFailure(e.to_string()).into())
    }

    /// Decode a JSON array of blocks and render it
    pub fn render_json(&self, json: &str) -> Result<String> {
        self.render(&Block::from_json(json)?)
    }

    /// Fetch a page and render it
    pub fn render_page(&self, source: &dyn PageSource, id: &str) -> Result<String> {
        self.render(&source.fetch(id)?)
    }
}

impl Default for BlocksService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlocksError;
    use mdfmt_core::{Phase, Walk};
    use pretty_assertions::assert_eq;

    const ABOUT: &str = r#"[
      {"object": "block", "id": "1", "type": "paragraph", "paragraph": {"color": "default", "rich_text": [
        {"type": "text", "text": {"content": "Hi, I'm Mark Rosemaker[^1]."}, "plain_text": "Hi, I'm Mark Rosemaker[^1]."}
      ]}},
      {"object": "block", "id": "2", "type": "paragraph", "paragraph": {"color": "default", "rich_text": [
        {"type": "text", "text": {"content": "[^1]: Or at least, that is the direct translation of my birth name."}}
      ]}},
      {"object": "block", "id": "3", "type": "image", "image": {"type": "file", "caption": [],
        "file": {"url": "https://example.com/about.jpg?X-Amz-Expires=3600", "expiry_time": "2022-04-12T16:22:39.000Z"}}},
      {"object": "block", "id": "4", "type": "paragraph", "paragraph": {"color": "default", "rich_text": [
        {"type": "text", "text": {"content": "Since 2015, I've been teaching German online with "}},
        {"type": "text", "text": {"content": "Authentic German Learning", "link": {"url": "https://www.authenticgermanlearning.com/"}}},
        {"type": "text", "text": {"content": "."}}
      ]}},
      {"object": "block", "id": "5", "type": "paragraph", "paragraph": {"color": "default", "rich_text": [
        {"type": "text", "text": {"content": "So stay tuned if you want to find out more about"}}
      ]}},
      {"object": "block", "id": "6", "type": "bulleted_list_item", "has_children": true, "bulleted_list_item": {
        "color": "default",
        "rich_text": [{"type": "text", "text": {"content": "how to start and run an online business"}}],
        "children": [
          {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [{"type": "text", "text": {"content": "social media"}}]}},
          {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [{"type": "text", "text": {"content": "SEO"}}]}}
        ]
      }},
      {"object": "block", "id": "7", "type": "bulleted_list_item", "has_children": true, "bulleted_list_item": {
        "color": "default",
        "rich_text": [{"type": "text", "text": {"content": "philosophy"}}],
        "children": [
          {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [{"type": "text", "text": {"content": "rationality"}}]}},
          {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [{"type": "text", "text": {"content": "ethics"}}]}}
        ]
      }}
    ]"#;

    const ABOUT_MARKDOWN: &str = "Hi, I'm Mark Rosemaker[^1].

[^1]: Or at least, that is the direct translation of my birth name.

![](https://example.com/about.jpg?X-Amz-Expires=3600)

Since 2015, I've been teaching German online with [Authentic German Learning](https://www.authenticgermanlearning.com/).

So stay tuned if you want to find out more about

- how to start and run an online business
\t- social media
\t- SEO
- philosophy
\t- rationality
\t- ethics
";

    #[test]
    fn test_render_page() {
        let service = BlocksService::new();
        assert_eq!(service.render_json(ABOUT).unwrap(), ABOUT_MARKDOWN);
    }

    fn render_json(json: &str) -> String {
        BlocksService::new().render_json(json).unwrap()
    }

    #[test]
    fn test_annotations_and_mentions() {
        let json = r#"[{"type": "paragraph", "paragraph": {"rich_text": [
            {"type": "text", "text": {"content": "bold"}, "annotations": {"bold": true}},
            {"type": "text", "text": {"content": " and "}},
            {"type": "text", "text": {"content": "both"}, "annotations": {"bold": true, "italic": true}},
            {"type": "text", "text": {"content": " "}},
            {"type": "text", "text": {"content": "x"}, "annotations": {"code": true, "color": "red"}},
            {"type": "text", "text": {"content": " "}},
            {"type": "text", "text": {"content": "gone"}, "annotations": {"strikethrough": true}},
            {"type": "text", "text": {"content": " by "}},
            {"type": "mention", "mention": {"type": "user", "user": {"id": "u1", "type": "person", "name": "Mark"}}, "plain_text": "@Mark"},
            {"type": "text", "text": {"content": " on "}},
            {"type": "mention", "mention": {"type": "date", "date": {"start": "2022-04-01", "end": null}}},
            {"type": "text", "text": {"content": ", see "}},
            {"type": "mention", "mention": {"type": "page", "page": {"id": "abc"}}},
            {"type": "text", "text": {"content": " and "}},
            {"type": "equation", "equation": {"expression": "E=mc^2"}}
        ]}}]"#;
        assert_eq!(
            render_json(json),
            "**bold** and ***both*** `x` ~~gone~~ by  on 2022-04-01, see [](/abc) and E=mc^2\n"
        );
    }

    #[test]
    fn test_block_kinds() {
        let json = r#"[
            {"type": "heading_1", "heading_1": {"rich_text": [{"type": "text", "text": {"content": "Title"}}]}},
            {"type": "quote", "quote": {"rich_text": [{"type": "text", "text": {"content": "quoted"}}]}},
            {"type": "code", "code": {"language": "rust", "rich_text": [{"type": "text", "text": {"content": "fn main() {}"}}]}},
            {"type": "divider", "divider": {}},
            {"type": "numbered_list_item", "numbered_list_item": {"rich_text": [{"type": "text", "text": {"content": "one"}}]}},
            {"type": "numbered_list_item", "numbered_list_item": {"rich_text": [{"type": "text", "text": {"content": "two"}}]}},
            {"type": "to_do", "to_do": {"checked": false, "rich_text": [{"type": "text", "text": {"content": "todo"}}]}},
            {"type": "bookmark", "bookmark": {"url": "https://x.org", "caption": []}},
            {"type": "link_preview", "link_preview": {"url": "https://github.com/x"}},
            {"type": "link_to_page", "link_to_page": {"type": "page_id", "page_id": "p1"}},
            {"type": "equation", "equation": {"expression": "a^2"}}
        ]"#;
        assert_eq!(
            render_json(json),
            "# Title\n\n> quoted\n\n```rust\nfn main() {}\n```\n\n---\n\n1. one\n2. two\n\n- [ ] todo\n\n<https://x.org>\n\n<https://github.com/x>\n\n[](/p1)\n\na^2\n"
        );
    }

    #[test]
    fn test_colored_paragraph() {
        let json = r#"[
            {"type": "paragraph", "paragraph": {"color": "blue", "rich_text": [{"type": "text", "text": {"content": "a"}}]}},
            {"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "b"}}]}}
        ]"#;
        assert_eq!(render_json(json), "a\n\nb\n");
    }

    #[test]
    fn test_paragraph_children_follow() {
        let json = r#"[{"type": "paragraph", "paragraph": {
            "rich_text": [{"type": "text", "text": {"content": "parent"}}],
            "children": [{"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "child"}}]}}]
        }}]"#;
        assert_eq!(render_json(json), "parent\n\nchild\n");
    }

    #[test]
    fn test_unsupported_blocks() {
        let json = r#"[
            {"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "a"}}]}},
            {"type": "child_page", "child_page": {"title": "Sub"}},
            {"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "b"}}]}}
        ]"#;
        assert_eq!(render_json(json), "a\n\nb\n");

        let err = BlocksService::new().strict().render_json(json).unwrap_err();
        assert!(matches!(
            err,
            BlocksError::Render(FormatError::UnsupportedNodeKind(kind)) if kind == "unsupported"
        ));
    }

    #[test]
    fn test_user_rule_override() {
        let mut service = BlocksService::new();
        service.add_rule(
            1,
            Rule::new("user", |out, cursor, phase| {
                if let (Phase::Enter, mdfmt_core::NodeKind::Custom(custom)) = (phase, &cursor.node().kind) {
                    out.write_str("@")?;
                    out.write_str(custom.attr("name").unwrap_or_default())?;
                }
                Ok(Walk::SkipChildren)
            }),
        );
        let json = r#"[{"type": "paragraph", "paragraph": {"rich_text": [
            {"type": "text", "text": {"content": "by "}},
            {"type": "mention", "mention": {"type": "user", "user": {"id": "u1", "name": "Mark"}}}
        ]}}]"#;
        assert_eq!(service.render_json(json).unwrap(), "by @Mark\n");
    }

    #[test]
    fn test_render_cached_page() {
        let source = crate::CachedSource::new(|id: &str| Block::from_json(&format!(
            r#"[{{"type": "paragraph", "paragraph": {{"rich_text": [{{"type": "text", "text": {{"content": "page {id}"}}}}]}}}}]"#
        )));
        let service = BlocksService::new();
        assert_eq!(service.render_page(&source, "p1").unwrap(), "page p1\n");
        assert!(source.cached("p1").is_some());
    }

    #[test]
    fn test_decode_error() {
        let err = BlocksService::new().render_json("{").unwrap_err();
        assert!(matches!(err, BlocksError::Decode(_)));
    }
}
