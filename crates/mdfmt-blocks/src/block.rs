//! Content block types.
//!
//! These mirror the JSON shape of Notion's block API: every object carries a
//! `type` string and a field of the same name holding the type's payload.
//! Only the payloads the converter understands are modelled; anything else
//! is ignored on decode and surfaces as an unsupported block.

use serde::Deserialize;

/// A content block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub id: String,
    /// Block type, e.g. `paragraph` or `bulleted_list_item`
    #[serde(rename = "type")]
    pub kind: String,

    pub paragraph: Option<RichTextBlock>,
    pub heading_1: Option<RichTextBlock>,
    pub heading_2: Option<RichTextBlock>,
    pub heading_3: Option<RichTextBlock>,
    pub bulleted_list_item: Option<RichTextBlock>,
    pub numbered_list_item: Option<RichTextBlock>,
    pub quote: Option<RichTextBlock>,
    pub to_do: Option<ToDo>,
    pub code: Option<Code>,
    pub image: Option<File>,
    pub bookmark: Option<Bookmark>,
    pub link_preview: Option<LinkPreview>,
    pub equation: Option<Equation>,
    pub link_to_page: Option<LinkToPage>,
}

impl Block {
    /// Decode a JSON array of blocks
    pub fn from_json(json: &str) -> crate::Result<Vec<Block>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Color of a block or of rich text; `default` means none
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn is_default(&self) -> bool {
        self.0.is_empty() || self.0 == "default"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Payload of blocks that hold a line of rich text and nested blocks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichTextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToDo {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Code {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

/// A file, either hosted by the service or external
#[derive(Debug, Clone, Default, Deserialize)]
pub struct File {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub file: Option<FileUrl>,
    pub external: Option<FileUrl>,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

impl File {
    pub fn url(&self) -> &str {
        let file = match self.kind.as_str() {
            "external" => self.external.as_ref(),
            "file" => self.file.as_ref(),
            _ => self.file.as_ref().or(self.external.as_ref()),
        };
        file.map(|f| f.url.as_str()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bookmark {
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkPreview {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Equation {
    pub expression: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkToPage {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub page_id: Option<String>,
    pub database_id: Option<String>,
}

impl LinkToPage {
    pub fn id(&self) -> Option<&str> {
        match self.kind.as_str() {
            "database_id" => self.database_id.as_deref(),
            _ => self.page_id.as_deref().or(self.database_id.as_deref()),
        }
    }
}

/// A run of formatted text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichText {
    /// `text`, `mention` or `equation`
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<Text>,
    pub mention: Option<Mention>,
    pub equation: Option<Equation>,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichText {
    /// Plain text run without annotations
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            kind: "text".to_string(),
            plain_text: content.clone(),
            text: Some(Text { content, link: None }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Text {
    pub content: String,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

/// A reference to a user, page, database or date inside rich text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mention {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: Option<User>,
    pub page: Option<Reference>,
    pub database: Option<Reference>,
    pub date: Option<DateRange>,
    pub link_preview: Option<LinkPreview>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    /// `person` or `bot`
    #[serde(rename = "type", default)]
    pub kind: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reference {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

impl DateRange {
    /// `start`, or `start-end` for a range
    pub fn display(&self) -> String {
        match &self.end {
            Some(end) => format!("{}-{}", self.start, end),
            None => self.start.clone(),
        }
    }
}
