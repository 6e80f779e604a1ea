//! Formatter - the main entry point for Markdown formatting.

use std::io::Write;

use mdfmt_core::{CodeFormatter, FormatError, Node, Options, Registry, Renderer, Rule, UnknownKindPolicy};

use crate::parse::parse;
use crate::Result;

/// The main service for formatting Markdown
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: Options,
}

impl Formatter {
    /// Create a Formatter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Formatter with custom options
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    /// Render emphasis as terminal escape sequences
    pub fn terminal(mut self) -> Self {
        self.options.terminal = true;
        self
    }

    /// Fail on node kinds without a rule instead of rendering their children
    pub fn strict(mut self) -> Self {
        self.options.unknown_kinds = UnknownKindPolicy::Strict;
        self
    }

    /// Format front matter and `yaml`/`yml` code blocks
    #[cfg(feature = "yaml")]
    pub fn with_yaml(self) -> Self {
        self.with_formatter("yaml", crate::yaml::YamlFormatter)
            .with_formatter("yml", crate::yaml::YamlFormatter)
    }

    /// Register a code formatter for a language
    pub fn with_formatter<F>(mut self, language: &str, formatter: F) -> Self
    where
        F: CodeFormatter + 'static,
    {
        self.options = self.options.with_language_formatter(language, formatter);
        self
    }

    /// Add a rule; it wins over the built-in rule for its kind when
    /// `priority` is at least zero
    pub fn add_rule(&mut self, priority: i32, rule: Rule) -> &mut Self {
        self.options.overrides.push((priority, vec![rule]));
        self
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Format Markdown bytes
    pub fn format(&self, src: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(src.len() + 1);
        self.format_to(src, &mut out)?;
        Ok(out)
    }

    /// Format a Markdown string
    pub fn format_str(&self, src: &str) -> Result<String> {
        let mut out = Vec::with_capacity(src.len() + 1);
        self.render_to(&parse(src), &mut out)?;
        String::from_utf8(out).map_err(|e| FormatError::ParseFailure(e.to_string()))
    }

    /// Format Markdown bytes into a sink
    pub fn format_to(&self, src: &[u8], sink: &mut dyn Write) -> Result<()> {
        let src = std::str::from_utf8(src)
            .map_err(|e| FormatError::ParseFailure(format!("input is not valid UTF-8: {e}")))?;
        self.render_to(&parse(src), sink)
    }

    /// Render a tree built elsewhere
    pub fn render(&self, root: &Node) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.render_to(root, &mut out)?;
        Ok(out)
    }

    fn render_to(&self, root: &Node, sink: &mut dyn Write) -> Result<()> {
        Renderer::new(Registry::default_registry(), &self.options).render(root, sink)
    }
}

/// Format Markdown with default options
pub fn format(src: &[u8]) -> Result<Vec<u8>> {
    Formatter::new().format(src)
}

/// Format Markdown with the given options
pub fn format_with(src: &[u8], options: &Options) -> Result<Vec<u8>> {
    Formatter::with_options(options.clone()).format(src)
}

/// Format a Markdown string with default options
pub fn format_str(src: &str) -> Result<String> {
    Formatter::new().format_str(src)
}
