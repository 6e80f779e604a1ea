//! Configuration options for rendering

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::rules::Rule;

/// Error returned by a [`CodeFormatter`]
pub type CodeFormatError = Box<dyn std::error::Error + Send + Sync>;

/// Reformats the content of a code block for one language.
///
/// Closures of the right shape implement this trait, so a formatter can be
/// registered without defining a type.
pub trait CodeFormatter: Send + Sync {
    fn format(&self, code: &[u8]) -> Result<Vec<u8>, CodeFormatError>;
}

impl<F> CodeFormatter for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, CodeFormatError> + Send + Sync,
{
    fn format(&self, code: &[u8]) -> Result<Vec<u8>, CodeFormatError> {
        self(code)
    }
}

/// What to do with a node whose kind has no rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKindPolicy {
    /// Log a warning and render the node's children without markup
    #[default]
    Lenient,
    /// Abort the pass with [`FormatError::UnsupportedNodeKind`](crate::FormatError::UnsupportedNodeKind)
    Strict,
}

/// Options for rendering
#[derive(Clone, Default)]
pub struct Options {
    /// Render emphasis as ANSI escape sequences instead of Markdown markers
    pub terminal: bool,

    /// Extra rules, applied on top of the registry by priority
    pub overrides: Vec<(i32, Vec<Rule>)>,

    /// Code formatters by language tag (the first word of a fence info
    /// string, or `yaml` for front matter)
    pub language_formatters: HashMap<String, Arc<dyn CodeFormatter>>,

    /// Handling of node kinds without a rule
    pub unknown_kinds: UnknownKindPolicy,

    /// Number ordered lists from their source start value instead of 1
    pub preserve_list_start: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Add rules at `priority`. For the same kind, the rule with the higher
    /// priority wins; on a tie the one added last wins.
    pub fn with_override(mut self, priority: i32, rules: Vec<Rule>) -> Self {
        self.overrides.push((priority, rules));
        self
    }

    pub fn with_language_formatter<F>(mut self, language: impl Into<String>, formatter: F) -> Self
    where
        F: CodeFormatter + 'static,
    {
        self.language_formatters
            .insert(language.into(), Arc::new(formatter));
        self
    }

    pub fn with_unknown_kinds(mut self, policy: UnknownKindPolicy) -> Self {
        self.unknown_kinds = policy;
        self
    }

    pub fn with_preserve_list_start(mut self, preserve: bool) -> Self {
        self.preserve_list_start = preserve;
        self
    }

    /// Look up the formatter for a language tag
    pub fn formatter(&self, language: &str) -> Option<&dyn CodeFormatter> {
        self.language_formatters.get(language).map(|f| f.as_ref())
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut languages: Vec<&str> = self.language_formatters.keys().map(String::as_str).collect();
        languages.sort_unstable();
        f.debug_struct("Options")
            .field("terminal", &self.terminal)
            .field("overrides", &self.overrides)
            .field("language_formatters", &languages)
            .field("unknown_kinds", &self.unknown_kinds)
            .field("preserve_list_start", &self.preserve_list_start)
            .finish()
    }
}
