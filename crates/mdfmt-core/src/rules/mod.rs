//! Rule system for rendering document trees.
//!
//! A [`Registry`] maps node kind names to [`Rule`]s. Rules are added in
//! prioritized groups: for the same kind the group with the higher priority
//! wins, and within one priority the group added last wins.

mod commonmark;
mod rule;
mod terminal;

pub use commonmark::commonmark_rules;
pub use rule::{RenderFn, Rule};
pub use terminal::terminal_rules;

use std::borrow::Cow;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::options::Options;

/// Priority of the rules in [`Registry::default_registry`]
pub const DEFAULT_PRIORITY: i32 = 0;

/// Priority at which [`terminal_rules`] are applied when
/// [`Options::terminal`] is set
pub const TERMINAL_PRIORITY: i32 = 100;

static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(|| {
    RegistryBuilder::new()
        .add(DEFAULT_PRIORITY, commonmark_rules())
        .build()
});

/// Rules by kind, each with the priority it was registered at
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: IndexMap<String, (i32, Rule)>,
}

impl Registry {
    /// Process-wide registry with the CommonMark rules
    pub fn default_registry() -> &'static Registry {
        &DEFAULT_REGISTRY
    }

    /// Find the rule for a kind
    pub fn get(&self, kind: &str) -> Option<&Rule> {
        self.rules.get(kind).map(|(_, rule)| rule)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.rules.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered kind names, in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Apply a group of rules; a rule replaces the current one for its kind
    /// unless that one has a higher priority
    fn apply(&mut self, priority: i32, rules: Vec<Rule>) {
        for rule in rules {
            match self.rules.get_mut(&rule.kind) {
                Some(entry) if entry.0 > priority => {}
                Some(entry) => *entry = (priority, rule),
                None => {
                    self.rules.insert(rule.kind.clone(), (priority, rule));
                }
            }
        }
    }

    /// This registry with the terminal rules and the overrides of `options`
    /// applied. Borrows when there is nothing to apply.
    pub fn resolve(&self, options: &Options) -> Cow<'_, Registry> {
        if !options.terminal && options.overrides.is_empty() {
            return Cow::Borrowed(self);
        }

        let mut builder = RegistryBuilder::new();
        if options.terminal {
            builder = builder.add(TERMINAL_PRIORITY, terminal_rules());
        }
        for (priority, rules) in &options.overrides {
            builder = builder.add(*priority, rules.clone());
        }

        let mut registry = self.clone();
        builder.apply_to(&mut registry);
        Cow::Owned(registry)
    }
}

/// Collects prioritized rule groups and builds a [`Registry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    groups: Vec<(i32, Vec<Rule>)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group of rules at `priority`
    pub fn add(mut self, priority: i32, rules: Vec<Rule>) -> Self {
        self.groups.push((priority, rules));
        self
    }

    pub fn build(self) -> Registry {
        let mut registry = Registry::default();
        self.apply_to(&mut registry);
        registry
    }

    fn apply_to(mut self, registry: &mut Registry) {
        // stable, so equal priorities keep their insertion order
        self.groups.sort_by_key(|(priority, _)| *priority);
        for (priority, rules) in self.groups {
            registry.apply(priority, rules);
        }
    }
}
