//! Style registry for dispatching spec classes to their style.

use std::collections::HashSet;
use std::sync::Arc;

use super::{builtin_styles, SpecStyle};

/// Registry of spec styles.
///
/// Keeps registration order: when a class could match more than one style,
/// the first registered one owns it.
/// Automatically registers all built-in styles on creation.
pub struct StyleRegistry {
    styles: Vec<Arc<dyn SpecStyle>>,
}

impl StyleRegistry {
    /// Create a new registry with all built-in styles.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for style in builtin_styles() {
            registry.register(style);
        }
        registry
    }

    /// A registry with no styles.
    pub fn empty() -> Self {
        Self { styles: Vec::new() }
    }

    /// Built-in styles except those named in `disabled`.
    ///
    /// Names compare case-insensitively, ignoring spaces, so "FunSpec",
    /// "fun spec" and "Fun Spec" all switch off the same style.
    pub fn with_disabled(disabled: &[String]) -> Self {
        let disabled: HashSet<String> = disabled.iter().map(|n| normalize(n)).collect();
        let mut registry = Self::empty();
        for style in builtin_styles() {
            if !disabled.contains(&normalize(style.spec_style_name())) {
                registry.register(style);
            }
        }
        registry
    }

    /// Register a style. A style with the same fqn is replaced in place.
    pub fn register(&mut self, style: Arc<dyn SpecStyle>) {
        match self.styles.iter_mut().find(|s| s.fqn() == style.fqn()) {
            Some(existing) => *existing = style,
            None => self.styles.push(style),
        }
    }

    /// Get the style for an exact fully qualified class name.
    pub fn style_for_fqn(&self, fqn: &str) -> Option<Arc<dyn SpecStyle>> {
        self.styles.iter().find(|s| s.fqn() == fqn).cloned()
    }

    /// First registered style matching any of the candidate supertypes.
    pub fn style_for_supertypes(&self, candidates: &[String]) -> Option<Arc<dyn SpecStyle>> {
        self.styles
            .iter()
            .find(|s| candidates.iter().any(|c| c == s.fqn()))
            .cloned()
    }

    /// Look a style up by its name ("Fun Spec", "funspec") or simple class name.
    pub fn style_by_name(&self, name: &str) -> Option<Arc<dyn SpecStyle>> {
        let wanted = normalize(name);
        self.styles
            .iter()
            .find(|s| {
                normalize(s.spec_style_name()) == wanted
                    || s.fqn().rsplit('.').next().map(normalize) == Some(wanted.clone())
            })
            .cloned()
    }

    pub fn styles(&self) -> &[Arc<dyn SpecStyle>] {
        &self.styles
    }

    /// List all registered styles as (name, fqn).
    pub fn list_styles(&self) -> Vec<(&'static str, &'static str)> {
        self.styles
            .iter()
            .map(|s| (s.spec_style_name(), s.fqn()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
