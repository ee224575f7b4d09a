//! Spec discovery: dispatch each class of a file to its style and collect
//! its test tree.

use std::path::Path;

use serde::Serialize;
use tracing::debug;
use tree_sitter::Node;

use crate::config::DiscoveryConfig;
use crate::error::{KtSpecError, Result};
use crate::model::{Spec, Test, TestElement};
use crate::styles::{SpecStyle, StyleRegistry};
use crate::syntax::supertypes::{declarations, is_declaration, ClassDeclaration};
use crate::syntax::{named_children, NodeAnchor, SourceFile};

/// The spec and test found at a position.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub spec_name: String,
    pub spec_fqn: String,
    pub style: &'static str,
    /// Innermost test enclosing the position, if any.
    pub test: Option<Test>,
}

/// Finds specs and their tests in Kotlin files.
pub struct SpecDiscovery {
    registry: StyleRegistry,
    config: DiscoveryConfig,
}

impl SpecDiscovery {
    /// Discovery with every built-in style and default limits.
    pub fn new() -> Self {
        Self::with_registry(StyleRegistry::new())
    }

    pub fn with_registry(registry: StyleRegistry) -> Self {
        Self {
            registry,
            config: DiscoveryConfig::default(),
        }
    }

    /// Discovery honouring the configured limits and disabled styles.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            registry: StyleRegistry::with_disabled(&config.disabled_styles),
            config: config.clone(),
        }
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// All specs declared in a parsed file.
    ///
    /// Classes extending none of the registered styles are skipped, so a
    /// file without specs yields an empty list.
    pub fn specs(&self, file: &SourceFile) -> Vec<Spec> {
        let decls = declarations(file);
        decls
            .iter()
            .filter_map(|decl| self.spec(file, decl, &decls))
            .collect()
    }

    fn spec(
        &self,
        file: &SourceFile,
        decl: &ClassDeclaration<'_>,
        all: &[ClassDeclaration<'_>],
    ) -> Option<Spec> {
        let (style, superclass) = self.style_for(decl, all)?;
        debug!(spec = %decl.fqn, style = style.spec_style_name(), "recognizing spec");

        let mut tests = Vec::new();
        collect_tests(style.as_ref(), decl.node, file.content(), &mut tests);

        Some(Spec {
            name: decl.name.clone(),
            fqn: decl.fqn.clone(),
            superclass,
            style: style.spec_style_name(),
            anchor: NodeAnchor::of(&decl.name_node.unwrap_or(decl.node)),
            tests,
        })
    }

    /// The style owning a declaration and the supertype that selected it.
    fn style_for(
        &self,
        decl: &ClassDeclaration<'_>,
        all: &[ClassDeclaration<'_>],
    ) -> Option<(std::sync::Arc<dyn SpecStyle>, String)> {
        let candidates = decl.resolved_supertypes(all);
        if candidates.is_empty() {
            return None;
        }
        match self.registry.style_for_supertypes(&candidates) {
            Some(style) => {
                let fqn = style.fqn().to_string();
                Some((style, fqn))
            }
            None => {
                debug!(class = %decl.fqn, ?candidates, "no style matches");
                None
            }
        }
    }

    /// Read, parse and recognize a file from disk.
    pub fn specs_for_path(&self, path: &Path) -> Result<Vec<Spec>> {
        let file = self.parse_path(path)?;
        Ok(self.specs(&file))
    }

    /// Read and parse a file, enforcing extension and size limits.
    pub fn parse_path(&self, path: &Path) -> Result<SourceFile> {
        if !self.config.is_source(path) {
            return Err(KtSpecError::UnsupportedFile(path.display().to_string()));
        }
        let size = std::fs::metadata(path)
            .map_err(|e| KtSpecError::io(path, e))?
            .len();
        if size > self.config.max_file_size {
            return Err(KtSpecError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.config.max_file_size,
            });
        }
        SourceFile::from_path(path)
    }

    /// The spec and innermost test enclosing a byte offset.
    pub fn enclosing(&self, file: &SourceFile, offset: usize) -> Option<Location> {
        let decls = declarations(file);
        let (decl, style) = decls
            .iter()
            .rev()
            .filter(|d| d.node.start_byte() <= offset && offset < d.node.end_byte())
            .find_map(|d| self.style_for(d, &decls).map(|(style, _)| (d, style)))?;

        let src = file.content();
        let test = file.leaf_at(offset).and_then(|leaf| {
            style.test_at_leaf(leaf, src).or_else(|| {
                std::iter::successors(Some(leaf), |n| n.parent())
                    .take_while(|n| *n != decl.node)
                    .find_map(|n| style.test(n, src))
            })
        });

        Some(Location {
            spec_name: decl.name.clone(),
            spec_fqn: decl.fqn.clone(),
            style: style.spec_style_name(),
            test,
        })
    }

    /// Innermost test enclosing a byte offset.
    pub fn enclosing_test(&self, file: &SourceFile, offset: usize) -> Option<Test> {
        self.enclosing(file, offset)?.test
    }
}

impl Default for SpecDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order walk building test trees. Nested classes are their own specs.
///
/// Only containers take nested elements. A test declared inside a leaf
/// shares the leaf's parent path, so it is placed next to the leaf.
fn collect_tests(style: &dyn SpecStyle, node: Node, src: &str, out: &mut Vec<TestElement>) {
    for child in named_children(node) {
        if is_declaration(&child) {
            continue;
        }
        match style.test(child, src) {
            Some(test) if test.is_container() => {
                let mut element = TestElement::new(test);
                collect_tests(style, child, src, &mut element.nested);
                out.push(element);
            }
            Some(test) => {
                out.push(TestElement::new(test));
                collect_tests(style, child, src, out);
            }
            None => collect_tests(style, child, src, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestType;

    const FEATURE: &str = r#"
package com.example

import io.kotest.core.spec.style.FeatureSpec

class LoginSpec : FeatureSpec({
    feature("Login") {
        scenario("succeeds with valid credentials") { }
        scenario("fails with bad password") { }
    }
})
"#;

    #[test]
    fn test_specs_builds_tree() {
        let file = SourceFile::parse(FEATURE).unwrap();
        let specs = SpecDiscovery::new().specs(&file);
        assert_eq!(specs.len(), 1);

        let spec = &specs[0];
        assert_eq!(spec.fqn, "com.example.LoginSpec");
        assert_eq!(spec.style, "Feature Spec");
        assert_eq!(spec.superclass, "io.kotest.core.spec.style.FeatureSpec");
        assert_eq!(spec.tests.len(), 1);
        assert_eq!(spec.tests[0].nested.len(), 2);
        assert_eq!(spec.tests[0].test.test_type, TestType::Container);
        assert_eq!(spec.test_count(), 3);
    }

    #[test]
    fn test_unmatched_supertype_is_empty() {
        let file = SourceFile::parse(
            r#"
import io.kotest.core.spec.style.FeatureSpec

class NotASpec : Something({
    feature("Login") { scenario("x") { } }
})
"#,
        )
        .unwrap();
        assert!(SpecDiscovery::new().specs(&file).is_empty());
    }

    #[test]
    fn test_disabled_style_is_ignored() {
        let config = DiscoveryConfig {
            disabled_styles: vec!["Feature Spec".to_string()],
            ..Default::default()
        };
        let file = SourceFile::parse(FEATURE).unwrap();
        assert!(SpecDiscovery::from_config(&config).specs(&file).is_empty());
    }

    #[test]
    fn test_enclosing_test() {
        let file = SourceFile::parse(FEATURE).unwrap();
        let discovery = SpecDiscovery::new();

        let offset = FEATURE.find("fails with").unwrap();
        let test = discovery.enclosing_test(&file, offset).unwrap();
        assert_eq!(test.readable_path(), "Login -- fails with bad password");

        let offset = FEATURE.find("package").unwrap();
        assert!(discovery.enclosing(&file, offset).is_none());

        let offset = FEATURE.find("class LoginSpec").unwrap();
        let location = discovery.enclosing(&file, offset).unwrap();
        assert_eq!(location.spec_name, "LoginSpec");
        assert!(location.test.is_none());
    }

    #[test]
    fn test_parse_path_rejects_other_extensions() {
        let discovery = SpecDiscovery::new();
        let err = discovery.parse_path(Path::new("Main.java")).err().unwrap();
        assert!(matches!(err, KtSpecError::UnsupportedFile(_)));
    }

    #[test]
    fn test_test_inside_leaf_is_placed_beside_it() {
        let file = SourceFile::parse(
            r#"
import io.kotest.core.spec.style.FunSpec

class S : FunSpec({
    context("ctx") {
        test("a") { test("b") { } }
    }
})
"#,
        )
        .unwrap();
        let specs = SpecDiscovery::new().specs(&file);
        let ctx = &specs[0].tests[0];
        let children: Vec<_> = ctx.nested.iter().map(|e| e.test.readable_path()).collect();
        assert_eq!(children, vec!["ctx -- a", "ctx -- b"]);
        assert!(ctx.nested.iter().all(|e| e.nested.is_empty()));
        assert!(ctx.nested.iter().all(|e| !e.test.is_root));
    }
}
