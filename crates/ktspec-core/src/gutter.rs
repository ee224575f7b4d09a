//! Gutter run markers.
//!
//! Markers come from the leaf-token form of recognition: every `{` that
//! opens a test lambda and every `.` of a config chain is offered to the
//! owning style. Both tokens of `test("x").config(..) { }` resolve to the
//! same call, so markers are deduplicated by anchor.

use std::collections::HashSet;

use serde::Serialize;
use tree_sitter::Node;

use crate::discovery::SpecDiscovery;
use crate::model::Spec;
use crate::syntax::supertypes::is_declaration;
use crate::syntax::{NodeAnchor, SourceFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Runs a whole spec class.
    Spec,
    /// Runs one test.
    Run,
    /// A test Kotest will skip.
    Disabled,
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spec => write!(f, "spec"),
            Self::Run => write!(f, "run"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GutterMarker {
    pub kind: MarkerKind,
    /// Spec fqn for spec markers, the readable test path otherwise.
    pub label: String,
    pub spec_fqn: String,
    pub line: u32,
    pub anchor: NodeAnchor,
}

/// Markers for every spec and test in the file, ordered by position.
pub fn markers(discovery: &SpecDiscovery, file: &SourceFile) -> Vec<GutterMarker> {
    let specs = discovery.specs(file);
    let mut out = Vec::new();

    for spec in &specs {
        out.push(GutterMarker {
            kind: MarkerKind::Spec,
            label: spec.fqn.clone(),
            spec_fqn: spec.fqn.clone(),
            line: spec.anchor.line(),
            anchor: spec.anchor.clone(),
        });

        let Some(style) = discovery.registry().style_by_name(spec.style) else {
            continue;
        };
        let Some(body) = declaration_node(file, spec) else {
            continue;
        };

        let mut seen = HashSet::new();
        visit_leaves(body, true, &mut |leaf| {
            let Some(test) = style.test_at_leaf(leaf, file.content()) else {
                return;
            };
            if !seen.insert(test.anchor.clone()) {
                return;
            }
            out.push(GutterMarker {
                kind: if test.disabled {
                    MarkerKind::Disabled
                } else {
                    MarkerKind::Run
                },
                label: test.readable_path(),
                spec_fqn: spec.fqn.clone(),
                line: test.anchor.line(),
                anchor: test.anchor,
            });
        });
    }

    out.sort_by_key(|m| (m.anchor.start_byte, m.kind != MarkerKind::Spec));
    out
}

/// The class declaration a spec was recognized from.
fn declaration_node<'t>(file: &'t SourceFile, spec: &Spec) -> Option<Node<'t>> {
    let anchored = file.resolve(&spec.anchor)?;
    std::iter::successors(Some(anchored), |n| n.parent()).find(is_declaration)
}

fn visit_leaves<'t>(node: Node<'t>, top: bool, f: &mut impl FnMut(Node<'t>)) {
    if !top && is_declaration(&node) {
        return;
    }
    if node.child_count() == 0 {
        f(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_leaves(child, false, f);
    }
}
