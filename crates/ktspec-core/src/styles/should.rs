//! `ShouldSpec`: `context` blocks with `should` leaves.

use tree_sitter::Node;

use super::{call_stub, match_call, match_config_chain, Declaration, Keyword, SpecStyle};
use crate::model::TestType;

const CONTEXTS: &[Keyword] = &[Keyword::enabled("context"), Keyword::disabled("xcontext")];
const SHOULDS: &[Keyword] = &[Keyword::enabled("should"), Keyword::disabled("xshould")];

pub struct ShouldSpecStyle;

impl SpecStyle for ShouldSpecStyle {
    fn fqn(&self) -> &'static str {
        "io.kotest.core.spec.style.ShouldSpec"
    }

    fn spec_style_name(&self) -> &'static str {
        "Should Spec"
    }

    fn generate_test(&self, _spec_name: &str, name: &str) -> String {
        call_stub("should", name)
    }

    fn leaf(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, SHOULDS, TestType::Test)
            .or_else(|| match_config_chain(node, src, SHOULDS, TestType::Test))
    }

    fn container(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, CONTEXTS, TestType::Container)
    }
}
