//! `FunSpec`: `context` containers holding `test` leaves.

use tree_sitter::Node;

use super::{call_stub, match_call, match_config_chain, Declaration, Keyword, SpecStyle};
use crate::model::TestType;

const CONTEXTS: &[Keyword] = &[Keyword::enabled("context"), Keyword::disabled("xcontext")];
const TESTS: &[Keyword] = &[Keyword::enabled("test"), Keyword::disabled("xtest")];

pub struct FunSpecStyle;

impl SpecStyle for FunSpecStyle {
    fn fqn(&self) -> &'static str {
        "io.kotest.core.spec.style.FunSpec"
    }

    fn spec_style_name(&self) -> &'static str {
        "Fun Spec"
    }

    fn generate_test(&self, _spec_name: &str, name: &str) -> String {
        call_stub("test", name)
    }

    fn leaf(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, TESTS, TestType::Test)
            .or_else(|| match_config_chain(node, src, TESTS, TestType::Test))
    }

    fn container(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, CONTEXTS, TestType::Container)
    }
}
