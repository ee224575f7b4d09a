//! `BehaviorSpec`: given / when / then.
//!
//! Names carry a `Given: ` / `When: ` / `And: ` / `Then: ` prefix for
//! display. Path entries use the bare name.

use tree_sitter::Node;

use super::{call_stub, match_call, match_config_chain, Declaration, Keyword, SpecStyle};
use crate::model::TestType;

const GIVEN: &str = "Given: ";
const WHEN: &str = "When: ";
const AND: &str = "And: ";
const THEN: &str = "Then: ";

const CONTAINERS: &[Keyword] = &[
    Keyword::enabled("given").with_prefix(GIVEN),
    Keyword::enabled("Given").with_prefix(GIVEN),
    Keyword::disabled("xgiven").with_prefix(GIVEN),
    Keyword::disabled("xGiven").with_prefix(GIVEN),
    Keyword::enabled("when").with_prefix(WHEN),
    Keyword::enabled("When").with_prefix(WHEN),
    Keyword::disabled("xwhen").with_prefix(WHEN),
    Keyword::disabled("xWhen").with_prefix(WHEN),
    Keyword::enabled("and").with_prefix(AND),
    Keyword::enabled("And").with_prefix(AND),
    Keyword::disabled("xand").with_prefix(AND),
    Keyword::disabled("xAnd").with_prefix(AND),
];

const THENS: &[Keyword] = &[
    Keyword::enabled("then").with_prefix(THEN),
    Keyword::enabled("Then").with_prefix(THEN),
    Keyword::disabled("xthen").with_prefix(THEN),
    Keyword::disabled("xThen").with_prefix(THEN),
];

pub struct BehaviorSpecStyle;

impl SpecStyle for BehaviorSpecStyle {
    fn fqn(&self) -> &'static str {
        "io.kotest.core.spec.style.BehaviorSpec"
    }

    fn spec_style_name(&self) -> &'static str {
        "Behavior Spec"
    }

    fn generate_test(&self, _spec_name: &str, name: &str) -> String {
        call_stub("then", name)
    }

    fn leaf(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, THENS, TestType::Test)
            .or_else(|| match_config_chain(node, src, THENS, TestType::Test))
    }

    fn container(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, CONTAINERS, TestType::Container)
    }
}
