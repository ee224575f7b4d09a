//! `DescribeSpec`: `describe` and `context` blocks with `it` leaves.

use tree_sitter::Node;

use super::{call_stub, match_call, match_config_chain, Declaration, Keyword, SpecStyle};
use crate::model::TestType;

const CONTAINERS: &[Keyword] = &[
    Keyword::enabled("describe"),
    Keyword::enabled("context"),
    Keyword::disabled("xdescribe"),
    Keyword::disabled("xcontext"),
];
const TESTS: &[Keyword] = &[Keyword::enabled("it"), Keyword::disabled("xit")];

pub struct DescribeSpecStyle;

impl SpecStyle for DescribeSpecStyle {
    fn fqn(&self) -> &'static str {
        "io.kotest.core.spec.style.DescribeSpec"
    }

    fn spec_style_name(&self) -> &'static str {
        "Describe Spec"
    }

    fn generate_test(&self, _spec_name: &str, name: &str) -> String {
        call_stub("it", name)
    }

    fn leaf(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, TESTS, TestType::Test)
            .or_else(|| match_config_chain(node, src, TESTS, TestType::Test))
    }

    fn container(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, CONTAINERS, TestType::Container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::test_support::{names, recognize};
    use crate::syntax::SourceFile;

    #[test]
    fn test_describe_context_it() {
        let file = SourceFile::parse(
            r#"
class StackSpec : DescribeSpec({
    describe("a stack") {
        context("when empty") {
            it("has size zero") { }
        }
        xit("pops") { }
    }
})
"#,
        )
        .unwrap();
        let tests = recognize(&DescribeSpecStyle, &file);
        assert_eq!(
            names(&tests),
            vec![
                "a stack",
                "a stack -- when empty",
                "a stack -- when empty -- has size zero",
                "a stack -- pops",
            ]
        );
        assert!(tests[3].disabled);
        assert_eq!(tests[2].path.len(), 3);
    }
}
