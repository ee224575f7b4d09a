//! `StringSpec`: tests are string literals invoked with a lambda.

use tree_sitter::Node;

use super::{escape_name, Declaration, SpecStyle, CONFIG_MEMBER};
use crate::model::{TestName, TestType};
use crate::syntax::psi::{
    extract_string_invoke_with_lambda,
    extract_string_receiver_for_dot_expression_with_rhs_final_lambda, StringArg,
};

pub struct StringSpecStyle;

impl SpecStyle for StringSpecStyle {
    fn fqn(&self) -> &'static str {
        "io.kotest.core.spec.style.StringSpec"
    }

    fn spec_style_name(&self) -> &'static str {
        "String Spec"
    }

    fn generate_test(&self, _spec_name: &str, name: &str) -> String {
        format!("\"{}\" {{ }}", escape_name(name))
    }

    fn leaf(&self, node: Node, src: &str) -> Option<Declaration> {
        extract_string_invoke_with_lambda(node, src)
            .or_else(|| {
                extract_string_receiver_for_dot_expression_with_rhs_final_lambda(
                    node,
                    src,
                    CONFIG_MEMBER,
                )
            })
            .map(declare)
    }

    /// String specs are flat.
    fn container(&self, _node: Node, _src: &str) -> Option<Declaration> {
        None
    }
}

fn declare(arg: StringArg) -> Declaration {
    Declaration {
        name: TestName::new(None, arg.text, arg.interpolated),
        test_type: TestType::Test,
        disabled: false,
    }
}
