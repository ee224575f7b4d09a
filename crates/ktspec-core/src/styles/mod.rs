//! Kotest spec styles.
//!
//! A style recognizes the declarations of one Kotest convention
//! (`FeatureSpec`, `FunSpec`, ...). Each style only says which calls are
//! containers and which are leaf tests; building the [`Test`], including
//! the upward walk that resolves its path, is shared by all of them.
//!
//! ```ignore
//! let style = FeatureSpecStyle;
//! if let Some(test) = style.test(node, file.content()) {
//!     println!("{} ({})", test.readable_path(), test.test_type);
//! }
//! ```

mod behavior;
mod describe;
mod feature;
mod fun;
mod registry;
mod should;
mod string;

pub use behavior::BehaviorSpecStyle;
pub use describe::DescribeSpecStyle;
pub use feature::FeatureSpecStyle;
pub use fun::FunSpecStyle;
pub use registry::StyleRegistry;
pub use should::ShouldSpecStyle;
pub use string::StringSpecStyle;

use tree_sitter::Node;

use crate::model::{Test, TestName, TestPathEntry, TestType};
use crate::syntax::psi::{
    self, extract_lhs_string_arg_for_dot_expression_with_rhs_final_lambda,
    extract_string_arg_for_function_with_string_and_lambda_args, identifier_name, Expression,
    StringArg,
};
use crate::syntax::NodeAnchor;

/// Package all built-in styles live in.
pub const STYLE_PACKAGE: &str = "io.kotest.core.spec.style";

/// Member that attaches configuration to a declaration: `test("x").config(..) { }`.
pub const CONFIG_MEMBER: &str = "config";

/// What a single node declares, before its path is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: TestName,
    pub test_type: TestType,
    pub disabled: bool,
}

/// A call name recognized by a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub name: &'static str,
    pub prefix: Option<&'static str>,
    pub disabled: bool,
}

impl Keyword {
    pub const fn enabled(name: &'static str) -> Self {
        Self {
            name,
            prefix: None,
            disabled: false,
        }
    }

    /// The `x`-prefixed variant Kotest skips.
    pub const fn disabled(name: &'static str) -> Self {
        Self {
            name,
            prefix: None,
            disabled: true,
        }
    }

    pub const fn with_prefix(self, prefix: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            ..self
        }
    }

    fn declare(&self, arg: StringArg, test_type: TestType) -> Declaration {
        Declaration {
            name: TestName::new(self.prefix, arg.text, arg.interpolated),
            test_type,
            disabled: self.disabled,
        }
    }
}

/// One Kotest spec style.
pub trait SpecStyle: Send + Sync {
    /// Fully qualified name of the class a spec extends to use this style.
    fn fqn(&self) -> &'static str;

    /// Human-readable style name.
    fn spec_style_name(&self) -> &'static str;

    /// Source of an empty test named `name`, insertable inside a spec body.
    fn generate_test(&self, spec_name: &str, name: &str) -> String;

    /// A leaf test declared by `node`.
    fn leaf(&self, node: Node, src: &str) -> Option<Declaration>;

    /// A container declared by `node`. Also used for the parent walk.
    fn container(&self, node: Node, src: &str) -> Option<Declaration>;

    /// Recognize a full node. The leaf check wins over the container check.
    fn test(&self, node: Node, src: &str) -> Option<Test> {
        let declaration = self
            .leaf(node, src)
            .or_else(|| self.container(node, src))?;
        Some(build_test(self, node, src, declaration))
    }

    fn is_test_element(&self, node: Node, src: &str) -> bool {
        self.test(node, src).is_some()
    }

    /// Recognize from a leaf token: the `{` opening a test lambda or the
    /// `.` of a config chain.
    fn test_at_leaf(&self, leaf: Node, src: &str) -> Option<Test> {
        if let Some(call) = psi::if_call_expression_lambda_open_brace(leaf) {
            return self.test(call, src);
        }
        if let Some(dot) = psi::if_dot_expression_separator(leaf) {
            return self.test(dot, src);
        }
        None
    }
}

/// Assemble a [`Test`] for `node`, resolving its path from the enclosing
/// containers.
pub fn build_test<S: SpecStyle + ?Sized>(
    style: &S,
    node: Node,
    src: &str,
    declaration: Declaration,
) -> Test {
    let parents = parent_tests(style, node, src);
    let disabled = declaration.disabled || parents.iter().any(|p| p.disabled);

    let mut path: Vec<TestPathEntry> = parents
        .into_iter()
        .map(|p| TestPathEntry::from_name(&p.name))
        .collect();
    path.push(TestPathEntry::from_name(&declaration.name));

    Test {
        is_root: path.len() == 1,
        name: declaration.name,
        path,
        test_type: declaration.test_type,
        disabled,
        anchor: NodeAnchor::of(&node),
    }
}

/// Containers enclosing `node`, outermost first.
pub fn parent_tests<S: SpecStyle + ?Sized>(style: &S, node: Node, src: &str) -> Vec<Declaration> {
    let mut parents: Vec<Declaration> = std::iter::successors(node.parent(), |n| n.parent())
        .filter_map(|ancestor| style.container(ancestor, src))
        .collect();
    parents.reverse();
    parents
}

/// `keyword("name") { }` for one of `keywords`.
pub fn match_call(
    node: Node,
    src: &str,
    keywords: &[Keyword],
    test_type: TestType,
) -> Option<Declaration> {
    let Expression::Call(parts) = psi::classify(node) else {
        return None;
    };
    let name = identifier_name(&parts.callee, src)?;
    let keyword = keywords.iter().find(|k| k.name == name)?;
    let arg =
        extract_string_arg_for_function_with_string_and_lambda_args(node, src, &[keyword.name])?;
    Some(keyword.declare(arg, test_type))
}

/// `keyword("name").config(..) { }` for one of `keywords`.
pub fn match_config_chain(
    node: Node,
    src: &str,
    keywords: &[Keyword],
    test_type: TestType,
) -> Option<Declaration> {
    let Expression::DotQualified(dot) = psi::classify(node) else {
        return None;
    };
    let name = psi::call_name(dot.receiver, src)?;
    let keyword = keywords.iter().find(|k| k.name == name)?;
    let arg = extract_lhs_string_arg_for_dot_expression_with_rhs_final_lambda(
        node,
        src,
        &[keyword.name],
        CONFIG_MEMBER,
    )?;
    Some(keyword.declare(arg, test_type))
}

/// Escape a test name for use inside a Kotlin string literal.
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// `keyword("name") { }`, the stub shape most styles share.
pub(crate) fn call_stub(keyword: &str, name: &str) -> String {
    format!("{}(\"{}\") {{ }}", keyword, escape_name(name))
}

/// All built-in styles, in registration order.
pub fn builtin_styles() -> Vec<std::sync::Arc<dyn SpecStyle>> {
    vec![
        std::sync::Arc::new(FeatureSpecStyle),
        std::sync::Arc::new(FunSpecStyle),
        std::sync::Arc::new(DescribeSpecStyle),
        std::sync::Arc::new(ShouldSpecStyle),
        std::sync::Arc::new(BehaviorSpecStyle),
        std::sync::Arc::new(StringSpecStyle),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use tree_sitter::Node;

    use super::SpecStyle;
    use crate::model::Test;
    use crate::syntax::SourceFile;

    /// Every test the style recognizes in the file, in pre-order.
    pub fn recognize(style: &dyn SpecStyle, file: &SourceFile) -> Vec<Test> {
        let mut out = Vec::new();
        walk(file.root(), &mut |node| {
            if let Some(test) = style.test(node, file.content()) {
                out.push(test);
            }
        });
        out
    }

    fn walk<'t>(node: Node<'t>, f: &mut impl FnMut(Node<'t>)) {
        f(node);
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            walk(child, f);
        }
    }

    pub fn names(tests: &[Test]) -> Vec<String> {
        tests.iter().map(|t| t.readable_path()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_name() {
        assert_eq!(escape_name("plain"), "plain");
        assert_eq!(escape_name("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_name("costs $5"), "costs \\$5");
        assert_eq!(escape_name("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_call_stub() {
        assert_eq!(call_stub("test", "adds"), "test(\"adds\") { }");
    }

    #[test]
    fn test_keyword_constructors() {
        let k = Keyword::disabled("xtest");
        assert!(k.disabled);
        let given = Keyword::enabled("given").with_prefix("Given: ");
        assert_eq!(given.prefix, Some("Given: "));
        assert!(!given.disabled);
    }

    #[test]
    fn test_builtin_styles_have_unique_fqns() {
        let styles = builtin_styles();
        let mut fqns: Vec<_> = styles.iter().map(|s| s.fqn()).collect();
        fqns.sort();
        fqns.dedup();
        assert_eq!(fqns.len(), styles.len());
        assert!(fqns.iter().all(|f| f.starts_with(STYLE_PACKAGE)));
    }
}
