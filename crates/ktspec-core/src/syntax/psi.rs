//! Shape predicates over the Kotlin syntax tree.
//!
//! Each helper looks at one node (or one leaf token) and either returns the
//! part of the tree it matched or `None`. Mismatches are the common case
//! while walking a file and are never errors.
//!
//! The helpers accept both shapes tree-sitter Kotlin grammars produce for
//! calls and member access: arguments either directly under
//! `call_expression` or wrapped in `call_suffix`, members either directly
//! under `navigation_expression` or wrapped in `navigation_suffix`.

use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::Node;

use super::{children, named_children, node_text};

/// Unescaped `$name` or `${` template entry inside string text.
static TEMPLATE_ENTRY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(^|[^\\])(\\\\)*\$(\{|[A-Za-z_])").ok());

const IDENTIFIER_KINDS: &[&str] = &["identifier", "simple_identifier", "type_identifier"];

pub fn is_identifier(node: &Node) -> bool {
    IDENTIFIER_KINDS.contains(&node.kind())
}

pub fn is_string_literal(node: &Node) -> bool {
    node.is_named() && node.kind().ends_with("string_literal")
}

/// Text of an identifier node with any backticks removed.
pub fn identifier_name<'a>(node: &Node, src: &'a str) -> Option<&'a str> {
    if !is_identifier(node) {
        return None;
    }
    Some(node_text(node, src).trim_matches('`'))
}

/// A string literal argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringArg {
    /// Literal value with escapes resolved, or raw text for raw strings.
    pub text: String,
    /// The literal holds template entries, so `text` is only a display hint.
    pub interpolated: bool,
}

/// Read a string literal node into a [`StringArg`].
pub fn string_arg(node: &Node, src: &str) -> Option<StringArg> {
    if !is_string_literal(node) {
        return None;
    }
    Some(string_arg_from_text(
        node_text(node, src),
        has_interpolation_node(*node),
    ))
}

/// Best-effort reading of literal text, tolerating a missing closing quote.
pub fn string_arg_from_text(raw: &str, interpolation_node: bool) -> StringArg {
    if let Some(rest) = raw.strip_prefix("\"\"\"") {
        let body = rest.strip_suffix("\"\"\"").unwrap_or(rest);
        return StringArg {
            text: body.to_string(),
            interpolated: interpolation_node || body.contains("${") || has_template_entry(body),
        };
    }

    let body = raw.strip_prefix('"').unwrap_or(raw);
    let body = match body.strip_suffix('"') {
        Some(b) if !b.ends_with('\\') || b.ends_with("\\\\") => b,
        _ => body,
    };
    StringArg {
        text: unescape(body),
        interpolated: interpolation_node || has_template_entry(body),
    }
}

fn has_template_entry(text: &str) -> bool {
    match TEMPLATE_ENTRY.as_ref() {
        Some(re) => re.is_match(text),
        None => text.contains('$'),
    }
}

fn has_interpolation_node(node: Node) -> bool {
    children(node).into_iter().any(|child| {
        child.kind().contains("interpolat") || (child.is_named() && has_interpolation_node(child))
    })
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// The parts of a `call_expression`.
#[derive(Debug, Clone, Copy)]
pub struct CallParts<'t> {
    pub call: Node<'t>,
    /// The expression being called: an identifier, a member access, a
    /// string literal, ...
    pub callee: Node<'t>,
    /// `value_arguments`, when the call has parentheses.
    pub arguments: Option<Node<'t>>,
    /// The trailing `lambda_literal`, when there is one.
    pub lambda: Option<Node<'t>>,
}

impl<'t> CallParts<'t> {
    /// Expressions of the value arguments, in order.
    pub fn argument_expressions(&self) -> Vec<Node<'t>> {
        self.arguments.map(value_argument_expressions).unwrap_or_default()
    }
}

/// Split a `call_expression` into callee, arguments and trailing lambda.
pub fn call_parts(call: Node) -> Option<CallParts> {
    if call.kind() != "call_expression" {
        return None;
    }
    let mut parts = named_children(call).into_iter();
    let callee = parts.next()?;
    if callee.kind() == "call_suffix" {
        return None;
    }

    let mut arguments = None;
    let mut lambda = None;
    for part in parts.flat_map(|p| {
        if p.kind() == "call_suffix" {
            named_children(p)
        } else {
            vec![p]
        }
    }) {
        match part.kind() {
            "value_arguments" => arguments = Some(part),
            "annotated_lambda" => {
                lambda = named_children(part)
                    .into_iter()
                    .find(|n| n.kind() == "lambda_literal");
            }
            "lambda_literal" => lambda = Some(part),
            _ => {}
        }
    }

    // `f("x") { }` may also come out as a lambda applied to the call `f("x")`.
    if callee.kind() == "call_expression" && arguments.is_none() && lambda.is_some() {
        if let Some(inner) = call_parts(callee).filter(|inner| inner.lambda.is_none()) {
            return Some(CallParts {
                call,
                callee: inner.callee,
                arguments: inner.arguments,
                lambda,
            });
        }
    }

    Some(CallParts {
        call,
        callee,
        arguments,
        lambda,
    })
}

/// Climb to the outermost call that has `call` as its callee.
fn outermost_call(call: Node) -> Node {
    let mut current = call;
    while let Some(parent) = current.parent() {
        if parent.kind() != "call_expression" || named_children(parent).first() != Some(&current) {
            break;
        }
        current = parent;
    }
    current
}

/// Expressions passed inside a `value_arguments` node.
pub fn value_argument_expressions(arguments: Node) -> Vec<Node> {
    named_children(arguments)
        .into_iter()
        .filter(|n| n.kind() == "value_argument")
        .filter_map(|arg| named_children(arg).into_iter().last())
        .collect()
}

/// Name of a call whose callee is a plain identifier.
pub fn call_name<'a>(call: Node, src: &'a str) -> Option<&'a str> {
    let parts = call_parts(call)?;
    identifier_name(&parts.callee, src)
}

/// A `receiver.member` expression, optionally called: `receiver.member(..) { }`.
#[derive(Debug, Clone, Copy)]
pub struct DotQualified<'t> {
    /// The whole expression: the enclosing call when the member is called,
    /// otherwise the `navigation_expression` itself.
    pub expression: Node<'t>,
    pub receiver: Node<'t>,
    pub member: Node<'t>,
    /// Arguments and lambda of the member call.
    pub selector: Option<CallParts<'t>>,
}

/// Split a member access into receiver and member, requiring a plain `.`.
fn navigation_parts(nav: Node) -> Option<(Node, Node)> {
    if nav.kind() != "navigation_expression" {
        return None;
    }
    let mut tokens = Vec::new();
    for child in children(nav) {
        if child.kind() == "navigation_suffix" {
            tokens.extend(children(child));
        } else {
            tokens.push(child);
        }
    }
    let named: Vec<Node> = tokens
        .iter()
        .filter(|t| t.is_named() && !super::is_comment(t))
        .copied()
        .collect();
    let receiver = *named.first()?;
    let member = *named.last()?;
    if receiver == member || !is_identifier(&member) {
        return None;
    }
    let plain_dot = tokens.iter().any(|t| !t.is_named() && t.kind() == ".");
    plain_dot.then_some((receiver, member))
}

/// View a node as a dot-qualified expression.
pub fn dot_qualified(node: Node) -> Option<DotQualified> {
    match node.kind() {
        "call_expression" => {
            let parts = call_parts(node)?;
            let (receiver, member) = navigation_parts(parts.callee)?;
            Some(DotQualified {
                expression: node,
                receiver,
                member,
                selector: Some(parts),
            })
        }
        "navigation_expression" => {
            let (receiver, member) = navigation_parts(node)?;
            Some(DotQualified {
                expression: node,
                receiver,
                member,
                selector: None,
            })
        }
        _ => None,
    }
}

/// The runtime shape of an expression node, as far as recognition cares.
#[derive(Debug, Clone, Copy)]
pub enum Expression<'t> {
    /// `name(..) { }`
    Call(CallParts<'t>),
    /// `receiver.name(..) { }` or `receiver.name`
    DotQualified(DotQualified<'t>),
    /// `"literal" { }`
    StringInvoke(CallParts<'t>),
    Other,
}

pub fn classify(node: Node) -> Expression {
    match node.kind() {
        "call_expression" => {
            let Some(parts) = call_parts(node) else {
                return Expression::Other;
            };
            if is_identifier(&parts.callee) {
                Expression::Call(parts)
            } else if is_string_literal(&parts.callee) {
                Expression::StringInvoke(parts)
            } else if let Some(dot) = dot_qualified(node) {
                Expression::DotQualified(dot)
            } else {
                Expression::Other
            }
        }
        "navigation_expression" => dot_qualified(node)
            .map(Expression::DotQualified)
            .unwrap_or(Expression::Other),
        _ => Expression::Other,
    }
}

/// `name("literal") { }` where `name` is one of `names`.
///
/// The call must take exactly one value argument, a string literal, and end
/// with a trailing lambda.
pub fn extract_string_arg_for_function_with_string_and_lambda_args(
    call: Node,
    src: &str,
    names: &[&str],
) -> Option<StringArg> {
    let parts = call_parts(call)?;
    let name = identifier_name(&parts.callee, src)?;
    if !names.contains(&name) {
        return None;
    }
    parts.lambda?;
    match parts.argument_expressions().as_slice() {
        [single] => string_arg(single, src),
        _ => None,
    }
}

/// `lhs("literal").rhs(..) { }`, returning the left call's string.
///
/// The left call must not have a lambda of its own; the right call must end
/// with one.
pub fn extract_lhs_string_arg_for_dot_expression_with_rhs_final_lambda(
    dot: Node,
    src: &str,
    lhs: &[&str],
    rhs: &str,
) -> Option<StringArg> {
    let dot = dot_qualified(dot)?;
    if identifier_name(&dot.member, src)? != rhs {
        return None;
    }
    dot.selector?.lambda?;

    let left = call_parts(dot.receiver)?;
    if left.lambda.is_some() || !lhs.contains(&identifier_name(&left.callee, src)?) {
        return None;
    }
    match left.argument_expressions().as_slice() {
        [single] => string_arg(single, src),
        _ => None,
    }
}

/// `"literal" { }`: a string invoked with a trailing lambda and nothing else.
pub fn extract_string_invoke_with_lambda(call: Node, src: &str) -> Option<StringArg> {
    let parts = call_parts(call)?;
    parts.lambda?;
    if !parts.argument_expressions().is_empty() {
        return None;
    }
    string_arg(&parts.callee, src)
}

/// `"literal".rhs(..) { }`, returning the receiver string.
pub fn extract_string_receiver_for_dot_expression_with_rhs_final_lambda(
    dot: Node,
    src: &str,
    rhs: &str,
) -> Option<StringArg> {
    let dot = dot_qualified(dot)?;
    if identifier_name(&dot.member, src)? != rhs {
        return None;
    }
    dot.selector?.lambda?;
    string_arg(&dot.receiver, src)
}

/// If `leaf` is the `{` opening a trailing lambda, the call owning the lambda.
pub fn if_call_expression_lambda_open_brace(leaf: Node) -> Option<Node> {
    if leaf.is_named() || leaf.kind() != "{" {
        return None;
    }
    let lambda = leaf.parent()?;
    if lambda.kind() != "lambda_literal" || lambda.start_byte() != leaf.start_byte() {
        return None;
    }

    let mut owner = lambda.parent()?;
    if owner.kind() == "annotated_lambda" {
        owner = owner.parent()?;
    }
    if owner.kind() == "call_suffix" {
        owner = owner.parent()?;
    }
    let parts = call_parts(owner)?;
    (parts.lambda == Some(lambda)).then_some(owner)
}

/// If `leaf` is the `.` of a dot-qualified expression, that expression.
///
/// When the member is called, the expression is the enclosing call, so
/// `a.b { }` maps to the whole call rather than to `a.b`.
pub fn if_dot_expression_separator(leaf: Node) -> Option<Node> {
    if leaf.is_named() || leaf.kind() != "." {
        return None;
    }
    let mut nav = leaf.parent()?;
    if nav.kind() == "navigation_suffix" {
        nav = nav.parent()?;
    }
    navigation_parts(nav)?;

    match nav.parent() {
        Some(parent)
            if parent.kind() == "call_expression"
                && named_children(parent).first() == Some(&nav) =>
        {
            Some(outermost_call(parent))
        }
        _ => Some(nav),
    }
}
