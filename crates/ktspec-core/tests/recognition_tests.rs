use ktspec_core::styles::{
    BehaviorSpecStyle, DescribeSpecStyle, FeatureSpecStyle, FunSpecStyle, ShouldSpecStyle,
    StringSpecStyle,
};
use ktspec_core::config::RunConfig;
use ktspec_core::{
    RunMode, RunRequest, SourceFile, SpecDiscovery, SpecStyle, StyleRegistry, TestType,
};
use tree_sitter::Node;

fn all_nodes<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    out.push(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        all_nodes(child, out);
    }
}

fn nodes(file: &SourceFile) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    all_nodes(file.root(), &mut out);
    out
}

const NESTED: &str = r#"
import io.kotest.core.spec.style.FeatureSpec

class NestedSpec : FeatureSpec({
    feature("A") {
        feature("B") {
            scenario("C") { }
        }
    }
})
"#;

const LOGIN: &str = r#"
package com.example.auth

import io.kotest.core.spec.style.FeatureSpec

class LoginSpec : FeatureSpec({
    feature("Login") {
        scenario("succeeds with valid credentials") { }
        scenario("fails with bad password") { }
    }
})
"#;

#[test]
fn test_is_test_element_agrees_with_test() {
    let styles: Vec<Box<dyn SpecStyle>> = vec![
        Box::new(FeatureSpecStyle),
        Box::new(FunSpecStyle),
        Box::new(DescribeSpecStyle),
        Box::new(ShouldSpecStyle),
        Box::new(BehaviorSpecStyle),
        Box::new(StringSpecStyle),
    ];
    let file = SourceFile::parse(
        r#"
class Mixed : FunSpec({
    feature("f") { scenario("s") { } }
    context("c") { test("t") { } it("i") { } should("sh") { } }
    given("g") { then("th") { } }
    "str" { }
    test("cfg").config(enabled = false) { }
})
"#,
    )
    .unwrap();

    for style in &styles {
        for node in nodes(&file) {
            assert_eq!(
                style.test(node, file.content()).is_some(),
                style.is_test_element(node, file.content()),
                "{} disagrees on {}",
                style.spec_style_name(),
                node.kind()
            );
        }
    }
}

#[test]
fn test_nested_paths() {
    let file = SourceFile::parse(NESTED).unwrap();
    let specs = SpecDiscovery::new().specs(&file);
    let tests = specs[0].all_tests();

    let a = tests.iter().find(|t| t.name.name == "A").unwrap();
    assert_eq!(a.path.len(), 1);
    assert!(a.is_root);

    let c = tests.iter().find(|t| t.name.name == "C").unwrap();
    let path: Vec<_> = c.path.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(path, vec!["A", "B", "C"]);
    assert!(!c.is_root);
    assert_eq!(c.path.last().unwrap().name, c.name.name);
}

#[test]
fn test_leaf_form_agrees_with_full_form() {
    let file = SourceFile::parse(NESTED).unwrap();
    let style = FeatureSpecStyle;
    let src = file.content();

    let mut checked = 0;
    for node in nodes(&file) {
        if node.kind() != "{" {
            continue;
        }
        let Some(from_leaf) = style.test_at_leaf(node, src) else {
            continue;
        };
        let owner = std::iter::successors(node.parent(), |n| n.parent())
            .find(|n| style.test(*n, src).as_ref() == Some(&from_leaf))
            .expect("leaf result matches an enclosing call");
        assert_eq!(style.test(owner, src), Some(from_leaf));
        checked += 1;
    }
    assert_eq!(checked, 3);
}

#[test]
fn test_config_chain_leaf_forms() {
    let source = r#"
class S : FunSpec({
    test("slow").config(timeout = 5.seconds) { }
})
"#;
    let file = SourceFile::parse(source).unwrap();
    let style = FunSpecStyle;
    let src = file.content();

    let brace = file.leaf_at(source.rfind("{ }").unwrap()).unwrap();
    let dot = file.leaf_at(source.find(".config").unwrap()).unwrap();
    let from_brace = style.test_at_leaf(brace, src).unwrap();
    let from_dot = style.test_at_leaf(dot, src).unwrap();
    assert_eq!(from_brace, from_dot);
    assert_eq!(from_brace.name.name, "slow");
    assert_eq!(from_brace.test_type, TestType::Test);
}

#[test]
fn test_generated_stubs_round_trip() {
    let registry = StyleRegistry::new();
    for style in registry.styles() {
        for name in ["plain name", "with \"quotes\"", "costs $5", "back\\slash"] {
            let stub = style.generate_test("Generated", name);
            let file = SourceFile::parse(stub.clone()).unwrap();
            let recognized: Vec<_> = nodes(&file)
                .into_iter()
                .filter_map(|n| style.test(n, file.content()))
                .collect();
            assert_eq!(recognized.len(), 1, "{}: {}", style.spec_style_name(), stub);
            let test = &recognized[0];
            assert_eq!(test.name.name, name, "{}", stub);
            assert_eq!(test.test_type, TestType::Test);
            assert!(!test.name.interpolated, "{}", stub);
            assert!(test.is_root);
        }
    }
}

#[test]
fn test_interpolation_flag() {
    let file = SourceFile::parse(
        r#"
import io.kotest.core.spec.style.FunSpec

class S : FunSpec({
    test("plain") { }
    test("user $id") { }
    test("total ${items.size}") { }
    test("escaped \$id") { }
})
"#,
    )
    .unwrap();
    let specs = SpecDiscovery::new().specs(&file);
    let flags: Vec<_> = specs[0]
        .all_tests()
        .iter()
        .map(|t| (t.name.name.clone(), t.name.interpolated))
        .collect();
    assert_eq!(flags[0], ("plain".to_string(), false));
    assert!(flags[1].1);
    assert!(flags[2].1);
    assert_eq!(flags[3], ("escaped $id".to_string(), false));
}

#[test]
fn test_unmatched_supertype_yields_nothing() {
    let file = SourceFile::parse(
        r#"
import org.junit.jupiter.api.Test

class PlainTest : Base({
    feature("Login") { scenario("x") { } }
})
"#,
    )
    .unwrap();
    assert!(SpecDiscovery::new().specs(&file).is_empty());
}

#[test]
fn test_login_scenario() {
    let file = SourceFile::parse(LOGIN).unwrap();
    let specs = SpecDiscovery::new().specs(&file);
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].fqn, "com.example.auth.LoginSpec");

    let roots = &specs[0].tests;
    assert_eq!(roots.len(), 1);
    let login = &roots[0];
    assert_eq!(login.test.name.name, "Login");
    assert_eq!(login.test.test_type, TestType::Container);
    assert_eq!(login.test.path.len(), 1);

    let children: Vec<_> = login.nested.iter().map(|e| &e.test).collect();
    assert_eq!(children.len(), 2);
    for child in &children {
        assert_eq!(child.test_type, TestType::Test);
        assert_eq!(child.path.len(), 2);
        assert_eq!(child.path[0].name, "Login");
    }
    assert_eq!(children[0].path[1].name, "succeeds with valid credentials");
    assert_eq!(children[1].path[1].name, "fails with bad password");
}

#[test]
fn test_malformed_source_does_not_panic() {
    let sources = [
        "import io.kotest.core.spec.style.FeatureSpec\nclass S : FeatureSpec({\n    feature(\"Login\") {\n        scenario(\"ok\") { }\n",
        "class S : FeatureSpec({ feature(\"unterminated) { } })",
        "class : ({",
        "",
        "feature(",
    ];
    let discovery = SpecDiscovery::new();
    for source in sources {
        let file = SourceFile::parse(source).unwrap();
        let specs = discovery.specs(&file);
        assert!(specs.len() <= 1);
        let _ = ktspec_core::gutter::markers(&discovery, &file);
    }
}

#[test]
fn test_same_file_base_class() {
    let file = SourceFile::parse(
        r#"
import io.kotest.core.spec.style.DescribeSpec

abstract class BaseSpec(body: DescribeSpec.() -> Unit) : DescribeSpec(body)

class RealSpec : BaseSpec({
    describe("thing") { it("works") { } }
})
"#,
    )
    .unwrap();
    let specs = SpecDiscovery::new().specs(&file);
    let real = specs.iter().find(|s| s.name == "RealSpec").unwrap();
    assert_eq!(real.style, "Describe Spec");
    assert_eq!(real.test_count(), 2);
}

#[test]
fn test_wildcard_and_alias_imports() {
    let file = SourceFile::parse(
        r#"
import io.kotest.core.spec.style.*
import io.kotest.core.spec.style.StringSpec as Strings

class A : ShouldSpec({ should("x") { } })
class B : Strings({ "y" { } })
class C : io.kotest.core.spec.style.FunSpec({ test("z") { } })
"#,
    )
    .unwrap();
    let specs = SpecDiscovery::new().specs(&file);
    let styles: Vec<_> = specs.iter().map(|s| (s.name.as_str(), s.style)).collect();
    assert_eq!(
        styles,
        vec![("A", "Should Spec"), ("B", "String Spec"), ("C", "Fun Spec")]
    );
}

#[test]
fn test_interpolated_ancestor_is_not_a_run_key() {
    let file = SourceFile::parse(
        r#"
import io.kotest.core.spec.style.FunSpec

class S : FunSpec({
    context("user $id") { test("logs in") { } }
    context("Login") {
        context("as ${role.name}") { test("sees dashboard") { } }
    }
})
"#,
    )
    .unwrap();
    let specs = SpecDiscovery::new().specs(&file);
    let spec = &specs[0];
    let tests = spec.all_tests();

    let logs_in = tests.iter().find(|t| t.name.name == "logs in").unwrap();
    assert!(logs_in.path[0].interpolated);
    assert!(!logs_in.path[1].interpolated);
    let request = RunRequest::for_test(RunMode::Run, None, &spec.fqn, logs_in);
    assert_eq!(request.test_filter(), None);
    let command = request.command_line(&RunConfig::default()).to_string();
    assert!(!command.contains("kotest_filter_tests"));

    let dashboard = tests.iter().find(|t| t.name.name == "sees dashboard").unwrap();
    let request = RunRequest::for_test(RunMode::Run, None, &spec.fqn, dashboard);
    assert_eq!(request.test_filter().as_deref(), Some("Login"));
}
