//! `FeatureSpec`: `feature` containers holding `scenario` tests.

use tree_sitter::Node;

use super::{call_stub, match_call, match_config_chain, Declaration, Keyword, SpecStyle};
use crate::model::TestType;

const FEATURES: &[Keyword] = &[Keyword::enabled("feature"), Keyword::disabled("xfeature")];
const SCENARIOS: &[Keyword] = &[Keyword::enabled("scenario"), Keyword::disabled("xscenario")];

/// Feature spec style.
pub struct FeatureSpecStyle;

impl SpecStyle for FeatureSpecStyle {
    fn fqn(&self) -> &'static str {
        "io.kotest.core.spec.style.FeatureSpec"
    }

    fn spec_style_name(&self) -> &'static str {
        "Feature Spec"
    }

    fn generate_test(&self, _spec_name: &str, name: &str) -> String {
        call_stub("scenario", name)
    }

    fn leaf(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, SCENARIOS, TestType::Test)
            .or_else(|| match_config_chain(node, src, SCENARIOS, TestType::Test))
    }

    fn container(&self, node: Node, src: &str) -> Option<Declaration> {
        match_call(node, src, FEATURES, TestType::Container)
            .or_else(|| match_config_chain(node, src, FEATURES, TestType::Container))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::test_support::{names, recognize};
    use crate::syntax::SourceFile;

    const LOGIN: &str = r#"
class LoginSpec : FeatureSpec({
    feature("Login") {
        scenario("succeeds with valid credentials") { }
        scenario("fails with bad password") { }
    }
})
"#;

    #[test]
    fn test_feature_with_scenarios() {
        let file = SourceFile::parse(LOGIN).unwrap();
        let tests = recognize(&FeatureSpecStyle, &file);
        assert_eq!(
            names(&tests),
            vec![
                "Login",
                "Login -- succeeds with valid credentials",
                "Login -- fails with bad password",
            ]
        );
        assert_eq!(tests[0].test_type, TestType::Container);
        assert!(tests[0].is_root);
        assert!(tests[1..].iter().all(|t| t.test_type == TestType::Test && !t.is_root));
    }

    #[test]
    fn test_nested_features() {
        let file = SourceFile::parse(
            r#"
class S : FeatureSpec({
    feature("A") {
        feature("B") {
            scenario("C") { }
        }
    }
})
"#,
        )
        .unwrap();
        let tests = recognize(&FeatureSpecStyle, &file);
        let c = tests.iter().find(|t| t.name.name == "C").unwrap();
        assert_eq!(c.readable_path(), "A -- B -- C");
        assert!(!c.is_root);
    }

    #[test]
    fn test_scenario_with_config() {
        let file = SourceFile::parse(
            r#"
class S : FeatureSpec({
    feature("A") {
        scenario("slow").config(timeout = 1000.milliseconds) { }
    }
})
"#,
        )
        .unwrap();
        let tests = recognize(&FeatureSpecStyle, &file);
        assert_eq!(names(&tests), vec!["A", "A -- slow"]);
        assert_eq!(tests[1].test_type, TestType::Test);
    }

    #[test]
    fn test_disabled_propagates_from_xfeature() {
        let file = SourceFile::parse(
            r#"
class S : FeatureSpec({
    xfeature("off") {
        scenario("inner") { }
    }
    feature("on") {
        xscenario("skipped") { }
        scenario("runs") { }
    }
})
"#,
        )
        .unwrap();
        let tests = recognize(&FeatureSpecStyle, &file);
        let disabled: Vec<_> = tests
            .iter()
            .filter(|t| t.disabled)
            .map(|t| t.name.name.as_str())
            .collect();
        assert_eq!(disabled, vec!["off", "inner", "skipped"]);
    }

    #[test]
    fn test_scenario_without_lambda_is_not_a_test() {
        let file = SourceFile::parse(
            r#"
class S : FeatureSpec({
    scenario("no body")
    scenario(name) { }
})
"#,
        )
        .unwrap();
        assert!(recognize(&FeatureSpecStyle, &file).is_empty());
    }

    #[test]
    fn test_generated_stub() {
        assert_eq!(
            FeatureSpecStyle.generate_test("LoginSpec", "logs out"),
            "scenario(\"logs out\") { }"
        );
    }
}
