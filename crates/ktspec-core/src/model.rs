//! Test hierarchy produced by recognition.
//!
//! Everything here is rebuilt on each recognition pass. Nothing holds on to
//! the syntax tree: [`NodeAnchor`] is only a lookup key.

use serde::Serialize;

use crate::syntax::NodeAnchor;

/// Separator Kotest uses between path entries in test filters.
pub const PATH_SEPARATOR: &str = " -- ";

/// Display name of a test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TestName {
    /// Shown before the name, e.g. `"Given: "` in behavior specs.
    pub prefix: Option<String>,
    pub name: String,
    /// The name holds template entries and is only a display hint.
    pub interpolated: bool,
}

impl TestName {
    pub fn new(prefix: Option<&str>, name: impl Into<String>, interpolated: bool) -> Self {
        Self {
            prefix: prefix.map(String::from),
            name: name.into(),
            interpolated,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, self.name),
            None => self.name.clone(),
        }
    }
}

impl std::fmt::Display for TestName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One segment of a test path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TestPathEntry {
    pub name: String,
    /// The segment's name is interpolated, so it cannot key a filter.
    pub interpolated: bool,
}

impl TestPathEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interpolated: false,
        }
    }

    /// Path segment for a declared name. Prefixes are not part of the path.
    pub fn from_name(name: &TestName) -> Self {
        Self {
            name: name.name.clone(),
            interpolated: name.interpolated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// May hold nested tests.
    Container,
    /// Executable leaf.
    Test,
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Container => write!(f, "Container"),
            Self::Test => write!(f, "Test"),
        }
    }
}

/// A recognized test declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Test {
    pub name: TestName,
    /// Root first; the last entry is this test.
    pub path: Vec<TestPathEntry>,
    pub test_type: TestType,
    pub disabled: bool,
    pub is_root: bool,
    /// Where the declaration sits in the file it was recognized from.
    pub anchor: NodeAnchor,
}

impl Test {
    /// Path entries joined the way Kotest filters expect them.
    pub fn readable_path(&self) -> String {
        self.path
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }

    pub fn is_container(&self) -> bool {
        self.test_type == TestType::Container
    }

    /// Leading path entries that can key a test filter: everything before
    /// the first interpolated entry.
    pub fn stable_path(&self) -> &[TestPathEntry] {
        let end = self
            .path
            .iter()
            .position(|entry| entry.interpolated)
            .unwrap_or(self.path.len());
        &self.path[..end]
    }
}

/// A test together with the tests declared inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestElement {
    pub test: Test,
    pub nested: Vec<TestElement>,
}

impl TestElement {
    pub fn new(test: Test) -> Self {
        Self {
            test,
            nested: Vec::new(),
        }
    }

    /// This element and every descendant, in pre-order.
    pub fn flatten(&self) -> Vec<&Test> {
        let mut out = vec![&self.test];
        for child in &self.nested {
            out.extend(child.flatten());
        }
        out
    }
}

/// A spec class and the tests recognized in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spec {
    pub name: String,
    pub fqn: String,
    /// Fully qualified style type the class extends.
    pub superclass: String,
    /// Style label, e.g. "Feature Spec".
    pub style: &'static str,
    /// The class name identifier, or the declaration when it has none.
    pub anchor: NodeAnchor,
    pub tests: Vec<TestElement>,
}

impl Spec {
    /// Every test of the spec, in pre-order.
    pub fn all_tests(&self) -> Vec<&Test> {
        self.tests.iter().flat_map(TestElement::flatten).collect()
    }

    pub fn test_count(&self) -> usize {
        self.all_tests().len()
    }
}
