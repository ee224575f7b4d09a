//! Display tree of the explorer.

use std::path::{Path, PathBuf};

use crate::model::{Spec, Test, TestElement};
use crate::syntax::NodeAnchor;

/// What a tree node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File {
        path: PathBuf,
    },
    Module {
        name: String,
    },
    Spec {
        name: String,
        fqn: String,
        style: &'static str,
        anchor: NodeAnchor,
    },
    Test {
        spec_fqn: String,
        test: Test,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
    pub expanded: bool,
}

impl TreeNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            expanded: true,
        }
    }

    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::File { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            NodeKind::Module { name } => name.clone(),
            NodeKind::Spec { name, style, .. } => format!("{} [{}]", name, style),
            NodeKind::Test { test, .. } => test.name.display_name(),
        }
    }

    fn set_expanded_all(&mut self, expanded: bool) {
        self.expanded = expanded;
        for child in &mut self.children {
            child.set_expanded_all(expanded);
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }
}

/// One visible line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub depth: usize,
    pub node: &'a TreeNode,
}

impl Row<'_> {
    pub fn has_children(&self) -> bool {
        !self.node.children.is_empty()
    }
}

/// The explorer tree with a selection cursor over its visible rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorerTree {
    root: Option<TreeNode>,
    selected: usize,
}

impl ExplorerTree {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tree for one file: the file, its module, one node per spec and the
    /// spec's tests below it. Everything starts expanded.
    pub fn build(file: &Path, module: &str, specs: &[Spec]) -> Self {
        let mut module_node = TreeNode::new(NodeKind::Module {
            name: module.to_string(),
        });
        for spec in specs {
            let mut spec_node = TreeNode::new(NodeKind::Spec {
                name: spec.name.clone(),
                fqn: spec.fqn.clone(),
                style: spec.style,
                anchor: spec.anchor.clone(),
            });
            spec_node.children = spec
                .tests
                .iter()
                .map(|element| test_node(&spec.fqn, element))
                .collect();
            module_node.children.push(spec_node);
        }

        let mut root = TreeNode::new(NodeKind::File {
            path: file.to_path_buf(),
        });
        root.children.push(module_node);

        Self {
            root: Some(root),
            selected: 0,
        }
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes, expanded or not.
    pub fn len(&self) -> usize {
        self.root.as_ref().map(TreeNode::count).unwrap_or(0)
    }

    pub fn expand_all(&mut self) {
        if let Some(root) = &mut self.root {
            root.set_expanded_all(true);
        }
    }

    pub fn collapse_all(&mut self) {
        if let Some(root) = &mut self.root {
            root.set_expanded_all(false);
        }
        self.selected = 0;
    }

    /// Rows currently visible, depth-first.
    pub fn visible_rows(&self) -> Vec<Row<'_>> {
        let mut rows = Vec::new();
        if let Some(root) = &self.root {
            push_rows(root, 0, &mut rows);
        }
        rows
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&TreeNode> {
        self.visible_rows().get(self.selected).map(|row| row.node)
    }

    pub fn select_next(&mut self) {
        let count = self.visible_rows().len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select(&mut self, index: usize) {
        let count = self.visible_rows().len();
        self.selected = index.min(count.saturating_sub(1));
    }

    /// Expand or collapse the selected node.
    pub fn toggle_selected(&mut self) {
        let index = self.selected;
        if let Some(root) = &mut self.root {
            let mut counter = 0;
            toggle_at(root, index, &mut counter);
        }
        self.select(self.selected);
    }
}

fn test_node(spec_fqn: &str, element: &TestElement) -> TreeNode {
    let mut node = TreeNode::new(NodeKind::Test {
        spec_fqn: spec_fqn.to_string(),
        test: element.test.clone(),
    });
    node.children = element
        .nested
        .iter()
        .map(|child| test_node(spec_fqn, child))
        .collect();
    node
}

fn push_rows<'a>(node: &'a TreeNode, depth: usize, rows: &mut Vec<Row<'a>>) {
    rows.push(Row { depth, node });
    if node.expanded {
        for child in &node.children {
            push_rows(child, depth + 1, rows);
        }
    }
}

fn toggle_at(node: &mut TreeNode, index: usize, counter: &mut usize) -> bool {
    if *counter == index {
        if !node.children.is_empty() {
            node.expanded = !node.expanded;
        }
        return true;
    }
    *counter += 1;
    if node.expanded {
        for child in &mut node.children {
            if toggle_at(child, index, counter) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::SpecDiscovery;
    use crate::syntax::SourceFile;

    fn sample() -> ExplorerTree {
        let file = SourceFile::parse(
            r#"
import io.kotest.core.spec.style.FeatureSpec

class LoginSpec : FeatureSpec({
    feature("Login") {
        scenario("a") { }
        scenario("b") { }
    }
})
"#,
        )
        .unwrap();
        let specs = SpecDiscovery::new().specs(&file);
        ExplorerTree::build(Path::new("src/test/kotlin/LoginSpec.kt"), "app", &specs)
    }

    #[test]
    fn test_build_is_fully_expanded() {
        let tree = sample();
        let labels: Vec<_> = tree
            .visible_rows()
            .iter()
            .map(|r| (r.depth, r.node.label()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (0, "LoginSpec.kt".to_string()),
                (1, "app".to_string()),
                (2, "LoginSpec [Feature Spec]".to_string()),
                (3, "Login".to_string()),
                (4, "a".to_string()),
                (4, "b".to_string()),
            ]
        );
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_toggle_collapses_subtree() {
        let mut tree = sample();
        tree.select(3);
        tree.toggle_selected();
        assert_eq!(tree.visible_rows().len(), 4);
        tree.toggle_selected();
        assert_eq!(tree.visible_rows().len(), 6);
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut tree = sample();
        tree.select_previous();
        assert_eq!(tree.selected_index(), 0);
        for _ in 0..10 {
            tree.select_next();
        }
        assert_eq!(tree.selected_index(), 5);
        assert!(matches!(
            tree.selected().unwrap().kind,
            NodeKind::Test { .. }
        ));

        tree.collapse_all();
        assert_eq!(tree.visible_rows().len(), 1);
        tree.expand_all();
        assert_eq!(tree.visible_rows().len(), 6);
    }

    #[test]
    fn test_empty_tree() {
        let tree = ExplorerTree::empty();
        assert!(tree.is_empty());
        assert!(tree.visible_rows().is_empty());
        assert!(tree.selected().is_none());
    }
}
