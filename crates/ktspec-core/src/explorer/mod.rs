//! Test explorer: the tree of specs for the selected file.
//!
//! The explorer reacts to two signals, a new file selection and changed
//! files on disk. Either one rebuilds the tree from scratch, deferred while
//! the project is indexing.

mod gate;
mod tree;

pub use gate::DumbModeGate;
pub use tree::{ExplorerTree, NodeKind, Row, TreeNode};

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ExplorerConfig;
use crate::discovery::SpecDiscovery;
use crate::project::Project;
use crate::run::{RunMode, RunRequest};

pub struct TestExplorer {
    project: Project,
    discovery: SpecDiscovery,
    gate: DumbModeGate<PathBuf>,
    selected_file: Option<PathBuf>,
    tree: ExplorerTree,
    expand_all: bool,
}

impl TestExplorer {
    pub fn new(project: Project, discovery: SpecDiscovery, config: &ExplorerConfig) -> Self {
        Self {
            project,
            discovery,
            gate: DumbModeGate::new(),
            selected_file: None,
            tree: ExplorerTree::empty(),
            expand_all: config.expand_all,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn tree(&self) -> &ExplorerTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ExplorerTree {
        &mut self.tree
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn is_indexing(&self) -> bool {
        self.gate.is_indexing()
    }

    /// Refreshes waiting for indexing to finish.
    pub fn pending_refreshes(&self) -> usize {
        self.gate.pending()
    }

    /// The editor selection moved to another file (or to none).
    pub fn selection_changed(&mut self, file: Option<PathBuf>) {
        self.selected_file = file;
        self.refresh_content();
    }

    /// Files changed on disk. Refreshes when one of them has the selected
    /// file's name.
    pub fn files_changed(&mut self, changed: &[PathBuf]) {
        let Some(selected) = &self.selected_file else {
            return;
        };
        let name = selected.file_name();
        if changed.iter().any(|path| path.file_name() == name) {
            self.refresh_content();
        }
    }

    /// Rebuild the tree for the selected file.
    pub fn refresh_content(&mut self) {
        let Some(file) = self.selected_file.clone() else {
            self.tree = ExplorerTree::empty();
            return;
        };
        if self.project.module_for_file(&file).is_none() {
            debug!(file = %file.display(), "file belongs to no module");
            self.tree = ExplorerTree::empty();
            return;
        }
        match self.gate.run_when_smart(file) {
            Some(file) => self.render(&file),
            None => debug!("indexing, refresh deferred"),
        }
    }

    pub fn begin_indexing(&mut self) {
        self.gate.begin_indexing();
    }

    /// Run every refresh deferred during indexing, in order.
    pub fn indexing_finished(&mut self) {
        for file in self.gate.finish_indexing() {
            self.render(&file);
        }
    }

    fn render(&mut self, file: &Path) {
        let Some(module) = self.project.module_for_file(file).map(|m| m.name.clone()) else {
            self.tree = ExplorerTree::empty();
            return;
        };

        let discovery = &self.discovery;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| discovery.specs_for_path(file)));
        let mut tree = match outcome {
            Ok(Ok(specs)) => ExplorerTree::build(file, &module, &specs),
            Ok(Err(e)) => {
                warn!(file = %file.display(), error = %e, "recognition failed");
                ExplorerTree::empty()
            }
            Err(_) => {
                warn!(file = %file.display(), "recognition panicked");
                ExplorerTree::empty()
            }
        };
        if self.expand_all {
            tree.expand_all();
        } else {
            tree.collapse_all();
        }
        self.tree = tree;
    }

    /// Run request for the selected tree node. Only spec and test nodes
    /// can be run.
    pub fn run_selected(&self, mode: RunMode) -> Option<RunRequest> {
        let node = self.tree.selected()?;
        let file = self.selected_file.clone();
        match &node.kind {
            NodeKind::Spec { fqn, anchor, .. } => {
                Some(RunRequest::for_spec(mode, file, fqn, anchor.line()))
            }
            NodeKind::Test { spec_fqn, test } => {
                Some(RunRequest::for_test(mode, file, spec_fqn, test))
            }
            NodeKind::File { .. } | NodeKind::Module { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoveryConfig;
    use std::fs;
    use tempfile::TempDir;

    const SPEC: &str = r#"
import io.kotest.core.spec.style.FunSpec

class MathSpec : FunSpec({
    context("math") {
        test("adds") { }
    }
})
"#;

    fn explorer(dir: &TempDir) -> TestExplorer {
        let config = DiscoveryConfig::default();
        let project = Project::open(dir.path(), &config).unwrap();
        TestExplorer::new(
            project,
            SpecDiscovery::from_config(&config),
            &ExplorerConfig::default(),
        )
    }

    #[test]
    fn test_selection_builds_tree() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("MathSpec.kt");
        fs::write(&file, SPEC).unwrap();

        let mut explorer = explorer(&dir);
        explorer.selection_changed(Some(file));
        assert_eq!(explorer.tree().visible_rows().len(), 5);

        explorer.selection_changed(None);
        assert!(explorer.tree().is_empty());
    }

    #[test]
    fn test_refresh_deferred_while_indexing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("MathSpec.kt");
        fs::write(&file, SPEC).unwrap();

        let mut explorer = explorer(&dir);
        explorer.begin_indexing();
        explorer.selection_changed(Some(file));
        assert!(explorer.tree().is_empty());
        assert_eq!(explorer.pending_refreshes(), 1);

        explorer.indexing_finished();
        assert_eq!(explorer.pending_refreshes(), 0);
        assert!(!explorer.tree().is_empty());
    }

    #[test]
    fn test_files_changed_matches_by_name() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("MathSpec.kt");
        fs::write(&file, "class Empty\n").unwrap();

        let mut explorer = explorer(&dir);
        explorer.selection_changed(Some(file.clone()));
        assert_eq!(explorer.tree().visible_rows().len(), 2);

        fs::write(&file, SPEC).unwrap();
        explorer.files_changed(&[PathBuf::from("elsewhere/Other.kt")]);
        assert_eq!(explorer.tree().visible_rows().len(), 2);

        explorer.files_changed(&[PathBuf::from("elsewhere/MathSpec.kt")]);
        assert_eq!(explorer.tree().visible_rows().len(), 5);
    }

    #[test]
    fn test_unreadable_file_gives_empty_tree() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Gone.kt");
        fs::write(&file, SPEC).unwrap();

        let mut explorer = explorer(&dir);
        explorer.selection_changed(Some(file.clone()));
        assert!(!explorer.tree().is_empty());

        fs::write(&file, vec![0xffu8, 0xfe, 0x00]).unwrap();
        explorer.refresh_content();
        assert!(explorer.tree().is_empty());
    }

    #[test]
    fn test_run_selected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("MathSpec.kt");
        fs::write(&file, SPEC).unwrap();

        let mut explorer = explorer(&dir);
        explorer.selection_changed(Some(file));
        assert!(explorer.run_selected(RunMode::Run).is_none());

        explorer.tree_mut().select(4);
        let request = explorer.run_selected(RunMode::Coverage).unwrap();
        assert_eq!(request.spec_fqn, "MathSpec");
        assert_eq!(request.test_filter().as_deref(), Some("math -- adds"));
        assert_eq!(request.mode, RunMode::Coverage);
    }
}
