//! Project model: modules, the indexing scan and change detection.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::DiscoveryConfig;
use crate::discovery::SpecDiscovery;
use crate::error::{KtSpecError, Result};
use crate::model::Spec;

/// A directory carrying a build file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    /// Path relative to the project root, or the root's own name.
    pub name: String,
    pub root: PathBuf,
}

/// A project rooted at a directory.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    modules: Vec<Module>,
    config: DiscoveryConfig,
}

impl Project {
    /// Open a project and find its modules.
    ///
    /// Without any build file the project root itself is the only module.
    pub fn open(root: impl AsRef<Path>, config: &DiscoveryConfig) -> Result<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|e| KtSpecError::io(root, e))?;

        let mut modules: Vec<Module> = walk(&root, config)
            .filter(|path| path.is_dir())
            .filter(|dir| config.module_markers.iter().any(|m| dir.join(m).is_file()))
            .map(|dir| Module {
                name: module_name(&root, &dir),
                root: dir,
            })
            .collect();

        if modules.is_empty() {
            debug!(root = %root.display(), "no build files, using project root as module");
            modules.push(Module {
                name: module_name(&root, &root),
                root: root.clone(),
            });
        }
        modules.sort_by(|a, b| a.root.cmp(&b.root));

        Ok(Self {
            root,
            modules,
            config: config.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// The innermost module containing a file.
    pub fn module_for_file(&self, path: &Path) -> Option<&Module> {
        let path = path.canonicalize().ok()?;
        self.modules
            .iter()
            .filter(|m| path.starts_with(&m.root))
            .max_by_key(|m| m.root.components().count())
    }

    /// Kotlin sources of the project within the configured size limit.
    pub fn source_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walk(&self.root, &self.config)
            .filter(|path| path.is_file() && self.config.is_source(path))
            .filter(|path| {
                fs::metadata(path)
                    .map(|m| m.len() <= self.config.max_file_size)
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    }

    /// Scan every source file for specs.
    ///
    /// Files that fail to load are logged and left out.
    pub fn index(&self, discovery: &SpecDiscovery) -> ProjectIndex {
        let mut index = ProjectIndex::default();
        for path in self.source_files() {
            index.files_scanned += 1;
            let specs = match discovery.specs_for_path(&path) {
                Ok(specs) => specs,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    continue;
                }
            };
            if specs.is_empty() {
                continue;
            }
            let module = self
                .module_for_file(&path)
                .map(|m| m.name.clone())
                .unwrap_or_default();
            index.files.push(IndexedFile {
                relative_path: path
                    .strip_prefix(&self.root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .to_string(),
                path,
                module,
                specs,
            });
        }
        debug!(
            files = index.files_scanned,
            specs = index.spec_count(),
            "project index complete"
        );
        index
    }
}

fn walk<'a>(root: &Path, config: &'a DiscoveryConfig) -> impl Iterator<Item = PathBuf> + 'a {
    let excluded = config.exclude_dirs.clone();
    WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !(is_dir && excluded.iter().any(|d| entry.file_name() == d.as_str()))
        })
        .build()
        .flatten()
        .map(|entry| entry.into_path())
}

fn module_name(project_root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(project_root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().replace('\\', "/"),
        _ => project_root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| project_root.display().to_string()),
    }
}

/// A source file holding at least one spec.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub module: String,
    pub specs: Vec<Spec>,
}

/// Result of a project scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectIndex {
    pub files_scanned: usize,
    pub files: Vec<IndexedFile>,
}

impl ProjectIndex {
    pub fn spec_count(&self) -> usize {
        self.files.iter().map(|f| f.specs.len()).sum()
    }

    pub fn test_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.specs)
            .map(Spec::test_count)
            .sum()
    }

    /// Indexed files grouped by module name, modules in name order.
    pub fn by_module(&self) -> Vec<(&str, Vec<&IndexedFile>)> {
        let mut groups: Vec<(&str, Vec<&IndexedFile>)> = Vec::new();
        for file in &self.files {
            match groups.iter_mut().find(|(m, _)| *m == file.module) {
                Some((_, files)) => files.push(file),
                None => groups.push((file.module.as_str(), vec![file])),
            }
        }
        groups.sort_by(|a, b| a.0.cmp(b.0));
        groups
    }
}

/// Compute SHA256 hash of content for change detection.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Detects content changes of watched files by hashing them.
#[derive(Debug, Default)]
pub struct FileWatcher {
    hashes: HashMap<PathBuf, Option<String>>,
}

impl FileWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching a file, remembering its current content.
    pub fn watch(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let hash = hash_file(&path);
        self.hashes.insert(path, hash);
    }

    pub fn unwatch(&mut self, path: &Path) {
        self.hashes.remove(path);
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.hashes.contains_key(path)
    }

    /// Files whose content changed (or that appeared or vanished) since the
    /// last poll.
    pub fn poll(&mut self) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for (path, hash) in self.hashes.iter_mut() {
            let current = hash_file(path);
            if current != *hash {
                *hash = current;
                changed.push(path.clone());
            }
        }
        changed.sort();
        changed
    }
}

fn hash_file(path: &Path) -> Option<String> {
    fs::read(path).ok().map(|bytes| compute_hash(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_root_is_fallback_module() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A.kt"), "class A\n").unwrap();

        let project = Project::open(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(project.modules().len(), 1);
        let module = project.module_for_file(&dir.path().join("A.kt")).unwrap();
        assert_eq!(module.root, project.root());
    }

    #[test]
    fn test_innermost_module_wins() {
        let dir = TempDir::new().unwrap();
        let app = dir.path().join("app/src/test/kotlin");
        fs::create_dir_all(&app).unwrap();
        fs::write(dir.path().join("settings.gradle.kts"), "").unwrap();
        fs::write(dir.path().join("build.gradle.kts"), "").unwrap();
        fs::write(dir.path().join("app/build.gradle.kts"), "").unwrap();
        fs::write(app.join("S.kt"), "class S\n").unwrap();

        let project = Project::open(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(project.modules().len(), 2);
        assert_eq!(project.module_for_file(&app.join("S.kt")).unwrap().name, "app");
    }

    #[test]
    fn test_excluded_dirs_are_not_scanned() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("build/generated")).unwrap();
        fs::write(dir.path().join("build/generated/G.kt"), "class G\n").unwrap();
        fs::write(dir.path().join("Real.kt"), "class Real\n").unwrap();

        let project = Project::open(dir.path(), &DiscoveryConfig::default()).unwrap();
        let files = project.source_files();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Real.kt"));
    }

    #[test]
    fn test_file_watcher_detects_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("S.kt");
        fs::write(&path, "class S\n").unwrap();

        let mut watcher = FileWatcher::new();
        watcher.watch(&path);
        assert!(watcher.poll().is_empty());

        fs::write(&path, "class S2\n").unwrap();
        assert_eq!(watcher.poll(), vec![path.clone()]);
        assert!(watcher.poll().is_empty());

        fs::remove_file(&path).unwrap();
        assert_eq!(watcher.poll(), vec![path]);
    }

    #[test]
    fn test_unwatched_file_is_not_polled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("S.kt");
        fs::write(&path, "class S\n").unwrap();

        let mut watcher = FileWatcher::new();
        watcher.watch(&path);
        assert!(watcher.is_watching(&path));

        watcher.unwatch(&path);
        assert!(!watcher.is_watching(&path));
        fs::write(&path, "class S2\n").unwrap();
        assert!(watcher.poll().is_empty());
    }

    #[test]
    fn test_compute_hash_is_stable() {
        assert_eq!(compute_hash(b"abc"), compute_hash(b"abc"));
        assert_ne!(compute_hash(b"abc"), compute_hash(b"abd"));
        assert_eq!(compute_hash(b"").len(), 64);
    }
}
