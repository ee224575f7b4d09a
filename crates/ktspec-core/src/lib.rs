//! Kotest spec recognition for Kotlin sources.
//!
//! Parses Kotlin files with tree-sitter, finds classes extending one of the
//! Kotest spec styles and recognizes the tests they declare:
//!
//! - [`syntax`]: parsing, node anchors and the shape predicates styles use
//! - [`styles`]: one [`SpecStyle`] per Kotest style and their registry
//! - [`discovery`]: dispatch of classes to styles, test trees per file
//! - [`gutter`] and [`run`]: run markers and Run/Debug/Coverage requests
//! - [`explorer`]: the tree shown for the selected file
//! - [`project`]: modules, project scans and change detection

pub mod config;
pub mod discovery;
pub mod error;
pub mod explorer;
pub mod gutter;
pub mod model;
pub mod project;
pub mod run;
pub mod styles;
pub mod syntax;

pub use config::{Config, ConfigError};
pub use discovery::{Location, SpecDiscovery};
pub use error::{KtSpecError, Result};
pub use explorer::{ExplorerTree, NodeKind, TestExplorer};
pub use gutter::{GutterMarker, MarkerKind};
pub use model::{Spec, Test, TestElement, TestName, TestPathEntry, TestType};
pub use project::{FileWatcher, Module, Project, ProjectIndex};
pub use run::{CommandLine, RunMode, RunRequest};
pub use styles::{SpecStyle, StyleRegistry};
pub use syntax::{NodeAnchor, Position, SourceFile};
