//! Tree-sitter based Kotlin syntax layer.
//!
//! Everything above this module reads the tree; nothing writes to it.
//! `SourceFile` owns the parsed tree together with its text, and
//! [`NodeAnchor`] is the only handle that outlives a parse.

pub mod psi;
pub mod supertypes;

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tree_sitter::{Language, Node, Parser as TSParser, Tree};

use crate::error::{KtSpecError, Result};

/// The Kotlin grammar.
pub fn kotlin_language() -> Language {
    tree_sitter_kotlin_ng::LANGUAGE.into()
}

/// A parsed Kotlin file.
pub struct SourceFile {
    path: Option<PathBuf>,
    content: String,
    tree: Tree,
}

impl SourceFile {
    /// Parse source text that has no file behind it.
    pub fn parse(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        let tree = parse_tree(&content)?;
        Ok(Self {
            path: None,
            content,
            tree,
        })
    }

    /// Read and parse a file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| KtSpecError::io(path, e))?;
        let tree = parse_tree(&content)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            content,
            tree,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text for a node of this file.
    pub fn text(&self, node: &Node) -> &str {
        node_text(node, &self.content)
    }

    /// Whether tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.root().has_error()
    }

    /// Smallest node covering the byte at `offset`.
    pub fn leaf_at(&self, offset: usize) -> Option<Node<'_>> {
        if offset >= self.content.len() {
            return None;
        }
        let mut node = self.root().descendant_for_byte_range(offset, offset + 1)?;
        // Descend while a child still covers the offset.
        loop {
            let mut cursor = node.walk();
            let next = node
                .children(&mut cursor)
                .find(|c| c.start_byte() <= offset && offset < c.end_byte());
            match next {
                Some(child) => node = child,
                None => return Some(node),
            }
        }
    }

    /// Map an anchor from an earlier pass over this same text back to a node.
    pub fn resolve(&self, anchor: &NodeAnchor) -> Option<Node<'_>> {
        let mut node = self
            .root()
            .descendant_for_byte_range(anchor.start_byte, anchor.end_byte)?;
        loop {
            if node.kind() == anchor.kind
                && node.start_byte() == anchor.start_byte
                && node.end_byte() == anchor.end_byte
            {
                return Some(node);
            }
            node = node.parent()?;
            if node.byte_range() != (anchor.start_byte..anchor.end_byte) {
                return None;
            }
        }
    }

    /// Convert a 1-based line and column to a byte offset.
    pub fn byte_offset(&self, line: u32, column: u32) -> Option<usize> {
        if line == 0 || column == 0 {
            return None;
        }
        let mut offset = 0usize;
        for (index, text) in self.content.split_inclusive('\n').enumerate() {
            if index + 1 == line as usize {
                let within = (column as usize - 1).min(text.trim_end_matches('\n').len());
                return Some(offset + within);
            }
            offset += text.len();
        }
        None
    }
}

/// Parse source code into a tree-sitter tree.
fn parse_tree(content: &str) -> Result<Tree> {
    let mut parser = TSParser::new();
    parser
        .set_language(&kotlin_language())
        .map_err(|e| KtSpecError::Language(e.to_string()))?;

    parser
        .parse(content, None)
        .ok_or_else(|| KtSpecError::Parse("tree-sitter returned no tree".to_string()))
}

/// Get text for a node from source content.
///
/// Returns an empty string when the node does not belong to `content`.
pub fn node_text<'a>(node: &Node, content: &'a str) -> &'a str {
    content.get(node.byte_range()).unwrap_or("")
}

/// Named children, skipping comments.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| !is_comment(n))
        .collect()
}

/// All children, including anonymous tokens.
pub fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

pub fn is_comment(node: &Node) -> bool {
    node.kind().contains("comment")
}

/// 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A non-owning handle to a syntax node.
///
/// Anchors are lookup keys into the tree that produced them. They stay
/// valid only as long as the text is unchanged; after an edit the next
/// recognition pass produces fresh anchors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeAnchor {
    pub kind: &'static str,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: Position,
    pub end: Position,
}

impl NodeAnchor {
    pub fn of(node: &Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            kind: node.kind(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start: Position {
                line: start.row as u32 + 1,
                column: start.column as u32 + 1,
            },
            end: Position {
                line: end.row as u32 + 1,
                column: end.column as u32 + 1,
            },
        }
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start_byte <= offset && offset < self.end_byte
    }

    pub fn line(&self) -> u32 {
        self.start.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_returns_source_file() {
        let file = SourceFile::parse("fun main() {}\n").unwrap();
        assert_eq!(file.root().kind(), "source_file");
        assert!(!file.has_errors());
        assert!(file.path().is_none());
    }

    #[test]
    fn test_byte_offset() {
        let file = SourceFile::parse("val a = 1\nval b = 2\n").unwrap();
        assert_eq!(file.byte_offset(1, 1), Some(0));
        assert_eq!(file.byte_offset(2, 5), Some(14));
        assert_eq!(file.byte_offset(3, 1), None);
        assert_eq!(file.byte_offset(0, 1), None);
    }

    #[test]
    fn test_leaf_at_finds_token() {
        let content = "fun main() { println(1) }\n";
        let file = SourceFile::parse(content).unwrap();
        let offset = content.find('{').unwrap();
        let leaf = file.leaf_at(offset).unwrap();
        assert_eq!(leaf.kind(), "{");
        assert_eq!(leaf.child_count(), 0);
    }

    #[test]
    fn test_anchor_resolves_to_same_node() {
        let content = "fun main() { println(1) }\n";
        let file = SourceFile::parse(content).unwrap();
        let leaf = file.leaf_at(content.find("println").unwrap()).unwrap();
        let parent = leaf.parent().unwrap();
        let anchor = NodeAnchor::of(&parent);
        let resolved = file.resolve(&anchor).unwrap();
        assert_eq!(resolved, parent);
        assert_eq!(anchor.line(), 1);
    }
}
