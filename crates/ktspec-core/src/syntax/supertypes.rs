//! Declared supertype resolution for class and object declarations.
//!
//! Resolution is purely syntactic: a supertype reference is turned into the
//! fully qualified names it could denote using the file's package, its
//! imports and the other declarations in the same file.

use std::collections::{HashMap, HashSet};

use tree_sitter::Node;

use super::psi::is_identifier;
use super::{children, named_children, node_text, SourceFile};

const DECLARATION_KINDS: &[&str] = &["class_declaration", "object_declaration"];

/// Upper bound on local supertype chains (`class A : B()`, `class B : C()`, ...).
const MAX_LOCAL_DEPTH: usize = 8;

pub fn is_declaration(node: &Node) -> bool {
    DECLARATION_KINDS.contains(&node.kind())
}

/// One `import` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Imported path without `.*` or alias.
    pub path: String,
    pub alias: Option<String>,
    pub wildcard: bool,
}

impl Import {
    /// Parse the text of an import directive.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.trim().strip_prefix("import")?.trim().trim_end_matches(';').trim();
        let (path, alias) = match body.split_once(" as ") {
            Some((path, alias)) => (path.trim(), Some(alias.trim().to_string())),
            None => (body, None),
        };
        let path: String = path.chars().filter(|c| !c.is_whitespace()).collect();
        let (path, wildcard) = match path.strip_suffix(".*") {
            Some(prefix) => (prefix.to_string(), true),
            None => (path, false),
        };
        if path.is_empty() {
            return None;
        }
        Some(Self {
            path,
            alias,
            wildcard,
        })
    }

    /// Simple name this import brings into scope.
    fn visible_name(&self) -> Option<&str> {
        if self.wildcard {
            return None;
        }
        self.alias
            .as_deref()
            .or_else(|| self.path.rsplit('.').next())
    }
}

/// Package and imports of a file.
#[derive(Debug, Clone, Default)]
pub struct FileHeader {
    pub package: Option<String>,
    pub imports: Vec<Import>,
}

impl FileHeader {
    pub fn read(file: &SourceFile) -> Self {
        let mut header = FileHeader::default();
        collect_header(file.root(), file.content(), &mut header);
        header
    }

    /// Fully qualified names a (possibly dotted) type reference may denote.
    pub fn candidates(&self, reference: &str) -> Vec<String> {
        let (first, rest) = match reference.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (reference, None),
        };

        let mut out = Vec::new();
        for import in &self.imports {
            if import.visible_name() == Some(first) {
                out.push(match rest {
                    Some(rest) => format!("{}.{}", import.path, rest),
                    None => import.path.clone(),
                });
            }
        }
        if rest.is_some() {
            out.push(reference.to_string());
        }
        for import in self.imports.iter().filter(|i| i.wildcard) {
            out.push(format!("{}.{}", import.path, reference));
        }
        if let Some(package) = &self.package {
            out.push(format!("{}.{}", package, reference));
        }
        if rest.is_none() {
            out.push(reference.to_string());
        }

        let mut seen = HashSet::new();
        out.retain(|c| seen.insert(c.clone()));
        out
    }

    /// Fully qualified name of a top-level declaration in this file.
    pub fn qualify(&self, name: &str) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, name),
            None => name.to_string(),
        }
    }
}

fn collect_header(node: Node, src: &str, header: &mut FileHeader) {
    for child in named_children(node) {
        match child.kind() {
            "package_header" => {
                let text = node_text(&child, src);
                let name: String = text
                    .trim()
                    .trim_start_matches("package")
                    .trim()
                    .trim_end_matches(';')
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                if !name.is_empty() {
                    header.package = Some(name);
                }
            }
            "import_header" | "import" => {
                if let Some(import) = Import::parse(node_text(&child, src)) {
                    header.imports.push(import);
                }
            }
            "import_list" => collect_header(child, src, header),
            _ => {}
        }
    }
}

/// A supertype as written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperTypeRef {
    /// Dotted reference without type arguments.
    pub text: String,
    /// Fully qualified names it may resolve to, most specific first.
    pub candidates: Vec<String>,
}

/// A class or object declaration.
#[derive(Debug, Clone)]
pub struct ClassDeclaration<'t> {
    pub node: Node<'t>,
    pub name: String,
    /// Identifier holding the declaration name.
    pub name_node: Option<Node<'t>>,
    pub fqn: String,
    pub supertypes: Vec<SuperTypeRef>,
}

impl ClassDeclaration<'_> {
    /// Candidate supertype names, following supertypes declared in the same file.
    pub fn resolved_supertypes(&self, local: &[ClassDeclaration<'_>]) -> Vec<String> {
        let by_name: HashMap<&str, &ClassDeclaration<'_>> =
            local.iter().map(|d| (d.name.as_str(), d)).collect();

        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut frontier: Vec<&ClassDeclaration<'_>> = vec![self];
        for _ in 0..MAX_LOCAL_DEPTH {
            let mut next = Vec::new();
            for decl in frontier {
                if !visited.insert(decl.fqn.as_str()) {
                    continue;
                }
                for supertype in &decl.supertypes {
                    out.extend(supertype.candidates.iter().cloned());
                    if let Some(parent) = by_name.get(supertype.text.as_str()) {
                        next.push(*parent);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        out
    }
}

/// Every class and object declaration in the file, outer ones first.
pub fn declarations(file: &SourceFile) -> Vec<ClassDeclaration<'_>> {
    let header = FileHeader::read(file);
    let mut out = Vec::new();
    collect_declarations(file.root(), file.content(), &header, &mut Vec::new(), &mut out);
    out
}

fn collect_declarations<'t>(
    node: Node<'t>,
    src: &str,
    header: &FileHeader,
    outer: &mut Vec<String>,
    out: &mut Vec<ClassDeclaration<'t>>,
) {
    for child in named_children(node) {
        if is_declaration(&child) {
            let name_node = declaration_name(child);
            let name = name_node
                .map(|n| node_text(&n, src).trim_matches('`').to_string())
                .unwrap_or_default();
            let mut qualified = outer.clone();
            qualified.push(name.clone());

            out.push(ClassDeclaration {
                node: child,
                name: name.clone(),
                name_node,
                fqn: header.qualify(&qualified.join(".")),
                supertypes: supertype_refs(child, src)
                    .into_iter()
                    .map(|text| SuperTypeRef {
                        candidates: header.candidates(&text),
                        text,
                    })
                    .collect(),
            });

            outer.push(name);
            collect_declarations(child, src, header, outer, out);
            outer.pop();
        } else {
            collect_declarations(child, src, header, outer, out);
        }
    }
}

fn declaration_name(decl: Node) -> Option<Node> {
    decl.child_by_field_name("name")
        .or_else(|| named_children(decl).into_iter().find(|n| is_identifier(n)))
}

/// Supertype references listed after the `:` of a declaration.
fn supertype_refs(decl: Node, src: &str) -> Vec<String> {
    let mut specifiers = Vec::new();
    for child in named_children(decl) {
        match child.kind() {
            "delegation_specifier" => specifiers.push(child),
            "delegation_specifiers" => specifiers.extend(
                named_children(child)
                    .into_iter()
                    .filter(|n| n.kind() == "delegation_specifier"),
            ),
            _ => {}
        }
    }

    specifiers
        .into_iter()
        .filter_map(|spec| find_user_type(spec))
        .map(|user_type| {
            let mut parts = Vec::new();
            collect_type_name(user_type, src, &mut parts);
            parts.join(".")
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn find_user_type(node: Node) -> Option<Node> {
    if node.kind() == "user_type" {
        return Some(node);
    }
    named_children(node)
        .into_iter()
        .filter(|n| n.kind() != "value_arguments" && n.kind() != "type_arguments")
        .find_map(find_user_type)
}

fn collect_type_name(node: Node, src: &str, parts: &mut Vec<String>) {
    for child in children(node) {
        if child.kind() == "type_arguments" {
            continue;
        }
        if is_identifier(&child) {
            parts.push(node_text(&child, src).trim_matches('`').to_string());
        } else if child.is_named() {
            collect_type_name(child, src, parts);
        }
    }
}
