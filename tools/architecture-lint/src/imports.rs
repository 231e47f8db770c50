//! Collects every path a source file mentions and classifies its root.

use std::collections::BTreeSet;

use syn::visit::Visit;

use crate::layer::{CRATE_NAME, LINTED_ROOTS};

/// What a path reaches for, reduced to its first meaningful segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dependency {
    /// A sibling layer of the backend crate, such as `outbound`.
    Module(String),
    /// An external crate, such as `diesel`.
    Crate(String),
}

/// Every path in `file`, from `use` trees and from inline expressions.
pub fn dependencies(file: &syn::File) -> BTreeSet<Dependency> {
    let mut collector = ImportCollector::default();
    collector.visit_file(file);
    collector
        .paths
        .iter()
        .filter_map(|segments| classify(segments))
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn classify(segments: &[String]) -> Option<Dependency> {
    let first = segments.first()?.as_str();
    if LINTED_ROOTS.contains(&first) {
        return Some(Dependency::Module(first.to_owned()));
    }
    if is_relative(first) || first == CRATE_NAME {
        return segments
            .iter()
            .skip(1)
            .find(|segment| !is_relative(segment))
            .filter(|segment| LINTED_ROOTS.contains(&segment.as_str()))
            .map(|segment| Dependency::Module(segment.clone()));
    }
    Some(Dependency::Crate(first.to_owned()))
}

#[derive(Default)]
struct ImportCollector {
    paths: BTreeSet<Vec<String>>,
}

impl ImportCollector {
    fn walk_use(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.walk_use(&path.tree, prefix);
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                prefix.push(ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.walk_use(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for ImportCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.walk_use(&node.tree, Vec::new());
    }
}
