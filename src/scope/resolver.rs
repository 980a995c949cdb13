//! Ordered multi-match lookup through a scope chain

use crate::parser::ast::Snippet;

use super::table::{ScopeId, ScopeTree};

/// Iterator over the snippets named `name` visible from a starting scope.
///
/// Each call resumes one past the previously returned entry, so the same
/// entry is never yielded twice. When a scope is exhausted the walk continues
/// from the start of its parent; a scope without a parent ends it.
#[derive(Debug, Clone)]
pub struct Matches<'t> {
    tree: &'t ScopeTree,
    name: &'t str,
    scope: Option<ScopeId>,
    next: usize,
}

impl<'t> Matches<'t> {
    pub(crate) fn new(tree: &'t ScopeTree, start: ScopeId, name: &'t str) -> Self {
        Self {
            tree,
            name,
            scope: Some(start),
            next: 0,
        }
    }
}

impl<'t> Iterator for Matches<'t> {
    type Item = &'t Snippet;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let scope = self.tree.get(self.scope?);
            if let Some((index, snippet)) = scope.find(self.name, self.next) {
                self.next = index + 1;
                return Some(snippet);
            }
            self.scope = scope.parent();
            self.next = 0;
        }
    }
}
