//! Scope storage: ordered snippet tables linked to their parents

use crate::parser::ast::Snippet;

use super::resolver::Matches;

/// Handle to a scope inside a [`ScopeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// An ordered list of snippets plus an optional parent for escalation.
///
/// Several entries may share a name; their order is definition order.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    entries: Vec<Snippet>,
    parent: Option<ScopeId>,
}

impl Scope {
    fn with_parent(parent: Option<ScopeId>) -> Self {
        Self {
            entries: Vec::new(),
            parent,
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn entries(&self) -> &[Snippet] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first entry named `name` at or after position `start`
    pub fn find(&self, name: &str, start: usize) -> Option<(usize, &Snippet)> {
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, snippet)| snippet.name() == name)
    }

    /// Get the first entry named `name`
    pub fn first(&self, name: &str) -> Option<&Snippet> {
        self.find(name, 0).map(|(_, snippet)| snippet)
    }

    /// Check if any entry is named `name`
    pub fn contains(&self, name: &str) -> bool {
        self.first(name).is_some()
    }

    /// Entry names in definition order, duplicates included
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Snippet::name)
    }
}

/// Scope and entry counts of a [`ScopeTree`] at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    entries: Vec<usize>,
}

/// Owner of every scope created while parsing.
///
/// Scopes refer to their parents by [`ScopeId`]; the tree keeps all of them
/// alive for as long as any snippet (which may hold context switches naming
/// them) can be rendered.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Create a tree holding only an empty root scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::with_parent(None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Get a scope by id.
    ///
    /// Ids are only handed out by this tree, so every id is valid here.
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Create an empty scope whose lookups escalate to `parent`
    pub fn add_child(&mut self, parent: ScopeId) -> ScopeId {
        self.push(Scope::with_parent(Some(parent)))
    }

    /// Create an empty scope with no parent
    pub fn add_detached(&mut self) -> ScopeId {
        self.push(Scope::with_parent(None))
    }

    fn push(&mut self, scope: Scope) -> ScopeId {
        self.scopes.push(scope);
        ScopeId(self.scopes.len() - 1)
    }

    /// Append a snippet to a scope
    pub fn register(&mut self, scope: ScopeId, snippet: Snippet) {
        self.scopes[scope.0].entries.push(snippet);
    }

    /// Every snippet named `name` visible from `start`, nearest scope first
    pub fn matches<'t>(&'t self, start: ScopeId, name: &'t str) -> Matches<'t> {
        Matches::new(self, start, name)
    }

    /// Record the current size of every scope
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            entries: self.scopes.iter().map(Scope::len).collect(),
        }
    }

    /// Drop every scope and entry added since `checkpoint` was taken
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.scopes.truncate(checkpoint.entries.len());
        for (scope, len) in self.scopes.iter_mut().zip(checkpoint.entries) {
            scope.entries.truncate(len);
        }
    }

    /// Number of scopes in the tree, root included
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
