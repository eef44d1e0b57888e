//! Lexical scopes of a query and the rules for resolving variables across them.
//!
//! Scopes form a tree rooted at the query's [`ScopeKind::Root`] scope. Each scope owns the
//! variables that are bound locally in it. Scopes only refer to their parent by [`ScopeId`], the
//! tree itself owns all scopes.

use crate::variables::{VariableId, VariablesTable};
use rasqal_common::{EngineError, EngineResult};
use std::fmt;

/// Identifier of a scope in a [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of query construct that opened a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The outermost scope of a query.
    Root,
    /// A group created by aggregation. Its variables are not visible through it.
    Group,
    Exists,
    NotExists,
    Subquery,
    /// A scope that only introduces new bindings.
    Let,
}

impl ScopeKind {
    /// Whether the scope blocks variable lookups that pass through it.
    pub fn is_isolating(self) -> bool {
        matches!(self, ScopeKind::Group)
    }
}

/// A lexical scope and its local variables.
#[derive(Clone, Debug)]
pub struct Scope {
    id: ScopeId,
    name: String,
    kind: ScopeKind,
    parent: Option<ScopeId>,
    local_vars: Vec<VariableId>,
}

impl Scope {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Variables bound locally in this scope, in declaration order.
    pub fn local_vars(&self) -> &[VariableId] {
        &self.local_vars
    }

    pub fn owns(&self, variable: VariableId) -> bool {
        self.local_vars.contains(&variable)
    }
}

/// How far [`ScopeTree::resolve`] searches for a variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchPolicy {
    /// Only the starting scope is searched.
    LocalOnly,
    /// The starting scope and all of its ancestors are searched.
    #[default]
    InheritParent,
}

/// Where and how a variable lookup starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionContext {
    pub scope: ScopeId,
    pub policy: SearchPolicy,
}

impl ResolutionContext {
    pub fn new(scope: ScopeId, policy: SearchPolicy) -> Self {
        Self { scope, policy }
    }
}

/// The outcome of a successful [`ScopeTree::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedVariable {
    /// The resolved variable.
    pub variable: VariableId,
    /// The scope that owns the variable.
    pub scope: ScopeId,
    /// Number of parent hops from the starting scope to the owning scope.
    pub depth: usize,
    /// The visited scopes, starting with the scope the lookup started in. Truncated to the
    /// configured maximum path length.
    pub path: Vec<ScopeId>,
}

/// Arena of all scopes of a query.
#[derive(Clone, Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Creates a tree that only contains the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId(0),
                name: "root".to_owned(),
                kind: ScopeKind::Root,
                parent: None,
                local_vars: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Opens a new scope below `parent`.
    pub fn add_scope(
        &mut self,
        parent: ScopeId,
        kind: ScopeKind,
        name: impl Into<String>,
    ) -> EngineResult<ScopeId> {
        self.scope(parent)?;
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            name: name.into(),
            kind,
            parent: Some(parent),
            local_vars: Vec::new(),
        });
        Ok(id)
    }

    /// Declares `variable` as local to `scope`. Declaring a variable twice has no effect.
    pub fn declare(&mut self, scope: ScopeId, variable: VariableId) -> EngineResult<()> {
        let scope = self
            .scopes
            .get_mut(scope.0)
            .ok_or(EngineError::UnknownScope(scope.0))?;
        if !scope.local_vars.contains(&variable) {
            scope.local_vars.push(variable);
        }
        Ok(())
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    fn scope(&self, id: ScopeId) -> EngineResult<&Scope> {
        self.get(id).ok_or(EngineError::UnknownScope(id.0))
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns the first scope, in creation order, that declares `variable`.
    pub fn declaring_scope(&self, variable: VariableId) -> Option<ScopeId> {
        self.scopes
            .iter()
            .find(|scope| scope.owns(variable))
            .map(Scope::id)
    }

    /// Iterates `scope` and its ancestors, innermost first.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        let mut next = self.get(scope);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.parent.and_then(|parent| self.get(parent));
            Some(current)
        })
    }

    /// Number of parent hops between `scope` and the root.
    pub fn depth(&self, scope: ScopeId) -> usize {
        self.ancestors(scope).count().saturating_sub(1)
    }

    /// Resolves `name` starting at `context.scope`.
    ///
    /// Each visited scope is searched for a local variable called `name`. With
    /// [`SearchPolicy::InheritParent`], the search continues with the parent until the root has
    /// been searched. The recorded path is limited to `max_path` entries.
    pub fn resolve(
        &self,
        variables: &VariablesTable,
        name: &str,
        context: ResolutionContext,
        max_path: usize,
    ) -> Option<ResolvedVariable> {
        let mut path = Vec::new();
        for (depth, scope) in self.ancestors(context.scope).enumerate() {
            if path.len() < max_path {
                path.push(scope.id);
            }

            let found = scope
                .local_vars
                .iter()
                .copied()
                .find(|variable| variables.name(*variable) == name);
            if let Some(variable) = found {
                tracing::trace!(name, scope = %scope.id, depth, "Resolved variable");
                return Some(ResolvedVariable {
                    variable,
                    scope: scope.id,
                    depth,
                    path,
                });
            }

            if context.policy == SearchPolicy::LocalOnly {
                break;
            }
        }

        tracing::trace!(name, ?path, "Variable not found in scope chain");
        None
    }

    /// Checks whether `variable` is visible from `scope`.
    ///
    /// The scope chain is walked upward. The variable is visible if it is owned by a scope on
    /// the chain before a [`ScopeKind::Group`] ancestor is passed. The starting scope itself may
    /// be a group.
    pub fn validate_scope_boundaries(&self, scope: ScopeId, variable: VariableId) -> bool {
        for (depth, current) in self.ancestors(scope).enumerate() {
            if current.owns(variable) {
                return true;
            }
            if depth > 0 && current.kind.is_isolating() {
                tracing::trace!(
                    scope = %scope,
                    blocked_by = %current.id,
                    "Scope boundary violation"
                );
                return false;
            }
        }
        false
    }

    /// Checks whether code in scope `from` may access `variable` owned by scope `to`.
    ///
    /// - Access within a scope is always allowed.
    /// - A descendant may access an ancestor's variable unless a group lies strictly between
    ///   them.
    /// - An ancestor may not access a descendant's variable if any scope on the path, including
    ///   both ends, is a group.
    /// - Unrelated scopes may access each other through their common ancestor.
    pub fn check_cross_scope_access(
        &self,
        from: ScopeId,
        to: ScopeId,
        variable: VariableId,
    ) -> bool {
        let Some(target) = self.get(to) else {
            return false;
        };
        if self.get(from).is_none() || !target.owns(variable) {
            return false;
        }
        if from == to {
            return true;
        }

        if let Some(path) = self.path_between(from, to) {
            // `from` is a descendant of `to`.
            return !path[1..path.len() - 1]
                .iter()
                .any(|scope| self.is_isolating(*scope));
        }

        if let Some(path) = self.path_between(to, from) {
            // `from` is an ancestor of `to`.
            return !path.iter().any(|scope| self.is_isolating(*scope));
        }

        self.common_ancestor(from, to).is_some()
    }

    /// Returns the scopes from `descendant` up to and including `ancestor`, if `ancestor` is on
    /// the scope chain of `descendant`.
    fn path_between(&self, descendant: ScopeId, ancestor: ScopeId) -> Option<Vec<ScopeId>> {
        let mut path = Vec::new();
        for scope in self.ancestors(descendant) {
            path.push(scope.id);
            if scope.id == ancestor {
                return Some(path);
            }
        }
        None
    }

    fn common_ancestor(&self, lhs: ScopeId, rhs: ScopeId) -> Option<ScopeId> {
        let lhs_chain = self.ancestors(lhs).map(Scope::id).collect::<Vec<_>>();
        self.ancestors(rhs)
            .map(Scope::id)
            .find(|scope| lhs_chain.contains(scope))
    }

    fn is_isolating(&self, scope: ScopeId) -> bool {
        self.get(scope)
            .is_some_and(|scope| scope.kind.is_isolating())
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
