use crate::context::QueryContext;
use crate::row::Row;
use crate::scope::{ResolutionContext, ScopeId, SearchPolicy};
use crate::variables::VariableId;
use rasqal_model::Term;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Gives an expression access to the values of variables.
pub trait Bindings {
    /// The value bound to the variable called `name`, or `None` if it is unbound or unknown.
    fn value(&self, name: &str) -> Option<&Term>;
}

impl<S: BuildHasher> Bindings for HashMap<String, Term, S> {
    fn value(&self, name: &str) -> Option<&Term> {
        self.get(name)
    }
}

/// The bindings of a row produced by a rowsource with the variables `schema`.
///
/// Without a scope, names are looked up in the variables table of the query. With a scope, a
/// name is first resolved through the scope chain and the resolved variable must be visible from
/// the scope. Variables that are not declared in any scope are looked up in the variables table.
/// The value is read from the row if the variable is part of the schema and from the variable
/// itself otherwise.
#[derive(Clone, Copy, Debug)]
pub struct RowBindings<'a> {
    context: &'a QueryContext,
    schema: &'a [VariableId],
    row: &'a Row,
    scope: Option<ScopeId>,
}

impl<'a> RowBindings<'a> {
    pub fn new(
        context: &'a QueryContext,
        schema: &'a [VariableId],
        row: &'a Row,
        scope: Option<ScopeId>,
    ) -> Self {
        Self {
            context,
            schema,
            row,
            scope,
        }
    }

    /// Finds the variable that `name` refers to from the current scope.
    pub fn lookup(&self, name: &str) -> Option<VariableId> {
        let variables = self.context.variables();
        let Some(scope) = self.scope else {
            return variables.lookup(name);
        };

        let scopes = self.context.scopes();
        let resolution = ResolutionContext::new(scope, SearchPolicy::InheritParent);
        match scopes.resolve(
            variables,
            name,
            resolution,
            self.context.options().max_scope_path,
        ) {
            Some(resolved) => {
                if scopes.validate_scope_boundaries(scope, resolved.variable) {
                    Some(resolved.variable)
                } else {
                    tracing::trace!(name, scope = %scope, "Variable is not visible from scope");
                    None
                }
            }
            None => variables
                .lookup(name)
                .filter(|variable| scopes.declaring_scope(*variable).is_none()),
        }
    }

    fn value_of(&self, variable: VariableId) -> Option<&'a Term> {
        match self.schema.iter().position(|v| *v == variable) {
            Some(position) => self.row.get(position),
            None => self
                .context
                .variables()
                .get(variable)
                .and_then(|variable| variable.value()),
        }
    }
}

impl Bindings for RowBindings<'_> {
    fn value(&self, name: &str) -> Option<&Term> {
        self.lookup(name)
            .and_then(|variable| self.value_of(variable))
    }
}
