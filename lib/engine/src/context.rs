use crate::expr::{ExpressionEvaluator, RowBindings, SparqlExpressionEvaluator};
use crate::row::Row;
use crate::scope::{ScopeId, ScopeTree};
use crate::variables::{VariableId, VariableKind, VariablesTable};
use rasqal_common::{EngineResult, ExecutionOptions};
use rasqal_model::Variable;
use std::sync::Arc;

/// Everything a rowsource pipeline shares while it is built and executed.
///
/// Operators register variables and scopes while their variables are ensured. Afterwards, the
/// context is only read.
#[derive(Debug)]
pub struct QueryContext {
    variables: VariablesTable,
    scopes: ScopeTree,
    options: ExecutionOptions,
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl QueryContext {
    /// Creates a context with the default options and the [`SparqlExpressionEvaluator`].
    pub fn new() -> Self {
        Self {
            variables: VariablesTable::new(),
            scopes: ScopeTree::new(),
            options: ExecutionOptions::default(),
            evaluator: Arc::new(SparqlExpressionEvaluator),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    #[must_use]
    pub fn with_variables(mut self, variables: VariablesTable) -> Self {
        self.variables = variables;
        self
    }

    pub fn variables(&self) -> &VariablesTable {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariablesTable {
        &mut self.variables
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeTree {
        &mut self.scopes
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    pub fn evaluator(&self) -> &dyn ExpressionEvaluator {
        self.evaluator.as_ref()
    }

    /// Registers a normal variable in the variables table.
    pub fn declare_variable(&mut self, name: &str) -> EngineResult<VariableId> {
        self.variables
            .add_variable(VariableKind::Normal, name, None)
    }

    /// Registers a normal variable and declares it as local to `scope`.
    pub fn declare_in_scope(&mut self, scope: ScopeId, name: &str) -> EngineResult<VariableId> {
        let variable = self.declare_variable(name)?;
        self.scopes.declare(scope, variable)?;
        Ok(variable)
    }

    /// The SPARQL variables for the given ids.
    pub fn variable_names(&self, ids: &[VariableId]) -> Vec<Variable> {
        ids.iter()
            .map(|id| Variable::new_unchecked(self.variables.name(*id)))
            .collect()
    }

    /// The bindings of `row`, produced by a rowsource with the variables `schema`.
    pub fn bindings<'a>(
        &'a self,
        schema: &'a [VariableId],
        row: &'a Row,
        scope: Option<ScopeId>,
    ) -> RowBindings<'a> {
        RowBindings::new(self, schema, row, scope)
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new()
    }
}
