//! EXTEND operator, the rowsource for `BIND(expr AS ?var)`.
//!
//! For each input row:
//! - If `?var` is already bound in the row, the row is dropped. Extend is undefined for rows
//!   whose domain contains the variable.
//! - Otherwise the expression is evaluated against the row. On success, the value is bound to
//!   `?var`. On error, the [`ExtendErrorPolicy`] decides whether the row is emitted with `?var`
//!   unbound or dropped.

use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::scope::ScopeId;
use crate::variables::{VariableId, VariableKind};
use rasqal_common::{EngineResult, ExtendErrorPolicy};
use rasqal_model::{Expression, Variable};
use std::sync::Arc;

#[derive(Debug)]
pub struct ExtendRowSource {
    input: BoxedRowSource,
    variable: Variable,
    expression: Expression,
    scope: Option<ScopeId>,
    /// Output variables and the position of the extend variable in them.
    variables: Option<Arc<[VariableId]>>,
    position: usize,
    counter: RowCounter,
    state: RowSourceState,
}

impl ExtendRowSource {
    /// Creates an EXTEND that binds `expression` to `variable` for every row of `input`.
    ///
    /// If `scope` is given, the expression is evaluated with scope-aware variable lookups and
    /// `variable` becomes a local variable of that scope.
    pub fn new(
        input: BoxedRowSource,
        variable: Variable,
        expression: Expression,
        scope: Option<ScopeId>,
    ) -> Self {
        Self {
            input,
            variable,
            expression,
            scope,
            variables: None,
            position: 0,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }

    fn extend(&self, context: &QueryContext, mut row: Row) -> Option<Row> {
        let input_variables = self.input.variables();
        if row.is_bound(self.position) {
            tracing::trace!(
                variable = self.variable.as_str(),
                offset = row.offset(),
                "Dropping row that already binds the extend variable"
            );
            return None;
        }

        let bindings = context.bindings(input_variables, &row, self.scope);
        let value = match context.evaluator().evaluate(&self.expression, &bindings) {
            Ok(value) => Some(value),
            Err(_) => match context.options().extend_error_policy {
                ExtendErrorPolicy::PassThrough => None,
                ExtendErrorPolicy::Drop => {
                    tracing::trace!(
                        variable = self.variable.as_str(),
                        offset = row.offset(),
                        "Dropping row with failed extend expression"
                    );
                    return None;
                }
            },
        };

        if self.position < row.len() {
            row.set(self.position, value);
        } else {
            row.push(value);
        }
        Some(row)
    }
}

impl RowSource for ExtendRowSource {
    fn name(&self) -> &'static str {
        "extend"
    }

    fn ensure_variables(&mut self, context: &mut QueryContext) -> EngineResult<()> {
        if !self.state.initialize(self.name()) {
            return Ok(());
        }
        self.input.ensure_variables(context)?;

        let variable = context
            .variables_mut()
            .add_variable(VariableKind::Normal, self.variable.as_str(), None)?;
        if let Some(scope) = self.scope {
            context.scopes_mut().declare(scope, variable)?;
        }

        let input_variables = self.input.variables();
        let existing = input_variables.iter().position(|v| *v == variable);
        let variables: Arc<[VariableId]> = match existing {
            Some(position) => {
                self.position = position;
                Arc::clone(input_variables)
            }
            None => {
                self.position = input_variables.len();
                input_variables
                    .iter()
                    .copied()
                    .chain(std::iter::once(variable))
                    .collect()
            }
        };
        tracing::debug!(
            variable = self.variable.as_str(),
            position = self.position,
            width = variables.len(),
            "Ensured variables of EXTEND"
        );
        self.variables = Some(variables);
        Ok(())
    }

    fn variables(&self) -> &Arc<[VariableId]> {
        ensured(&self.variables, self.name())
    }

    fn read_row(&mut self, context: &QueryContext) -> EngineResult<Option<Row>> {
        if !self.state.begin_read(self.name()) {
            return Ok(None);
        }
        loop {
            let Some(row) = self.input.read_row(context)? else {
                return Ok(self.state.end_read(None));
            };
            if let Some(row) = self.extend(context, row) {
                let row = self.counter.number(row);
                return Ok(self.state.end_read(Some(row)));
            }
        }
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.state.reset(self.name());
        self.counter.reset();
        self.input.reset()
    }

    fn finish(&mut self) {
        if !self.state.is_finished() {
            self.input.finish();
            self.state = RowSourceState::Finished;
        }
    }
}
