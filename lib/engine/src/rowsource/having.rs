//! HAVING operator, filters grouped rows by a conjunction of conditions.
//!
//! A row is kept if every condition has the effective boolean value `true`. A condition that
//! cannot be evaluated counts as `false` for this row only.

use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::scope::ScopeId;
use crate::variables::VariableId;
use rasqal_common::EngineResult;
use rasqal_model::Expression;
use std::sync::Arc;

#[derive(Debug)]
pub struct HavingRowSource {
    input: BoxedRowSource,
    conditions: Vec<Expression>,
    scope: Option<ScopeId>,
    variables: Option<Arc<[VariableId]>>,
    counter: RowCounter,
    state: RowSourceState,
}

impl HavingRowSource {
    pub fn new(input: BoxedRowSource, conditions: Vec<Expression>, scope: Option<ScopeId>) -> Self {
        Self {
            input,
            conditions,
            scope,
            variables: None,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }

    fn accepts(&self, context: &QueryContext, row: &Row) -> bool {
        let bindings = context.bindings(self.input.variables(), row, self.scope);
        self.conditions.iter().all(|condition| {
            context
                .evaluator()
                .evaluate_boolean(condition, &bindings)
                .unwrap_or(false)
        })
    }
}

impl RowSource for HavingRowSource {
    fn name(&self) -> &'static str {
        "having"
    }

    fn ensure_variables(&mut self, context: &mut QueryContext) -> EngineResult<()> {
        if self.state.initialize(self.name()) {
            self.input.ensure_variables(context)?;
            self.variables = Some(Arc::clone(self.input.variables()));
        }
        Ok(())
    }

    fn variables(&self) -> &Arc<[VariableId]> {
        ensured(&self.variables, self.name())
    }

    fn read_row(&mut self, context: &QueryContext) -> EngineResult<Option<Row>> {
        if !self.state.begin_read(self.name()) {
            return Ok(None);
        }
        while let Some(row) = self.input.read_row(context)? {
            if self.accepts(context, &row) {
                let row = self.counter.number(row);
                return Ok(self.state.end_read(Some(row)));
            }
            tracing::trace!(offset = row.offset(), "HAVING rejected row");
        }
        Ok(self.state.end_read(None))
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
