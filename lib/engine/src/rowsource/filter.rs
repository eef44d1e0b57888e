use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::scope::ScopeId;
use crate::variables::VariableId;
use rasqal_common::EngineResult;
use rasqal_model::Expression;
use std::sync::Arc;

/// Keeps the rows for which the expression has the effective boolean value `true`.
#[derive(Debug)]
pub struct FilterRowSource {
    input: BoxedRowSource,
    expression: Expression,
    scope: Option<ScopeId>,
    variables: Option<Arc<[VariableId]>>,
    counter: RowCounter,
    state: RowSourceState,
}

impl FilterRowSource {
    pub fn new(input: BoxedRowSource, expression: Expression, scope: Option<ScopeId>) -> Self {
        Self {
            input,
            expression,
            scope,
            variables: None,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }
}

impl RowSource for FilterRowSource {
    fn name(&self) -> &'static str {
        "filter"
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
            let bindings = context.bindings(self.input.variables(), &row, self.scope);
            let keep = context
                .evaluator()
                .evaluate_boolean(&self.expression, &bindings)
                .unwrap_or(false);
            if keep {
                let row = self.counter.number(row);
                return Ok(self.state.end_read(Some(row)));
            }
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
