use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::variables::VariableId;
use rasqal_common::EngineResult;
use rasqal_model::Term;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Drops rows whose values have already been emitted.
#[derive(Debug)]
pub struct DistinctRowSource {
    input: BoxedRowSource,
    seen: FxHashSet<Vec<Option<Term>>>,
    variables: Option<Arc<[VariableId]>>,
    counter: RowCounter,
    state: RowSourceState,
}

impl DistinctRowSource {
    pub fn new(input: BoxedRowSource) -> Self {
        Self {
            input,
            seen: FxHashSet::default(),
            variables: None,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }
}

impl RowSource for DistinctRowSource {
    fn name(&self) -> &'static str {
        "distinct"
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
            if self.seen.insert(row.values().to_vec()) {
                let row = self.counter.number(row);
                return Ok(self.state.end_read(Some(row)));
            }
        }
        Ok(self.state.end_read(None))
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.state.reset(self.name());
        self.counter.reset();
        self.seen.clear();
        self.input.reset()
    }

    fn finish(&mut self) {
        if !self.state.is_finished() {
            self.input.finish();
            self.seen = FxHashSet::default();
            self.state = RowSourceState::Finished;
        }
    }
}
