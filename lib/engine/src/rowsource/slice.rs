use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::variables::VariableId;
use rasqal_common::EngineResult;
use std::sync::Arc;

/// `OFFSET` and `LIMIT` over any input.
#[derive(Debug)]
pub struct SliceRowSource {
    input: BoxedRowSource,
    offset: usize,
    limit: Option<usize>,
    skipped: usize,
    emitted: usize,
    variables: Option<Arc<[VariableId]>>,
    counter: RowCounter,
    state: RowSourceState,
}

impl SliceRowSource {
    pub fn new(input: BoxedRowSource, offset: usize, limit: Option<usize>) -> Self {
        Self {
            input,
            offset,
            limit,
            skipped: 0,
            emitted: 0,
            variables: None,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }

    fn next_row(&mut self, context: &QueryContext) -> EngineResult<Option<Row>> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            return Ok(None);
        }
        while self.skipped < self.offset {
            if self.input.read_row(context)?.is_none() {
                return Ok(None);
            }
            self.skipped += 1;
        }
        let row = self.input.read_row(context)?;
        if row.is_some() {
            self.emitted += 1;
        }
        Ok(row)
    }
}

impl RowSource for SliceRowSource {
    fn name(&self) -> &'static str {
        "slice"
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
        let row = self.next_row(context)?.map(|row| self.counter.number(row));
        Ok(self.state.end_read(row))
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.state.reset(self.name());
        self.counter.reset();
        self.skipped = 0;
        self.emitted = 0;
        self.input.reset()
    }

    fn finish(&mut self) {
        if !self.state.is_finished() {
            self.input.finish();
            self.state = RowSourceState::Finished;
        }
    }
}
