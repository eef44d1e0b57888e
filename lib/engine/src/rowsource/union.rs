use crate::compatibility::RowCompatibility;
use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::variables::VariableId;
use rasqal_common::EngineResult;
use std::sync::Arc;

/// Emits all rows of the left input followed by all rows of the right input.
///
/// The output variables are the left variables followed by the right variables that do not occur
/// on the left. Rows of both inputs are widened to them.
#[derive(Debug)]
pub struct UnionRowSource {
    left: BoxedRowSource,
    right: BoxedRowSource,
    alignment: Option<RowCompatibility>,
    variables: Option<Arc<[VariableId]>>,
    left_done: bool,
    counter: RowCounter,
    state: RowSourceState,
}

impl UnionRowSource {
    pub fn new(left: BoxedRowSource, right: BoxedRowSource) -> Self {
        Self {
            left,
            right,
            alignment: None,
            variables: None,
            left_done: false,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }

    fn next_row(&mut self, context: &QueryContext) -> EngineResult<Option<Row>> {
        let Some(alignment) = self.alignment.as_ref() else {
            panic!("{}: read_row() before ensure_variables()", self.name());
        };
        if !self.left_done {
            if let Some(row) = self.left.read_row(context)? {
                return Ok(Some(alignment.widen_left(&row)));
            }
            self.left_done = true;
        }
        Ok(self
            .right
            .read_row(context)?
            .map(|row| alignment.widen_right(&row)))
    }
}

impl RowSource for UnionRowSource {
    fn name(&self) -> &'static str {
        "union"
    }

    fn ensure_variables(&mut self, context: &mut QueryContext) -> EngineResult<()> {
        if self.state.initialize(self.name()) {
            self.left.ensure_variables(context)?;
            self.right.ensure_variables(context)?;
            let alignment = RowCompatibility::new(self.left.variables(), self.right.variables());
            self.variables = Some(Arc::clone(alignment.variables()));
            self.alignment = Some(alignment);
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
        self.left_done = false;
        self.left.reset()?;
        self.right.reset()
    }

    fn finish(&mut self) {
        if !self.state.is_finished() {
            self.left.finish();
            self.right.finish();
            self.state = RowSourceState::Finished;
        }
    }
}
