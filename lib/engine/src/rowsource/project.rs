use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::variables::{VariableId, VariableKind};
use rasqal_common::EngineResult;
use rasqal_model::Variable;
use std::sync::Arc;

/// Restricts rows to the projected variables, in projection order.
///
/// Projected variables that the input does not produce are unbound in every row.
#[derive(Debug)]
pub struct ProjectRowSource {
    input: BoxedRowSource,
    projection: Vec<Variable>,
    positions: Vec<Option<usize>>,
    variables: Option<Arc<[VariableId]>>,
    counter: RowCounter,
    state: RowSourceState,
}

impl ProjectRowSource {
    pub fn new(input: BoxedRowSource, projection: Vec<Variable>) -> Self {
        Self {
            input,
            projection,
            positions: Vec::new(),
            variables: None,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }
}

impl RowSource for ProjectRowSource {
    fn name(&self) -> &'static str {
        "project"
    }

    fn ensure_variables(&mut self, context: &mut QueryContext) -> EngineResult<()> {
        if !self.state.initialize(self.name()) {
            return Ok(());
        }
        self.input.ensure_variables(context)?;

        let mut variables = Vec::with_capacity(self.projection.len());
        for variable in &self.projection {
            let id = context
                .variables_mut()
                .add_variable(VariableKind::Normal, variable.as_str(), None)?;
            variables.push(id);
        }
        let input_variables = self.input.variables();
        self.positions = variables
            .iter()
            .map(|id| input_variables.iter().position(|v| v == id))
            .collect();
        self.variables = Some(variables.into());
        Ok(())
    }

    fn variables(&self) -> &Arc<[VariableId]> {
        ensured(&self.variables, self.name())
    }

    fn read_row(&mut self, context: &QueryContext) -> EngineResult<Option<Row>> {
        if !self.state.begin_read(self.name()) {
            return Ok(None);
        }
        let row = self.input.read_row(context)?.map(|row| {
            let projected = self
                .positions
                .iter()
                .map(|position| position.and_then(|p| row.get(p)).cloned())
                .collect();
            self.counter.number(projected)
        });
        Ok(self.state.end_read(row))
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
