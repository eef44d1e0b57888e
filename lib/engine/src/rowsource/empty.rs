use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, RowSource, RowSourceState};
use crate::variables::VariableId;
use rasqal_common::EngineResult;
use std::sync::Arc;

/// Produces a single row without any variables.
///
/// This is the neutral element of joins and the input of group patterns without triple patterns.
#[derive(Debug, Default)]
pub struct EmptyRowSource {
    variables: Option<Arc<[VariableId]>>,
    state: RowSourceState,
}

impl EmptyRowSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowSource for EmptyRowSource {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn ensure_variables(&mut self, _context: &mut QueryContext) -> EngineResult<()> {
        if self.state.initialize(self.name()) {
            self.variables = Some(Arc::from([]));
        }
        Ok(())
    }

    fn variables(&self) -> &Arc<[VariableId]> {
        ensured(&self.variables, self.name())
    }

    fn read_row(&mut self, _context: &QueryContext) -> EngineResult<Option<Row>> {
        if !self.state.begin_read(self.name()) {
            return Ok(None);
        }
        let row = match self.state {
            RowSourceState::Initialized => Some(Row::default()),
            _ => None,
        };
        Ok(self.state.end_read(row))
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.state.reset(self.name());
        Ok(())
    }

    fn finish(&mut self) {
        self.state = RowSourceState::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yields_one_row() {
        let mut context = QueryContext::new();
        let mut source = EmptyRowSource::new();
        source.ensure_variables(&mut context).unwrap();

        assert!(source.variables().is_empty());
        assert_eq!(source.read_row(&context).unwrap(), Some(Row::default()));
        assert_eq!(source.read_row(&context).unwrap(), None);
        assert_eq!(source.read_row(&context).unwrap(), None);

        source.reset().unwrap();
        let rows = source.read_all_rows(&context).unwrap();
        assert_eq!(rows, vec![Row::default()]);
    }
}
