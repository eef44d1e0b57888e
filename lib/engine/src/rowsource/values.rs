use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, RowCounter, RowSource, RowSourceState};
use crate::variables::VariableId;
use rasqal_common::{EngineError, EngineResult};
use std::ops::Range;
use std::sync::Arc;

/// Plays back a materialized table of rows, e.g. from a `VALUES` clause or injected bindings.
///
/// An optional limit and offset bound the played back range. The range is fixed when the
/// variables are ensured.
#[derive(Debug)]
pub struct ValuesRowSource {
    declared: Arc<[VariableId]>,
    rows: Vec<Row>,
    limit: Option<usize>,
    offset: usize,
    variables: Option<Arc<[VariableId]>>,
    range: Range<usize>,
    next: usize,
    counter: RowCounter,
    state: RowSourceState,
}

impl ValuesRowSource {
    /// Creates a rowsource for `rows` over `variables`.
    ///
    /// Every row must have one value per variable.
    pub fn new(variables: impl Into<Arc<[VariableId]>>, rows: Vec<Row>) -> EngineResult<Self> {
        let declared = variables.into();
        if let Some(row) = rows.iter().find(|row| row.len() != declared.len()) {
            return Err(EngineError::invalid_plan(format!(
                "VALUES row has {} values but {} variables are declared",
                row.len(),
                declared.len()
            )));
        }
        Ok(Self {
            declared,
            rows,
            limit: None,
            offset: 0,
            variables: None,
            range: 0..0,
            next: 0,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        })
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl RowSource for ValuesRowSource {
    fn name(&self) -> &'static str {
        "values"
    }

    fn ensure_variables(&mut self, _context: &mut QueryContext) -> EngineResult<()> {
        if !self.state.initialize(self.name()) {
            return Ok(());
        }

        let start = self.offset.min(self.rows.len());
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(self.rows.len()),
            None => self.rows.len(),
        };
        self.range = start..end;
        self.next = start;
        self.variables = Some(Arc::clone(&self.declared));
        tracing::debug!(
            rows = self.rows.len(),
            start,
            end,
            "Ensured variables of VALUES"
        );
        Ok(())
    }

    fn variables(&self) -> &Arc<[VariableId]> {
        ensured(&self.variables, self.name())
    }

    fn read_row(&mut self, _context: &QueryContext) -> EngineResult<Option<Row>> {
        if !self.state.begin_read(self.name()) {
            return Ok(None);
        }
        let row = if self.range.contains(&self.next) {
            let row = self.rows[self.next].clone();
            self.next += 1;
            Some(self.counter.number(row))
        } else {
            None
        };
        Ok(self.state.end_read(row))
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.state.reset(self.name());
        self.next = self.range.start;
        self.counter.reset();
        Ok(())
    }

    fn finish(&mut self) {
        self.rows = Vec::new();
        self.state = RowSourceState::Finished;
    }
}
