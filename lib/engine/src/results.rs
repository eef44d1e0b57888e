use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::BoxedRowSource;
use itertools::Itertools;
use rasqal_common::EngineResult;
use rasqal_model::{Term, Variable};
use std::fmt;
use std::sync::Arc;

/// One result of a query: the values of the result variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    variables: Arc<[Variable]>,
    values: Vec<Option<Term>>,
}

impl Solution {
    /// The value of the variable called `name`, if it is bound.
    pub fn get(&self, name: &str) -> Option<&Term> {
        let position = self.variables.iter().position(|v| v.as_str() == name)?;
        self.values.get(position)?.as_ref()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn values(&self) -> &[Option<Term>] {
        &self.values
    }

    /// The bound variables and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.variables
            .iter()
            .zip(&self.values)
            .filter_map(|(variable, value)| Some((variable, value.as_ref()?)))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self
            .iter()
            .map(|(variable, value)| format!("{variable}={value}"));
        write!(f, "{}", bindings.format(" "))
    }
}

/// An iterator over the [`Solution`]s of a rowsource pipeline.
///
/// The pipeline is finished once it is exhausted, once it fails, or when the stream is dropped.
#[derive(Debug)]
pub struct SolutionStream {
    variables: Arc<[Variable]>,
    /// Wrapped in an Option for termination handling.
    source: Option<BoxedRowSource>,
    context: QueryContext,
}

impl SolutionStream {
    /// Ensures the variables of `source` and prepares it for reading.
    pub fn try_new(mut source: BoxedRowSource, mut context: QueryContext) -> EngineResult<Self> {
        source.ensure_variables(&mut context)?;
        let variables = context.variable_names(source.variables()).into();
        Ok(Self {
            variables,
            source: Some(source),
            context,
        })
    }

    /// The variables of the solutions.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// Reads the next row without converting it into a [`Solution`].
    pub fn next_row(&mut self) -> Option<EngineResult<Row>> {
        let source = self.source.as_mut()?;
        match source.read_row(&self.context) {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.close();
                None
            }
            Err(error) => {
                tracing::debug!(%error, "Rowsource pipeline failed");
                self.close();
                Some(Err(error))
            }
        }
    }

    fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.finish();
        }
    }
}

impl Iterator for SolutionStream {
    type Item = EngineResult<Solution>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.next_row()?;
        Some(row.map(|row| Solution {
            variables: Arc::clone(&self.variables),
            values: row.into_values(),
        }))
    }
}

impl Drop for SolutionStream {
    fn drop(&mut self) {
        self.close();
    }
}
