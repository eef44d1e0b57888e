//! MINUS operator, the set difference of two rowsources by compatibility.
//!
//! All rows of the right input are materialized on the first read. A left row is emitted if no
//! right row is compatible with it under the configured [`CompatibilityPolicy`]. With the
//! default MINUS policy, rows over disjoint variables never remove each other.
//!
//! The check is a nested loop over the cached right rows.

use crate::compatibility::RowCompatibility;
use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::variables::VariableId;
use rasqal_common::{CompatibilityPolicy, EngineResult};
use std::sync::Arc;

#[derive(Debug)]
pub struct MinusRowSource {
    left: BoxedRowSource,
    right: BoxedRowSource,
    compatibility: Option<RowCompatibility>,
    right_rows: Option<Vec<Row>>,
    counter: RowCounter,
    state: RowSourceState,
}

impl MinusRowSource {
    pub fn new(left: BoxedRowSource, right: BoxedRowSource) -> Self {
        Self {
            left,
            right,
            compatibility: None,
            right_rows: None,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }

    fn compatibility(&self) -> &RowCompatibility {
        match &self.compatibility {
            Some(compatibility) => compatibility,
            None => panic!(
                "{}: compatibility map before ensure_variables()",
                self.name()
            ),
        }
    }

    fn is_removed(&self, row: &Row, right_rows: &[Row], policy: CompatibilityPolicy) -> bool {
        let compatibility = self.compatibility();
        if policy == CompatibilityPolicy::Minus && compatibility.shared_count() == 0 {
            return false;
        }
        right_rows
            .iter()
            .any(|right| compatibility.is_compatible(row, right, policy))
    }
}

impl RowSource for MinusRowSource {
    fn name(&self) -> &'static str {
        "minus"
    }

    fn ensure_variables(&mut self, context: &mut QueryContext) -> EngineResult<()> {
        if self.state.initialize(self.name()) {
            self.left.ensure_variables(context)?;
            self.right.ensure_variables(context)?;
            let compatibility =
                RowCompatibility::new(self.left.variables(), self.right.variables());
            tracing::debug!(
                shared = compatibility.shared_count(),
                "Ensured variables of MINUS"
            );
            self.compatibility = Some(compatibility);
        }
        Ok(())
    }

    fn variables(&self) -> &Arc<[VariableId]> {
        if self.compatibility.is_none() {
            panic!("{}: variables() before ensure_variables()", self.name());
        }
        self.left.variables()
    }

    fn read_row(&mut self, context: &QueryContext) -> EngineResult<Option<Row>> {
        if !self.state.begin_read(self.name()) {
            return Ok(None);
        }

        let right_rows = match self.right_rows.take() {
            Some(rows) => rows,
            None => {
                let rows = self.right.read_all_rows(context)?;
                tracing::debug!(rows = rows.len(), "Materialized right side of MINUS");
                rows
            }
        };

        let policy = context.options().minus_policy;
        let mut result = None;
        while let Some(row) = self.left.read_row(context)? {
            if self.is_removed(&row, &right_rows, policy) {
                tracing::trace!(offset = row.offset(), "MINUS removed row");
                continue;
            }
            result = Some(self.counter.number(row));
            break;
        }
        self.right_rows = Some(right_rows);
        Ok(self.state.end_read(result))
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.state.reset(self.name());
        self.counter.reset();
        self.right_rows = None;
        self.left.reset()?;
        self.right.reset()
    }

    fn finish(&mut self) {
        if !self.state.is_finished() {
            self.left.finish();
            self.right.finish();
            self.right_rows = None;
            self.state = RowSourceState::Finished;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rowsource::ValuesRowSource;
    use rasqal_common::ExecutionOptions;
    use rasqal_model::{Literal, Term};

    fn int(value: i64) -> Option<Term> {
        Some(Literal::from(value).into())
    }

    fn values(
        context: &mut QueryContext,
        names: &[&str],
        rows: Vec<Vec<Option<Term>>>,
    ) -> BoxedRowSource {
        let variables = names
            .iter()
            .map(|name| context.declare_variable(name).unwrap())
            .collect::<Vec<_>>();
        let rows = rows.into_iter().map(Row::new).collect();
        Box::new(ValuesRowSource::new(variables, rows).unwrap())
    }

    #[test]
    fn test_removes_compatible_rows() {
        let mut context = QueryContext::new();
        let left = values(
            &mut context,
            &["a", "b"],
            vec![
                vec![int(1), int(2)],
                vec![int(3), int(4)],
                vec![int(5), None],
            ],
        );
        let right = values(&mut context, &["a"], vec![vec![int(3)], vec![int(5)]]);
        let mut minus = MinusRowSource::new(left, right);
        minus.ensure_variables(&mut context).unwrap();

        let rows = minus.read_all_rows(&context).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values(), &[int(1), int(2)]);
    }

    #[test]
    fn test_disjoint_domains_keep_all_rows() {
        for (policy, expected) in [
            (CompatibilityPolicy::Minus, 2),
            (CompatibilityPolicy::Join, 0),
        ] {
            let mut context = QueryContext::new()
                .with_options(ExecutionOptions::default().with_minus_policy(policy));
            let left = values(&mut context, &["a"], vec![vec![int(1)], vec![int(2)]]);
            let right = values(&mut context, &["b"], vec![vec![int(1)]]);
            let mut minus = MinusRowSource::new(left, right);
            minus.ensure_variables(&mut context).unwrap();
            assert_eq!(minus.read_all_rows(&context).unwrap().len(), expected);
        }
    }

    #[test]
    fn test_reset_reads_again() {
        let mut context = QueryContext::new();
        let left = values(&mut context, &["a"], vec![vec![int(1)], vec![int(2)]]);
        let right = values(&mut context, &["a"], vec![vec![int(2)]]);
        let mut minus = MinusRowSource::new(left, right);
        minus.ensure_variables(&mut context).unwrap();

        assert_eq!(minus.read_all_rows(&context).unwrap().len(), 1);
        assert_eq!(minus.read_row(&context).unwrap(), None);
        minus.reset().unwrap();
        assert_eq!(minus.read_all_rows(&context).unwrap().len(), 1);
    }
}
