use crate::compatibility::RowCompatibility;
use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::scope::ScopeId;
use crate::variables::VariableId;
use rasqal_common::{CompatibilityPolicy, EngineResult};
use rasqal_model::Expression;
use std::sync::Arc;

/// Which left rows a [`JoinRowSource`] emits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// Only left rows with at least one matching right row.
    #[default]
    Inner,
    /// All left rows. Rows without a match are emitted with the right variables unbound
    /// (`OPTIONAL`).
    Left,
}

/// Nested-loop join of two rowsources.
///
/// The right input is reset and read again for every left row. Two rows match if they are
/// compatible and the optional filter expression holds for the merged row.
#[derive(Debug)]
pub struct JoinRowSource {
    left: BoxedRowSource,
    right: BoxedRowSource,
    kind: JoinKind,
    filter: Option<Expression>,
    scope: Option<ScopeId>,
    compatibility: Option<RowCompatibility>,
    variables: Option<Arc<[VariableId]>>,
    current: Option<Row>,
    matched: bool,
    counter: RowCounter,
    state: RowSourceState,
}

impl JoinRowSource {
    pub fn new(left: BoxedRowSource, right: BoxedRowSource, kind: JoinKind) -> Self {
        Self {
            left,
            right,
            kind,
            filter: None,
            scope: None,
            compatibility: None,
            variables: None,
            current: None,
            matched: false,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }

    /// Adds a condition that must hold for the merged rows (the filter of an `OPTIONAL`).
    #[must_use]
    pub fn with_filter(mut self, filter: Expression, scope: Option<ScopeId>) -> Self {
        self.filter = Some(filter);
        self.scope = scope;
        self
    }

    fn next_row(&mut self, context: &QueryContext) -> EngineResult<Option<Row>> {
        let Some(compatibility) = self.compatibility.as_ref() else {
            panic!("{}: read_row() before ensure_variables()", self.name());
        };

        loop {
            let left = match self.current.take() {
                Some(left) => left,
                None => {
                    let Some(left) = self.left.read_row(context)? else {
                        return Ok(None);
                    };
                    self.right.reset()?;
                    self.matched = false;
                    left
                }
            };

            while let Some(right) = self.right.read_row(context)? {
                if !compatibility.is_compatible(&left, &right, CompatibilityPolicy::Join) {
                    continue;
                }
                let merged = compatibility.merge(&left, &right);
                if let Some(filter) = &self.filter {
                    let bindings = context.bindings(compatibility.variables(), &merged, self.scope);
                    let accepted = context
                        .evaluator()
                        .evaluate_boolean(filter, &bindings)
                        .unwrap_or(false);
                    if !accepted {
                        continue;
                    }
                }
                self.matched = true;
                self.current = Some(left);
                return Ok(Some(merged));
            }

            if self.kind == JoinKind::Left && !self.matched {
                return Ok(Some(compatibility.widen_left(&left)));
            }
        }
    }
}

impl RowSource for JoinRowSource {
    fn name(&self) -> &'static str {
        "join"
    }

    fn ensure_variables(&mut self, context: &mut QueryContext) -> EngineResult<()> {
        if self.state.initialize(self.name()) {
            self.left.ensure_variables(context)?;
            self.right.ensure_variables(context)?;
            let compatibility =
                RowCompatibility::new(self.left.variables(), self.right.variables());
            tracing::debug!(
                kind = ?self.kind,
                shared = compatibility.shared_count(),
                "Ensured variables of JOIN"
            );
            self.variables = Some(Arc::clone(compatibility.variables()));
            self.compatibility = Some(compatibility);
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
        self.current = None;
        self.matched = false;
        self.left.reset()?;
        self.right.reset()
    }

    fn finish(&mut self) {
        if !self.state.is_finished() {
            self.left.finish();
            self.right.finish();
            self.current = None;
            self.state = RowSourceState::Finished;
        }
    }
}
