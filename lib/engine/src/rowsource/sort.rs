use crate::context::QueryContext;
use crate::row::Row;
use crate::rowsource::{ensured, BoxedRowSource, RowCounter, RowSource, RowSourceState};
use crate::scope::ScopeId;
use crate::variables::VariableId;
use rasqal_common::EngineResult;
use rasqal_model::{Expression, Literal, Numeric, OrderExpression, Term, TypedValueRef};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::Arc;

/// Orders the rows of its input by a list of `ORDER BY` conditions.
///
/// The input is materialized on the first read. Rows with equal keys keep their input order.
#[derive(Debug)]
pub struct SortRowSource {
    input: BoxedRowSource,
    conditions: Vec<OrderExpression>,
    scope: Option<ScopeId>,
    sorted: Option<VecDeque<Row>>,
    variables: Option<Arc<[VariableId]>>,
    counter: RowCounter,
    state: RowSourceState,
}

impl SortRowSource {
    pub fn new(
        input: BoxedRowSource,
        conditions: Vec<OrderExpression>,
        scope: Option<ScopeId>,
    ) -> Self {
        Self {
            input,
            conditions,
            scope,
            sorted: None,
            variables: None,
            counter: RowCounter::default(),
            state: RowSourceState::default(),
        }
    }

    fn sort(&mut self, context: &QueryContext) -> EngineResult<VecDeque<Row>> {
        let rows = self.input.read_all_rows(context)?;
        let input_variables = self.input.variables();
        let mut keyed = rows
            .into_iter()
            .map(|row| {
                let bindings = context.bindings(input_variables, &row, self.scope);
                let keys = self
                    .conditions
                    .iter()
                    .map(|condition| {
                        context
                            .evaluator()
                            .evaluate(order_expression(condition), &bindings)
                            .ok()
                    })
                    .collect::<Vec<_>>();
                (keys, row)
            })
            .collect::<Vec<_>>();

        keyed.sort_by(|(lhs, _), (rhs, _)| {
            self.conditions
                .iter()
                .zip(lhs.iter().zip(rhs))
                .map(|(condition, (lhs, rhs))| {
                    let ordering = compare_order_terms(lhs.as_ref(), rhs.as_ref());
                    match condition {
                        OrderExpression::Asc(_) => ordering,
                        OrderExpression::Desc(_) => ordering.reverse(),
                    }
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        tracing::debug!(rows = keyed.len(), "Sorted input of ORDER BY");
        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }
}

fn order_expression(condition: &OrderExpression) -> &Expression {
    match condition {
        OrderExpression::Asc(expression) | OrderExpression::Desc(expression) => expression,
    }
}

/// The total order used by `ORDER BY`.
///
/// Unbound values come first, followed by blank nodes, IRIs and literals. Literals are grouped
/// into numerics, dateTimes, dates, booleans, strings and other literals, in that order, and are
/// only compared by value within their group. dateTime and date values are ordered by their
/// instant, placing values without timezone as if they were UTC. This agrees with the value order
/// whenever two values are comparable.
pub fn compare_order_terms(lhs: Option<&Term>, rhs: Option<&Term>) -> Ordering {
    match (lhs, rhs) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(lhs), Some(rhs)) => rank(lhs).cmp(&rank(rhs)).then_with(|| match (lhs, rhs) {
            (Term::BlankNode(lhs), Term::BlankNode(rhs)) => lhs.as_str().cmp(rhs.as_str()),
            (Term::NamedNode(lhs), Term::NamedNode(rhs)) => lhs.as_str().cmp(rhs.as_str()),
            (Term::Literal(lhs), Term::Literal(rhs)) => compare_literals(lhs, rhs),
            _ => Ordering::Equal,
        }),
    }
}

fn rank(term: &Term) -> u8 {
    match term {
        Term::BlankNode(_) => 0,
        Term::NamedNode(_) => 1,
        Term::Literal(_) => 2,
        #[allow(
            unreachable_patterns,
            reason = "Quoted triples only exist if the rdf-star feature is enabled"
        )]
        _ => 3,
    }
}

fn literal_rank(value: &TypedValueRef<'_>) -> u8 {
    match value {
        TypedValueRef::Numeric(_) => 0,
        TypedValueRef::DateTime(_) => 1,
        TypedValueRef::Date(_) => 2,
        TypedValueRef::Boolean(_) => 3,
        TypedValueRef::SimpleLiteral(_) | TypedValueRef::LanguageString { .. } => 4,
        TypedValueRef::OtherLiteral(_)
        | TypedValueRef::NamedNode(_)
        | TypedValueRef::BlankNode(_) => 5,
    }
}

fn compare_literals(lhs: &Literal, rhs: &Literal) -> Ordering {
    let lhs_value = TypedValueRef::from_literal(lhs.as_ref());
    let rhs_value = TypedValueRef::from_literal(rhs.as_ref());
    literal_rank(&lhs_value)
        .cmp(&literal_rank(&rhs_value))
        .then_with(|| match (lhs_value, rhs_value) {
            (TypedValueRef::Numeric(lhs), TypedValueRef::Numeric(rhs)) => {
                compare_numerics(lhs, rhs)
            }
            (TypedValueRef::DateTime(lhs), TypedValueRef::DateTime(rhs)) => {
                (lhs.timeline_position(), lhs.timezone().is_present())
                    .cmp(&(rhs.timeline_position(), rhs.timezone().is_present()))
            }
            (TypedValueRef::Date(lhs), TypedValueRef::Date(rhs)) => {
                (lhs.timeline_position(), lhs.timezone().is_present())
                    .cmp(&(rhs.timeline_position(), rhs.timezone().is_present()))
            }
            (TypedValueRef::Boolean(lhs), TypedValueRef::Boolean(rhs)) => lhs.cmp(&rhs),
            _ => Ordering::Equal,
        })
        .then_with(|| {
            lhs.value()
                .cmp(rhs.value())
                .then_with(|| lhs.datatype().as_str().cmp(rhs.datatype().as_str()))
                .then_with(|| lhs.language().cmp(&rhs.language()))
        })
}

/// NaN is placed after all other numerics.
fn compare_numerics(lhs: Numeric, rhs: Numeric) -> Ordering {
    match (lhs.is_nan(), rhs.is_nan()) {
        (false, false) => lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal),
        (lhs, rhs) => lhs.cmp(&rhs),
    }
}

impl RowSource for SortRowSource {
    fn name(&self) -> &'static str {
        "sort"
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
        let mut sorted = match self.sorted.take() {
            Some(sorted) => sorted,
            None => self.sort(context)?,
        };
        let row = sorted.pop_front().map(|row| self.counter.number(row));
        self.sorted = Some(sorted);
        Ok(self.state.end_read(row))
    }

    fn reset(&mut self) -> EngineResult<()> {
        self.state.reset(self.name());
        self.counter.reset();
        self.sorted = None;
        self.input.reset()
    }

    fn finish(&mut self) {
        if !self.state.is_finished() {
            self.input.finish();
            self.sorted = None;
            self.state = RowSourceState::Finished;
        }
    }
}
