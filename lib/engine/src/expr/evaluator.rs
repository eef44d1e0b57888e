use crate::expr::Bindings;
use rasqal_model::vocab::xsd;
use rasqal_model::{
    Expression, Function, Literal, Numeric, Term, TermRef, ThinError, ThinResult, TypedValueRef,
};
use std::cmp::Ordering;
use std::fmt;

/// Evaluates SPARQL expressions.
///
/// A failed evaluation is an *expected* error. The operator that evaluates the expression
/// decides what happens to the affected row.
pub trait ExpressionEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates `expression` against `bindings`.
    fn evaluate(&self, expression: &Expression, bindings: &dyn Bindings) -> ThinResult<Term>;

    /// Evaluates `expression` and returns its effective boolean value.
    fn evaluate_boolean(
        &self,
        expression: &Expression,
        bindings: &dyn Bindings,
    ) -> ThinResult<bool> {
        let term = self.evaluate(expression, bindings)?;
        effective_boolean_value(term.as_ref())
    }
}

/// [Effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv) of a term.
pub fn effective_boolean_value(term: TermRef<'_>) -> ThinResult<bool> {
    TypedValueRef::from_term(term)?.effective_boolean_value()
}

/// The default evaluator for SPARQL expressions.
///
/// Supports the logical, comparison and arithmetic operators, `BOUND`, `IF`, `COALESCE`, `IN`,
/// the term accessors and the dateTime accessors. Everything else, including `EXISTS`, evaluates
/// to an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct SparqlExpressionEvaluator;

impl ExpressionEvaluator for SparqlExpressionEvaluator {
    fn evaluate(&self, expression: &Expression, bindings: &dyn Bindings) -> ThinResult<Term> {
        match expression {
            Expression::NamedNode(node) => Ok(node.clone().into()),
            Expression::Literal(literal) => Ok(literal.clone().into()),
            Expression::Variable(variable) => bindings
                .value(variable.as_str())
                .cloned()
                .ok_or(ThinError::default()),
            Expression::Bound(variable) => Ok(boolean(bindings.value(variable.as_str()).is_some())),
            Expression::Or(lhs, rhs) => self.or(lhs, rhs, bindings).map(boolean),
            Expression::And(lhs, rhs) => self.and(lhs, rhs, bindings).map(boolean),
            Expression::Not(inner) => Ok(boolean(!self.evaluate_boolean(inner, bindings)?)),
            Expression::Equal(lhs, rhs) => {
                let lhs = self.evaluate(lhs, bindings)?;
                let rhs = self.evaluate(rhs, bindings)?;
                value_eq(&lhs, &rhs).map(boolean)
            }
            Expression::SameTerm(lhs, rhs) => {
                let lhs = self.evaluate(lhs, bindings)?;
                let rhs = self.evaluate(rhs, bindings)?;
                Ok(boolean(lhs == rhs))
            }
            Expression::Greater(lhs, rhs) => self
                .compare(lhs, rhs, bindings)
                .map(|ordering| boolean(ordering.is_gt())),
            Expression::GreaterOrEqual(lhs, rhs) => self
                .compare(lhs, rhs, bindings)
                .map(|ordering| boolean(ordering.is_ge())),
            Expression::Less(lhs, rhs) => self
                .compare(lhs, rhs, bindings)
                .map(|ordering| boolean(ordering.is_lt())),
            Expression::LessOrEqual(lhs, rhs) => self
                .compare(lhs, rhs, bindings)
                .map(|ordering| boolean(ordering.is_le())),
            Expression::In(needle, haystack) => self.in_list(needle, haystack, bindings),
            Expression::Add(lhs, rhs) => self.arithmetic(lhs, rhs, bindings, Numeric::checked_add),
            Expression::Subtract(lhs, rhs) => {
                self.arithmetic(lhs, rhs, bindings, Numeric::checked_sub)
            }
            Expression::Multiply(lhs, rhs) => {
                self.arithmetic(lhs, rhs, bindings, Numeric::checked_mul)
            }
            Expression::Divide(lhs, rhs) => {
                self.arithmetic(lhs, rhs, bindings, Numeric::checked_div)
            }
            Expression::UnaryPlus(inner) => {
                let value = numeric(&self.evaluate(inner, bindings)?)?;
                Ok(value.to_literal().into())
            }
            Expression::UnaryMinus(inner) => {
                let value = numeric(&self.evaluate(inner, bindings)?)?;
                Ok(value.checked_neg()?.to_literal().into())
            }
            Expression::If(test, if_true, if_false) => {
                if self.evaluate_boolean(test, bindings)? {
                    self.evaluate(if_true, bindings)
                } else {
                    self.evaluate(if_false, bindings)
                }
            }
            Expression::Coalesce(args) => args
                .iter()
                .find_map(|arg| self.evaluate(arg, bindings).ok())
                .ok_or(ThinError::default()),
            Expression::FunctionCall(function, args) => {
                self.call_function(function, args, bindings)
            }
            Expression::Exists(_) => ThinError::expected(),
        }
    }
}

impl SparqlExpressionEvaluator {
    /// SPARQL's logical-or with its error semantics: an error is only hidden if the other
    /// operand is true.
    fn or(&self, lhs: &Expression, rhs: &Expression, bindings: &dyn Bindings) -> ThinResult<bool> {
        match self.evaluate_boolean(lhs, bindings) {
            Ok(true) => Ok(true),
            Ok(false) => self.evaluate_boolean(rhs, bindings),
            Err(error) => match self.evaluate_boolean(rhs, bindings) {
                Ok(true) => Ok(true),
                _ => Err(error),
            },
        }
    }

    /// SPARQL's logical-and with its error semantics: an error is only hidden if the other
    /// operand is false.
    fn and(&self, lhs: &Expression, rhs: &Expression, bindings: &dyn Bindings) -> ThinResult<bool> {
        match self.evaluate_boolean(lhs, bindings) {
            Ok(true) => self.evaluate_boolean(rhs, bindings),
            Ok(false) => Ok(false),
            Err(error) => match self.evaluate_boolean(rhs, bindings) {
                Ok(false) => Ok(false),
                _ => Err(error),
            },
        }
    }

    fn compare(
        &self,
        lhs: &Expression,
        rhs: &Expression,
        bindings: &dyn Bindings,
    ) -> ThinResult<Ordering> {
        let lhs = self.evaluate(lhs, bindings)?;
        let rhs = self.evaluate(rhs, bindings)?;
        TypedValueRef::from_term(lhs.as_ref())?
            .partial_cmp_values(&TypedValueRef::from_term(rhs.as_ref())?)
            .ok_or(ThinError::default())
    }

    fn in_list(
        &self,
        needle: &Expression,
        haystack: &[Expression],
        bindings: &dyn Bindings,
    ) -> ThinResult<Term> {
        let needle = self.evaluate(needle, bindings)?;
        let mut error = None;
        for candidate in haystack {
            match self
                .evaluate(candidate, bindings)
                .and_then(|candidate| value_eq(&needle, &candidate))
            {
                Ok(true) => return Ok(boolean(true)),
                Ok(false) => {}
                Err(e) => error = Some(e),
            }
        }
        match error {
            Some(error) => Err(error),
            None => Ok(boolean(false)),
        }
    }

    fn arithmetic(
        &self,
        lhs: &Expression,
        rhs: &Expression,
        bindings: &dyn Bindings,
        operation: impl Fn(Numeric, Numeric) -> ThinResult<Numeric>,
    ) -> ThinResult<Term> {
        let lhs = numeric(&self.evaluate(lhs, bindings)?)?;
        let rhs = numeric(&self.evaluate(rhs, bindings)?)?;
        Ok(operation(lhs, rhs)?.to_literal().into())
    }

    fn call_function(
        &self,
        function: &Function,
        args: &[Expression],
        bindings: &dyn Bindings,
    ) -> ThinResult<Term> {
        let args = args
            .iter()
            .map(|arg| self.evaluate(arg, bindings))
            .collect::<ThinResult<Vec<_>>>()?;
        match function {
            Function::Str => string_value(unary(&args)?),
            Function::Lang => match unary(&args)? {
                Term::Literal(literal) => Ok(simple(literal.language().unwrap_or_default())),
                _ => ThinError::expected(),
            },
            Function::Datatype => match unary(&args)? {
                Term::Literal(literal) => Ok(literal.datatype().into_owned().into()),
                _ => ThinError::expected(),
            },
            Function::IsIri => Ok(boolean(matches!(unary(&args)?, Term::NamedNode(_)))),
            Function::IsBlank => Ok(boolean(matches!(unary(&args)?, Term::BlankNode(_)))),
            Function::IsLiteral => Ok(boolean(matches!(unary(&args)?, Term::Literal(_)))),
            Function::IsNumeric => Ok(boolean(matches!(
                TypedValueRef::from_term(unary(&args)?.as_ref())?,
                TypedValueRef::Numeric(_)
            ))),
            Function::StrLen => {
                let (value, _) = string_argument(unary(&args)?)?;
                let length = i64::try_from(value.chars().count())?;
                Ok(Literal::from(length).into())
            }
            Function::UCase => map_string(unary(&args)?, str::to_uppercase),
            Function::LCase => map_string(unary(&args)?, str::to_lowercase),
            Function::Year => temporal(unary(&args)?, |value| match value {
                Temporal::DateTime(value) => Ok(integer(value.year())),
                Temporal::Date(value) => Ok(integer(value.year())),
            }),
            Function::Month => temporal(unary(&args)?, |value| match value {
                Temporal::DateTime(value) => Ok(integer(value.month().into())),
                Temporal::Date(value) => Ok(integer(value.month().into())),
            }),
            Function::Day => temporal(unary(&args)?, |value| match value {
                Temporal::DateTime(value) => Ok(integer(value.day().into())),
                Temporal::Date(value) => Ok(integer(value.day().into())),
            }),
            Function::Hours => date_time(unary(&args)?, |value| integer(value.hour().into())),
            Function::Minutes => date_time(unary(&args)?, |value| integer(value.minute().into())),
            Function::Seconds => date_time(unary(&args)?, |value| {
                Literal::new_typed_literal(value.seconds_decimal(), xsd::DECIMAL).into()
            }),
            Function::Timezone => temporal(unary(&args)?, |value| {
                let duration = match value {
                    Temporal::DateTime(value) => value.timezone_duration(),
                    Temporal::Date(value) => value.timezone_duration(),
                };
                duration
                    .map(|duration| {
                        Literal::new_typed_literal(duration, xsd::DAY_TIME_DURATION).into()
                    })
                    .ok_or(ThinError::default())
            }),
            Function::Tz => temporal(unary(&args)?, |value| {
                Ok(simple(&match value {
                    Temporal::DateTime(value) => value.tz(),
                    Temporal::Date(value) => value.tz(),
                }))
            }),
            _ => ThinError::expected(),
        }
    }
}

fn boolean(value: bool) -> Term {
    Literal::from(value).into()
}

fn integer(value: i64) -> Term {
    Literal::from(value).into()
}

fn simple(value: &str) -> Term {
    Literal::new_simple_literal(value).into()
}

fn value_eq(lhs: &Term, rhs: &Term) -> ThinResult<bool> {
    let lhs = TypedValueRef::from_term(lhs.as_ref())?;
    let rhs = TypedValueRef::from_term(rhs.as_ref())?;
    lhs.value_eq(&rhs)
}

fn numeric(term: &Term) -> ThinResult<Numeric> {
    match term {
        Term::Literal(literal) => Numeric::from_literal(literal.as_ref()),
        _ => ThinError::expected(),
    }
}

fn unary(args: &[Term]) -> ThinResult<&Term> {
    match args {
        [arg] => Ok(arg),
        _ => ThinError::expected(),
    }
}

fn string_value(term: &Term) -> ThinResult<Term> {
    match term {
        Term::NamedNode(node) => Ok(simple(node.as_str())),
        Term::Literal(literal) => Ok(simple(literal.value())),
        _ => ThinError::expected(),
    }
}

/// Returns the lexical form and language of a string literal.
fn string_argument(term: &Term) -> ThinResult<(&str, Option<&str>)> {
    match term {
        Term::Literal(literal)
            if literal.datatype() == xsd::STRING || literal.language().is_some() =>
        {
            Ok((literal.value(), literal.language()))
        }
        _ => ThinError::expected(),
    }
}

fn map_string(term: &Term, map: impl Fn(&str) -> String) -> ThinResult<Term> {
    let (value, language) = string_argument(term)?;
    let value = map(value);
    Ok(match language {
        Some(language) => {
            Literal::new_language_tagged_literal_unchecked(value, language.to_owned()).into()
        }
        None => Literal::new_simple_literal(value).into(),
    })
}

enum Temporal {
    DateTime(rasqal_model::DateTime),
    Date(rasqal_model::Date),
}

fn temporal(term: &Term, map: impl Fn(Temporal) -> ThinResult<Term>) -> ThinResult<Term> {
    let Term::Literal(literal) = term else {
        return ThinError::expected();
    };
    match TypedValueRef::from_literal(literal.as_ref()) {
        TypedValueRef::DateTime(value) => map(Temporal::DateTime(value)),
        TypedValueRef::Date(value) => map(Temporal::Date(value)),
        _ => ThinError::expected(),
    }
}

fn date_time(term: &Term, map: impl Fn(rasqal_model::DateTime) -> Term) -> ThinResult<Term> {
    temporal(term, |value| match value {
        Temporal::DateTime(value) => Ok(map(value)),
        Temporal::Date(_) => ThinError::expected(),
    })
}
