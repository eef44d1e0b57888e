use rasqal_engine::rowsource::{BoxedRowSource, ValuesRowSource};
use rasqal_engine::{EngineResult, QueryContext, Row, SolutionStream};
use rasqal_model::vocab::xsd;
use rasqal_model::{Expression, Function, Literal, NamedNodeRef, Term, Variable};

pub fn int(value: i64) -> Option<Term> {
    Some(Literal::from(value).into())
}

pub fn typed(value: &str, datatype: NamedNodeRef<'_>) -> Option<Term> {
    Some(Literal::new_typed_literal(value, datatype).into())
}

pub fn var(name: &str) -> Expression {
    Expression::Variable(Variable::new_unchecked(name))
}

pub fn lit(value: impl Into<Literal>) -> Expression {
    Expression::Literal(value.into())
}

pub fn call(function: Function, argument: Expression) -> Expression {
    Expression::FunctionCall(function, vec![argument])
}

/// Declares the variables called `names` and plays back `rows` over them.
pub fn values(
    context: &mut QueryContext,
    names: &[&str],
    rows: Vec<Vec<Option<Term>>>,
) -> EngineResult<BoxedRowSource> {
    let variables = names
        .iter()
        .map(|name| context.declare_variable(name))
        .collect::<EngineResult<Vec<_>>>()?;
    let rows = rows.into_iter().map(Row::new).collect();
    Ok(Box::new(ValuesRowSource::new(variables, rows)?))
}

/// Runs the pipeline and renders the solutions as a table. Unbound values are rendered as `-`.
pub fn render(source: BoxedRowSource, context: QueryContext) -> EngineResult<String> {
    let mut stream = SolutionStream::try_new(source, context)?;
    let mut lines = vec![
        stream
            .variables()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "),
    ];
    for solution in &mut stream {
        let line = solution?
            .values()
            .iter()
            .map(|value| value.as_ref().map_or_else(|| "-".to_owned(), compact))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

fn compact(term: &Term) -> String {
    match term {
        Term::Literal(literal)
            if [xsd::INTEGER, xsd::DECIMAL, xsd::DOUBLE, xsd::BOOLEAN]
                .contains(&literal.datatype()) =>
        {
            literal.value().to_owned()
        }
        _ => term.to_string(),
    }
}
