use crate::test_utils::{call, int, lit, render, typed, values, var};
use rasqal_engine::rowsource::{
    DistinctRowSource, ExtendRowSource, FilterRowSource, JoinKind, JoinRowSource,
    MinusRowSource, ProjectRowSource, RowSource, SliceRowSource, SortRowSource, UnionRowSource,
};
use rasqal_engine::{EngineResult, QueryContext, SolutionStream};
use rasqal_model::vocab::xsd;
use rasqal_model::{Expression, Function, Literal, OrderExpression, Term, Variable};

fn name(value: &str) -> Option<Term> {
    Some(Literal::new_simple_literal(value).into())
}

/// ```sparql
/// SELECT ?name ?double {
///   VALUES (?id ?name ?age) { ... }
///   BIND(?age * 2 AS ?double)
///   FILTER(?double > 40)
///   MINUS { VALUES ?id { 3 } }
/// } ORDER BY DESC(?double) LIMIT 2
/// ```
#[test]
fn test_select_pipeline() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let people = values(
        &mut context,
        &["id", "name", "age"],
        vec![
            vec![int(1), name("alice"), int(31)],
            vec![int(2), name("bob"), int(19)],
            vec![int(3), name("carol"), int(45)],
            vec![int(4), name("dave"), int(27)],
            vec![int(5), name("erin"), None],
        ],
    )?;
    let extend = ExtendRowSource::new(
        people,
        Variable::new_unchecked("double"),
        Expression::Multiply(Box::new(var("age")), Box::new(lit(2_i64))),
        None,
    );
    let filter = FilterRowSource::new(
        Box::new(extend),
        Expression::Greater(Box::new(var("double")), Box::new(lit(40_i64))),
        None,
    );
    let excluded = values(&mut context, &["id"], vec![vec![int(3)]])?;
    let minus = MinusRowSource::new(Box::new(filter), excluded);
    let sort = SortRowSource::new(
        Box::new(minus),
        vec![OrderExpression::Desc(var("double"))],
        None,
    );
    let project = ProjectRowSource::new(
        Box::new(sort),
        vec![
            Variable::new_unchecked("name"),
            Variable::new_unchecked("double"),
        ],
    );
    let slice = SliceRowSource::new(Box::new(project), 0, Some(2));

    insta::assert_snapshot!(render(Box::new(slice), context)?, @r#"
    ?name ?double
    "alice" 62
    "dave" 54
    "#);
    Ok(())
}

#[test]
fn test_optional_union_distinct() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let people = values(&mut context, &["person"], vec![vec![int(1)], vec![int(2)]])?;
    let emails = values(
        &mut context,
        &["person", "email"],
        vec![vec![int(1), name("a@example.com")]],
    )?;
    let optional = JoinRowSource::new(people, emails, JoinKind::Left);
    let others = values(&mut context, &["other"], vec![vec![int(9)], vec![int(9)]])?;
    let union = UnionRowSource::new(Box::new(optional), others);
    let distinct = DistinctRowSource::new(Box::new(union));

    insta::assert_snapshot!(render(Box::new(distinct), context)?, @r#"
    ?person ?email ?other
    1 "a@example.com" -
    2 - -
    - - 9
    "#);
    Ok(())
}

#[test]
fn test_sort_date_times_by_instant() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(
        &mut context,
        &["dt"],
        vec![
            vec![typed("2002-01-01T00:00:00+02:00", xsd::DATE_TIME)],
            vec![typed("2001-12-31T23:00:00Z", xsd::DATE_TIME)],
        ],
    )?;
    let hours = ExtendRowSource::new(
        input,
        Variable::new_unchecked("hour"),
        call(Function::Hours, var("dt")),
        None,
    );
    let sort = SortRowSource::new(Box::new(hours), vec![OrderExpression::Asc(var("dt"))], None);
    let project = ProjectRowSource::new(Box::new(sort), vec![Variable::new_unchecked("hour")]);

    // 2002-01-01T00:00:00+02:00 is 2001-12-31T22:00:00Z.
    insta::assert_snapshot!(render(Box::new(project), context)?, @r"
    ?hour
    22
    23
    ");
    Ok(())
}

#[test]
fn test_stream_finishes_pipeline() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(&mut context, &["a"], vec![vec![int(1)], vec![int(2)]])?;
    let mut stream = SolutionStream::try_new(input, context)?;

    let first = stream.next().transpose()?.expect("first solution");
    assert_eq!(first.get("a"), int(1).as_ref());
    assert!(stream.next().transpose()?.is_some());
    assert!(stream.next().is_none());
    assert!(stream.next().is_none());
    Ok(())
}

#[test]
fn test_reset_replays_pipeline() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(&mut context, &["a"], vec![vec![int(1)], vec![int(2)]])?;
    let mut extend = ExtendRowSource::new(
        input,
        Variable::new_unchecked("b"),
        Expression::Add(Box::new(var("a")), Box::new(lit(1_i64))),
        None,
    );
    extend.ensure_variables(&mut context)?;

    let first = extend.read_all_rows(&context)?;
    extend.reset()?;
    let second = extend.read_all_rows(&context)?;
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    Ok(())
}
