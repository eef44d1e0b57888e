use crate::test_utils::{call, int, lit, render, typed, values, var};
use rasqal_engine::rowsource::{ExtendRowSource, RowSource};
use rasqal_engine::{EngineResult, ExecutionOptions, ExtendErrorPolicy, QueryContext};
use rasqal_model::vocab::xsd;
use rasqal_model::{Expression, Function, Variable};

#[test]
fn test_extend_binds_sum() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(
        &mut context,
        &["a", "b"],
        vec![vec![int(1), int(2)], vec![int(3), int(4)]],
    )?;
    let extend = ExtendRowSource::new(
        input,
        Variable::new_unchecked("c"),
        Expression::Add(Box::new(var("a")), Box::new(var("b"))),
        None,
    );

    insta::assert_snapshot!(render(Box::new(extend), context)?, @r"
    ?a ?b ?c
    1 2 3
    3 4 7
    ");
    Ok(())
}

#[test]
fn test_extend_drops_rows_that_bind_the_variable() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(
        &mut context,
        &["a", "c"],
        vec![
            vec![int(1), None],
            vec![int(2), int(20)],
            vec![int(3), None],
        ],
    )?;
    let extend = ExtendRowSource::new(
        input,
        Variable::new_unchecked("c"),
        Expression::Multiply(Box::new(var("a")), Box::new(lit(10_i64))),
        None,
    );

    insta::assert_snapshot!(render(Box::new(extend), context)?, @r"
    ?a ?c
    1 10
    3 30
    ");
    Ok(())
}

#[test]
fn test_extend_error_keeps_row_unbound() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(&mut context, &["a"], vec![vec![int(1)], vec![int(0)]])?;
    let extend = ExtendRowSource::new(
        input,
        Variable::new_unchecked("q"),
        Expression::Divide(Box::new(lit(1_i64)), Box::new(var("a"))),
        None,
    );

    insta::assert_snapshot!(render(Box::new(extend), context)?, @r"
    ?a ?q
    1 1
    0 -
    ");
    Ok(())
}

#[test]
fn test_extend_error_drops_row_with_drop_policy() -> EngineResult<()> {
    let mut context = QueryContext::new().with_options(
        ExecutionOptions::default().with_extend_error_policy(ExtendErrorPolicy::Drop),
    );
    let input = values(&mut context, &["a"], vec![vec![int(1)], vec![int(0)]])?;
    let mut extend = ExtendRowSource::new(
        input,
        Variable::new_unchecked("q"),
        Expression::Divide(Box::new(lit(1_i64)), Box::new(var("a"))),
        None,
    );
    extend.ensure_variables(&mut context)?;

    let rows = extend.read_all_rows(&context)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values(), &[int(1), int(1)]);
    Ok(())
}

#[test]
fn test_extend_registers_variable_once() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(&mut context, &["a"], vec![vec![int(1)]])?;
    let mut extend = ExtendRowSource::new(input, Variable::new_unchecked("b"), var("a"), None);
    extend.ensure_variables(&mut context)?;
    extend.ensure_variables(&mut context)?;

    assert_eq!(context.variables().len(), 2);
    assert_eq!(extend.variables().len(), 2);
    Ok(())
}

#[test]
fn test_extend_date_time_accessors() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(
        &mut context,
        &["dt"],
        vec![
            vec![typed("2004-12-31T23:50:22.5-01:15", xsd::DATE_TIME)],
            vec![typed("2000-02-29T24:00:00Z", xsd::DATE_TIME)],
            vec![typed("not a date", xsd::DATE_TIME)],
        ],
    )?;
    let year = ExtendRowSource::new(
        input,
        Variable::new_unchecked("year"),
        call(Function::Year, var("dt")),
        None,
    );
    let seconds = ExtendRowSource::new(
        Box::new(year),
        Variable::new_unchecked("seconds"),
        call(Function::Seconds, var("dt")),
        None,
    );
    let tz = ExtendRowSource::new(
        Box::new(seconds),
        Variable::new_unchecked("tz"),
        call(Function::Tz, var("dt")),
        None,
    );

    insta::assert_snapshot!(render(Box::new(tz), context)?, @r#"
    ?dt ?year ?seconds ?tz
    "2004-12-31T23:50:22.5-01:15"^^<http://www.w3.org/2001/XMLSchema#dateTime> 2005 22.5 "Z"
    "2000-02-29T24:00:00Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> 2000 0 "Z"
    "not a date"^^<http://www.w3.org/2001/XMLSchema#dateTime> - - -
    "#);
    Ok(())
}
