use crate::test_utils::{int, lit, render, values, var};
use rasqal_engine::rowsource::HavingRowSource;
use rasqal_engine::{EngineResult, QueryContext};
use rasqal_model::{Expression, Literal};

#[test]
fn test_having_keeps_rows_matching_all_conditions() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(
        &mut context,
        &["group", "count"],
        vec![
            vec![Some(Literal::new_simple_literal("a").into()), int(1)],
            vec![Some(Literal::new_simple_literal("b").into()), int(5)],
            vec![Some(Literal::new_simple_literal("c").into()), int(12)],
        ],
    )?;
    let having = HavingRowSource::new(
        input,
        vec![
            Expression::Greater(Box::new(var("count")), Box::new(lit(1_i64))),
            Expression::Less(Box::new(var("count")), Box::new(lit(10_i64))),
        ],
        None,
    );

    insta::assert_snapshot!(render(Box::new(having), context)?, @r#"
    ?group ?count
    "b" 5
    "#);
    Ok(())
}

#[test]
fn test_having_treats_errors_as_false() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(
        &mut context,
        &["count"],
        vec![
            vec![int(3)],
            vec![None],
            vec![Some(Literal::new_simple_literal("three").into())],
            vec![int(4)],
        ],
    )?;
    let condition = Expression::Greater(Box::new(var("count")), Box::new(lit(2_i64)));
    let having = HavingRowSource::new(input, vec![condition], None);

    insta::assert_snapshot!(render(Box::new(having), context)?, @r"
    ?count
    3
    4
    ");
    Ok(())
}

#[test]
fn test_having_without_conditions_keeps_all_rows() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(&mut context, &["count"], vec![vec![int(1)], vec![None]])?;
    let having = HavingRowSource::new(input, Vec::new(), None);

    insta::assert_snapshot!(render(Box::new(having), context)?, @r"
    ?count
    1
    -
    ");
    Ok(())
}
