use crate::test_utils::{int, render, values};
use rasqal_engine::rowsource::{RowSource, ValuesRowSource};
use rasqal_engine::{EngineError, EngineResult, QueryContext, Row};

#[test]
fn test_values_plays_back_rows() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let source = values(
        &mut context,
        &["a", "b"],
        vec![vec![int(1), int(2)], vec![int(3), None]],
    )?;

    insta::assert_snapshot!(render(source, context)?, @r"
    ?a ?b
    1 2
    3 -
    ");
    Ok(())
}

#[test]
fn test_values_limit_and_offset() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let a = context.declare_variable("a")?;
    let rows = (1..=5).map(|value| Row::new(vec![int(value)])).collect();
    let mut source = ValuesRowSource::new(vec![a], rows)?
        .with_offset(1)
        .with_limit(2);
    source.ensure_variables(&mut context)?;

    let rows = source.read_all_rows(&context)?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].values(), &[int(2)]);
    assert_eq!(rows[0].offset(), 0);
    assert_eq!(rows[1].values(), &[int(3)]);

    source.reset()?;
    let row = source.read_row(&context)?.map(Row::into_values);
    assert_eq!(row, Some(vec![int(2)]));
    Ok(())
}

#[test]
fn test_values_rejects_ragged_rows() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let a = context.declare_variable("a")?;
    let result = ValuesRowSource::new(vec![a], vec![Row::new(vec![int(1), int(2)])]);
    assert!(matches!(result, Err(EngineError::InvalidPlan(_))));
    Ok(())
}
