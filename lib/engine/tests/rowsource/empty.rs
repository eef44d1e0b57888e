use crate::test_utils::{int, values};
use rasqal_engine::rowsource::{EmptyRowSource, JoinKind, JoinRowSource, RowSource};
use rasqal_engine::{EngineResult, QueryContext};

#[test]
fn test_empty_yields_exactly_one_row() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let mut empty = EmptyRowSource::new();
    empty.ensure_variables(&mut context)?;

    assert!(empty.variables().is_empty());
    let row = empty.read_row(&context)?.expect("one row");
    assert!(row.is_empty());
    assert_eq!(row.offset(), 0);
    assert_eq!(empty.read_row(&context)?, None);
    assert_eq!(empty.read_row(&context)?, None);
    Ok(())
}

#[test]
fn test_empty_read_all_rows() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let mut empty = EmptyRowSource::new();
    empty.ensure_variables(&mut context)?;

    assert_eq!(empty.read_all_rows(&context)?.len(), 1);
    empty.reset()?;
    assert_eq!(empty.read_all_rows(&context)?.len(), 1);
    Ok(())
}

#[test]
fn test_empty_is_neutral_for_join() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let input = values(&mut context, &["a"], vec![vec![int(1)], vec![int(2)]])?;
    let mut join = JoinRowSource::new(Box::new(EmptyRowSource::new()), input, JoinKind::Inner);
    join.ensure_variables(&mut context)?;

    let rows = join.read_all_rows(&context)?;
    let rows = rows
        .iter()
        .map(|row| row.values().to_vec())
        .collect::<Vec<_>>();
    assert_eq!(rows, vec![vec![int(1)], vec![int(2)]]);
    Ok(())
}

#[test]
#[should_panic(expected = "empty: read_row() before ensure_variables()")]
fn test_read_before_ensure_panics() {
    let context = QueryContext::new();
    EmptyRowSource::new().read_row(&context).ok();
}

#[test]
#[should_panic(expected = "empty: read_row() after finish()")]
fn test_read_after_finish_panics() {
    let mut context = QueryContext::new();
    let mut empty = EmptyRowSource::new();
    empty.ensure_variables(&mut context).unwrap();
    empty.finish();
    empty.read_row(&context).ok();
}
