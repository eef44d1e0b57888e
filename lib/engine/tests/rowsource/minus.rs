use crate::test_utils::{int, render, values};
use rasqal_engine::rowsource::{MinusRowSource, RowSource};
use rasqal_engine::{CompatibilityPolicy, EngineResult, ExecutionOptions, QueryContext};
use rasqal_model::{Literal, Term};

fn text(value: &str) -> Option<Term> {
    Some(Literal::new_simple_literal(value).into())
}

#[test]
fn test_minus_removes_compatible_rows() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let left = values(
        &mut context,
        &["person", "name"],
        vec![
            vec![int(1), text("alice")],
            vec![int(2), text("bob")],
            vec![int(3), text("carol")],
        ],
    )?;
    let right = values(
        &mut context,
        &["person", "email"],
        vec![vec![int(2), text("bob@example.com")]],
    )?;
    let minus = MinusRowSource::new(left, right);

    insta::assert_snapshot!(render(Box::new(minus), context)?, @r#"
    ?person ?name
    1 "alice"
    3 "carol"
    "#);
    Ok(())
}

#[test]
fn test_minus_with_empty_right_keeps_left() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let left = values(&mut context, &["a"], vec![vec![int(1)], vec![int(2)]])?;
    let right = values(&mut context, &["a"], Vec::new())?;
    let minus = MinusRowSource::new(left, right);

    insta::assert_snapshot!(render(Box::new(minus), context)?, @r"
    ?a
    1
    2
    ");
    Ok(())
}

#[test]
fn test_minus_with_disjoint_domains_keeps_left() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let left = values(&mut context, &["a"], vec![vec![int(1)], vec![int(2)]])?;
    let right = values(&mut context, &["b"], vec![vec![int(1)], vec![int(2)]])?;
    let minus = MinusRowSource::new(left, right);

    insta::assert_snapshot!(render(Box::new(minus), context)?, @r"
    ?a
    1
    2
    ");
    Ok(())
}

#[test]
fn test_minus_requires_a_shared_bound_variable() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let left = values(
        &mut context,
        &["a", "b"],
        vec![vec![None, int(1)], vec![int(2), int(2)]],
    )?;
    let right = values(&mut context, &["a"], vec![vec![int(2)], vec![int(7)]])?;
    let minus = MinusRowSource::new(left, right);

    // The first row shares no bound variable with any right row and is kept.
    insta::assert_snapshot!(render(Box::new(minus), context)?, @r"
    ?a ?b
    - 1
    ");
    Ok(())
}

#[test]
fn test_minus_with_join_compatibility() -> EngineResult<()> {
    let mut context = QueryContext::new()
        .with_options(ExecutionOptions::default().with_minus_policy(CompatibilityPolicy::Join));
    let left = values(&mut context, &["a"], vec![vec![int(1)], vec![None]])?;
    let right = values(&mut context, &["b"], vec![vec![int(1)]])?;
    let mut minus = MinusRowSource::new(left, right);
    minus.ensure_variables(&mut context)?;

    assert!(minus.read_all_rows(&context)?.is_empty());
    Ok(())
}

#[test]
fn test_minus_left_rows_are_renumbered() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let left = values(
        &mut context,
        &["a"],
        vec![vec![int(1)], vec![int(2)], vec![int(3)]],
    )?;
    let right = values(&mut context, &["a"], vec![vec![int(1)]])?;
    let mut minus = MinusRowSource::new(left, right);
    minus.ensure_variables(&mut context)?;

    let offsets = minus
        .read_all_rows(&context)?
        .iter()
        .map(|row| row.offset())
        .collect::<Vec<_>>();
    assert_eq!(offsets, vec![0, 1]);
    Ok(())
}
