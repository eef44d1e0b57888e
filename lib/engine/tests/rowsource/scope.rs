use crate::test_utils::{int, render};
use rasqal_engine::rowsource::{ExtendRowSource, FilterRowSource, ValuesRowSource};
use rasqal_engine::{EngineResult, QueryContext, Row, ScopeKind};
use rasqal_model::{Expression, Literal, Variable};

fn var(name: &str) -> Expression {
    Expression::Variable(Variable::new_unchecked(name))
}

#[test]
fn test_group_hides_outer_variables_from_nested_scopes() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let root = context.scopes().root();
    let group = context
        .scopes_mut()
        .add_scope(root, ScopeKind::Group, "group")?;
    let exists = context
        .scopes_mut()
        .add_scope(group, ScopeKind::Exists, "exists")?;
    let x = context.declare_in_scope(root, "x")?;
    let input = Box::new(ValuesRowSource::new(vec![x], vec![Row::new(vec![int(1)])])?);

    let from_group = ExtendRowSource::new(
        input,
        Variable::new_unchecked("g"),
        var("x"),
        Some(group),
    );
    let from_exists = ExtendRowSource::new(
        Box::new(from_group),
        Variable::new_unchecked("e"),
        var("x"),
        Some(exists),
    );

    insta::assert_snapshot!(render(Box::new(from_exists), context)?, @r"
    ?x ?g ?e
    1 1 -
    ");
    Ok(())
}

#[test]
fn test_subquery_inherits_parent_variables() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let root = context.scopes().root();
    let subquery = context
        .scopes_mut()
        .add_scope(root, ScopeKind::Subquery, "subquery")?;
    let x = context.declare_in_scope(root, "x")?;
    let input = Box::new(ValuesRowSource::new(
        vec![x],
        vec![Row::new(vec![int(1)]), Row::new(vec![int(2)])],
    )?);

    let filter = FilterRowSource::new(
        input,
        Expression::Equal(
            Box::new(var("x")),
            Box::new(Expression::Literal(Literal::from(2_i64))),
        ),
        Some(subquery),
    );

    insta::assert_snapshot!(render(Box::new(filter), context)?, @r"
    ?x
    2
    ");
    Ok(())
}

#[test]
fn test_extend_declares_variable_in_its_scope() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let root = context.scopes().root();
    let group = context
        .scopes_mut()
        .add_scope(root, ScopeKind::Group, "group")?;
    let sibling = context
        .scopes_mut()
        .add_scope(root, ScopeKind::Group, "sibling")?;
    let a = context.declare_variable("a")?;
    let input = Box::new(ValuesRowSource::new(vec![a], vec![Row::new(vec![int(3)])])?);

    // `a` is declared in no scope and is therefore visible everywhere.
    let inner = ExtendRowSource::new(input, Variable::new_unchecked("b"), var("a"), Some(group));
    let outer = ExtendRowSource::new(
        Box::new(inner),
        Variable::new_unchecked("c"),
        var("b"),
        Some(sibling),
    );

    insta::assert_snapshot!(render(Box::new(outer), context)?, @r"
    ?a ?b ?c
    3 3 -
    ");
    Ok(())
}

#[test]
fn test_cross_scope_access_rules() -> EngineResult<()> {
    let mut context = QueryContext::new();
    let root = context.scopes().root();
    let group = context
        .scopes_mut()
        .add_scope(root, ScopeKind::Group, "group")?;
    let nested = context
        .scopes_mut()
        .add_scope(group, ScopeKind::Let, "let")?;
    let other = context
        .scopes_mut()
        .add_scope(root, ScopeKind::Subquery, "subquery")?;
    let outer = context.declare_in_scope(root, "outer")?;
    let inner = context.declare_in_scope(nested, "inner")?;
    let local = context.declare_in_scope(group, "local")?;
    let scopes = context.scopes();

    assert!(scopes.check_cross_scope_access(group, group, local));
    assert!(scopes.check_cross_scope_access(nested, group, local));
    assert!(!scopes.check_cross_scope_access(root, group, local));

    assert!(scopes.check_cross_scope_access(root, root, outer));
    assert!(scopes.check_cross_scope_access(group, root, outer));
    assert!(!scopes.check_cross_scope_access(nested, root, outer));
    assert!(!scopes.check_cross_scope_access(root, nested, inner));
    assert!(scopes.check_cross_scope_access(other, nested, inner));
    assert!(!scopes.check_cross_scope_access(root, root, inner));
    Ok(())
}
