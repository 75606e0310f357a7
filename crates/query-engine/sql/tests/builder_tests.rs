mod common;

use query_engine_metadata::metadata::{ComparisonOperator, ScalarType};
use query_engine_sql::sqm::ast::{Parameter, Value};
use query_engine_sql::sqm::{ConstructionError, NodeBuilder};

use common::{builder, equals, item};

#[test]
fn paths_are_typed_by_the_resolver() {
    let b = builder();
    assert_eq!(b.path(&item(), "name").result_type, ScalarType::Text);
    assert_eq!(b.path(&item(), "stock").result_type, ScalarType::Integer);
    assert_eq!(b.path(&item(), "unknown").result_type, ScalarType::Any);
    assert_eq!(
        NodeBuilder::untyped().path(&item(), "name").result_type,
        ScalarType::Any
    );
}

#[test]
fn literals_are_typed_by_their_value() {
    let b = builder();
    assert_eq!(
        b.literal(Value::Integer(1)).unwrap().result_type,
        ScalarType::Bigint
    );
    assert_eq!(
        b.literal(Value::Float(1.5)).unwrap().result_type,
        ScalarType::DoublePrecision
    );
    assert_eq!(
        b.literal(Value::String("a".to_string())).unwrap().result_type,
        ScalarType::Text
    );
    assert_eq!(
        b.literal(Value::Boolean(false)).unwrap().result_type,
        ScalarType::Boolean
    );
    assert_eq!(b.literal(Value::Null).unwrap().result_type, ScalarType::Any);
    assert_eq!(
        b.typed_literal(Value::String("2024-01-01".to_string()), ScalarType::Date)
            .unwrap()
            .result_type,
        ScalarType::Date
    );
}

#[test]
fn non_finite_floats_are_not_literals() {
    let b = builder();
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            b.literal(Value::Float(value)),
            Err(ConstructionError::NonFiniteFloat(f)) if f.is_nan() == value.is_nan()
        ));
        assert!(matches!(
            b.typed_literal(Value::Float(value), ScalarType::Real),
            Err(ConstructionError::NonFiniteFloat(_))
        ));
    }
    similar_asserts::assert_eq!(
        ConstructionError::NonFiniteFloat(f64::INFINITY).to_string(),
        "the float inf cannot be written as a literal"
    );
}

#[test]
fn every_node_gets_its_own_identity() {
    let b = builder();
    let first = equals(&b, "price", 1);
    let second = equals(&b, "price", 1);
    assert_ne!(first, second);
    assert_ne!(first.id, second.id);
    assert_eq!(first, first.clone());
    similar_asserts::assert_eq!(first.render_hql(), second.render_hql());
}

#[test]
fn multi_valued_operators_require_a_list() {
    let b = builder();
    let result = b.comparison(
        b.path(&item(), "price"),
        ComparisonOperator::In,
        b.literal(Value::Integer(1)).unwrap(),
    );
    assert_eq!(
        result.unwrap_err(),
        ConstructionError::ListRequired(ComparisonOperator::In)
    );
}

#[test]
fn single_valued_operators_refuse_a_list() {
    let b = builder();
    let result = b.comparison(
        b.path(&item(), "price"),
        ComparisonOperator::Equals,
        b.list(vec![b.literal(Value::Integer(1)).unwrap()]).unwrap(),
    );
    assert_eq!(
        result.unwrap_err(),
        ConstructionError::UnexpectedList(ComparisonOperator::Equals)
    );
}

#[test]
fn lists_are_refused_outside_the_right_of_a_comparison() {
    let b = builder();
    let list = || b.list(vec![b.literal(Value::Integer(1)).unwrap()]).unwrap();
    assert!(matches!(
        b.comparison(list(), ComparisonOperator::In, list()),
        Err(ConstructionError::ListNotAllowed(_))
    ));
    assert!(matches!(
        b.is_null(list()),
        Err(ConstructionError::ListNotAllowed(_))
    ));
    assert!(matches!(
        b.between(
            b.path(&item(), "price"),
            list(),
            b.literal(Value::Integer(2)).unwrap(),
            false
        ),
        Err(ConstructionError::ListNotAllowed(_))
    ));
    assert!(matches!(
        b.list(vec![list()]),
        Err(ConstructionError::ListNotAllowed(_))
    ));
}

#[test]
fn empty_lists_and_junctions_are_refused() {
    let b = builder();
    assert_eq!(b.list(vec![]).unwrap_err(), ConstructionError::EmptyList);
    assert_eq!(
        b.and_all(vec![]).unwrap_err(),
        ConstructionError::EmptyJunction
    );
}

#[test]
fn junctions_fold_to_the_left() {
    let b = builder();
    let single = b.or_all([equals(&b, "price", 1)]).unwrap();
    similar_asserts::assert_eq!(single.render_hql(), "i.price = 1");

    let chained = b
        .or_all([
            equals(&b, "price", 1),
            equals(&b, "price", 2),
            equals(&b, "price", 3),
        ])
        .unwrap();
    similar_asserts::assert_eq!(
        chained.render_hql(),
        "i.price = 1 or i.price = 2 or i.price = 3"
    );
}

#[test]
fn negate_wraps_without_rewriting() {
    let b = builder();
    let inner = b.and(equals(&b, "price", 1), equals(&b, "stock", 1));
    let negated = inner.negate(&b);
    let query_engine_sql::sqm::ast::PredicateKind::Negation(negation) = &negated.kind else {
        panic!("expected a negation, got {negated:?}");
    };
    assert!(negation.inner.ptr_eq(&inner));
}

#[test]
fn aliased_expressions_are_new_nodes() {
    let b = builder();
    let parameter = b.parameter(Parameter::Named("p".to_string()), ScalarType::Integer);
    let aliased = b.aliased(&parameter, "limit");
    assert_ne!(aliased, parameter);
    assert_eq!(aliased.alias.as_deref(), Some("limit"));
    assert_eq!(aliased.result_type, ScalarType::Integer);
    similar_asserts::assert_eq!(aliased.render_hql(), parameter.render_hql());
}

#[test]
fn construction_errors_describe_the_problem() {
    similar_asserts::assert_eq!(
        ConstructionError::ListRequired(ComparisonOperator::NotIn).to_string(),
        "operator _nin requires a list of values on its right-hand side"
    );
    similar_asserts::assert_eq!(
        ConstructionError::EmptyJunction.to_string(),
        "a junction requires at least one predicate"
    );
}
