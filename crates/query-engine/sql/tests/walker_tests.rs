mod common;

use query_engine_metadata::metadata::ComparisonOperator;
use query_engine_sql::sqm::ast::*;
use query_engine_sql::sqm::parameters::collect_parameters;
use query_engine_sql::sqm::SemanticWalker;

use common::{builder, equals, item};

/// Records the variant of every node it is dispatched to, depth first.
#[derive(Default)]
struct Recorder {
    visited: Vec<String>,
}

impl SemanticWalker for Recorder {
    type Output = usize;
    type ExpressionOutput = usize;

    fn visit_comparison(&mut self, _predicate: &Predicate, comparison: &Comparison) -> usize {
        self.visited.push(format!("comparison {}", comparison.operator));
        1 + comparison.left.accept(self) + comparison.right.accept(self)
    }

    fn visit_junction(&mut self, _predicate: &Predicate, junction: &Junction) -> usize {
        self.visited.push(format!("junction {:?}", junction.operator));
        1 + junction.left.accept(self) + junction.right.accept(self)
    }

    fn visit_negation(&mut self, _predicate: &Predicate, negation: &Negation) -> usize {
        self.visited.push("negation".to_string());
        1 + negation.inner.accept(self)
    }

    fn visit_nullness(&mut self, _predicate: &Predicate, nullness: &Nullness) -> usize {
        self.visited.push(format!("nullness negated={}", nullness.negated));
        1 + nullness.expression.accept(self)
    }

    fn visit_between(&mut self, _predicate: &Predicate, between: &Between) -> usize {
        self.visited.push(format!("between negated={}", between.negated));
        1 + between.expression.accept(self) + between.lower.accept(self) + between.upper.accept(self)
    }

    fn visit_literal(&mut self, _expression: &Expression, value: &Value) -> usize {
        self.visited.push(format!("literal {value:?}"));
        1
    }

    fn visit_parameter(&mut self, _expression: &Expression, parameter: &Parameter) -> usize {
        self.visited.push(format!("parameter {parameter:?}"));
        1
    }

    fn visit_path(&mut self, _expression: &Expression, path: &Path) -> usize {
        self.visited
            .push(format!("path {}.{}", path.root.alias, path.attribute));
        1
    }

    fn visit_list(&mut self, _expression: &Expression, elements: &[Expression]) -> usize {
        self.visited.push(format!("list of {}", elements.len()));
        1 + elements
            .iter()
            .map(|element| element.accept(self))
            .sum::<usize>()
    }
}

#[test]
fn every_variant_dispatches_to_its_own_method() {
    let b = builder();
    let price = b.path(&item(), "price");
    let tree = b
        .and_all([
            b.not(equals(&b, "stock", 0)),
            b.is_null(b.path(&item(), "name")).unwrap(),
            b.between(
                price.clone(),
                b.literal(Value::Integer(1)).unwrap(),
                b.parameter(Parameter::Named("max".to_string()), price.result_type),
                false,
            )
            .unwrap(),
            b.comparison(
                price,
                ComparisonOperator::In,
                b.list(vec![b.literal(Value::Integer(3)).unwrap()]).unwrap(),
            )
            .unwrap(),
        ])
        .unwrap();

    let mut recorder = Recorder::default();
    let count = tree.accept(&mut recorder);

    similar_asserts::assert_eq!(
        recorder.visited,
        vec![
            "junction And",
            "junction And",
            "junction And",
            "negation",
            "comparison _eq",
            "path i.stock",
            "literal Integer(0)",
            "nullness negated=false",
            "path i.name",
            "between negated=false",
            "path i.price",
            "literal Integer(1)",
            "parameter Named(\"max\")",
            "comparison _in",
            "path i.price",
            "list of 1",
            "literal Integer(3)",
        ]
    );
    assert_eq!(count, recorder.visited.len());
}

#[test]
fn operands_are_in_source_order() {
    let b = builder();
    let left = equals(&b, "price", 1);
    let right = equals(&b, "stock", 2);
    let junction = b.or(left.clone(), right.clone());

    assert_eq!(junction.operands(), Operands::Predicates(vec![&left, &right]));
    assert_eq!(junction.operator(), Some(BooleanOperator::Or));
    assert_eq!(left.operator(), None);

    let PredicateKind::Comparison(comparison) = &left.kind else {
        panic!("expected a comparison, got {left:?}");
    };
    assert_eq!(
        left.operands(),
        Operands::Expressions(vec![&comparison.left, &comparison.right])
    );
}

#[test]
fn negation_is_derived_from_the_variant() {
    let b = builder();
    let name = b.path(&item(), "name");
    assert!(!equals(&b, "price", 1).is_negated());
    assert!(equals(&b, "price", 1).negate(&b).is_negated());
    assert!(b.is_not_null(name.clone()).unwrap().is_negated());
    assert!(!b.is_null(name).unwrap().is_negated());
}

#[test]
fn predicates_are_boolean() {
    let b = builder();
    let predicate = b.or(equals(&b, "price", 1), equals(&b, "price", 2));
    assert_eq!(
        predicate.result_type(),
        query_engine_metadata::metadata::ScalarType::Boolean
    );
}

#[test]
fn leaf_expressions_flatten_lists() {
    let b = builder();
    let predicate = b
        .comparison(
            b.path(&item(), "price"),
            ComparisonOperator::In,
            b.list(vec![
                b.literal(Value::Integer(1)).unwrap(),
                b.literal(Value::Integer(2)).unwrap(),
            ])
            .unwrap(),
        )
        .unwrap();
    let rendered = predicate
        .leaf_expressions()
        .into_iter()
        .map(Expression::render_hql)
        .collect::<Vec<_>>();
    similar_asserts::assert_eq!(rendered, vec!["i.price", "1", "2"]);
}

#[test]
fn parameters_are_collected_once_in_order() {
    let b = builder();
    let price = b.path(&item(), "price");
    let named = |name: &str| b.parameter(Parameter::Named(name.to_string()), price.result_type);
    let predicate = b
        .or_all([
            b.comparison(price.clone(), ComparisonOperator::GreaterThan, named("min"))
                .unwrap(),
            b.between(price.clone(), named("low"), named("min"), false)
                .unwrap(),
            b.comparison(
                price.clone(),
                ComparisonOperator::In,
                b.list(vec![
                    b.parameter(Parameter::Positional(2), price.result_type),
                    named("low"),
                ])
                .unwrap(),
            )
            .unwrap(),
        ])
        .unwrap();

    similar_asserts::assert_eq!(
        collect_parameters(&predicate),
        vec![
            Parameter::Named("min".to_string()),
            Parameter::Named("low".to_string()),
            Parameter::Positional(2),
        ]
    );
    assert!(collect_parameters(&equals(&b, "price", 1)).is_empty());
}
