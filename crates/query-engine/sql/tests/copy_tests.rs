mod common;

use query_engine_metadata::metadata::ComparisonOperator;
use query_engine_sql::sqm::ast::{PredicateKind, SelectStatement, Value};
use query_engine_sql::sqm::evaluate::{evaluate, Bindings};
use query_engine_sql::sqm::{copy_tree, CopyContext};

use common::{builder, equals, item};

#[test]
fn shared_subtree_is_copied_once() {
    let b = builder();
    let shared = equals(&b, "price", 1);
    let tree = b.or(
        b.and(shared.clone(), equals(&b, "stock", 2)),
        b.and(shared.clone(), equals(&b, "stock", 3)),
    );

    let copy = copy_tree(&tree, &b);

    let PredicateKind::Junction(top) = &copy.kind else {
        panic!("expected a junction, got {copy:?}");
    };
    let (PredicateKind::Junction(left), PredicateKind::Junction(right)) =
        (&top.left.kind, &top.right.kind)
    else {
        panic!("expected junctions below the root");
    };
    assert!(left.left.ptr_eq(&right.left));
    assert!(!left.left.ptr_eq(&shared));
    assert_ne!(left.left, shared);
}

#[test]
fn copy_is_a_distinct_tree() {
    let b = builder();
    let tree = b.and(equals(&b, "price", 1), equals(&b, "stock", 2));
    let copy = copy_tree(&tree, &b);

    assert_ne!(copy, tree);
    assert!(!copy.ptr_eq(&tree));
    let originals = tree.leaf_expressions();
    let copies = copy.leaf_expressions();
    assert_eq!(originals.len(), copies.len());
    for (original, copied) in originals.iter().zip(copies.iter()) {
        assert!(!original.ptr_eq(copied));
        assert_eq!(original.result_type, copied.result_type);
    }
}

#[test]
fn context_returns_the_same_copy_for_the_same_node() {
    let b = builder();
    let predicate = equals(&b, "price", 1);
    let mut context = CopyContext::new(&b);
    assert!(context.is_empty());

    let first = predicate.copy(&mut context);
    let second = predicate.copy(&mut context);
    assert!(first.ptr_eq(&second));
    assert!(context
        .copied_predicate(&predicate)
        .is_some_and(|copy| copy.ptr_eq(&first)));
    // the comparison and its two operands
    assert_eq!(context.len(), 3);
}

#[test]
fn independent_contexts_produce_independent_copies() {
    let b = builder();
    let predicate = equals(&b, "price", 1);
    let first = predicate.copy(&mut CopyContext::new(&b));
    let second = predicate.copy(&mut CopyContext::new(&b));
    assert!(!first.ptr_eq(&second));
    similar_asserts::assert_eq!(first.render_hql(), second.render_hql());
}

#[test]
fn aliases_survive_copying() {
    let b = builder();
    let aliased = b.aliased(&b.path(&item(), "price"), "cost");
    let predicate = b
        .comparison(
            aliased,
            ComparisonOperator::GreaterThan,
            b.literal(Value::Integer(5)).unwrap(),
        )
        .unwrap();

    let mut context = CopyContext::new(&b);
    let copy = predicate.copy(&mut context);
    let PredicateKind::Comparison(comparison) = &copy.kind else {
        panic!("expected a comparison, got {copy:?}");
    };
    assert_eq!(comparison.left.alias.as_deref(), Some("cost"));
    assert_eq!(comparison.right.alias, None);
}

#[test]
fn list_elements_are_copied() {
    let b = builder();
    let shared = b.literal(Value::Integer(1)).unwrap();
    let list = b.list(vec![shared.clone(), shared.clone()]).unwrap();
    let mut context = CopyContext::new(&b);
    let copy = list.copy(&mut context);

    let copied_shared = context.copied_expression(&shared).unwrap().clone();
    let query_engine_sql::sqm::ast::ExpressionKind::List(elements) = &copy.kind else {
        panic!("expected a list, got {copy:?}");
    };
    assert!(elements.iter().all(|element| element.ptr_eq(&copied_shared)));
}

#[test]
fn statement_copy_keeps_root_and_meaning() {
    let b = builder();
    let statement = SelectStatement {
        root: item(),
        predicate: Some(b.not(equals(&b, "stock", 0))),
    };
    let copy = statement.copy(&mut CopyContext::new(&b));
    assert_eq!(copy.root, statement.root);
    assert_ne!(copy.predicate, statement.predicate);
    similar_asserts::assert_eq!(copy.render_hql(), statement.render_hql());
}

#[test]
fn concurrent_copies_and_walks_of_a_shared_tree() {
    let b = builder();
    let shared = equals(&b, "price", 1);
    let tree = b.and(
        b.or(shared.clone(), equals(&b, "stock", 2)),
        b.not(shared),
    );
    let expected = tree.render_hql();
    let bindings = Bindings::new()
        .with_path("i", "price", Value::Integer(1))
        .with_path("i", "stock", Value::Integer(2));
    let expected_truth = evaluate(&tree, &bindings);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let copy = copy_tree(&tree, &b);
                similar_asserts::assert_eq!(copy.render_hql(), expected);
                similar_asserts::assert_eq!(tree.render_hql(), expected);
                assert_eq!(evaluate(&copy, &bindings), expected_truth);
            });
        }
    });
}
