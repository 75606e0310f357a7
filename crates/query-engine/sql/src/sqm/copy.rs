//! Deep copies of query trees.
//!
//! A copy is driven by a `CopyContext` which remembers, per original node identity,
//! the copy made for it. A node reached twice during one copy (a subtree shared by
//! two parents) is therefore copied once, and the copied parents share the copy.

use std::collections::HashMap;

use super::ast::*;
use super::builder::NodeBuilder;

/// The identity map of a single copy operation.
#[derive(Debug)]
pub struct CopyContext<'a> {
    builder: &'a NodeBuilder,
    predicates: HashMap<NodeId, Predicate>,
    expressions: HashMap<NodeId, Expression>,
}

impl<'a> CopyContext<'a> {
    pub fn new(builder: &'a NodeBuilder) -> CopyContext<'a> {
        CopyContext {
            builder,
            predicates: HashMap::new(),
            expressions: HashMap::new(),
        }
    }

    /// The copy already made of a predicate, if any.
    pub fn copied_predicate(&self, original: &Predicate) -> Option<&Predicate> {
        self.predicates.get(&original.id)
    }

    /// The copy already made of an expression, if any.
    pub fn copied_expression(&self, original: &Expression) -> Option<&Expression> {
        self.expressions.get(&original.id)
    }

    /// The number of nodes copied so far.
    pub fn len(&self) -> usize {
        self.predicates.len() + self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Predicate {
    /// Copy this predicate and everything below it.
    pub fn copy(&self, context: &mut CopyContext<'_>) -> Predicate {
        if let Some(existing) = context.predicates.get(&self.id) {
            return existing.clone();
        }

        let kind = match &self.kind {
            PredicateKind::Comparison(comparison) => PredicateKind::Comparison(Comparison {
                left: comparison.left.copy(context),
                operator: comparison.operator,
                right: comparison.right.copy(context),
            }),
            PredicateKind::Junction(junction) => PredicateKind::Junction(Junction {
                left: junction.left.copy(context),
                operator: junction.operator,
                right: junction.right.copy(context),
            }),
            PredicateKind::Negation(negation) => PredicateKind::Negation(Negation {
                inner: negation.inner.copy(context),
            }),
            PredicateKind::Nullness(nullness) => PredicateKind::Nullness(Nullness {
                expression: nullness.expression.copy(context),
                negated: nullness.negated,
            }),
            PredicateKind::Between(between) => PredicateKind::Between(Between {
                expression: between.expression.copy(context),
                lower: between.lower.copy(context),
                upper: between.upper.copy(context),
                negated: between.negated,
            }),
        };

        // nodes are immutable, so the auxiliary state (the alias) is carried
        // over at construction rather than patched in afterwards.
        let copy = context.builder.make_predicate(kind, self.alias.clone());
        context.predicates.insert(self.id, copy.clone());
        copy
    }
}

impl Expression {
    /// Copy this expression and everything below it.
    pub fn copy(&self, context: &mut CopyContext<'_>) -> Expression {
        if let Some(existing) = context.expressions.get(&self.id) {
            return existing.clone();
        }

        let kind = match &self.kind {
            ExpressionKind::Literal(value) => ExpressionKind::Literal(value.clone()),
            ExpressionKind::Parameter(parameter) => ExpressionKind::Parameter(parameter.clone()),
            ExpressionKind::Path(path) => ExpressionKind::Path(path.clone()),
            ExpressionKind::List(elements) => ExpressionKind::List(
                elements
                    .iter()
                    .map(|element| element.copy(context))
                    .collect(),
            ),
        };

        let copy = context
            .builder
            .make_expression(self.result_type, kind, self.alias.clone());
        context.expressions.insert(self.id, copy.clone());
        copy
    }
}

impl SelectStatement {
    /// Copy the statement, its predicate included.
    pub fn copy(&self, context: &mut CopyContext<'_>) -> SelectStatement {
        SelectStatement {
            root: self.root.clone(),
            predicate: self
                .predicate
                .as_ref()
                .map(|predicate| predicate.copy(context)),
        }
    }
}

/// Copy a whole tree under a context of its own.
pub fn copy_tree(predicate: &Predicate, builder: &NodeBuilder) -> Predicate {
    let mut context = CopyContext::new(builder);
    let copy = predicate.copy(&mut context);
    tracing::debug!(copied_nodes = context.len(), "copied query tree");
    copy
}
