//! Eager distribution of negations.
//!
//! `Predicate::negate` only wraps. This pass rewrites a predicate so that no
//! `Negation` node is left: junctions are flipped with De Morgan's law and leaves
//! take their complementary operator. Every rewrite used here is an equivalence
//! under three-valued logic, so predicates over nullable values keep their meaning.

use std::collections::HashMap;

use super::ast::*;
use super::builder::NodeBuilder;
use super::walker::SemanticWalker;

/// Rewrite `predicate` with its negations pushed down to the leaves.
///
/// Subtrees which need no rewrite are shared with the input, and a subtree
/// shared in the input stays shared in the output.
pub fn push_down_negations(predicate: &Predicate, builder: &NodeBuilder) -> Predicate {
    let mut pushdown = NegationPushdown {
        builder,
        negated: false,
        rewritten: HashMap::new(),
    };
    pushdown.rewrite(predicate, false)
}

struct NegationPushdown<'a> {
    builder: &'a NodeBuilder,
    /// Whether the predicate being visited sits under an odd number of negations.
    negated: bool,
    rewritten: HashMap<(NodeId, bool), Predicate>,
}

impl NegationPushdown<'_> {
    fn rewrite(&mut self, predicate: &Predicate, negated: bool) -> Predicate {
        if let Some(existing) = self.rewritten.get(&(predicate.id, negated)) {
            return existing.clone();
        }
        let saved = std::mem::replace(&mut self.negated, negated);
        let rewritten = predicate.accept(self);
        self.negated = saved;
        self.rewritten
            .insert((predicate.id, negated), rewritten.clone());
        rewritten
    }
}

impl SemanticWalker for NegationPushdown<'_> {
    type Output = Predicate;
    type ExpressionOutput = Expression;

    fn visit_comparison(&mut self, predicate: &Predicate, comparison: &Comparison) -> Predicate {
        if !self.negated {
            return predicate.clone();
        }
        // the complement has the same arity, so the operand shape stays valid
        self.builder.make_predicate(
            PredicateKind::Comparison(Comparison {
                left: comparison.left.clone(),
                operator: comparison.operator.negated(),
                right: comparison.right.clone(),
            }),
            predicate.alias.clone(),
        )
    }

    fn visit_junction(&mut self, predicate: &Predicate, junction: &Junction) -> Predicate {
        let negated = self.negated;
        let left = self.rewrite(&junction.left, negated);
        let right = self.rewrite(&junction.right, negated);
        if !negated && left.ptr_eq(&junction.left) && right.ptr_eq(&junction.right) {
            return predicate.clone();
        }
        let operator = if negated {
            junction.operator.dual()
        } else {
            junction.operator
        };
        self.builder.make_predicate(
            PredicateKind::Junction(Junction {
                left,
                operator,
                right,
            }),
            predicate.alias.clone(),
        )
    }

    fn visit_negation(&mut self, _predicate: &Predicate, negation: &Negation) -> Predicate {
        let negated = !self.negated;
        self.rewrite(&negation.inner, negated)
    }

    fn visit_nullness(&mut self, predicate: &Predicate, nullness: &Nullness) -> Predicate {
        if !self.negated {
            return predicate.clone();
        }
        self.builder.make_predicate(
            PredicateKind::Nullness(Nullness {
                expression: nullness.expression.clone(),
                negated: !nullness.negated,
            }),
            predicate.alias.clone(),
        )
    }

    fn visit_between(&mut self, predicate: &Predicate, between: &Between) -> Predicate {
        if !self.negated {
            return predicate.clone();
        }
        self.builder.make_predicate(
            PredicateKind::Between(Between {
                expression: between.expression.clone(),
                lower: between.lower.clone(),
                upper: between.upper.clone(),
                negated: !between.negated,
            }),
            predicate.alias.clone(),
        )
    }

    // expressions carry no negation and are shared as they are.

    fn visit_literal(&mut self, expression: &Expression, _value: &Value) -> Expression {
        expression.clone()
    }

    fn visit_parameter(&mut self, expression: &Expression, _parameter: &Parameter) -> Expression {
        expression.clone()
    }

    fn visit_path(&mut self, expression: &Expression, _path: &Path) -> Expression {
        expression.clone()
    }

    fn visit_list(&mut self, expression: &Expression, _elements: &[Expression]) -> Expression {
        expression.clone()
    }
}
