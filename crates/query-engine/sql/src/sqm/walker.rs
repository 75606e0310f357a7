//! Double dispatch over query trees.
//!
//! A node accepts a walker and calls the one walker method matching its own
//! variant, handing back whatever that method returns. All variant specific logic
//! of a consumer lives in its walker.

use super::ast::*;

/// A consumer of query trees, with one method per node variant.
///
/// Predicates produce `Output` and expressions produce `ExpressionOutput`.
/// There are no default methods: a new variant means a new required method.
pub trait SemanticWalker {
    type Output;
    type ExpressionOutput;

    fn visit_comparison(&mut self, predicate: &Predicate, comparison: &Comparison)
        -> Self::Output;

    fn visit_junction(&mut self, predicate: &Predicate, junction: &Junction) -> Self::Output;

    fn visit_negation(&mut self, predicate: &Predicate, negation: &Negation) -> Self::Output;

    fn visit_nullness(&mut self, predicate: &Predicate, nullness: &Nullness) -> Self::Output;

    fn visit_between(&mut self, predicate: &Predicate, between: &Between) -> Self::Output;

    fn visit_literal(&mut self, expression: &Expression, value: &Value) -> Self::ExpressionOutput;

    fn visit_parameter(
        &mut self,
        expression: &Expression,
        parameter: &Parameter,
    ) -> Self::ExpressionOutput;

    fn visit_path(&mut self, expression: &Expression, path: &Path) -> Self::ExpressionOutput;

    fn visit_list(
        &mut self,
        expression: &Expression,
        elements: &[Expression],
    ) -> Self::ExpressionOutput;
}

impl Predicate {
    pub fn accept<W: SemanticWalker + ?Sized>(&self, walker: &mut W) -> W::Output {
        match &self.kind {
            PredicateKind::Comparison(comparison) => walker.visit_comparison(self, comparison),
            PredicateKind::Junction(junction) => walker.visit_junction(self, junction),
            PredicateKind::Negation(negation) => walker.visit_negation(self, negation),
            PredicateKind::Nullness(nullness) => walker.visit_nullness(self, nullness),
            PredicateKind::Between(between) => walker.visit_between(self, between),
        }
    }
}

impl Expression {
    pub fn accept<W: SemanticWalker + ?Sized>(&self, walker: &mut W) -> W::ExpressionOutput {
        match &self.kind {
            ExpressionKind::Literal(value) => walker.visit_literal(self, value),
            ExpressionKind::Parameter(parameter) => walker.visit_parameter(self, parameter),
            ExpressionKind::Path(path) => walker.visit_path(self, path),
            ExpressionKind::List(elements) => walker.visit_list(self, elements),
        }
    }
}
