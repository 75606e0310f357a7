//! Collect the parameters a query tree expects.

use indexmap::IndexSet;

use super::ast::*;
use super::walker::SemanticWalker;

/// The distinct parameters of a predicate, in the order they first appear.
pub fn collect_parameters(predicate: &Predicate) -> Vec<Parameter> {
    let mut collector = ParameterCollector::default();
    predicate.accept(&mut collector);
    collector.parameters.into_iter().collect()
}

#[derive(Default)]
struct ParameterCollector {
    parameters: IndexSet<Parameter>,
}

impl ParameterCollector {
    /// Predicates only matter for what they contain, so every variant walks its
    /// operands the same way.
    fn walk_operands(&mut self, predicate: &Predicate) {
        match predicate.operands() {
            Operands::Predicates(predicates) => {
                for operand in predicates {
                    operand.accept(self);
                }
            }
            Operands::Expressions(expressions) => {
                for operand in expressions {
                    operand.accept(self);
                }
            }
        }
    }
}

impl SemanticWalker for ParameterCollector {
    type Output = ();
    type ExpressionOutput = ();

    fn visit_comparison(&mut self, predicate: &Predicate, _comparison: &Comparison) {
        self.walk_operands(predicate);
    }

    fn visit_junction(&mut self, predicate: &Predicate, _junction: &Junction) {
        self.walk_operands(predicate);
    }

    fn visit_negation(&mut self, predicate: &Predicate, _negation: &Negation) {
        self.walk_operands(predicate);
    }

    fn visit_nullness(&mut self, predicate: &Predicate, _nullness: &Nullness) {
        self.walk_operands(predicate);
    }

    fn visit_between(&mut self, predicate: &Predicate, _between: &Between) {
        self.walk_operands(predicate);
    }

    fn visit_literal(&mut self, _expression: &Expression, _value: &Value) {}

    fn visit_parameter(&mut self, _expression: &Expression, parameter: &Parameter) {
        self.parameters.insert(parameter.clone());
    }

    fn visit_path(&mut self, _expression: &Expression, _path: &Path) {}

    fn visit_list(&mut self, _expression: &Expression, elements: &[Expression]) {
        for element in elements {
            element.accept(self);
        }
    }
}
