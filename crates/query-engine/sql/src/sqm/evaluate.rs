//! In-memory evaluation of predicates under SQL's three-valued logic.
//!
//! Used to check that rewrites of a predicate keep its meaning for every
//! assignment of values, null included.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Not;

use query_engine_metadata::metadata::ComparisonOperator;

use super::ast::*;
use super::walker::SemanticWalker;

/// A truth value of three-valued (Kleene) logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruthValue {
    True,
    False,
    Unknown,
}

impl TruthValue {
    pub const ALL: [TruthValue; 3] = [TruthValue::True, TruthValue::False, TruthValue::Unknown];

    pub fn and(self, other: TruthValue) -> TruthValue {
        match (self, other) {
            (TruthValue::False, _) | (_, TruthValue::False) => TruthValue::False,
            (TruthValue::True, TruthValue::True) => TruthValue::True,
            _ => TruthValue::Unknown,
        }
    }

    pub fn or(self, other: TruthValue) -> TruthValue {
        match (self, other) {
            (TruthValue::True, _) | (_, TruthValue::True) => TruthValue::True,
            (TruthValue::False, TruthValue::False) => TruthValue::False,
            _ => TruthValue::Unknown,
        }
    }
}

impl Not for TruthValue {
    type Output = TruthValue;

    fn not(self) -> TruthValue {
        match self {
            TruthValue::True => TruthValue::False,
            TruthValue::False => TruthValue::True,
            TruthValue::Unknown => TruthValue::Unknown,
        }
    }
}

impl From<bool> for TruthValue {
    fn from(value: bool) -> Self {
        if value {
            TruthValue::True
        } else {
            TruthValue::False
        }
    }
}

/// Values for the paths and parameters of a predicate. Anything unbound is null.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    paths: HashMap<(String, String), Value>,
    parameters: HashMap<Parameter, Value>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    #[must_use]
    pub fn with_path(mut self, alias: &str, attribute: &str, value: Value) -> Bindings {
        self.paths
            .insert((alias.to_string(), attribute.to_string()), value);
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter, value: Value) -> Bindings {
        self.parameters.insert(parameter, value);
        self
    }
}

/// Evaluate a predicate against the given bindings.
pub fn evaluate(predicate: &Predicate, bindings: &Bindings) -> TruthValue {
    predicate.accept(&mut Evaluator { bindings })
}

/// What an expression evaluates to.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Value),
    List(Vec<Value>),
}

struct Evaluator<'a> {
    bindings: &'a Bindings,
}

impl Evaluator<'_> {
    fn scalar(&mut self, expression: &Expression) -> Value {
        match expression.accept(self) {
            Operand::Scalar(value) => value,
            Operand::List(_) => Value::Null,
        }
    }
}

impl SemanticWalker for Evaluator<'_> {
    type Output = TruthValue;
    type ExpressionOutput = Operand;

    fn visit_comparison(&mut self, _predicate: &Predicate, comparison: &Comparison) -> TruthValue {
        let left = self.scalar(&comparison.left);
        let right = comparison.right.accept(self);
        match (comparison.operator, right) {
            (ComparisonOperator::In, Operand::List(values)) => is_in(&left, &values),
            (ComparisonOperator::NotIn, Operand::List(values)) => !is_in(&left, &values),
            (operator, Operand::Scalar(right)) => compare(&left, operator, &right),
            (_, Operand::List(_)) => TruthValue::Unknown,
        }
    }

    fn visit_junction(&mut self, _predicate: &Predicate, junction: &Junction) -> TruthValue {
        let left = junction.left.accept(self);
        let right = junction.right.accept(self);
        match junction.operator {
            BooleanOperator::And => left.and(right),
            BooleanOperator::Or => left.or(right),
        }
    }

    fn visit_negation(&mut self, _predicate: &Predicate, negation: &Negation) -> TruthValue {
        !negation.inner.accept(self)
    }

    fn visit_nullness(&mut self, _predicate: &Predicate, nullness: &Nullness) -> TruthValue {
        let is_null = self.scalar(&nullness.expression) == Value::Null;
        TruthValue::from(is_null != nullness.negated)
    }

    fn visit_between(&mut self, _predicate: &Predicate, between: &Between) -> TruthValue {
        let value = self.scalar(&between.expression);
        let lower = self.scalar(&between.lower);
        let upper = self.scalar(&between.upper);
        let result = compare(&value, ComparisonOperator::GreaterThanOrEqualTo, &lower).and(
            compare(&value, ComparisonOperator::LessThanOrEqualTo, &upper),
        );
        if between.negated {
            !result
        } else {
            result
        }
    }

    fn visit_literal(&mut self, _expression: &Expression, value: &Value) -> Operand {
        Operand::Scalar(value.clone())
    }

    fn visit_parameter(&mut self, _expression: &Expression, parameter: &Parameter) -> Operand {
        Operand::Scalar(
            self.bindings
                .parameters
                .get(parameter)
                .cloned()
                .unwrap_or(Value::Null),
        )
    }

    fn visit_path(&mut self, _expression: &Expression, path: &Path) -> Operand {
        let key = (path.root.alias.clone(), path.attribute.clone());
        Operand::Scalar(self.bindings.paths.get(&key).cloned().unwrap_or(Value::Null))
    }

    fn visit_list(&mut self, _expression: &Expression, elements: &[Expression]) -> Operand {
        Operand::List(elements.iter().map(|element| self.scalar(element)).collect())
    }
}

/// `left in (values)`: true on any match, otherwise unknown if anything was null.
fn is_in(left: &Value, values: &[Value]) -> TruthValue {
    values
        .iter()
        .map(|value| compare(left, ComparisonOperator::Equals, value))
        .fold(TruthValue::False, TruthValue::or)
}

fn compare(left: &Value, operator: ComparisonOperator, right: &Value) -> TruthValue {
    if *left == Value::Null || *right == Value::Null {
        return TruthValue::Unknown;
    }
    match operator {
        ComparisonOperator::Like => like(left, right, false),
        ComparisonOperator::NotLike => !like(left, right, false),
        ComparisonOperator::CaseInsensitiveLike => like(left, right, true),
        ComparisonOperator::NotCaseInsensitiveLike => !like(left, right, true),
        ComparisonOperator::In => compare(left, ComparisonOperator::Equals, right),
        ComparisonOperator::NotIn => compare(left, ComparisonOperator::NotEquals, right),
        _ => match order(left, right) {
            None => TruthValue::Unknown,
            Some(ordering) => TruthValue::from(match operator {
                ComparisonOperator::Equals => ordering == Ordering::Equal,
                ComparisonOperator::NotEquals => ordering != Ordering::Equal,
                ComparisonOperator::LessThan => ordering == Ordering::Less,
                ComparisonOperator::LessThanOrEqualTo => ordering != Ordering::Greater,
                ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }),
        },
    }
}

#[allow(clippy::cast_precision_loss)]
fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => Some(l.cmp(r)),
        (Value::Integer(l), Value::Float(r)) => (*l as f64).partial_cmp(r),
        (Value::Float(l), Value::Integer(r)) => l.partial_cmp(&(*r as f64)),
        (Value::Float(l), Value::Float(r)) => l.partial_cmp(r),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Boolean(l), Value::Boolean(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

fn like(text: &Value, pattern: &Value, case_insensitive: bool) -> TruthValue {
    let (Value::String(text), Value::String(pattern)) = (text, pattern) else {
        return TruthValue::Unknown;
    };
    let (text, pattern) = if case_insensitive {
        (text.to_lowercase(), pattern.to_lowercase())
    } else {
        (text.clone(), pattern.clone())
    };
    let text = text.chars().collect::<Vec<char>>();
    let pattern = pattern.chars().collect::<Vec<char>>();
    TruthValue::from(like_matches(&text, &pattern))
}

/// `%` matches any run of characters, `_` exactly one.
fn like_matches(text: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('%', rest)) => (0..=text.len()).any(|skip| like_matches(&text[skip..], rest)),
        Some(('_', rest)) => !text.is_empty() && like_matches(&text[1..], rest),
        Some((c, rest)) => text.first() == Some(c) && like_matches(&text[1..], rest),
    }
}
