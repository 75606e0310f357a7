//! Render a query tree back to HQL text.
//!
//! Parentheses are only emitted where leaving them out would change how the text
//! groups: an operand is wrapped when it binds more loosely than its parent. The
//! output is stable, so re-rendering a re-parsed rendering yields the same text.

use std::fmt;

use query_engine_metadata::metadata::ComparisonOperator;

use super::ast::*;
use super::walker::SemanticWalker;

/// Binding strengths, loosest first.
pub const OR_BINDING: u8 = 1;
pub const AND_BINDING: u8 = 2;
pub const NOT_BINDING: u8 = 3;
pub const ATOM_BINDING: u8 = 4;

/// An append-only HQL text buffer.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Hql {
    pub hql: String,
}

impl Hql {
    pub fn new() -> Hql {
        Hql::default()
    }

    pub fn append_syntax(&mut self, hql: &str) {
        self.hql.push_str(hql);
    }

    /// Append a name. Names which would not read back as a single identifier, such as
    /// `unit price` or `and`, are quoted with backticks, embedded backticks doubled.
    pub fn append_identifier(&mut self, identifier: &str) {
        if is_plain_identifier(identifier) {
            self.hql.push_str(identifier);
        } else {
            self.hql.push('`');
            self.hql.push_str(&identifier.replace('`', "``"));
            self.hql.push('`');
        }
    }

    pub fn append_string_literal(&mut self, value: &str) {
        self.hql.push('\'');
        self.hql.push_str(&value.replace('\'', "''"));
        self.hql.push('\'');
    }

    pub fn into_string(self) -> String {
        self.hql
    }
}

/// Words with a meaning of their own in the rendered text.
const RESERVED_WORDS: &[&str] = &[
    "and", "between", "false", "from", "ilike", "in", "is", "like", "not", "null", "or",
    "select", "true", "where",
];

fn is_plain_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED_WORDS.contains(&identifier.to_ascii_lowercase().as_str())
}

impl Predicate {
    /// How tightly this predicate binds its operands.
    pub fn binding_strength(&self) -> u8 {
        match &self.kind {
            PredicateKind::Junction(Junction {
                operator: BooleanOperator::Or,
                ..
            }) => OR_BINDING,
            PredicateKind::Junction(Junction {
                operator: BooleanOperator::And,
                ..
            }) => AND_BINDING,
            PredicateKind::Negation(_) => NOT_BINDING,
            PredicateKind::Comparison(_)
            | PredicateKind::Nullness(_)
            | PredicateKind::Between(_) => ATOM_BINDING,
        }
    }

    pub fn to_hql(&self, hql: &mut Hql) {
        self.accept(&mut HqlRenderer { hql });
    }

    pub fn render_hql(&self) -> String {
        let mut hql = Hql::new();
        self.to_hql(&mut hql);
        hql.into_string()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_hql())
    }
}

impl Expression {
    pub fn to_hql(&self, hql: &mut Hql) {
        self.accept(&mut HqlRenderer { hql });
    }

    pub fn render_hql(&self) -> String {
        let mut hql = Hql::new();
        self.to_hql(&mut hql);
        hql.into_string()
    }
}

impl SelectStatement {
    pub fn to_hql(&self, hql: &mut Hql) {
        hql.append_syntax("select ");
        hql.append_identifier(&self.root.alias);
        hql.append_syntax(" from ");
        hql.append_identifier(&self.root.entity);
        hql.append_syntax(" ");
        hql.append_identifier(&self.root.alias);
        if let Some(predicate) = &self.predicate {
            hql.append_syntax(" where ");
            predicate.to_hql(hql);
        }
    }

    pub fn render_hql(&self) -> String {
        let mut hql = Hql::new();
        self.to_hql(&mut hql);
        hql.into_string()
    }
}

/// The HQL spelling of a comparison operator.
pub fn hql_operator(operator: ComparisonOperator) -> &'static str {
    match operator {
        ComparisonOperator::Equals => "=",
        ComparisonOperator::NotEquals => "<>",
        ComparisonOperator::LessThan => "<",
        ComparisonOperator::LessThanOrEqualTo => "<=",
        ComparisonOperator::GreaterThan => ">",
        ComparisonOperator::GreaterThanOrEqualTo => ">=",
        ComparisonOperator::Like => "like",
        ComparisonOperator::NotLike => "not like",
        ComparisonOperator::CaseInsensitiveLike => "ilike",
        ComparisonOperator::NotCaseInsensitiveLike => "not ilike",
        ComparisonOperator::In => "in",
        ComparisonOperator::NotIn => "not in",
    }
}

struct HqlRenderer<'a> {
    hql: &'a mut Hql,
}

impl HqlRenderer<'_> {
    fn append_operand(&mut self, operand: &Predicate, parent_binding: u8) {
        if operand.binding_strength() < parent_binding {
            self.hql.append_syntax("(");
            operand.accept(self);
            self.hql.append_syntax(")");
        } else {
            operand.accept(self);
        }
    }
}

impl SemanticWalker for HqlRenderer<'_> {
    type Output = ();
    type ExpressionOutput = ();

    fn visit_comparison(&mut self, _predicate: &Predicate, comparison: &Comparison) {
        comparison.left.accept(self);
        self.hql.append_syntax(" ");
        self.hql.append_syntax(hql_operator(comparison.operator));
        self.hql.append_syntax(" ");
        comparison.right.accept(self);
    }

    fn visit_junction(&mut self, predicate: &Predicate, junction: &Junction) {
        let binding = predicate.binding_strength();
        self.append_operand(&junction.left, binding);
        match junction.operator {
            BooleanOperator::And => self.hql.append_syntax(" and "),
            BooleanOperator::Or => self.hql.append_syntax(" or "),
        }
        self.append_operand(&junction.right, binding);
    }

    fn visit_negation(&mut self, predicate: &Predicate, negation: &Negation) {
        self.hql.append_syntax("not ");
        self.append_operand(&negation.inner, predicate.binding_strength());
    }

    fn visit_nullness(&mut self, _predicate: &Predicate, nullness: &Nullness) {
        nullness.expression.accept(self);
        if nullness.negated {
            self.hql.append_syntax(" is not null");
        } else {
            self.hql.append_syntax(" is null");
        }
    }

    fn visit_between(&mut self, _predicate: &Predicate, between: &Between) {
        between.expression.accept(self);
        if between.negated {
            self.hql.append_syntax(" not between ");
        } else {
            self.hql.append_syntax(" between ");
        }
        between.lower.accept(self);
        self.hql.append_syntax(" and ");
        between.upper.accept(self);
    }

    fn visit_literal(&mut self, _expression: &Expression, value: &Value) {
        match value {
            Value::Null => self.hql.append_syntax("null"),
            Value::Boolean(true) => self.hql.append_syntax("true"),
            Value::Boolean(false) => self.hql.append_syntax("false"),
            Value::Integer(i) => self.hql.append_syntax(&i.to_string()),
            // debug formatting keeps the fractional part of whole numbers
            Value::Float(f) => self.hql.append_syntax(&format!("{f:?}")),
            Value::String(s) => self.hql.append_string_literal(s),
        }
    }

    fn visit_parameter(&mut self, _expression: &Expression, parameter: &Parameter) {
        match parameter {
            Parameter::Named(name) => {
                self.hql.append_syntax(":");
                self.hql.append_identifier(name);
            }
            Parameter::Positional(position) => {
                self.hql.append_syntax("?");
                self.hql.append_syntax(&position.to_string());
            }
        }
    }

    fn visit_path(&mut self, _expression: &Expression, path: &Path) {
        self.hql.append_identifier(&path.root.alias);
        self.hql.append_syntax(".");
        self.hql.append_identifier(&path.attribute);
    }

    fn visit_list(&mut self, _expression: &Expression, elements: &[Expression]) {
        self.hql.append_syntax("(");
        for (index, element) in elements.iter().enumerate() {
            element.accept(self);
            if index < (elements.len() - 1) {
                self.hql.append_syntax(", ");
            }
        }
        self.hql.append_syntax(")");
    }
}
