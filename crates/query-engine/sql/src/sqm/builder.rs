//! Construction of query tree nodes.

use std::fmt;
use std::sync::Arc;

use query_engine_metadata::metadata::{ComparisonOperator, Metadata, ScalarType, TypeResolver};

use super::ast::*;
use super::error::ConstructionError;

/// Supplies the services every node constructor needs: type resolution and node identity.
/// One builder serves one query compilation.
#[derive(Clone)]
pub struct NodeBuilder {
    resolver: Arc<dyn TypeResolver>,
}

impl fmt::Debug for NodeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBuilder").finish_non_exhaustive()
    }
}

impl NodeBuilder {
    pub fn new(resolver: Arc<dyn TypeResolver>) -> NodeBuilder {
        NodeBuilder { resolver }
    }

    /// A builder which knows no entities; every path resolves to `ScalarType::Any`.
    pub fn untyped() -> NodeBuilder {
        NodeBuilder::new(Arc::new(Metadata::empty()))
    }

    pub fn resolver(&self) -> &dyn TypeResolver {
        self.resolver.as_ref()
    }

    pub(crate) fn make_predicate(&self, kind: PredicateKind, alias: Option<String>) -> Predicate {
        Predicate::new(NodeId::fresh(), alias, kind)
    }

    pub(crate) fn make_expression(
        &self,
        result_type: ScalarType,
        kind: ExpressionKind,
        alias: Option<String>,
    ) -> Expression {
        Expression::new(NodeId::fresh(), result_type, alias, kind)
    }

    // Expressions //

    /// A literal, typed after its value.
    pub fn literal(&self, value: Value) -> Result<Expression, ConstructionError> {
        let result_type = match &value {
            Value::Null => ScalarType::Any,
            Value::Boolean(_) => ScalarType::Boolean,
            Value::Integer(_) => ScalarType::Bigint,
            Value::Float(_) => ScalarType::DoublePrecision,
            Value::String(_) => ScalarType::Text,
        };
        self.typed_literal(value, result_type)
    }

    /// A literal of an explicitly given type. NaN and the infinities have no literal spelling.
    pub fn typed_literal(
        &self,
        value: Value,
        result_type: ScalarType,
    ) -> Result<Expression, ConstructionError> {
        if let Value::Float(f) = value {
            if !f.is_finite() {
                return Err(ConstructionError::NonFiniteFloat(f));
            }
        }
        Ok(self.make_expression(result_type, ExpressionKind::Literal(value), None))
    }

    pub fn parameter(&self, parameter: Parameter, result_type: ScalarType) -> Expression {
        self.make_expression(result_type, ExpressionKind::Parameter(parameter), None)
    }

    /// A path to an attribute of a root, typed by the type resolver.
    pub fn path(&self, root: &QueryRoot, attribute: impl Into<String>) -> Expression {
        let attribute = attribute.into();
        let result_type = self.resolver.attribute_type(&root.entity, &attribute);
        self.make_expression(
            result_type,
            ExpressionKind::Path(Path {
                root: root.clone(),
                attribute,
            }),
            None,
        )
    }

    /// A list of values, typed after its first element.
    pub fn list(&self, elements: Vec<Expression>) -> Result<Expression, ConstructionError> {
        let first = elements.first().ok_or(ConstructionError::EmptyList)?;
        if elements.iter().any(Expression::is_list) {
            return Err(ConstructionError::ListNotAllowed("inside another list"));
        }
        let result_type = first.result_type;
        Ok(self.make_expression(result_type, ExpressionKind::List(elements), None))
    }

    /// The same expression under an alias. Children are shared with the original.
    pub fn aliased(&self, expression: &Expression, alias: impl Into<String>) -> Expression {
        let kind = match &expression.kind {
            ExpressionKind::Literal(value) => ExpressionKind::Literal(value.clone()),
            ExpressionKind::Parameter(parameter) => ExpressionKind::Parameter(parameter.clone()),
            ExpressionKind::Path(path) => ExpressionKind::Path(path.clone()),
            ExpressionKind::List(elements) => ExpressionKind::List(elements.clone()),
        };
        self.make_expression(expression.result_type, kind, Some(alias.into()))
    }

    // Predicates //

    /// `left <operator> right`. Multi-valued operators require a list on the right,
    /// all others refuse one.
    pub fn comparison(
        &self,
        left: Expression,
        operator: ComparisonOperator,
        right: Expression,
    ) -> Result<Predicate, ConstructionError> {
        if left.is_list() {
            return Err(ConstructionError::ListNotAllowed(
                "on the left-hand side of a comparison",
            ));
        }
        match (operator.is_multi_valued(), right.is_list()) {
            (true, false) => Err(ConstructionError::ListRequired(operator)),
            (false, true) => Err(ConstructionError::UnexpectedList(operator)),
            _ => Ok(self.make_predicate(
                PredicateKind::Comparison(Comparison {
                    left,
                    operator,
                    right,
                }),
                None,
            )),
        }
    }

    pub fn junction(
        &self,
        left: Predicate,
        operator: BooleanOperator,
        right: Predicate,
    ) -> Predicate {
        self.make_predicate(
            PredicateKind::Junction(Junction {
                left,
                operator,
                right,
            }),
            None,
        )
    }

    pub fn and(&self, left: Predicate, right: Predicate) -> Predicate {
        self.junction(left, BooleanOperator::And, right)
    }

    pub fn or(&self, left: Predicate, right: Predicate) -> Predicate {
        self.junction(left, BooleanOperator::Or, right)
    }

    /// Fold predicates into a left-nested chain of junctions, in order.
    pub fn junction_all(
        &self,
        operator: BooleanOperator,
        predicates: impl IntoIterator<Item = Predicate>,
    ) -> Result<Predicate, ConstructionError> {
        predicates
            .into_iter()
            .reduce(|left, right| self.junction(left, operator, right))
            .ok_or(ConstructionError::EmptyJunction)
    }

    pub fn and_all(
        &self,
        predicates: impl IntoIterator<Item = Predicate>,
    ) -> Result<Predicate, ConstructionError> {
        self.junction_all(BooleanOperator::And, predicates)
    }

    pub fn or_all(
        &self,
        predicates: impl IntoIterator<Item = Predicate>,
    ) -> Result<Predicate, ConstructionError> {
        self.junction_all(BooleanOperator::Or, predicates)
    }

    /// Wrap a predicate in a negation.
    pub fn not(&self, inner: Predicate) -> Predicate {
        self.make_predicate(PredicateKind::Negation(Negation { inner }), None)
    }

    pub fn nullness(
        &self,
        expression: Expression,
        negated: bool,
    ) -> Result<Predicate, ConstructionError> {
        if expression.is_list() {
            return Err(ConstructionError::ListNotAllowed("in a nullness test"));
        }
        Ok(self.make_predicate(
            PredicateKind::Nullness(Nullness {
                expression,
                negated,
            }),
            None,
        ))
    }

    pub fn is_null(&self, expression: Expression) -> Result<Predicate, ConstructionError> {
        self.nullness(expression, false)
    }

    pub fn is_not_null(&self, expression: Expression) -> Result<Predicate, ConstructionError> {
        self.nullness(expression, true)
    }

    pub fn between(
        &self,
        expression: Expression,
        lower: Expression,
        upper: Expression,
        negated: bool,
    ) -> Result<Predicate, ConstructionError> {
        if [&expression, &lower, &upper].iter().any(|e| e.is_list()) {
            return Err(ConstructionError::ListNotAllowed("in a between predicate"));
        }
        Ok(self.make_predicate(
            PredicateKind::Between(Between {
                expression,
                lower,
                upper,
                negated,
            }),
            None,
        ))
    }
}

impl Predicate {
    /// The logical negation of this predicate.
    ///
    /// Negation is lazy: the predicate is wrapped, not rewritten. See
    /// `push_down_negations` for the distributed form.
    pub fn negate(&self, builder: &NodeBuilder) -> Predicate {
        builder.not(self.clone())
    }
}
