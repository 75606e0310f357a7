//! Type definitions of the semantic query model: the typed tree a query is analysed into.
//!
//! Nodes are immutable once built and are handed around through reference counted
//! handles, so a subtree may be shared by several parents. Equality and hashing of
//! handles follow node identity, never structure: two independently built but
//! identical subtrees are different nodes.

use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use query_engine_metadata::metadata::{ComparisonOperator, ScalarType};

/// The identity of a node, stable for the lifetime of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Identities are unique within the process, whichever builder asked for them.
    pub(crate) fn fresh() -> NodeId {
        static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A query root: an entity and the alias the query refers to it by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryRoot {
    pub entity: String,
    pub alias: String,
}

/// A select statement over a single root, optionally restricted by a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub root: QueryRoot,
    pub predicate: Option<Predicate>,
}

// Predicates //

/// A handle on a boolean-valued node.
#[derive(Debug, Clone)]
pub struct Predicate(Arc<PredicateNode>);

/// A boolean-valued node.
#[derive(Debug)]
pub struct PredicateNode {
    pub id: NodeId,
    pub alias: Option<String>,
    pub kind: PredicateKind,
}

/// The closed set of predicate variants.
#[derive(Debug)]
pub enum PredicateKind {
    Comparison(Comparison),
    Junction(Junction),
    Negation(Negation),
    Nullness(Nullness),
    Between(Between),
}

/// `left <operator> right`. Multi-valued operators take a list on the right.
#[derive(Debug)]
pub struct Comparison {
    pub left: Expression,
    pub operator: ComparisonOperator,
    pub right: Expression,
}

/// The operator joining the two sides of a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOperator {
    And,
    Or,
}

impl BooleanOperator {
    /// The operator De Morgan's law trades this one for.
    pub fn dual(self) -> BooleanOperator {
        match self {
            BooleanOperator::And => BooleanOperator::Or,
            BooleanOperator::Or => BooleanOperator::And,
        }
    }
}

/// `left and right`, `left or right`.
#[derive(Debug)]
pub struct Junction {
    pub left: Predicate,
    pub operator: BooleanOperator,
    pub right: Predicate,
}

/// `not inner`.
#[derive(Debug)]
pub struct Negation {
    pub inner: Predicate,
}

/// `expression is null`, `expression is not null`.
#[derive(Debug)]
pub struct Nullness {
    pub expression: Expression,
    pub negated: bool,
}

/// `expression between lower and upper`, `expression not between lower and upper`.
#[derive(Debug)]
pub struct Between {
    pub expression: Expression,
    pub lower: Expression,
    pub upper: Expression,
    pub negated: bool,
}

/// The operands of a predicate, in left-to-right order.
#[derive(Debug, PartialEq, Eq)]
pub enum Operands<'a> {
    Expressions(Vec<&'a Expression>),
    Predicates(Vec<&'a Predicate>),
}

impl Predicate {
    pub(crate) fn new(id: NodeId, alias: Option<String>, kind: PredicateKind) -> Predicate {
        Predicate(Arc::new(PredicateNode { id, alias, kind }))
    }

    /// Every predicate produces a boolean.
    pub fn result_type(&self) -> ScalarType {
        ScalarType::Boolean
    }

    /// Whether this predicate is the negated form of some other predicate.
    /// Derived from the variant, never stored separately.
    pub fn is_negated(&self) -> bool {
        match &self.kind {
            PredicateKind::Negation(_) => true,
            PredicateKind::Nullness(Nullness { negated, .. })
            | PredicateKind::Between(Between { negated, .. }) => *negated,
            PredicateKind::Comparison(_) | PredicateKind::Junction(_) => false,
        }
    }

    /// The junction operator, if this is a junction.
    pub fn operator(&self) -> Option<BooleanOperator> {
        match &self.kind {
            PredicateKind::Junction(junction) => Some(junction.operator),
            _ => None,
        }
    }

    /// The direct operands of this predicate, in left-to-right order.
    pub fn operands(&self) -> Operands<'_> {
        match &self.kind {
            PredicateKind::Comparison(comparison) => {
                Operands::Expressions(vec![&comparison.left, &comparison.right])
            }
            PredicateKind::Junction(junction) => {
                Operands::Predicates(vec![&junction.left, &junction.right])
            }
            PredicateKind::Negation(negation) => Operands::Predicates(vec![&negation.inner]),
            PredicateKind::Nullness(nullness) => Operands::Expressions(vec![&nullness.expression]),
            PredicateKind::Between(between) => Operands::Expressions(vec![
                &between.expression,
                &between.lower,
                &between.upper,
            ]),
        }
    }

    /// All the non-list expressions below this predicate, in left-to-right order.
    /// Elements of list expressions are included in place of the list itself.
    pub fn leaf_expressions(&self) -> Vec<&Expression> {
        let mut leaves = vec![];
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Expression>) {
        match self.operands() {
            Operands::Predicates(predicates) => {
                for predicate in predicates {
                    predicate.collect_leaves(leaves);
                }
            }
            Operands::Expressions(expressions) => {
                for expression in expressions {
                    expression.collect_leaves(leaves);
                }
            }
        }
    }

    /// Are these two handles on the same node.
    pub fn ptr_eq(&self, other: &Predicate) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Predicate {
    type Target = PredicateNode;

    fn deref(&self) -> &PredicateNode {
        &self.0
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Expressions //

/// A handle on a value-producing node.
#[derive(Debug, Clone)]
pub struct Expression(Arc<ExpressionNode>);

/// A value-producing node.
#[derive(Debug)]
pub struct ExpressionNode {
    pub id: NodeId,
    pub result_type: ScalarType,
    pub alias: Option<String>,
    pub kind: ExpressionKind,
}

/// The closed set of expression variants.
#[derive(Debug)]
pub enum ExpressionKind {
    /// An irreducible value
    Literal(Value),
    /// A value supplied when the query is executed
    Parameter(Parameter),
    /// An attribute of a query root
    Path(Path),
    /// A parenthesized list of values, the right-hand side of `in`
    List(Vec<Expression>),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A query parameter, either `:name` or `?1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Parameter {
    Named(String),
    Positional(u32),
}

/// A reference to an attribute of a query root, `alias.attribute`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub root: QueryRoot,
    pub attribute: String,
}

impl Expression {
    pub(crate) fn new(
        id: NodeId,
        result_type: ScalarType,
        alias: Option<String>,
        kind: ExpressionKind,
    ) -> Expression {
        Expression(Arc::new(ExpressionNode {
            id,
            result_type,
            alias,
            kind,
        }))
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Expression>) {
        match &self.kind {
            ExpressionKind::List(elements) => {
                for element in elements {
                    element.collect_leaves(leaves);
                }
            }
            _ => leaves.push(self),
        }
    }

    /// Is this a list expression.
    pub fn is_list(&self) -> bool {
        matches!(self.kind, ExpressionKind::List(_))
    }

    /// Are these two handles on the same node.
    pub fn ptr_eq(&self, other: &Expression) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Expression {
    type Target = ExpressionNode;

    fn deref(&self) -> &ExpressionNode {
        &self.0
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
