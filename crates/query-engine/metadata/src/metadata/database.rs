//! Metadata information regarding the mapped entities and their relational storage.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The scalar types supported by the Engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Boolean,
    Smallint,
    Integer,
    Bigint,
    Real,
    #[serde(rename = "double precision")]
    DoublePrecision,
    Numeric,
    Character,
    #[serde(rename = "character varying")]
    CharacterVarying,
    Text,
    Json,
    Date,
    #[serde(rename = "timestamp with time zone")]
    TimestampWithTimeZone,
    #[serde(rename = "timestamp without time zone")]
    TimestampWithoutTimeZone,
    Uuid,
    Any,
}

impl ScalarType {
    const OPERATORS_SUPPORTED_BY_ALL_TYPES: &'static [ComparisonOperator] = &[
        ComparisonOperator::Equals,
        ComparisonOperator::NotEquals,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessThanOrEqualTo,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThanOrEqualTo,
        ComparisonOperator::In,
        ComparisonOperator::NotIn,
    ];

    const STRING_OPERATORS: &'static [ComparisonOperator] = &[
        ComparisonOperator::Like,
        ComparisonOperator::NotLike,
        ComparisonOperator::CaseInsensitiveLike,
        ComparisonOperator::NotCaseInsensitiveLike,
    ];

    /// Returns the complete set of comparison operators for the given type.
    pub fn comparison_operators(&self) -> BTreeSet<ComparisonOperator> {
        let mut operators =
            BTreeSet::from_iter(Self::OPERATORS_SUPPORTED_BY_ALL_TYPES.iter().copied());
        operators.extend(match self {
            ScalarType::Character
            | ScalarType::CharacterVarying
            | ScalarType::Text
            | ScalarType::Any => Self::STRING_OPERATORS.iter(),
            _ => [].iter(),
        });
        operators
    }

    /// Types whose values are written as quoted strings.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            ScalarType::Character
                | ScalarType::CharacterVarying
                | ScalarType::Text
                | ScalarType::Json
                | ScalarType::Date
                | ScalarType::TimestampWithTimeZone
                | ScalarType::TimestampWithoutTimeZone
                | ScalarType::Uuid
        )
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::DoublePrecision => write!(f, "double precision"),
            ScalarType::CharacterVarying => write!(f, "character varying"),
            ScalarType::TimestampWithTimeZone => write!(f, "timestamp with time zone"),
            ScalarType::TimestampWithoutTimeZone => write!(f, "timestamp without time zone"),
            _ => f.write_str(&format!("{self:?}").to_lowercase()),
        }
    }
}

/// The complete list of supported comparison operators for scalar types.
/// Not all of these are supported for every type.
///
/// Every operator has a complement (`negated`) which is equivalent to its
/// negation under SQL's three-valued logic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Sequence,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum ComparisonOperator {
    #[serde(rename = "_eq")]
    Equals,
    #[serde(rename = "_neq")]
    NotEquals,
    #[serde(rename = "_lt")]
    LessThan,
    #[serde(rename = "_lte")]
    LessThanOrEqualTo,
    #[serde(rename = "_gt")]
    GreaterThan,
    #[serde(rename = "_gte")]
    GreaterThanOrEqualTo,
    #[serde(rename = "_like")]
    Like,
    #[serde(rename = "_nlike")]
    NotLike,
    #[serde(rename = "_ilike")]
    CaseInsensitiveLike,
    #[serde(rename = "_nilike")]
    NotCaseInsensitiveLike,
    #[serde(rename = "_in")]
    In,
    #[serde(rename = "_nin")]
    NotIn,
}

impl ComparisonOperator {
    /// The name of the operator as it appears in requests and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals => "_eq",
            Self::NotEquals => "_neq",
            Self::LessThan => "_lt",
            Self::LessThanOrEqualTo => "_lte",
            Self::GreaterThan => "_gt",
            Self::GreaterThanOrEqualTo => "_gte",
            Self::Like => "_like",
            Self::NotLike => "_nlike",
            Self::CaseInsensitiveLike => "_ilike",
            Self::NotCaseInsensitiveLike => "_nilike",
            Self::In => "_in",
            Self::NotIn => "_nin",
        }
    }

    /// The operator which holds exactly when this one does not hold
    /// (and which is unknown exactly when this one is unknown).
    pub fn negated(&self) -> Self {
        match self {
            Self::Equals => Self::NotEquals,
            Self::NotEquals => Self::Equals,
            Self::LessThan => Self::GreaterThanOrEqualTo,
            Self::GreaterThanOrEqualTo => Self::LessThan,
            Self::LessThanOrEqualTo => Self::GreaterThan,
            Self::GreaterThan => Self::LessThanOrEqualTo,
            Self::Like => Self::NotLike,
            Self::NotLike => Self::Like,
            Self::CaseInsensitiveLike => Self::NotCaseInsensitiveLike,
            Self::NotCaseInsensitiveLike => Self::CaseInsensitiveLike,
            Self::In => Self::NotIn,
            Self::NotIn => Self::In,
        }
    }

    /// Operators whose right-hand side is a list of values rather than a single value.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Computes the argument type on the right-hand side of the operator,
    /// given the type of the value on the left-hand side.
    ///
    /// In practice, operators are always assumed to be operating on two values
    /// of the same type, so this just returns its input.
    pub fn rhs_argument_type(&self, lhs: ScalarType) -> ScalarType {
        lhs
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mapping from an entity name to its information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct EntitiesInfo(pub BTreeMap<String, EntityInfo>);

impl EntitiesInfo {
    pub fn empty() -> Self {
        EntitiesInfo(BTreeMap::new())
    }
}

/// Information about a mapped entity and the table it is stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
    pub schema_name: String,
    pub table_name: String,
    pub attributes: BTreeMap<String, AttributeInfo>,
}

/// Can this attribute contain null values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Nullable {
    #[default]
    Nullable,
    NonNullable,
}

/// Information about a mapped attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInfo {
    pub column_name: String,
    pub r#type: ScalarType,
    #[serde(default)]
    pub nullable: Nullable,
}
