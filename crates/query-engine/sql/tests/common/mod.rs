//! Common functions used across sqm test cases.

use std::collections::BTreeMap;
use std::sync::Arc;

use query_engine_metadata::metadata::{
    AttributeInfo, ComparisonOperator, EntitiesInfo, EntityInfo, Metadata, Nullable, ScalarType,
};
use query_engine_sql::sqm::ast::{Predicate, QueryRoot, Value};
use query_engine_sql::sqm::NodeBuilder;

/// A small catalog with a single `Item` entity.
pub fn metadata() -> Metadata {
    let attribute = |column_name: &str, r#type: ScalarType| AttributeInfo {
        column_name: column_name.to_string(),
        r#type,
        nullable: Nullable::Nullable,
    };
    let attributes = BTreeMap::from([
        ("name".to_string(), attribute("name", ScalarType::Text)),
        ("price".to_string(), attribute("price", ScalarType::Bigint)),
        ("stock".to_string(), attribute("stock", ScalarType::Integer)),
    ]);
    Metadata {
        entities: EntitiesInfo(BTreeMap::from([(
            "Item".to_string(),
            EntityInfo {
                schema_name: "public".to_string(),
                table_name: "item".to_string(),
                attributes,
            },
        )])),
    }
}

pub fn builder() -> NodeBuilder {
    NodeBuilder::new(Arc::new(metadata()))
}

pub fn item() -> QueryRoot {
    QueryRoot {
        entity: "Item".to_string(),
        alias: "i".to_string(),
    }
}

/// `i.<attribute> = <value>`
pub fn equals(builder: &NodeBuilder, attribute: &str, value: i64) -> Predicate {
    compare(builder, attribute, ComparisonOperator::Equals, value)
}

/// `i.<attribute> <operator> <value>`
pub fn compare(
    builder: &NodeBuilder,
    attribute: &str,
    operator: ComparisonOperator,
    value: i64,
) -> Predicate {
    builder
        .comparison(
            builder.path(&item(), attribute),
            operator,
            builder.literal(Value::Integer(value)).unwrap(),
        )
        .unwrap()
}
