use std::collections::BTreeMap;

use query_engine_metadata::metadata::{InstantiationError, InstantiatorRegistry, PropertyValues};
use serde::Deserialize;
use similar_asserts::assert_eq;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct MonetaryAmount {
    amount: i64,
    currency: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Address {
    street: String,
}

fn amount_values() -> PropertyValues {
    BTreeMap::from([
        ("amount".to_string(), serde_json::json!(250)),
        ("currency".to_string(), serde_json::json!("EUR")),
    ])
}

fn registry() -> InstantiatorRegistry {
    let mut registry = InstantiatorRegistry::new();
    registry.register::<MonetaryAmount>("MonetaryAmount");
    registry.register_abstract("Money");
    registry.register_with("Address", |values: &PropertyValues| {
        let street = values
            .get("street")
            .and_then(serde_json::Value::as_str)
            .ok_or("street is required")?;
        Ok(Address {
            street: street.to_string(),
        })
    });
    registry
}

#[test]
fn it_instantiates_registered_types() {
    let amount: MonetaryAmount = registry()
        .instantiate_as("MonetaryAmount", &amount_values())
        .unwrap();

    assert_eq!(
        amount,
        MonetaryAmount {
            amount: 250,
            currency: "EUR".to_string(),
        }
    );
}

#[test]
fn it_instantiates_with_explicit_constructors() {
    let values = BTreeMap::from([("street".to_string(), serde_json::json!("Main St"))]);
    let address: Address = registry().instantiate_as("Address", &values).unwrap();

    assert_eq!(address.street, "Main St");
}

#[test]
fn it_reports_types_without_a_constructor() {
    let registry = registry();
    assert!(!registry.contains("Coin"));

    let result = registry.instantiate("Coin", &amount_values());

    match result {
        Err(InstantiationError::NoConstructor { type_name }) => assert_eq!(type_name, "Coin"),
        other => panic!("expected a missing constructor, got {other:?}"),
    }
}

#[test]
fn it_refuses_abstract_types() {
    let error = registry()
        .instantiate("Money", &amount_values())
        .unwrap_err();

    assert!(matches!(error, InstantiationError::Abstract { .. }));
    assert_eq!(error.type_name(), "Money");
    assert_eq!(error.to_string(), "cannot instantiate abstract type: Money");
}

#[test]
fn it_carries_the_cause_of_a_failed_construction() {
    let values = BTreeMap::from([("amount".to_string(), serde_json::json!(250))]);

    let error = registry()
        .instantiate("MonetaryAmount", &values)
        .unwrap_err();

    assert_eq!(error.type_name(), "MonetaryAmount");
    let InstantiationError::Failed { source, .. } = &error else {
        panic!("expected a failed construction, got {error:?}");
    };
    assert!(source.to_string().contains("currency"));
}

#[test]
fn it_rejects_the_wrong_target_type() {
    let error = registry()
        .instantiate_as::<Address>("MonetaryAmount", &amount_values())
        .unwrap_err();

    assert!(matches!(error, InstantiationError::UnexpectedType { .. }));
}
