//! Tests that configuration can be written, read back and checked.

use std::collections::BTreeMap;

use similar_asserts::assert_eq;

use query_engine_metadata::metadata::{
    AttributeInfo, EntitiesInfo, EntityInfo, Metadata, Nullable, ScalarType,
};
use sqm_configuration::error::{MakeRuntimeConfigurationError, ParseConfigurationError};
use sqm_configuration::{
    make_runtime_configuration, parse_configuration, write_parsed_configuration, Dialect,
    NegationStrategy, ParsedConfiguration, CONFIGURATION_FILENAME,
    CONFIGURATION_JSONSCHEMA_FILENAME,
};

fn item_entity() -> EntityInfo {
    EntityInfo {
        schema_name: "public".to_string(),
        table_name: "item".to_string(),
        attributes: BTreeMap::from([(
            "price".to_string(),
            AttributeInfo {
                column_name: "price".to_string(),
                r#type: ScalarType::Bigint,
                nullable: Nullable::NonNullable,
            },
        )]),
    }
}

fn configuration_with(entity: EntityInfo) -> ParsedConfiguration {
    ParsedConfiguration {
        dialect: Dialect::BigQuery,
        negation_strategy: NegationStrategy::Distribute,
        metadata: Metadata {
            entities: EntitiesInfo(BTreeMap::from([("Item".to_string(), entity)])),
        },
        ..ParsedConfiguration::initial()
    }
}

#[tokio::test]
async fn configuration_round_trips_through_a_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let configuration = configuration_with(item_entity());

    write_parsed_configuration(configuration.clone(), dir.path())
        .await
        .expect("write_parsed_configuration");
    let parsed = parse_configuration(dir.path())
        .await
        .expect("parse_configuration");

    assert_eq!(parsed, configuration);
}

#[tokio::test]
async fn written_configuration_satisfies_written_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_parsed_configuration(configuration_with(item_entity()), dir.path())
        .await
        .expect("write_parsed_configuration");

    let read_json = |file: &str| -> serde_json::Value {
        let contents = std::fs::read_to_string(dir.path().join(file)).expect("read_to_string");
        serde_json::from_str(&contents).expect("from_str")
    };
    let schema = read_json(CONFIGURATION_JSONSCHEMA_FILENAME);
    let instance = read_json(CONFIGURATION_FILENAME);

    let compiled = jsonschema::JSONSchema::compile(&schema).expect("JSONSchema::compile");
    assert!(compiled.is_valid(&instance));
    assert!(!compiled.is_valid(&serde_json::json!({ "version": "2" })));
}

#[tokio::test]
async fn omitted_settings_take_their_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(CONFIGURATION_FILENAME), r#"{ "version": "1" }"#)
        .expect("write");

    let parsed = parse_configuration(dir.path())
        .await
        .expect("parse_configuration");

    assert_eq!(parsed.dialect, Dialect::Postgres);
    assert_eq!(parsed.negation_strategy, NegationStrategy::Wrap);
    assert_eq!(parsed.metadata, Metadata::empty());
    assert_eq!(parsed.schema, None);
}

#[tokio::test]
async fn parse_errors_point_at_the_problem() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(CONFIGURATION_FILENAME),
        "{\n  \"version\": \"1\",\n  \"dialect\": \"oracle\"\n}\n",
    )
    .expect("write");

    match parse_configuration(dir.path()).await {
        Err(ParseConfigurationError::ParseError {
            file_path, line, ..
        }) => {
            assert_eq!(file_path, dir.path().join(CONFIGURATION_FILENAME));
            assert_eq!(line, 3);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_versions_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(CONFIGURATION_FILENAME), r#"{ "version": "2" }"#)
        .expect("write");

    let result = parse_configuration(dir.path()).await;
    assert!(
        matches!(result, Err(ParseConfigurationError::ParseError { .. })),
        "{result:?}"
    );
}

#[tokio::test]
async fn missing_directories_are_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nowhere");

    let result = parse_configuration(&missing).await;
    assert!(
        matches!(
            &result,
            Err(ParseConfigurationError::MissingConfigurationDirectory(path)) if *path == missing
        ),
        "{result:?}"
    );
}

#[test]
fn runtime_configuration_keeps_settings() {
    let configuration =
        make_runtime_configuration(configuration_with(item_entity())).expect("valid");
    assert_eq!(configuration.dialect, Dialect::BigQuery);
    assert_eq!(configuration.negation_strategy, NegationStrategy::Distribute);
    assert_eq!(
        configuration
            .metadata
            .lookup_attribute("Item", "price")
            .map(|attribute| attribute.r#type),
        Some(ScalarType::Bigint)
    );
}

#[test]
fn entities_need_a_table_and_attributes() {
    let no_table = EntityInfo {
        table_name: String::new(),
        ..item_entity()
    };
    assert_eq!(
        make_runtime_configuration(configuration_with(no_table)).unwrap_err(),
        MakeRuntimeConfigurationError::MissingTableName {
            entity: "Item".to_string()
        }
    );

    let no_attributes = EntityInfo {
        attributes: BTreeMap::new(),
        ..item_entity()
    };
    assert_eq!(
        make_runtime_configuration(configuration_with(no_attributes)).unwrap_err(),
        MakeRuntimeConfigurationError::NoAttributes {
            entity: "Item".to_string()
        }
    );

    let mut no_column = item_entity();
    for attribute in no_column.attributes.values_mut() {
        attribute.column_name = String::new();
    }
    assert_eq!(
        make_runtime_configuration(configuration_with(no_column))
            .unwrap_err()
            .to_string(),
        "attribute 'price' of entity 'Item' has no column name"
    );
}
