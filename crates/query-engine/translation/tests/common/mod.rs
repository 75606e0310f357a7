use std::fs;
use std::path::PathBuf;

use query_engine_sql::sql;
use query_engine_translation::translation;

/// Translate the request of a golden file directory under its configuration, and render the
/// result for comparison against the snapshot.
pub async fn test_translation(testname: &str) -> anyhow::Result<String> {
    let directory = PathBuf::from("tests/goldenfiles").join(testname);

    let parsed_configuration = sqm_configuration::parse_configuration(&directory).await?;
    let configuration = sqm_configuration::make_runtime_configuration(parsed_configuration)?;

    let request = serde_json::from_str(&fs::read_to_string(directory.join("request.json"))?)?;

    let plan = translation::query::translate(&configuration, request)?;
    let query = plan.query_sql();
    let params: Vec<(usize, &sql::string::Param)> = query
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, p))
        .collect();

    Ok(format!("{}\n\n{}\n\n{:?}", plan.hql, query.sql, params))
}
