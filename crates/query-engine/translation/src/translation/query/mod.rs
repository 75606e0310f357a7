//! Translate an incoming `QueryRequest`.

pub mod analysis;
pub mod filtering;
pub mod values;

use query_engine_sql::sql;
use query_engine_sql::sqm::ast::SelectStatement;
use query_engine_sql::sqm::negation::push_down_negations;
use query_engine_sql::sqm::parameters::collect_parameters;
use query_engine_sql::sqm::CopyContext;
use sqm_configuration::{Configuration, NegationStrategy};

use super::error::Error;
use super::helpers::Env;
use super::request::QueryRequest;

/// Translate the incoming QueryRequest to an ExecutionPlan (SQL) to be run against the database.
pub fn translate(
    configuration: &Configuration,
    query_request: QueryRequest,
) -> Result<sql::execution_plan::ExecutionPlan, Error> {
    prepare(configuration, &query_request)?.plan()
}

/// A request analysed once, planned any number of times.
pub struct PreparedQuery {
    env: Env,
    negation_strategy: NegationStrategy,
    statement: SelectStatement,
}

/// Analyse a request against the configured metadata.
pub fn prepare(
    configuration: &Configuration,
    query_request: &QueryRequest,
) -> Result<PreparedQuery, Error> {
    tracing::info!(
        entity = %query_request.entity,
        alias = %query_request.alias,
        "analysing query request"
    );
    let env = Env::new(configuration);
    let statement = analysis::analyse_request(&env, query_request)?;
    Ok(PreparedQuery {
        env,
        negation_strategy: configuration.negation_strategy,
        statement,
    })
}

impl PreparedQuery {
    /// The analysed statement.
    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }

    /// Plan one invocation of the query. Every invocation works on its own copy of the tree.
    pub fn plan(&self) -> Result<sql::execution_plan::ExecutionPlan, Error> {
        let builder = self.env.builder();
        let mut statement = self.statement.copy(&mut CopyContext::new(builder));
        if self.negation_strategy == NegationStrategy::Distribute {
            statement.predicate = statement
                .predicate
                .map(|predicate| push_down_negations(&predicate, builder));
        }

        let hql = statement.render_hql();
        let parameters = statement
            .predicate
            .as_ref()
            .map(collect_parameters)
            .unwrap_or_default();

        let entity = self.env.lookup_entity(&statement.root.entity)?;
        let table_alias = sql::helpers::make_table_alias(statement.root.alias.clone());
        let from = sql::ast::From::Table {
            reference: sql::ast::TableReference::DBTable {
                schema: sql::ast::SchemaName(entity.schema_name.clone()),
                table: sql::ast::TableName(entity.table_name.clone()),
            },
            alias: table_alias.clone(),
        };
        let where_ = match &statement.predicate {
            Some(predicate) => filtering::translate_predicate(
                &self.env,
                &statement.root,
                &table_alias,
                predicate,
            )?,
            None => sql::helpers::empty_where(),
        };
        let select = sql::helpers::star_select(from, where_);

        // log and return
        tracing::info!(hql = %hql, "SQL AST: {:?}", select);
        Ok(sql::execution_plan::simple_exec_plan(
            statement.root.entity,
            hql,
            parameters,
            select,
        ))
    }
}
