//! Describe the translated form of a query: its HQL rendering and the SQL to run.

use super::ast;
use super::string;
use crate::sqm;

#[derive(Debug)]
/// Definition of an execution plan to be run against the database.
pub struct ExecutionPlan {
    /// The entity the query selects from.
    pub root_entity: String,
    /// The query rendered back to HQL, usable as a cache key.
    pub hql: String,
    /// The parameters the query expects, in order of first appearance.
    pub parameters: Vec<sqm::ast::Parameter>,
    /// The query.
    pub query: ast::Select,
}

impl ExecutionPlan {
    /// Extract the query component as SQL.
    pub fn query_sql(&self) -> string::SQL {
        select_to_sql(&self.query)
    }

    pub fn explain_query_sql(&self) -> string::SQL {
        explain_to_sql(&ast::Explain::Select(&self.query))
    }
}

pub fn select_to_sql(select: &ast::Select) -> string::SQL {
    let mut sql = string::SQL::new();
    select.to_sql(&mut sql);
    sql
}

pub fn explain_to_sql(explain: &ast::Explain) -> string::SQL {
    let mut sql = string::SQL::new();
    explain.to_sql(&mut sql);
    sql
}

/// A simple execution plan with only a root entity and a query.
pub fn simple_exec_plan(
    root_entity: String,
    hql: String,
    parameters: Vec<sqm::ast::Parameter>,
    query: ast::Select,
) -> ExecutionPlan {
    ExecutionPlan {
        root_entity,
        hql,
        parameters,
        query,
    }
}
