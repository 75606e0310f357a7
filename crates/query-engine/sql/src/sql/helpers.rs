//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// A `false` expression.
pub fn false_expr() -> Expression {
    Expression::Value(Value::Bool(false))
}

// Aliasing //

/// Create table aliases using this function so we build everything in one place.
pub fn make_table_alias(name: String) -> TableAlias {
    TableAlias { name }
}

/// Generate a column expression refering to a specific table.
pub fn make_column(table: TableReference, name: ColumnName) -> Expression {
    Expression::ColumnReference(ColumnReference::TableColumn { table, name })
}

// SELECTs //

/// Build a simple select * with an optional filter.
pub fn star_select(from: From, where_: Expression) -> Select {
    Select {
        select_list: SelectList::SelectStar,
        from: Some(from),
        where_: Where(where_),
    }
}
