//! Handle filtering/where clauses translation.

use query_engine_metadata::metadata::{ComparisonOperator, Nullable};
use query_engine_sql::sql;
use query_engine_sql::sqm::ast::*;
use query_engine_sql::sqm::SemanticWalker;
use sqm_configuration::Dialect;

use crate::translation::error::Error;
use crate::translation::helpers::Env;

/// Translate a predicate over the query root into a boolean SQL expression.
pub fn translate_predicate(
    env: &Env,
    root: &QueryRoot,
    table: &sql::ast::TableAlias,
    predicate: &Predicate,
) -> Result<sql::ast::Expression, Error> {
    predicate.accept(&mut SqlTranslator { env, root, table })
}

/// What an expression translates to: a scalar, or the items of a list.
enum Operand {
    Scalar(sql::ast::Expression),
    List(Vec<sql::ast::Expression>),
}

struct SqlTranslator<'a> {
    env: &'a Env,
    root: &'a QueryRoot,
    table: &'a sql::ast::TableAlias,
}

impl SqlTranslator<'_> {
    fn scalar(&mut self, expression: &Expression) -> Result<sql::ast::Expression, Error> {
        match expression.accept(self)? {
            Operand::Scalar(expression) => Ok(expression),
            Operand::List(_) => Err(Error::NotSupported("lists outside of _in".to_string())),
        }
    }
}

impl SemanticWalker for SqlTranslator<'_> {
    type Output = Result<sql::ast::Expression, Error>;
    type ExpressionOutput = Result<Operand, Error>;

    fn visit_comparison(&mut self, _predicate: &Predicate, comparison: &Comparison) -> Self::Output {
        let operator = comparison.operator;
        if self.env.dialect == Dialect::BigQuery
            && matches!(
                operator,
                ComparisonOperator::CaseInsensitiveLike | ComparisonOperator::NotCaseInsensitiveLike
            )
        {
            return Err(Error::NotSupported(format!(
                "the operator '{operator}' in the bigquery dialect"
            )));
        }

        let left = Box::new(self.scalar(&comparison.left)?);
        match (operator, comparison.right.accept(self)?) {
            (ComparisonOperator::In, Operand::List(right)) => {
                Ok(sql::ast::Expression::BinaryArrayOperation {
                    left,
                    operator: sql::ast::BinaryArrayOperator::In,
                    right,
                })
            }
            (ComparisonOperator::NotIn, Operand::List(right)) => {
                Ok(sql::ast::Expression::BinaryArrayOperation {
                    left,
                    operator: sql::ast::BinaryArrayOperator::NotIn,
                    right,
                })
            }
            (_, Operand::Scalar(right)) => Ok(sql::ast::Expression::BinaryOperation {
                left,
                operator: sql::ast::BinaryOperator(sql_operator(operator).to_string()),
                right: Box::new(right),
            }),
            (_, Operand::List(_)) => Err(Error::NotSupported(format!(
                "a list of values on the right of '{operator}'"
            ))),
        }
    }

    fn visit_junction(&mut self, _predicate: &Predicate, junction: &Junction) -> Self::Output {
        let left = Box::new(junction.left.accept(self)?);
        let right = Box::new(junction.right.accept(self)?);
        Ok(match junction.operator {
            BooleanOperator::And => sql::ast::Expression::And { left, right },
            BooleanOperator::Or => sql::ast::Expression::Or { left, right },
        })
    }

    fn visit_negation(&mut self, _predicate: &Predicate, negation: &Negation) -> Self::Output {
        Ok(sql::ast::Expression::Not(Box::new(
            negation.inner.accept(self)?,
        )))
    }

    fn visit_nullness(&mut self, _predicate: &Predicate, nullness: &Nullness) -> Self::Output {
        let expression = self.scalar(&nullness.expression)?;
        // a non-nullable column decides the check on its own
        if let ExpressionKind::Path(path) = &nullness.expression.kind {
            let attribute = self
                .env
                .lookup_attribute(&path.root.entity, &path.attribute)?;
            if attribute.nullable == Nullable::NonNullable {
                return Ok(if nullness.negated {
                    sql::helpers::true_expr()
                } else {
                    sql::helpers::false_expr()
                });
            }
        }
        Ok(sql::ast::Expression::UnaryOperation {
            expression: Box::new(expression),
            operator: if nullness.negated {
                sql::ast::UnaryOperator::IsNotNull
            } else {
                sql::ast::UnaryOperator::IsNull
            },
        })
    }

    fn visit_between(&mut self, _predicate: &Predicate, between: &Between) -> Self::Output {
        Ok(sql::ast::Expression::Between {
            expression: Box::new(self.scalar(&between.expression)?),
            lower: Box::new(self.scalar(&between.lower)?),
            upper: Box::new(self.scalar(&between.upper)?),
            negated: between.negated,
        })
    }

    fn visit_literal(&mut self, _expression: &Expression, value: &Value) -> Self::ExpressionOutput {
        let value = match value {
            Value::Null => sql::ast::Value::Null,
            Value::Boolean(b) => sql::ast::Value::Bool(*b),
            Value::Integer(i) => sql::ast::Value::Int8(*i),
            Value::Float(f) => sql::ast::Value::Float8(*f),
            Value::String(s) => sql::ast::Value::String(s.clone()),
        };
        Ok(Operand::Scalar(sql::ast::Expression::Value(value)))
    }

    fn visit_parameter(
        &mut self,
        _expression: &Expression,
        parameter: &Parameter,
    ) -> Self::ExpressionOutput {
        let value = match parameter {
            Parameter::Named(name) => sql::ast::Value::Variable(name.clone()),
            Parameter::Positional(position) => sql::ast::Value::Positional(*position),
        };
        Ok(Operand::Scalar(sql::ast::Expression::Value(value)))
    }

    fn visit_path(&mut self, _expression: &Expression, path: &Path) -> Self::ExpressionOutput {
        if path.root != *self.root {
            return Err(Error::UnknownRootAlias {
                alias: path.root.alias.clone(),
                root: self.root.alias.clone(),
            });
        }
        let attribute = self
            .env
            .lookup_attribute(&path.root.entity, &path.attribute)?;
        Ok(Operand::Scalar(sql::helpers::make_column(
            sql::ast::TableReference::AliasedTable(self.table.clone()),
            sql::ast::ColumnName(attribute.column_name.clone()),
        )))
    }

    fn visit_list(
        &mut self,
        _expression: &Expression,
        elements: &[Expression],
    ) -> Self::ExpressionOutput {
        elements
            .iter()
            .map(|element| self.scalar(element))
            .collect::<Result<Vec<_>, Error>>()
            .map(Operand::List)
    }
}

/// The SQL spelling of a comparison operator.
fn sql_operator(operator: ComparisonOperator) -> &'static str {
    match operator {
        ComparisonOperator::Equals => "=",
        ComparisonOperator::NotEquals => "<>",
        ComparisonOperator::LessThan => "<",
        ComparisonOperator::LessThanOrEqualTo => "<=",
        ComparisonOperator::GreaterThan => ">",
        ComparisonOperator::GreaterThanOrEqualTo => ">=",
        ComparisonOperator::Like => "LIKE",
        ComparisonOperator::NotLike => "NOT LIKE",
        ComparisonOperator::CaseInsensitiveLike => "ILIKE",
        ComparisonOperator::NotCaseInsensitiveLike => "NOT ILIKE",
        ComparisonOperator::In => "IN",
        ComparisonOperator::NotIn => "NOT IN",
    }
}
