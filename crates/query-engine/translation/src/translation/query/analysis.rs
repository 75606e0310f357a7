//! Analyse a query request into a query tree, checking it against the metadata.

use query_engine_metadata::metadata::{ComparisonOperator, ScalarType};
use query_engine_sql::sqm::ast::{Expression, Parameter, Predicate, QueryRoot, SelectStatement};

use super::values;
use crate::translation::error::Error;
use crate::translation::helpers::Env;
use crate::translation::request;

/// Build the select statement a request describes.
pub fn analyse_request(
    env: &Env,
    query_request: &request::QueryRequest,
) -> Result<SelectStatement, Error> {
    env.lookup_entity(&query_request.entity)?;
    let root = QueryRoot {
        entity: query_request.entity.clone(),
        alias: query_request.alias.clone(),
    };
    let analyser = Analyser { env, root: &root };
    let predicate = query_request
        .predicate
        .as_ref()
        .map(|expression| analyser.predicate(expression))
        .transpose()?;

    Ok(SelectStatement { root, predicate })
}

struct Analyser<'a> {
    env: &'a Env,
    root: &'a QueryRoot,
}

impl Analyser<'_> {
    fn predicate(&self, expression: &request::Expression) -> Result<Predicate, Error> {
        let builder = self.env.builder();
        match expression {
            request::Expression::And { expressions } => {
                Ok(builder.and_all(self.predicates(expressions)?)?)
            }
            request::Expression::Or { expressions } => {
                Ok(builder.or_all(self.predicates(expressions)?)?)
            }
            request::Expression::Not { expression } => Ok(builder.not(self.predicate(expression)?)),
            request::Expression::BinaryComparison {
                left,
                operator,
                right,
            } => {
                let left = self.operand(left, None)?;
                check_operator(*operator, left.result_type)?;
                let right = self.operand(right, Some(operator.rhs_argument_type(left.result_type)))?;
                Ok(builder.comparison(left, *operator, right)?)
            }
            request::Expression::IsNull { value, negated } => {
                Ok(builder.nullness(self.operand(value, None)?, *negated)?)
            }
            request::Expression::Between {
                value,
                lower,
                upper,
                negated,
            } => {
                let value = self.operand(value, None)?;
                // bounds are compared with the value, so they share its type
                let bounds_type = Some(value.result_type);
                let lower = self.operand(lower, bounds_type)?;
                let upper = self.operand(upper, bounds_type)?;
                Ok(builder.between(value, lower, upper, *negated)?)
            }
        }
    }

    fn predicates(&self, expressions: &[request::Expression]) -> Result<Vec<Predicate>, Error> {
        expressions
            .iter()
            .map(|expression| self.predicate(expression))
            .collect()
    }

    /// Build an operand. Values without a type of their own take the expected one.
    fn operand(
        &self,
        value: &request::ComparisonValue,
        expected: Option<ScalarType>,
    ) -> Result<Expression, Error> {
        let builder = self.env.builder();
        match value {
            request::ComparisonValue::Column { name, alias } => {
                if let Some(alias) = alias {
                    if *alias != self.root.alias {
                        return Err(Error::UnknownRootAlias {
                            alias: alias.clone(),
                            root: self.root.alias.clone(),
                        });
                    }
                }
                self.env.lookup_attribute(&self.root.entity, name)?;
                Ok(builder.path(self.root, name.as_str()))
            }
            request::ComparisonValue::Scalar { value } => match expected {
                Some(scalar_type) if scalar_type != ScalarType::Any => Ok(builder.typed_literal(
                    values::translate_json_value(value, scalar_type)?,
                    scalar_type,
                )?),
                _ => Ok(builder.literal(values::translate_json_value(value, ScalarType::Any)?)?),
            },
            request::ComparisonValue::Parameter { parameter } => {
                let parameter = match parameter {
                    request::ParameterReference::Named(name) => Parameter::Named(name.clone()),
                    request::ParameterReference::Positional(position) => {
                        Parameter::Positional(*position)
                    }
                };
                Ok(builder.parameter(parameter, expected.unwrap_or(ScalarType::Any)))
            }
            request::ComparisonValue::List { values } => {
                let elements = values
                    .iter()
                    .map(|value| self.operand(value, expected))
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(builder.list(elements)?)
            }
        }
    }
}

/// Is the operator one the type of its left operand supports.
fn check_operator(operator: ComparisonOperator, scalar_type: ScalarType) -> Result<(), Error> {
    if scalar_type.comparison_operators().contains(&operator) {
        Ok(())
    } else {
        Err(Error::OperatorNotSupportedForType {
            operator,
            scalar_type,
        })
    }
}
