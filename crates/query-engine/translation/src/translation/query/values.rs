//! Handle the translation of literal values.

use query_engine_metadata::metadata::ScalarType;
use query_engine_sql::sqm::ast::Value;

use crate::translation::error::Error;

/// Convert a JSON value into a literal of the type it is compared against.
pub fn translate_json_value(
    value: &serde_json::Value,
    scalar_type: ScalarType,
) -> Result<Value, Error> {
    let mismatch = || Error::TypeMismatch(value.clone(), scalar_type);
    match value {
        // numbers
        serde_json::Value::Number(num) => match scalar_type {
            // integers
            ScalarType::Smallint => num
                .as_i64()
                .filter(|i| i16::try_from(*i).is_ok())
                .map(Value::Integer)
                .ok_or_else(mismatch),
            ScalarType::Integer => num
                .as_i64()
                .filter(|i| i32::try_from(*i).is_ok())
                .map(Value::Integer)
                .ok_or_else(mismatch),
            ScalarType::Bigint => num.as_i64().map(Value::Integer).ok_or_else(mismatch),

            // floats
            ScalarType::Real | ScalarType::DoublePrecision | ScalarType::Numeric => {
                num.as_f64()
                    .filter(|f| f.is_finite())
                    .map(Value::Float)
                    .ok_or_else(mismatch)
            }

            ScalarType::Any => match (num.as_i64(), num.as_f64()) {
                (Some(i), _) => Ok(Value::Integer(i)),
                (None, Some(f)) => Ok(Value::Float(f)),
                (None, None) => Err(mismatch()),
            },

            _ => Err(mismatch()),
        },

        // booleans
        serde_json::Value::Bool(b) => match scalar_type {
            ScalarType::Boolean | ScalarType::Any => Ok(Value::Boolean(*b)),
            _ => Err(mismatch()),
        },

        // strings
        serde_json::Value::String(s) => match scalar_type {
            // numbers - for when the user wants to pass numbers as strings
            ScalarType::Smallint | ScalarType::Integer | ScalarType::Bigint => s
                .parse::<i64>()
                .map_err(|_| mismatch())
                .and_then(|i| translate_json_value(&serde_json::Value::from(i), scalar_type)),
            ScalarType::Real | ScalarType::DoublePrecision | ScalarType::Numeric => {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Value::Float)
                    .ok_or_else(mismatch)
            }

            // Any will be passed as string for now
            _ if scalar_type.is_textual() || scalar_type == ScalarType::Any => {
                Ok(Value::String(s.to_string()))
            }

            _ => Err(mismatch()),
        },

        // null
        serde_json::Value::Null => Ok(Value::Null),

        // not supported
        serde_json::Value::Array(_) => Err(Error::NotSupported("array values".to_string())),
        serde_json::Value::Object(_) => Err(Error::NotSupported("object values".to_string())),
    }
}
