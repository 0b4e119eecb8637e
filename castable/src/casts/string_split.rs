use crate::value::{Scalar, Value};
use crate::{Cast, CastError, CastResult, CastType, Castable};

/// Splits a stored string into a list of one-character strings and joins it
/// back on write
#[derive(Debug, Clone, Cast)]
pub struct StringSplitCast {
    base: Cast,
}

impl Castable for StringSplitCast {
    fn from_database(&mut self, raw: Value) -> CastResult<Value> {
        match raw {
            Value::Scalar(Scalar::String(text)) => Ok(Value::list(text.chars())),
            other => Ok(other),
        }
    }

    fn to_database(&self, value: Value) -> CastResult<Value> {
        let array = match value {
            Value::Array(array) => array,
            other => return Ok(other),
        };
        let joined = array
            .values()
            .map(|part| match part {
                Value::Scalar(scalar) => Ok(scalar.to_string()),
                nested => Err(CastError::conversion(
                    Self::NAME,
                    format!("cannot join nested value {}", nested.to_json()),
                )),
            })
            .collect::<CastResult<String>>()?;
        Ok(Value::from(joined))
    }
}
