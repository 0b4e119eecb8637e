use crate::value::{Scalar, Value};
use crate::{Cast, CastError, CastResult, CastType, Castable};

/// Integer cents in storage, decimal amounts in memory
#[derive(Debug, Clone, Cast)]
#[cast(key_type = "double")]
pub struct CentsCast {
    base: Cast,
}

impl Castable for CentsCast {
    fn from_database(&mut self, raw: Value) -> CastResult<Value> {
        let cents = match &raw {
            Value::Scalar(Scalar::Null) => return Ok(Value::null()),
            Value::Scalar(Scalar::Int(cents)) => *cents as f64,
            Value::Scalar(Scalar::Float(cents)) => *cents,
            Value::Scalar(Scalar::String(text)) => text.trim().parse::<f64>().map_err(|_| {
                CastError::conversion(Self::NAME, format!("'{}' is not a number", text))
            })?,
            other => return Err(not_a_number(other)),
        };
        Ok(Value::from(cents / 100.0))
    }

    fn to_database(&self, value: Value) -> CastResult<Value> {
        let cents = match &value {
            Value::Scalar(Scalar::Null) => return Ok(Value::null()),
            Value::Scalar(Scalar::Int(amount)) => amount
                .checked_mul(100)
                .ok_or_else(|| out_of_range(&value))?,
            Value::Scalar(Scalar::Float(amount)) => float_to_cents(*amount)
                .ok_or_else(|| out_of_range(&value))?,
            other => return Err(not_a_number(other)),
        };
        Ok(Value::from(cents))
    }
}

// NaN, infinities and amounts past the i64 range have no cents value
fn float_to_cents(amount: f64) -> Option<i64> {
    let cents = (amount * 100.0).round();
    let in_range = cents >= i64::MIN as f64 && cents < i64::MAX as f64;
    (cents.is_finite() && in_range).then_some(cents as i64)
}

fn out_of_range(value: &Value) -> CastError {
    CastError::conversion(
        CentsCast::NAME,
        format!("{} cannot be stored as cents", value.to_json()),
    )
}

fn not_a_number(value: &Value) -> CastError {
    CastError::conversion(
        CentsCast::NAME,
        format!("expected a number, got {}", value.to_json()),
    )
}
