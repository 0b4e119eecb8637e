use chrono::NaiveTime;

use crate::value::{Scalar, Value, TIME_FORMAT};
use crate::{Cast, CastError, CastResult, CastType, Castable};

const ACCEPTED_FORMATS: &[&str] = &[TIME_FORMAT, "%H:%M:%S%.f", "%H:%M"];

/// Time of day stored as `HH:MM:SS` text
#[derive(Debug, Clone, Cast)]
pub struct TimeCast {
    base: Cast,
}

impl TimeCast {
    fn parse(text: &str) -> CastResult<NaiveTime> {
        let text = text.trim();
        ACCEPTED_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
            .ok_or_else(|| {
                CastError::conversion(Self::NAME, format!("'{}' is not a time of day", text))
            })
    }

    fn from_seconds(seconds: i64) -> CastResult<NaiveTime> {
        u32::try_from(seconds)
            .ok()
            .and_then(|seconds| NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0))
            .ok_or_else(|| {
                CastError::conversion(
                    Self::NAME,
                    format!("{} is not a number of seconds within a day", seconds),
                )
            })
    }

    fn to_time(value: &Value) -> CastResult<Option<NaiveTime>> {
        let time = match value {
            Value::Scalar(Scalar::Null) => return Ok(None),
            Value::Scalar(Scalar::Time(time)) => *time,
            Value::Scalar(Scalar::DateTime(datetime)) => datetime.time(),
            Value::Scalar(Scalar::String(text)) => Self::parse(text)?,
            Value::Scalar(Scalar::Int(seconds)) => Self::from_seconds(*seconds)?,
            other => {
                return Err(CastError::conversion(
                    Self::NAME,
                    format!("expected a time of day, got {}", other.to_json()),
                ))
            }
        };
        Ok(Some(time))
    }
}

impl Castable for TimeCast {
    fn from_database(&mut self, raw: Value) -> CastResult<Value> {
        Ok(Self::to_time(&raw)?.map(Value::from).unwrap_or_default())
    }

    fn to_database(&self, value: Value) -> CastResult<Value> {
        Ok(Self::to_time(&value)?
            .map(|time| Value::from(time.format(TIME_FORMAT).to_string()))
            .unwrap_or_default())
    }
}
