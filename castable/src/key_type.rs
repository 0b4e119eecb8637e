//! Storage key types and the codec between held values and storage values
//!
//! A key type names the family of the persisted column. It decides the shape a
//! cast lazily initializes to, and how values cross the storage boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{DbErr, QueryResult, TryGetable, Value as SeaValue};
use serde::{Deserialize, Serialize};

use crate::value::{Array, Record, Scalar, Value};
use crate::{CastError, CastResult};

/// Declared storage representation of a cast attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    #[default]
    String,
    Double,
    Array,
    Object,
    Json,
}

impl KeyType {
    pub const ALL: [KeyType; 5] = [
        KeyType::String,
        KeyType::Double,
        KeyType::Array,
        KeyType::Object,
        KeyType::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Double => "double",
            Self::Array => "array",
            Self::Object => "object",
            Self::Json => "json",
        }
    }

    /// Shape an unset value takes on its first nested write
    pub fn empty_container(&self) -> Option<Value> {
        match self {
            Self::Array | Self::Json => Some(Value::Array(Array::new())),
            Self::Object => Some(Value::Record(Record::new())),
            Self::String | Self::Double => None,
        }
    }

    /// Convert a storage value into a held value
    pub fn decode(&self, raw: SeaValue) -> CastResult<Value> {
        let value = match raw {
            SeaValue::Bool(None)
            | SeaValue::TinyInt(None)
            | SeaValue::SmallInt(None)
            | SeaValue::Int(None)
            | SeaValue::BigInt(None)
            | SeaValue::Float(None)
            | SeaValue::Double(None)
            | SeaValue::String(None)
            | SeaValue::Char(None)
            | SeaValue::Json(None)
            | SeaValue::ChronoTime(None)
            | SeaValue::ChronoDateTime(None)
            | SeaValue::Decimal(None) => Value::null(),
            SeaValue::Bool(Some(value)) => Value::from(value),
            SeaValue::TinyInt(Some(value)) => Value::from(i64::from(value)),
            SeaValue::SmallInt(Some(value)) => Value::from(i64::from(value)),
            SeaValue::Int(Some(value)) => Value::from(i64::from(value)),
            SeaValue::BigInt(Some(value)) => Value::from(value),
            SeaValue::Float(Some(value)) => Value::from(f64::from(value)),
            SeaValue::Double(Some(value)) => Value::from(value),
            SeaValue::Decimal(Some(value)) => match value.to_f64() {
                Some(float) => Value::from(float),
                None => return Err(CastError::invalid_storage_value(*self, value.to_string())),
            },
            SeaValue::String(Some(text)) => self.decode_text(*text)?,
            SeaValue::Char(Some(c)) => self.decode_text(c.to_string())?,
            SeaValue::Json(Some(json)) => self.decode_json(*json),
            SeaValue::ChronoTime(Some(time)) => Value::from(NaiveTime::clone(&time)),
            SeaValue::ChronoDateTime(Some(datetime)) => {
                Value::from(NaiveDateTime::clone(&datetime))
            }
            other => {
                return Err(CastError::invalid_storage_value(
                    *self,
                    format!("{:?}", other),
                ))
            }
        };
        Ok(value)
    }

    /// Convert a held value into the storage value for this key type
    pub fn encode(&self, value: &Value) -> CastResult<SeaValue> {
        match self {
            Self::String => self.encode_text(value),
            Self::Double => self.encode_double(value),
            Self::Array | Self::Object | Self::Json => self.encode_json(value),
        }
    }

    /// Read this key type's column from a query row.
    ///
    /// Text and float columns are tried first, then the native column types a
    /// backend may use for the key type (`numeric`, `time`, `json`, ...).
    pub fn read_column(&self, row: &QueryResult, column: &str) -> CastResult<SeaValue> {
        let mut failure = None;
        for read in self.column_reads() {
            match read(row, column) {
                Ok(raw) => return Ok(raw),
                Err(err) => failure = Some(err),
            }
        }
        Err(failure
            .map(CastError::from)
            .unwrap_or_else(|| CastError::invalid_storage_value(*self, column)))
    }

    fn column_reads(&self) -> &'static [ColumnRead] {
        match self {
            Self::String => STRING_READS,
            Self::Double => DOUBLE_READS,
            Self::Array | Self::Object | Self::Json => JSON_READS,
        }
    }

    fn decode_text(&self, text: String) -> CastResult<Value> {
        match self {
            Self::String => Ok(Value::from(text)),
            Self::Double => parse_number(&text)
                .ok_or_else(|| CastError::invalid_storage_value(*self, text.clone())),
            Self::Array | Self::Object | Self::Json => {
                let json: serde_json::Value = serde_json::from_str(&text)?;
                Ok(self.decode_json(json))
            }
        }
    }

    fn decode_json(&self, json: serde_json::Value) -> Value {
        match self {
            Self::Array | Self::Json => Value::from_json_assoc(json),
            Self::String | Self::Double | Self::Object => Value::from_json(json),
        }
    }

    fn encode_text(&self, value: &Value) -> CastResult<SeaValue> {
        match value {
            Value::Scalar(Scalar::Null) => Ok(SeaValue::String(None)),
            Value::Scalar(scalar) => Ok(SeaValue::from(scalar.to_string())),
            structured => Err(CastError::invalid_storage_value(
                *self,
                structured.to_json().to_string(),
            )),
        }
    }

    fn encode_double(&self, value: &Value) -> CastResult<SeaValue> {
        let number = match value {
            Value::Scalar(Scalar::Null) => return Ok(SeaValue::Double(None)),
            Value::Scalar(Scalar::Int(int)) => *int as f64,
            Value::Scalar(Scalar::Float(float)) => *float,
            Value::Scalar(Scalar::String(text)) => parse_number(text)
                .and_then(|number| number.as_f64())
                .ok_or_else(|| CastError::invalid_storage_value(*self, text.clone()))?,
            other => {
                return Err(CastError::invalid_storage_value(
                    *self,
                    other.to_json().to_string(),
                ))
            }
        };
        Ok(SeaValue::Double(Some(number)))
    }

    fn encode_json(&self, value: &Value) -> CastResult<SeaValue> {
        if value.is_null() {
            return Ok(SeaValue::String(None));
        }
        let text = serde_json::to_string(&value.to_json())?;
        Ok(SeaValue::from(text))
    }
}

type ColumnRead = fn(&QueryResult, &str) -> Result<SeaValue, DbErr>;

const STRING_READS: &[ColumnRead] = &[
    read::<Option<String>>,
    read::<Option<NaiveTime>>,
    read::<Option<NaiveDateTime>>,
];

const DOUBLE_READS: &[ColumnRead] = &[
    read::<Option<f64>>,
    read::<Option<Decimal>>,
    read::<Option<i64>>,
    read::<Option<String>>,
];

const JSON_READS: &[ColumnRead] = &[read::<Option<String>>, read::<Option<serde_json::Value>>];

fn read<T>(row: &QueryResult, column: &str) -> Result<SeaValue, DbErr>
where
    T: TryGetable + Into<SeaValue>,
{
    Ok(row.try_get::<T>("", column)?.into())
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    text.parse::<f64>().ok().map(Value::from)
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = CastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key_type| key_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CastError::UnknownKeyType {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_types() {
        assert_eq!("object".parse::<KeyType>().unwrap(), KeyType::Object);
        assert_eq!(" JSON ".parse::<KeyType>().unwrap(), KeyType::Json);
        assert!(matches!(
            "float".parse::<KeyType>(),
            Err(CastError::UnknownKeyType { .. })
        ));
    }

    #[test]
    fn test_empty_container_shapes() {
        assert_eq!(KeyType::Array.empty_container(), Some(Value::Array(Array::new())));
        assert_eq!(KeyType::Json.empty_container(), Some(Value::Array(Array::new())));
        assert_eq!(KeyType::Object.empty_container(), Some(Value::Record(Record::new())));
        assert_eq!(KeyType::String.empty_container(), None);
        assert_eq!(KeyType::Double.empty_container(), None);
    }

    #[test]
    fn test_nulls_decode_to_unset() {
        for key_type in KeyType::ALL {
            assert!(key_type.decode(SeaValue::String(None)).unwrap().is_null());
            assert!(key_type.decode(SeaValue::Double(None)).unwrap().is_null());
        }
    }

    #[test]
    fn test_string_column() {
        let stored = KeyType::String.encode(&Value::from(20)).unwrap();
        assert_eq!(stored, SeaValue::from("20".to_string()));

        let err = KeyType::String.encode(&Value::list(["a"])).unwrap_err();
        assert!(matches!(err, CastError::InvalidStorageValue { key_type: KeyType::String, .. }));

        let decoded = KeyType::String.decode(SeaValue::from("foobar".to_string())).unwrap();
        assert_eq!(decoded, Value::from("foobar"));
    }

    #[test]
    fn test_double_column() {
        assert_eq!(KeyType::Double.encode(&Value::from(20)).unwrap(), SeaValue::Double(Some(20.0)));
        assert_eq!(
            KeyType::Double.encode(&Value::from(" 1.5 ")).unwrap(),
            SeaValue::Double(Some(1.5))
        );
        assert!(KeyType::Double.encode(&Value::from("abc")).is_err());

        assert_eq!(KeyType::Double.decode(SeaValue::Int(Some(20))).unwrap(), Value::from(20));
        assert_eq!(KeyType::Double.decode(SeaValue::from("20".to_string())).unwrap(), Value::from(20));
    }

    #[test]
    fn test_object_column_decodes_records() {
        let raw = SeaValue::from(r#"{"line_one":"A","line_two":"B"}"#.to_string());
        let value = KeyType::Object.decode(raw).unwrap();
        let record = value.as_record().expect("record");
        assert_eq!(record.get("line_one"), Some(&Value::from("A")));

        let stored = KeyType::Object.encode(&value).unwrap();
        assert_eq!(stored, SeaValue::from(r#"{"line_one":"A","line_two":"B"}"#.to_string()));
    }

    #[test]
    fn test_native_column_values() {
        let price = SeaValue::Decimal(Some(Box::new(Decimal::new(150, 2))));
        assert_eq!(KeyType::Double.decode(price).unwrap(), Value::from(1.5));

        let time = NaiveTime::from_hms_opt(8, 19, 12).unwrap();
        let stored = SeaValue::ChronoTime(Some(Box::new(time)));
        assert_eq!(KeyType::String.decode(stored).unwrap(), Value::from(time));

        let json = SeaValue::Json(Some(Box::new(serde_json::json!({ "line_one": "A" }))));
        let record = KeyType::Object.decode(json).unwrap();
        assert_eq!(record, Value::record([("line_one", "A")]));
    }

    #[test]
    fn test_json_column_decodes_arrays() {
        let raw = SeaValue::Json(Some(Box::new(serde_json::json!({ "a": 1 }))));
        let value = KeyType::Json.decode(raw).unwrap();
        assert_eq!(value.as_array().and_then(|array| array.get("a")), Some(&Value::from(1)));

        assert!(matches!(
            KeyType::Array.decode(SeaValue::from("{not json".to_string())),
            Err(CastError::Json(_))
        ));
    }
}
