use crate::value::Value;
use crate::{CastError, CastResult, KeyType};

/// State every cast carries: the attribute key, the declared storage key type
/// and the held value.
///
/// `Cast` is also the plain identity cast: it implements `Castable` with the
/// default conversions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cast {
    key: Option<String>,
    key_type: KeyType,
    value: Value,
}

impl Cast {
    pub fn new(key: Option<&str>, key_type: KeyType) -> Self {
        Self {
            key: key.map(str::to_string),
            key_type,
            value: Value::null(),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Bind the instance to the attribute it now serves
    pub fn bind_key(&mut self, key: &str) -> &mut Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = value.into();
        self
    }

    pub fn take_value(&mut self) -> Value {
        std::mem::take(&mut self.value)
    }

    /// Nested read without accessor dispatch.
    ///
    /// A field holding null counts as missing. Scalars have no distinguishable
    /// fields: any name yields the whole value.
    pub fn field(&self, name: &str) -> CastResult<&Value> {
        let found = match &self.value {
            Value::Array(array) => array.get(name),
            Value::Record(record) => record.get(name),
            Value::Scalar(_) => return Ok(&self.value),
        };
        found
            .filter(|value| !value.is_null())
            .ok_or_else(|| CastError::unknown_key(name))
    }

    /// Nested write. On a scalar the whole value is replaced.
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.initialize_value();

        match &mut self.value {
            Value::Array(array) => {
                array.insert(name, value);
            }
            Value::Record(record) => {
                record.insert(name, value);
            }
            scalar => *scalar = value,
        }
    }

    fn initialize_value(&mut self) {
        if !self.value.is_null() {
            return;
        }
        if let Some(container) = self.key_type.empty_container() {
            log::trace!(
                "initializing {} cast value for key {:?}",
                self.key_type,
                self.key
            );
            self.value = container;
        }
    }
}
