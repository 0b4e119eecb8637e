//! The cast contract
//!
//! `Castable` is what a mapper attribute delegates to: two conversions across the
//! storage boundary and access to the held value. The defaults implement the
//! base behavior on top of the `Cast` state exposed through `HasCast`.

use std::fmt;

use crate::value::Value;
use crate::{Cast, CastResult, KeyType};

/// Access to the base state of a cast, usually generated by `#[derive(Cast)]`
pub trait HasCast {
    fn cast(&self) -> &Cast;
    fn cast_mut(&mut self) -> &mut Cast;
}

/// Contract every cast type fulfils
pub trait Castable: HasCast + fmt::Debug {
    /// Convert a raw storage value into the domain value
    fn from_database(&mut self, raw: Value) -> CastResult<Value> {
        Ok(raw)
    }

    /// Convert a domain value back into a raw value the key type's codec accepts
    fn to_database(&self, value: Value) -> CastResult<Value> {
        Ok(value)
    }

    fn get_value(&self) -> &Value {
        self.cast().value()
    }

    /// Replace the held value. Every write path, boxed casts included, goes
    /// through here, so this is the method to override.
    fn replace_value(&mut self, value: Value) {
        self.cast_mut().set_value(value);
    }

    fn set_value(&mut self, value: Value) -> &mut Self
    where
        Self: Sized,
    {
        self.replace_value(value);
        self
    }

    /// Named accessors of the concrete cast. A `Some` here shadows any
    /// structured field of the same name.
    fn accessor(&self, _name: &str) -> Option<CastResult<Value>> {
        None
    }

    /// Nested read: accessor first, then the structured lookup
    fn get(&self, field: &str) -> CastResult<Value> {
        if let Some(result) = self.accessor(field) {
            return result;
        }
        self.cast().field(field).cloned()
    }

    /// Nested write, lazily initializing an unset structured value
    fn set(&mut self, field: &str, value: Value) {
        self.cast_mut().set_field(field, value);
    }

    /// Exportable form of the held value
    fn export(&self) -> serde_json::Value {
        self.get_value().to_json()
    }

    fn key(&self) -> Option<&str> {
        self.cast().key()
    }

    fn key_type(&self) -> KeyType {
        self.cast().key_type()
    }
}

/// Type-level declarations of a concrete cast
pub trait CastType: Castable + Sized + 'static {
    /// Name the cast is registered under
    const NAME: &'static str;
    /// Declared storage key type
    const KEY_TYPE: KeyType;

    /// Fresh, unset instance bound to an attribute key
    fn for_key(key: Option<&str>) -> Self;

    fn with_value(key: Option<&str>, value: Value) -> Self {
        let mut cast = Self::for_key(key);
        cast.replace_value(value);
        cast
    }

    fn boxed(key: Option<&str>) -> Box<dyn Castable> {
        Box::new(Self::for_key(key))
    }
}

impl HasCast for Cast {
    fn cast(&self) -> &Cast {
        self
    }

    fn cast_mut(&mut self) -> &mut Cast {
        self
    }
}

impl Castable for Cast {}

impl CastType for Cast {
    const NAME: &'static str = "cast";
    const KEY_TYPE: KeyType = KeyType::String;

    fn for_key(key: Option<&str>) -> Self {
        Cast::new(key, Self::KEY_TYPE)
    }
}
