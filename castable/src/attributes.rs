//! Mapper-side attribute bag
//!
//! `CastAttributes` holds one cast instance per declared attribute. It is the
//! seam between a model and its storage: rows come in as `sea_orm` values and
//! are hydrated through `from_database`, values go out through `to_database`
//! and the key type's codec.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sea_orm::{QueryResult, Value as SeaValue};

use crate::value::Value;
use crate::{CastError, CastMap, CastResult, Castable};

pub struct CastAttributes {
    casts: Arc<CastMap>,
    values: HashMap<String, Box<dyn Castable>>,
}

impl CastAttributes {
    /// Every declared attribute starts with a fresh, unset cast
    pub fn new(casts: Arc<CastMap>) -> Self {
        let values = casts
            .attributes()
            .filter_map(|attribute| {
                casts
                    .make(attribute)
                    .ok()
                    .map(|cast| (attribute.to_string(), cast))
            })
            .collect();
        Self { casts, values }
    }

    /// Hydrate every declared attribute from a query row
    pub fn from_query_result(casts: Arc<CastMap>, row: &QueryResult) -> CastResult<Self> {
        let mut attributes = Self::new(Arc::clone(&casts));
        for attribute in casts.attributes() {
            let cast = casts.make(attribute)?;
            let raw = cast.key_type().read_column(row, attribute)?;
            attributes.fill(attribute, cast, raw)?;
        }
        Ok(attributes)
    }

    pub fn casts(&self) -> &CastMap {
        &self.casts
    }

    /// Hydrate one attribute from its stored value
    pub fn hydrate(&mut self, key: &str, raw: SeaValue) -> CastResult<()> {
        let cast = self.casts.make(key)?;
        self.fill(key, cast, raw)
    }

    pub fn get(&self, key: &str) -> CastResult<&dyn Castable> {
        self.values
            .get(key)
            .map(|cast| cast.as_ref())
            .ok_or_else(|| CastError::unknown_attribute(key))
    }

    pub fn get_mut(&mut self, key: &str) -> CastResult<&mut dyn Castable> {
        self.values
            .get_mut(key)
            .map(|cast| -> &mut dyn Castable { cast.as_mut() })
            .ok_or_else(|| CastError::unknown_attribute(key))
    }

    /// Held value of an attribute
    pub fn value(&self, key: &str) -> CastResult<&Value> {
        Ok(self.get(key)?.get_value())
    }

    /// Assign a domain value through a fresh cast instance
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> CastResult<&mut dyn Castable> {
        let mut cast = self.casts.make(key)?;
        cast.replace_value(value.into());
        Ok(self.store(key, cast))
    }

    /// Assign a ready cast instance; it becomes the attribute's canonical holder.
    ///
    /// The instance is rebound to `key` and must declare the attribute's key type.
    pub fn assign(&mut self, key: &str, mut cast: Box<dyn Castable>) -> CastResult<&mut dyn Castable> {
        let expected = self.casts.make(key)?.key_type();
        if cast.key_type() != expected {
            return Err(CastError::key_type_mismatch(key, expected, cast.key_type()));
        }
        cast.cast_mut().bind_key(key);
        log::debug!("assigned cast instance to attribute '{}'", key);
        Ok(self.store(key, cast))
    }

    /// Storage value of one attribute: `to_database` then the key type's codec
    pub fn storage_value(&self, key: &str) -> CastResult<SeaValue> {
        let cast = self.get(key)?;
        let raw = cast.to_database(cast.get_value().clone())?;
        let stored = cast.key_type().encode(&raw)?;
        log::debug!("attribute '{}' converted for storage as {}", key, cast.key_type());
        Ok(stored)
    }

    /// Storage values of all declared attributes in declaration order
    pub fn to_storage(&self) -> CastResult<Vec<(String, SeaValue)>> {
        self.casts
            .attributes()
            .map(|attribute| Ok((attribute.to_string(), self.storage_value(attribute)?)))
            .collect()
    }

    /// Exportable form of every attribute
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.casts
                .attributes()
                .filter_map(|attribute| {
                    self.values
                        .get(attribute)
                        .map(|cast| (attribute.to_string(), cast.export()))
                })
                .collect(),
        )
    }

    fn fill(&mut self, key: &str, mut cast: Box<dyn Castable>, raw: SeaValue) -> CastResult<()> {
        let raw = cast.key_type().decode(raw)?;
        let domain = cast.from_database(raw)?;
        cast.replace_value(domain);
        log::debug!("hydrated attribute '{}' ({})", key, cast.key_type());
        self.store(key, cast);
        Ok(())
    }

    fn store(&mut self, key: &str, cast: Box<dyn Castable>) -> &mut dyn Castable {
        let slot = match self.values.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(cast);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(cast),
        };
        slot.as_mut()
    }
}

impl fmt::Debug for CastAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastAttributes")
            .field("casts", &self.casts)
            .field("values", &self.values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casts::{CentsCast, StringSplitCast, TimeCast};
    use crate::{Cast, CastType, KeyType};

    fn casts() -> Arc<CastMap> {
        Arc::new(
            CastMap::new()
                .with::<StringSplitCast>("letters")
                .with::<CentsCast>("price")
                .with::<TimeCast>("opens_at"),
        )
    }

    #[test]
    fn test_new_attributes_are_unset() {
        let attributes = CastAttributes::new(casts());
        assert!(attributes.value("letters").unwrap().is_null());
        assert_eq!(attributes.get("price").unwrap().key_type(), KeyType::Double);
        assert!(matches!(
            attributes.get("name"),
            Err(CastError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_hydrate_runs_from_database() {
        let mut attributes = CastAttributes::new(casts());
        attributes.hydrate("letters", SeaValue::from("foo".to_string())).unwrap();
        attributes.hydrate("price", SeaValue::Double(Some(20.0))).unwrap();

        assert_eq!(attributes.value("letters").unwrap(), &Value::list(["f", "o", "o"]));
        assert_eq!(attributes.value("price").unwrap(), &Value::from(0.2));
    }

    #[test]
    fn test_set_then_store() {
        let mut attributes = CastAttributes::new(casts());
        attributes.set("letters", Value::list(["b", "a", "r"])).unwrap();
        attributes.set("price", 1.25).unwrap();

        let stored = attributes.to_storage().unwrap();
        assert_eq!(
            stored,
            vec![
                ("letters".to_string(), SeaValue::from("bar".to_string())),
                ("price".to_string(), SeaValue::Double(Some(125.0))),
                ("opens_at".to_string(), SeaValue::String(None)),
            ]
        );
    }

    #[test]
    fn test_in_place_mutation_is_not_persisted_until_converted() {
        let mut attributes = CastAttributes::new(casts());
        attributes.hydrate("opens_at", SeaValue::from("08:00:00".to_string())).unwrap();
        let before = attributes.storage_value("opens_at").unwrap();

        attributes.get_mut("opens_at").unwrap().set("any", Value::from("09:30:00"));
        assert_eq!(attributes.value("opens_at").unwrap(), &Value::from("09:30:00"));

        assert_eq!(before, SeaValue::from("08:00:00".to_string()));
        assert_eq!(
            attributes.storage_value("opens_at").unwrap(),
            SeaValue::from("09:30:00".to_string())
        );
    }

    #[test]
    fn test_assign_replaces_instance() {
        let mut attributes = CastAttributes::new(casts());
        let replacement = CentsCast::with_value(None, Value::from(2.5));
        attributes.assign("price", Box::new(replacement)).unwrap();

        assert_eq!(attributes.value("price").unwrap(), &Value::from(2.5));
        assert_eq!(attributes.storage_value("price").unwrap(), SeaValue::Double(Some(250.0)));

        let stray = Box::new(CentsCast::for_key(None));
        assert!(matches!(
            attributes.assign("name", stray),
            Err(CastError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_assign_rebinds_key() {
        let mut attributes = CastAttributes::new(casts());
        let unbound = CentsCast::with_value(None, Value::from(1.5));
        attributes.assign("price", Box::new(unbound)).unwrap();
        assert_eq!(attributes.get("price").unwrap().key(), Some("price"));

        let elsewhere = CentsCast::with_value(Some("discount"), Value::from(0.5));
        let assigned = attributes.assign("price", Box::new(elsewhere)).unwrap();
        assert_eq!(assigned.key(), Some("price"));
    }

    #[test]
    fn test_assign_rejects_foreign_key_type() {
        let mut attributes = CastAttributes::new(casts());
        attributes.set("letters", Value::list(["a", "b"])).unwrap();

        let foreign = CentsCast::with_value(Some("letters"), Value::from(1.5));
        let err = attributes.assign("letters", Box::new(foreign)).unwrap_err();
        assert!(matches!(
            err,
            CastError::KeyTypeMismatch {
                expected: KeyType::String,
                found: KeyType::Double,
                ..
            }
        ));

        assert_eq!(
            attributes.storage_value("letters").unwrap(),
            SeaValue::from("ab".to_string())
        );
    }

    #[derive(Debug, Cast)]
    struct UpperCast {
        base: Cast,
    }

    impl Castable for UpperCast {
        fn replace_value(&mut self, value: Value) {
            let value = match value.as_str() {
                Some(text) => Value::from(text.to_uppercase()),
                None => value,
            };
            self.base.set_value(value);
        }
    }

    #[test]
    fn test_overridden_setter_is_used_for_writes_and_hydration() {
        let casts = Arc::new(CastMap::new().with::<UpperCast>("name"));
        let mut attributes = CastAttributes::new(casts);

        attributes.set("name", "abc").unwrap();
        assert_eq!(attributes.value("name").unwrap(), &Value::from("ABC"));

        attributes.hydrate("name", SeaValue::from("def".to_string())).unwrap();
        assert_eq!(attributes.value("name").unwrap(), &Value::from("DEF"));
    }

    #[test]
    fn test_conversion_errors_propagate() {
        let mut attributes = CastAttributes::new(casts());
        let err = attributes
            .hydrate("opens_at", SeaValue::from("noon-ish".to_string()))
            .unwrap_err();
        assert!(matches!(err, CastError::Conversion { .. }));

        attributes.set("letters", Value::record([("a", 1)])).unwrap();
        assert!(matches!(
            attributes.storage_value("letters"),
            Err(CastError::InvalidStorageValue { .. })
        ));
    }

    #[test]
    fn test_export() {
        let mut attributes = CastAttributes::new(casts());
        attributes.hydrate("letters", SeaValue::from("ab".to_string())).unwrap();
        attributes.hydrate("opens_at", SeaValue::from("08:19:12".to_string())).unwrap();

        assert_eq!(
            attributes.to_json(),
            serde_json::json!({ "letters": ["a", "b"], "price": null, "opens_at": "08:19:12" })
        );
    }
}
