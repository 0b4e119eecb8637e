//! Named cast types
//!
//! Model declarations refer to casts by name; the registry turns a name into a
//! factory producing fresh instances bound to an attribute key.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::casts::{CentsCast, IdentityCast, JsonCast, StringSplitCast, TimeCast};
use crate::{CastError, CastResult, CastType, Castable};

/// Builds a fresh cast for an attribute key
pub type CastFactory = fn(Option<&str>) -> Box<dyn Castable>;

static BUILTIN_CASTS: Lazy<CastRegistry> = Lazy::new(CastRegistry::with_builtins);

/// Process-wide registry holding the casts shipped with the crate
pub fn builtin_casts() -> &'static CastRegistry {
    &BUILTIN_CASTS
}

#[derive(Clone, Default)]
pub struct CastRegistry {
    factories: HashMap<String, CastFactory>,
}

impl CastRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register::<IdentityCast>()
            .register::<JsonCast>()
            .register::<StringSplitCast>()
            .register::<CentsCast>()
            .register::<TimeCast>();
        registry
    }

    /// Register a cast type under its declared name
    pub fn register<T: CastType>(&mut self) -> &mut Self {
        self.register_factory(T::NAME, T::boxed)
    }

    /// Register a factory under an explicit name, replacing any previous entry
    pub fn register_factory(&mut self, name: impl Into<String>, factory: CastFactory) -> &mut Self {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            log::debug!("cast '{}' re-registered, previous factory replaced", name);
        }
        self
    }

    pub fn resolve(&self, name: &str) -> CastResult<CastFactory> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| CastError::UnknownCast {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for CastRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastRegistry")
            .field("casts", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cast, KeyType, Value};

    #[derive(Debug, Cast)]
    #[cast(key_type = "object", name = "address")]
    struct PostalCast {
        base: Cast,
    }

    impl Castable for PostalCast {}

    #[test]
    fn test_builtins_are_registered() {
        assert_eq!(
            builtin_casts().names(),
            vec!["cents", "identity", "json", "string_split", "time"]
        );
    }

    #[test]
    fn test_resolve_builds_keyed_instances() {
        let factory = builtin_casts().resolve("cents").unwrap();
        let cast = factory(Some("price"));
        assert_eq!(cast.key(), Some("price"));
        assert_eq!(cast.key_type(), KeyType::Double);
        assert!(cast.get_value().is_null());
    }

    #[test]
    fn test_unknown_cast() {
        let err = builtin_casts().resolve("money").unwrap_err();
        assert!(matches!(err, CastError::UnknownCast { ref name } if name == "money"));
    }

    #[test]
    fn test_register_custom_cast() {
        let mut registry = CastRegistry::with_builtins();
        registry.register::<PostalCast>();
        assert!(registry.contains("address"));

        let mut cast = registry.resolve("address").unwrap()(None);
        cast.set("line_one", Value::from("A"));
        assert_eq!(cast.get("line_one").unwrap(), Value::from("A"));
        assert!(cast.get_value().as_record().is_some());
    }
}
