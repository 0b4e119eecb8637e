//! Per-model cast declarations
//!
//! A `CastMap` says which attribute is handled by which cast. It is built in
//! code with `CastMap::with`, or resolved from a serialized `CastConfig`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CastError, CastFactory, CastRegistry, CastResult, CastType, Castable};

/// Serialized form of a model's casts: attribute name -> registered cast name
///
/// ```json
/// { "casts": { "opens_at": "time", "price": "cents" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastConfig {
    #[serde(default)]
    pub casts: BTreeMap<String, String>,
}

impl CastConfig {
    pub fn from_json_str(json: &str) -> CastResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve every declared cast name against a registry
    pub fn resolve(&self, registry: &CastRegistry) -> CastResult<CastMap> {
        let mut map = CastMap::new();
        for (attribute, cast) in &self.casts {
            map.insert(attribute.clone(), registry.resolve(cast)?);
        }
        Ok(map)
    }
}

/// Ordered attribute -> cast factory declarations
#[derive(Clone, Default)]
pub struct CastMap {
    entries: Vec<(String, CastFactory)>,
}

impl CastMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `T` as the cast of `attribute`
    pub fn with<T: CastType>(mut self, attribute: impl Into<String>) -> Self {
        self.insert(attribute, T::boxed);
        self
    }

    /// Declare a factory for `attribute`, replacing an earlier declaration in place
    pub fn insert(&mut self, attribute: impl Into<String>, factory: CastFactory) -> &mut Self {
        let attribute = attribute.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == attribute) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((attribute, factory)),
        }
        self
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(attribute, _)| attribute.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fresh, unset cast for a declared attribute
    pub fn make(&self, attribute: &str) -> CastResult<Box<dyn Castable>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == attribute)
            .map(|(_, factory)| factory(Some(attribute)))
            .ok_or_else(|| CastError::unknown_attribute(attribute))
    }
}

impl fmt::Debug for CastMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastMap")
            .field("attributes", &self.attributes().collect::<Vec<_>>())
            .finish()
    }
}
