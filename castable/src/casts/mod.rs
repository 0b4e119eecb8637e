//! Casts shipped with the crate

mod cents;
mod string_split;
mod time;

pub use cents::CentsCast;
pub use string_split::StringSplitCast;
pub use time::TimeCast;

use crate::{Cast, Castable};

/// Stores and returns values unchanged
#[derive(Debug, Clone, Cast)]
pub struct IdentityCast {
    base: Cast,
}

impl Castable for IdentityCast {}

/// Unchanged values over a JSON column
#[derive(Debug, Clone, Cast)]
#[cast(key_type = "json")]
pub struct JsonCast {
    base: Cast,
}

impl Castable for JsonCast {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CastType, KeyType, Value};

    #[test]
    fn test_derived_declarations() {
        assert_eq!(IdentityCast::NAME, "identity");
        assert_eq!(IdentityCast::KEY_TYPE, KeyType::String);
        assert_eq!(JsonCast::NAME, "json");
        assert_eq!(JsonCast::KEY_TYPE, KeyType::Json);

        let cast = JsonCast::for_key(Some("meta"));
        assert_eq!(cast.key(), Some("meta"));
        assert_eq!(cast.key_type(), KeyType::Json);
        assert!(cast.get_value().is_null());
    }

    #[test]
    fn test_json_cast_initializes_container() {
        let mut cast = JsonCast::for_key(None);
        cast.set("theme", Value::from("dark"));
        assert_eq!(cast.get("theme").unwrap(), Value::from("dark"));
        assert_eq!(cast.export(), serde_json::json!({ "theme": "dark" }));
    }
}
