use crate::KeyType;

// Crate-wide result alias
pub type CastResult<T> = std::result::Result<T, CastError>;

/// Errors raised while converting or accessing cast values
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    /// Nested read of a field the structured value does not hold
    #[error("Unknown \"{key}\" key")]
    UnknownKey { key: String },

    /// A concrete cast rejected the value it was asked to convert
    #[error("CastError::Conversion: cast='{cast}' message='{message}'")]
    Conversion { cast: String, message: String },

    /// The storage codec cannot represent the value for the declared key type
    #[error("CastError::InvalidStorageValue: key_type='{key_type}' value='{value}'")]
    InvalidStorageValue { key_type: KeyType, value: String },

    #[error("CastError::UnknownKeyType: '{name}' (expected string, double, array, object or json)")]
    UnknownKeyType { name: String },

    #[error("CastError::UnknownCast: no cast registered under '{name}'")]
    UnknownCast { name: String },

    #[error("CastError::UnknownAttribute: attribute='{attribute}' has no declared cast")]
    UnknownAttribute { attribute: String },

    /// A cast instance assigned to an attribute declared with another key type
    #[error("CastError::KeyTypeMismatch: attribute='{attribute}' expected='{expected}' found='{found}'")]
    KeyTypeMismatch {
        attribute: String,
        expected: KeyType,
        found: KeyType,
    },

    #[error("CastError::Json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CastError::Database: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl CastError {
    /// Create an unknown key error
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey { key: key.into() }
    }

    /// Create a conversion error for the named cast
    pub fn conversion(cast: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            cast: cast.into(),
            message: message.into(),
        }
    }

    /// Create an invalid storage value error
    pub fn invalid_storage_value(key_type: KeyType, value: impl Into<String>) -> Self {
        Self::InvalidStorageValue {
            key_type,
            value: value.into(),
        }
    }

    /// Create an unknown attribute error
    pub fn unknown_attribute(attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create a key type mismatch error for an assigned cast
    pub fn key_type_mismatch(attribute: impl Into<String>, expected: KeyType, found: KeyType) -> Self {
        Self::KeyTypeMismatch {
            attribute: attribute.into(),
            expected,
            found,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownKey { key } => format!("Unknown \"{}\" key", key),
            Self::Conversion { cast, message } => {
                format!("The {} cast could not convert the value: {}", cast, message)
            }
            Self::InvalidStorageValue { key_type, value } => {
                format!("Cannot store '{}' in a {} column", value, key_type)
            }
            Self::UnknownKeyType { name } => format!("'{}' is not a storage key type", name),
            Self::UnknownCast { name } => {
                format!("No cast named '{}'. Please register it before use.", name)
            }
            Self::UnknownAttribute { attribute } => {
                format!("Attribute '{}' has no cast declared for it", attribute)
            }
            Self::KeyTypeMismatch {
                attribute,
                expected,
                found,
            } => format!(
                "Attribute '{}' is stored as {}, a cast stored as {} cannot be assigned to it",
                attribute, expected, found
            ),
            _ => self.to_string(),
        }
    }
}

impl From<CastError> for sea_orm::DbErr {
    fn from(err: CastError) -> Self {
        match err {
            CastError::Database(err) => err,
            other => sea_orm::DbErr::Custom(other.to_string()),
        }
    }
}
