// Lets `#[derive(Cast)]` expand to `::castable::...` inside this crate too
extern crate self as castable;

pub mod attributes;
pub mod cast;
pub mod casts;
pub mod config;
pub mod contract;
pub mod error;
pub mod key_type;
pub mod registry;
pub mod value;

pub use attributes::CastAttributes;
pub use cast::Cast;
pub use castable_macros::Cast;
pub use config::{CastConfig, CastMap};
pub use contract::{CastType, Castable, HasCast};
pub use error::{CastError, CastResult};
pub use key_type::KeyType;
pub use registry::{builtin_casts, CastFactory, CastRegistry};
pub use value::{Array, Record, Scalar, Value};
