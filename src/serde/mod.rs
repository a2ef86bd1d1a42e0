//! Serde integration.
//!
//! Any `Serialize`/`Deserialize` type can be encoded through a [`Codec`] as
//! long as its shape matches the schema: structs and string-keyed maps become
//! mappings, `Vec`s and tuples become sequences and unit enum variants become
//! their declaration index.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use schemapack::Codec;
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u8,
//! }
//!
//! let codec = Codec::parse("{ name: string, age: uint8 }").unwrap();
//! let person = Person { name: "Alice".into(), age: 30 };
//!
//! let bytes = schemapack::serde::to_bytes(&codec, &person).unwrap();
//! let decoded: Person = schemapack::serde::from_bytes(&codec, &bytes).unwrap();
//! assert_eq!(person, decoded);
//! ```

mod de;
mod error;
mod ser;

pub use error::SerdeError;

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::value::Value;

/// Serialize `value` and encode it with `codec`.
pub fn to_bytes<T: ?Sized + Serialize>(codec: &Codec, value: &T) -> Result<Vec<u8>, SerdeError> {
    let tree = ser::ValueSerializer::serialize(value)?;
    Ok(codec.encode(&tree)?)
}

/// Decode `data` with `codec` and deserialize the result.
pub fn from_bytes<T: for<'de> Deserialize<'de>>(codec: &Codec, data: &[u8]) -> Result<T, SerdeError> {
    let tree = codec.decode(data)?;
    de::ValueDeserializer::deserialize(&tree)
}

/// Serialize to a [`Value`] tree without encoding.
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value, SerdeError> {
    ser::ValueSerializer::serialize(value)
}

/// Deserialize from a [`Value`] tree, e.g. one built by hand or decoded
/// earlier.
pub fn from_value<'de, T: Deserialize<'de>>(value: &'de Value) -> Result<T, SerdeError> {
    de::ValueDeserializer::deserialize(value)
}
