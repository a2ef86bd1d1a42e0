//! Schemapack: a schema-driven compact binary codec.
//!
//! A schema describes the shape of a value: mappings of named fields,
//! sequences with a fixed head and a repeated tail, and primitive leaves.
//! The schema is compiled once into a [`Codec`]; encoded buffers carry no
//! field names, tags or type markers, only the bytes the schema calls for.
//! Both sides must hold the same schema.
//!
//! # Quick Start
//!
//! ```rust
//! use schemapack::{Codec, Value};
//!
//! let codec = Codec::parse(r#"{
//!     health: varuint,
//!     jumping: boolean,
//!     position: [ int16 ],
//!     attributes: { str: uint8, agi: uint8, int: uint8 },
//! }"#).unwrap();
//!
//! let player = Value::from_fields(vec![
//!     ("health", 4000i64.into()),
//!     ("jumping", false.into()),
//!     ("position", vec![-540i64, 343, 1201].into()),
//!     ("attributes", Value::from_fields(vec![
//!         ("str", 87i64.into()),
//!         ("agi", 42i64.into()),
//!         ("int", 22i64.into()),
//!     ])),
//! ]);
//!
//! let encoded = codec.encode(&player).unwrap();
//! assert_eq!(encoded.len(), 13);
//! let decoded = codec.decode(&encoded).unwrap();
//! assert_eq!(player, decoded);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod types;
pub mod value;

#[cfg(feature = "serde")]
pub mod serde;

pub use codec::{Codec, CodecBuilder};
pub use config::{set_string_encoding, set_validation, CodecOptions, StringEncoding};
pub use error::{ConfigError, DecodeError, EncodeError, Error, Result, SchemaError};
pub use registry::add_type_alias;
pub use schema::SchemaDef;
pub use types::PrimitiveType;
pub use value::Value;
