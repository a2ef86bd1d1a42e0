//! The codec instance: a compiled schema plus the options it was built with.

pub mod decoder;
pub mod encoder;
mod guard;
pub mod text;
pub mod wire;

use crate::config::{CodecOptions, StringEncoding};
use crate::error::{DecodeError, EncodeError, SchemaError};
use crate::parser;
use crate::schema::{normalize, SchemaDef, Traversal};
use crate::value::Value;

/// An encode/decode pair bound to one schema.
///
/// A `Codec` holds no mutable state. Every call gets its own cursor, so one
/// instance can be shared across threads and used concurrently without locks.
#[derive(Debug, Clone)]
pub struct Codec {
    traversal: Traversal,
    options: CodecOptions,
}

impl Codec {
    /// Compile `schema` with the process-wide default options.
    pub fn build(schema: &SchemaDef) -> Result<Codec, SchemaError> {
        Codec::builder(schema).build()
    }

    /// Parse schema text (see [`parser::parse`]) and compile it with the
    /// process-wide default options.
    pub fn parse(schema_text: &str) -> Result<Codec, SchemaError> {
        Codec::build(&parser::parse(schema_text)?)
    }

    pub fn builder(schema: &SchemaDef) -> CodecBuilder<'_> {
        CodecBuilder {
            schema,
            options: CodecOptions::from_defaults(),
        }
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        encoder::encode(&self.traversal, value, &self.options)
    }

    /// Exact length `encode` would produce for `value`.
    pub fn encoded_len(&self, value: &Value) -> Result<usize, EncodeError> {
        encoder::encoded_len(&self.traversal, value, &self.options)
    }

    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        decoder::decode(&self.traversal, data, &self.options)
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    pub fn is_root_sequence(&self) -> bool {
        self.traversal.is_root_sequence()
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }
}

/// Per-build overrides of the process-wide defaults.
pub struct CodecBuilder<'a> {
    schema: &'a SchemaDef,
    options: CodecOptions,
}

impl CodecBuilder<'_> {
    /// Enable or disable the encode-time validation guard.
    pub fn validate(mut self, enabled: bool) -> Self {
        self.options.validate = enabled;
        self
    }

    pub fn string_encoding(mut self, encoding: StringEncoding) -> Self {
        self.options.string_encoding = encoding;
        self
    }

    pub fn build(self) -> Result<Codec, SchemaError> {
        Ok(Codec {
            traversal: normalize(self.schema)?,
            options: self.options,
        })
    }
}
