//! Schema text notation.
//!
//! A schema is written like an object literal: mappings in braces, sequences
//! in brackets, type names at the leaves. Keys and type names may be bare or
//! quoted, so JSON schema documents parse as-is.
//!
//! ```
//! let def = schemapack::parser::parse("{ id: varuint, tags: [string] }").unwrap();
//! assert!(matches!(def, schemapack::SchemaDef::Map(_)));
//! ```

pub mod grammar;
pub mod lexer;

use crate::error::SchemaError;
use crate::schema::SchemaDef;

/// Parse schema text into a [`SchemaDef`]. Type names are not resolved here;
/// that happens when the schema is compiled.
pub fn parse(schema_text: &str) -> Result<SchemaDef, SchemaError> {
    grammar::parse_schema(schema_text)
}
