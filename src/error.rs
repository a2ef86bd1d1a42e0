/// Errors raised while parsing or compiling a schema definition.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("invalid type '{type_name}' at '{path}'")]
    InvalidSchemaType { type_name: String, path: String },

    #[error("type name '{0}' collides with a reserved structural marker")]
    ReservedNameCollision(String),

    #[error("duplicate field '{field}' in mapping at '{path}'")]
    DuplicateField { path: String, field: String },

    #[error("empty {kind} at '{path}'")]
    EmptyContainer { kind: &'static str, path: String },
}

/// Errors from process-wide or per-build configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported string encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("cannot alias '{alias}' to unknown type '{target}'")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("type name '{0}' collides with a reserved structural marker")]
    ReservedNameCollision(String),

    #[error("alias '{0}' would shadow a built-in primitive type")]
    ShadowsBuiltin(String),
}

/// Errors from the size and write passes.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("type mismatch for field '{field}': expected {expected}, got {actual} {value}")]
    TypeMismatch {
        field: String,
        value: String,
        expected: String,
        actual: String,
    },

    #[error("value {value} for field '{field}' is out of range for {type_name} {bounds}")]
    OutOfRange {
        field: String,
        value: String,
        type_name: &'static str,
        bounds: String,
    },

    #[error("missing field '{field}'")]
    MissingField { field: String },

    #[error("sequence '{field}' has {have} elements, schema requires at least {need}")]
    ShortSequence {
        field: String,
        need: usize,
        have: usize,
    },

    #[error("field '{field}' cannot be written as {encoding} text: {reason}")]
    InvalidText {
        field: String,
        encoding: &'static str,
        reason: String,
    },
}

/// Errors from the read pass.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated input: need {need} bytes, have {have}")]
    TruncatedInput { need: usize, have: usize },

    #[error("declared length {declared} exceeds the {available} remaining bytes")]
    LengthOverflow { declared: u64, available: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid {encoding} text at offset {offset}: {reason}")]
    InvalidText {
        offset: usize,
        encoding: &'static str,
        reason: String,
    },

    #[error("{remaining} trailing bytes after decoded value")]
    TrailingBytes { remaining: usize },
}

/// Top-level error type that wraps all sub-errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Result type alias for schemapack operations.
pub type Result<T> = std::result::Result<T, Error>;
