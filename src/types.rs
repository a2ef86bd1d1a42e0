//! The primitive codec table: every leaf type a schema can name.

use std::fmt;

/// Structural marker names used by the compiled traversal. User type names
/// and aliases may never take one of these.
pub const RESERVED_MARKERS: [&str; 4] = ["__arr", "__arrend", "__obj", "__objend"];

/// Marker for entering a sequence.
pub const MARKER_SEQ: &str = "__arr";
/// Marker for leaving a sequence (where the repeated tail is emitted).
pub const MARKER_SEQ_END: &str = "__arrend";
/// Marker for entering a mapping.
pub const MARKER_MAP: &str = "__obj";
/// Marker for leaving a mapping.
pub const MARKER_MAP_END: &str = "__objend";

/// A primitive leaf type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    /// Length-prefixed text under the codec's string encoding.
    Str,
    /// Base-128 unsigned integer.
    VarUint,
    /// Zig-zag, then base-128.
    VarInt,
    /// Length-prefixed raw bytes.
    Buffer,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 13] = [
        PrimitiveType::Boolean,
        PrimitiveType::Int8,
        PrimitiveType::Uint8,
        PrimitiveType::Int16,
        PrimitiveType::Uint16,
        PrimitiveType::Int32,
        PrimitiveType::Uint32,
        PrimitiveType::Float32,
        PrimitiveType::Float64,
        PrimitiveType::Str,
        PrimitiveType::VarUint,
        PrimitiveType::VarInt,
        PrimitiveType::Buffer,
    ];

    /// Canonical schema name.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Int8 => "int8",
            PrimitiveType::Uint8 => "uint8",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::Uint16 => "uint16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Uint32 => "uint32",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::Str => "string",
            PrimitiveType::VarUint => "varuint",
            PrimitiveType::VarInt => "varint",
            PrimitiveType::Buffer => "buffer",
        }
    }

    /// Look up a built-in type by name. The name must already be normalized
    /// with [`normalize_type_name`]; aliases are not consulted here.
    pub fn from_builtin_name(name: &str) -> Option<PrimitiveType> {
        PrimitiveType::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Wire width in bytes for fixed-width types, `None` for variable-width ones.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            PrimitiveType::Boolean | PrimitiveType::Int8 | PrimitiveType::Uint8 => Some(1),
            PrimitiveType::Int16 | PrimitiveType::Uint16 => Some(2),
            PrimitiveType::Int32 | PrimitiveType::Uint32 | PrimitiveType::Float32 => Some(4),
            PrimitiveType::Float64 => Some(8),
            PrimitiveType::Str
            | PrimitiveType::VarUint
            | PrimitiveType::VarInt
            | PrimitiveType::Buffer => None,
        }
    }

    /// Inclusive integer domain for integer types.
    pub fn int_bounds(self) -> Option<(i64, i64)> {
        match self {
            PrimitiveType::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            PrimitiveType::Uint8 => Some((0, u8::MAX as i64)),
            PrimitiveType::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            PrimitiveType::Uint16 => Some((0, u16::MAX as i64)),
            PrimitiveType::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            PrimitiveType::Uint32 => Some((0, u32::MAX as i64)),
            PrimitiveType::VarUint => Some((0, i64::MAX)),
            PrimitiveType::VarInt => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trim and lowercase a user-supplied type name.
pub fn normalize_type_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Whether a normalized name is one of the structural markers.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_MARKERS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_round_trip() {
        for ty in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_builtin_name(ty.name()), Some(ty));
        }
        assert_eq!(PrimitiveType::from_builtin_name("bool"), None);
    }

    #[test]
    fn test_fixed_widths() {
        assert_eq!(PrimitiveType::Boolean.fixed_width(), Some(1));
        assert_eq!(PrimitiveType::Uint16.fixed_width(), Some(2));
        assert_eq!(PrimitiveType::Float32.fixed_width(), Some(4));
        assert_eq!(PrimitiveType::Float64.fixed_width(), Some(8));
        assert_eq!(PrimitiveType::VarInt.fixed_width(), None);
        assert_eq!(PrimitiveType::Buffer.fixed_width(), None);
    }

    #[test]
    fn test_normalize_type_name() {
        assert_eq!(normalize_type_name("  UInt8 "), "uint8");
        assert!(is_reserved(&normalize_type_name("__OBJ")));
        assert!(!is_reserved("obj"));
    }
}
