//! Build-time configuration: string encoding and validation.
//!
//! The process-wide defaults are read once when a codec is built and copied
//! into its [`CodecOptions`]; changing them afterwards only affects codecs
//! built later.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::error::ConfigError;

/// How the `string` primitive maps text to wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StringEncoding {
    /// 7-bit ASCII, one byte per character.
    Ascii,
    #[default]
    Utf8,
    /// UTF-16 code units, little-endian.
    Utf16Le,
    /// The text is base64; its decoded bytes go on the wire.
    Base64,
    /// The text is hexadecimal; its decoded bytes go on the wire.
    Hex,
    /// Latin-1, one byte per character in U+0000..=U+00FF.
    Binary,
}

impl StringEncoding {
    const ALL: [StringEncoding; 6] = [
        StringEncoding::Ascii,
        StringEncoding::Utf8,
        StringEncoding::Utf16Le,
        StringEncoding::Base64,
        StringEncoding::Hex,
        StringEncoding::Binary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StringEncoding::Ascii => "ascii",
            StringEncoding::Utf8 => "utf8",
            StringEncoding::Utf16Le => "utf16le",
            StringEncoding::Base64 => "base64",
            StringEncoding::Hex => "hex",
            StringEncoding::Binary => "binary",
        }
    }

    fn to_index(self) -> u8 {
        self as u8
    }

    fn from_index(idx: u8) -> StringEncoding {
        StringEncoding::ALL
            .get(idx as usize)
            .copied()
            .unwrap_or_default()
    }
}

impl FromStr for StringEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Ok(StringEncoding::Ascii),
            "utf8" | "utf-8" => Ok(StringEncoding::Utf8),
            "utf16le" | "utf-16le" | "utf16" | "utf-16" | "ucs2" | "ucs-2" => {
                Ok(StringEncoding::Utf16Le)
            }
            "base64" => Ok(StringEncoding::Base64),
            "hex" => Ok(StringEncoding::Hex),
            "binary" | "latin1" => Ok(StringEncoding::Binary),
            _ => Err(ConfigError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for StringEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static DEFAULT_ENCODING: AtomicU8 = AtomicU8::new(1); // Utf8
static DEFAULT_VALIDATE: AtomicBool = AtomicBool::new(false);

/// Set the process-wide default string encoding by name.
pub fn set_string_encoding(name: &str) -> Result<(), ConfigError> {
    let encoding: StringEncoding = name.parse()?;
    DEFAULT_ENCODING.store(encoding.to_index(), Ordering::Relaxed);
    Ok(())
}

/// The current process-wide default string encoding.
pub fn string_encoding() -> StringEncoding {
    StringEncoding::from_index(DEFAULT_ENCODING.load(Ordering::Relaxed))
}

/// Set the process-wide default for the encode-time validation guard.
pub fn set_validation(enabled: bool) {
    DEFAULT_VALIDATE.store(enabled, Ordering::Relaxed);
}

/// The current process-wide validation default.
pub fn validation() -> bool {
    DEFAULT_VALIDATE.load(Ordering::Relaxed)
}

/// Options captured by a codec when it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    pub string_encoding: StringEncoding,
    /// Check leaf kinds and numeric bounds before writing.
    pub validate: bool,
}

impl CodecOptions {
    /// Snapshot of the process-wide defaults.
    pub fn from_defaults() -> Self {
        CodecOptions {
            string_encoding: string_encoding(),
            validate: validation(),
        }
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::from_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encodings() {
        assert_eq!("UTF8".parse::<StringEncoding>().unwrap(), StringEncoding::Utf8);
        assert_eq!(" ucs2 ".parse::<StringEncoding>().unwrap(), StringEncoding::Utf16Le);
        assert_eq!("latin1".parse::<StringEncoding>().unwrap(), StringEncoding::Binary);
        for enc in StringEncoding::ALL {
            assert_eq!(enc.name().parse::<StringEncoding>().unwrap(), enc);
            assert_eq!(StringEncoding::from_index(enc.to_index()), enc);
        }
    }

    #[test]
    fn test_unsupported_encoding() {
        let err = "ebcdic".parse::<StringEncoding>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedEncoding(ref s) if s == "ebcdic"));
        assert!(set_string_encoding("utf32").is_err());
    }
}
