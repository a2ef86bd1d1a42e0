//! The `string` primitive under each [`StringEncoding`].
//!
//! On the wire a string is a varuint byte length followed by the bytes the
//! encoding produces. Base64 and hex strings are transport notations: the
//! bytes they denote go on the wire, and decoding renders them back to text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::wire::{varuint_len, Reader, Writer};
use crate::config::StringEncoding;
use crate::error::DecodeError;

/// Exact payload length of `s` under `encoding`, excluding the length prefix.
/// The error is a human-readable reason the text cannot be encoded.
pub fn payload_len(s: &str, encoding: StringEncoding) -> Result<usize, String> {
    match encoding {
        StringEncoding::Utf8 => Ok(s.len()),
        StringEncoding::Ascii => {
            if s.is_ascii() {
                Ok(s.len())
            } else {
                Err("contains non-ASCII characters".into())
            }
        }
        StringEncoding::Binary => s.chars().try_fold(0usize, |n, c| {
            if (c as u32) <= 0xff {
                Ok(n + 1)
            } else {
                Err(format!("character {:?} is outside Latin-1", c))
            }
        }),
        StringEncoding::Utf16Le => Ok(s.encode_utf16().count() * 2),
        StringEncoding::Hex => {
            if s.len() % 2 != 0 {
                return Err("odd number of hex digits".into());
            }
            if let Some(c) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
                return Err(format!("invalid hex digit {:?}", c));
            }
            Ok(s.len() / 2)
        }
        StringEncoding::Base64 => {
            let digits = s.trim_end_matches('=').len();
            Ok(digits * 3 / 4)
        }
    }
}

/// Total wire length of `s`, prefix included.
pub fn encoded_len(s: &str, encoding: StringEncoding) -> Result<usize, String> {
    let n = payload_len(s, encoding)?;
    Ok(varuint_len(n as u64) + n)
}

/// Write the prefix and payload of `s`.
pub fn write(w: &mut Writer, s: &str, encoding: StringEncoding) -> Result<(), String> {
    match encoding {
        StringEncoding::Utf8 => {
            w.write_varuint(s.len() as u64);
            w.write_bytes(s.as_bytes());
        }
        StringEncoding::Ascii => {
            if !s.is_ascii() {
                return Err("contains non-ASCII characters".into());
            }
            w.write_varuint(s.len() as u64);
            w.write_bytes(s.as_bytes());
        }
        StringEncoding::Binary => {
            let n = payload_len(s, encoding)?;
            w.write_varuint(n as u64);
            for c in s.chars() {
                w.write_u8(c as u32 as u8);
            }
        }
        StringEncoding::Utf16Le => {
            w.write_varuint((s.encode_utf16().count() * 2) as u64);
            for unit in s.encode_utf16() {
                w.write_bytes(&unit.to_le_bytes());
            }
        }
        StringEncoding::Hex => {
            let n = payload_len(s, encoding)?;
            w.write_varuint(n as u64);
            for pair in s.as_bytes().chunks_exact(2) {
                w.write_u8((hex_digit(pair[0]) << 4) | hex_digit(pair[1]));
            }
        }
        StringEncoding::Base64 => {
            let bytes = STANDARD.decode(s).map_err(|e| e.to_string())?;
            if bytes.len() != payload_len(s, encoding)? {
                return Err("non-canonical base64 padding".into());
            }
            w.write_varuint(bytes.len() as u64);
            w.write_bytes(&bytes);
        }
    }
    Ok(())
}

/// Read a prefixed string and render it under `encoding`.
pub fn read(r: &mut Reader<'_>, encoding: StringEncoding) -> Result<String, DecodeError> {
    let offset = r.position();
    let bytes = r.read_prefixed()?;
    let invalid = |reason: String| DecodeError::InvalidText {
        offset,
        encoding: encoding.name(),
        reason,
    };

    match encoding {
        StringEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| invalid(e.to_string())),
        // ASCII reads bytes above 0x7f as their latin1 code points.
        StringEncoding::Ascii | StringEncoding::Binary => {
            Ok(bytes.iter().map(|&b| b as char).collect())
        }
        StringEncoding::Utf16Le => {
            if bytes.len() % 2 != 0 {
                return Err(invalid("odd byte length".into()));
            }
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).map_err(|e| invalid(e.to_string()))
        }
        StringEncoding::Hex => {
            const DIGITS: &[u8; 16] = b"0123456789abcdef";
            let mut out = String::with_capacity(bytes.len() * 2);
            for &b in bytes {
                out.push(DIGITS[(b >> 4) as usize] as char);
                out.push(DIGITS[(b & 0x0f) as usize] as char);
            }
            Ok(out)
        }
        StringEncoding::Base64 => Ok(STANDARD.encode(bytes)),
    }
}

fn hex_digit(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(s: &str, enc: StringEncoding) -> Vec<u8> {
        let len = encoded_len(s, enc).unwrap();
        let mut w = Writer::with_capacity(len);
        write(&mut w, s, enc).unwrap();
        let out = w.into_inner();
        assert_eq!(out.len(), len, "size pass disagrees for {:?} under {}", s, enc);
        out
    }

    fn decode(bytes: &[u8], enc: StringEncoding) -> String {
        let mut r = Reader::new(bytes);
        let s = read(&mut r, enc).unwrap();
        assert!(r.is_exhausted());
        s
    }

    #[test]
    fn test_utf8_multibyte() {
        let bytes = encode("asdдasf", StringEncoding::Utf8);
        assert_eq!(bytes[0], 8);
        assert_eq!(decode(&bytes, StringEncoding::Utf8), "asdдasf");
    }

    #[test]
    fn test_utf16_surrogate_pair() {
        let bytes = encode("a😀", StringEncoding::Utf16Le);
        assert_eq!(bytes, vec![6, 0x61, 0x00, 0x3d, 0xd8, 0x00, 0xde]);
        assert_eq!(decode(&bytes, StringEncoding::Utf16Le), "a😀");
    }

    #[test]
    fn test_ascii_read_keeps_high_bytes() {
        let bytes = [3, b'a', 0xe9, b'z'];
        assert_eq!(decode(&bytes, StringEncoding::Ascii), "a\u{e9}z");
    }

    #[test]
    fn test_hex_and_base64_carry_raw_bytes() {
        let bytes = encode("DEADbeef", StringEncoding::Hex);
        assert_eq!(bytes, vec![4, 0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode(&bytes, StringEncoding::Hex), "deadbeef");

        let bytes = encode("3q2+7w==", StringEncoding::Base64);
        assert_eq!(bytes, vec![4, 0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode(&bytes, StringEncoding::Base64), "3q2+7w==");
    }

    #[test]
    fn test_latin1_and_ascii() {
        let bytes = encode("café", StringEncoding::Binary);
        assert_eq!(bytes, vec![4, b'c', b'a', b'f', 0xe9]);
        assert_eq!(decode(&bytes, StringEncoding::Binary), "café");
        assert!(encoded_len("café", StringEncoding::Ascii).is_err());
        assert!(encoded_len("日本", StringEncoding::Binary).is_err());
    }

    #[test]
    fn test_rejects_bad_notation() {
        assert!(encoded_len("abc", StringEncoding::Hex).is_err());
        assert!(encoded_len("zz", StringEncoding::Hex).is_err());
        let mut w = Writer::with_capacity(8);
        assert!(write(&mut w, "!!!!", StringEncoding::Base64).is_err());
    }

    #[test]
    fn test_invalid_utf8_on_read() {
        let mut r = Reader::new(&[2, 0xc3, 0x28]);
        assert!(matches!(
            read(&mut r, StringEncoding::Utf8),
            Err(DecodeError::InvalidText { offset: 0, encoding: "utf8", .. })
        ));
    }
}
