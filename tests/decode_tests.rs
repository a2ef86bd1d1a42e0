//! Decoding from raw bytes, including malformed and truncated input.

use pretty_assertions::assert_eq;
use schemapack::{Codec, DecodeError, StringEncoding, Value};

fn player_codec() -> Codec {
    Codec::parse(
        "{ health: varuint, jumping: boolean, position: [int16], \
           attributes: { str: uint8, agi: uint8, int: uint8 } }",
    )
    .unwrap()
}

const PLAYER_BYTES: [u8; 13] = [
    0x2a, 0x16, 0x57, 0xa0, 0x1f, 0x00, 0x03, 0xfd, 0xe4, 0x01, 0x57, 0x04, 0xb1,
];

#[test]
fn test_decode_player() {
    let value = player_codec().decode(&PLAYER_BYTES).unwrap();
    assert_eq!(value.get("health"), Some(&Value::Integer(4000)));
    assert_eq!(value.get("jumping"), Some(&Value::Boolean(false)));
    assert_eq!(
        value.get("position").and_then(Value::as_seq),
        Some(&[Value::Integer(-540), Value::Integer(343), Value::Integer(1201)][..])
    );
    assert_eq!(
        value.get("attributes").and_then(|a| a.get("str")),
        Some(&Value::Integer(87))
    );
}

#[test]
fn test_every_truncation_fails() {
    let codec = player_codec();
    for cut in 0..PLAYER_BYTES.len() {
        match codec.decode(&PLAYER_BYTES[..cut]) {
            Err(DecodeError::TruncatedInput { need, have }) => {
                assert_eq!(have, cut);
                assert!(need > have, "cut {}: need {} have {}", cut, need, have);
            }
            other => panic!("cut {}: expected TruncatedInput, got {:?}", cut, other),
        }
    }
}

#[test]
fn test_truncated_by_one() {
    let err = player_codec().decode(&PLAYER_BYTES[..12]).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedInput { need: 13, have: 12 }));
}

#[test]
fn test_root_sequence_reads_until_exhausted() {
    let codec = Codec::parse("[uint8]").unwrap();
    assert_eq!(codec.decode(&[1, 2, 3]).unwrap(), vec![1i64, 2, 3].into());
    assert_eq!(codec.decode(&[]).unwrap(), Value::Seq(vec![]));
}

#[test]
fn test_root_sequence_partial_element() {
    let codec = Codec::parse("[uint16]").unwrap();
    let err = codec.decode(&[0x00, 0x01, 0x00]).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedInput { need: 4, have: 3 }));
}

#[test]
fn test_trailing_bytes_rejected() {
    let codec = Codec::parse("{ a: uint8 }").unwrap();
    let err = codec.decode(&[0x01, 0x02]).unwrap_err();
    assert!(matches!(err, DecodeError::TrailingBytes { remaining: 1 }));
}

#[test]
fn test_overlong_varuint() {
    let codec = Codec::parse("varuint").unwrap();
    let err = codec.decode(&[0x80; 11]).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidData(_)), "{:?}", err);
}

#[test]
fn test_invalid_utf8() {
    let codec = Codec::parse("string").unwrap();
    let err = codec.decode(&[0x02, 0xc3, 0x28]).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::InvalidText { offset: 0, encoding: "utf8", .. }
    ));
}

#[test]
fn test_invalid_utf16() {
    let codec = Codec::builder(&"string".into())
        .string_encoding(StringEncoding::Utf16Le)
        .build()
        .unwrap();
    // odd payload length
    assert!(matches!(
        codec.decode(&[0x01, 0x61]),
        Err(DecodeError::InvalidText { .. })
    ));
    // lone high surrogate
    assert!(matches!(
        codec.decode(&[0x02, 0x3d, 0xd8]),
        Err(DecodeError::InvalidText { .. })
    ));
}

#[test]
fn test_nonzero_boolean_is_true() {
    let codec = Codec::parse("boolean").unwrap();
    assert_eq!(codec.decode(&[0x02]).unwrap(), Value::Boolean(true));
    assert_eq!(codec.decode(&[0x00]).unwrap(), Value::Boolean(false));
}

#[test]
fn test_varuint_wraps_above_i64_max() {
    let codec = Codec::parse("varuint").unwrap();
    let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
    assert_eq!(codec.decode(&bytes).unwrap(), Value::Integer(-1));
}

#[test]
fn test_oversized_count_fails_before_reading() {
    let codec = Codec::parse("{ v: [string] }").unwrap();
    // count claims 200 elements, only 2 bytes follow
    let err = codec.decode(&[0xc8, 0x01, 0x00, 0x00]).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedInput { need: 202, have: 4 }));
}

#[test]
fn test_unrepresentable_length_is_reported_as_declared() {
    let max_varuint = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];

    let err = Codec::parse("string").unwrap().decode(&max_varuint).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::LengthOverflow {
            declared: u64::MAX,
            available: 0
        }
    ));

    let mut bytes = max_varuint.to_vec();
    bytes.extend_from_slice(&[0x00, 0x00]);
    let err = Codec::parse("{ v: [string] }").unwrap().decode(&bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::LengthOverflow {
            declared: u64::MAX,
            available: 2
        }
    ));
    assert_eq!(
        err.to_string(),
        "declared length 18446744073709551615 exceeds the 2 remaining bytes"
    );
}
