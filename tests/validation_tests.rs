//! The optional validation guard and the structural errors reported with or
//! without it.

use pretty_assertions::assert_eq;
use schemapack::{Codec, EncodeError, SchemaDef, StringEncoding, Value};

fn validating(schema: &str) -> Codec {
    Codec::builder(&schemapack::parser::parse(schema).unwrap())
        .validate(true)
        .build()
        .unwrap()
}

fn lax(schema: &str) -> Codec {
    Codec::builder(&schemapack::parser::parse(schema).unwrap())
        .validate(false)
        .build()
        .unwrap()
}

#[test]
fn test_out_of_range_uint8() {
    let codec = validating("{ level: uint8 }");
    let value = Value::from_fields(vec![("level", 300i64.into())]);
    match codec.encode(&value).unwrap_err() {
        EncodeError::OutOfRange {
            field,
            value,
            type_name,
            bounds,
        } => {
            assert_eq!(field, "level");
            assert_eq!(value, "300");
            assert_eq!(type_name, "uint8");
            assert_eq!(bounds, "[0, 255]");
        }
        other => panic!("unexpected: {:?}", other),
    }

    // Without the guard the value is truncated to its low byte.
    assert_eq!(lax("{ level: uint8 }").encode(&value).unwrap(), vec![44]);
}

#[test]
fn test_size_pass_reports_the_same_error() {
    let codec = validating("{ level: int8 }");
    let value = Value::from_fields(vec![("level", (-200i64).into())]);
    assert!(matches!(
        codec.encoded_len(&value),
        Err(EncodeError::OutOfRange { .. })
    ));
}

#[test]
fn test_negative_varuint() {
    let codec = validating("varuint");
    assert!(matches!(
        codec.encode(&Value::Integer(-1)),
        Err(EncodeError::OutOfRange { .. })
    ));
}

#[test]
fn test_strict_kinds() {
    let codec = validating("[boolean, int16, string]");
    let cases = [
        (Value::Seq(vec![1i64.into(), 2i64.into()]), "[0]", "1", "boolean"),
        (
            Value::Seq(vec![true.into(), Value::Float(1.5)]),
            "[1]",
            "1.5",
            "int16",
        ),
        (
            Value::Seq(vec![true.into(), 2i64.into(), 3i64.into()]),
            "[2]",
            "3",
            "string",
        ),
    ];
    for (value, path, offending, expected_type) in cases {
        match codec.encode(&value).unwrap_err() {
            EncodeError::TypeMismatch {
                field,
                value,
                expected,
                ..
            } => {
                assert_eq!(field, path);
                assert_eq!(value, offending);
                assert_eq!(expected, expected_type);
            }
            other => panic!("{}: unexpected {:?}", path, other),
        }
    }

    // Integral floats are accepted for integer types.
    let ok = Value::Seq(vec![false.into(), Value::Float(-540.0)]);
    assert_eq!(codec.encode(&ok).unwrap(), vec![0x00, 0xfd, 0xe4]);
}

#[test]
fn test_type_mismatch_message_names_value() {
    let codec = validating("{ s: string }");
    let err = codec
        .encode(&Value::from_fields(vec![("s", 5i64.into())]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "type mismatch for field 's': expected string, got integer 5"
    );
}

#[test]
fn test_float_past_i64_max_is_out_of_range() {
    let value = Value::Float(9_223_372_036_854_775_808.0);
    for schema in ["varuint", "varint"] {
        assert!(
            matches!(
                validating(schema).encode(&value),
                Err(EncodeError::OutOfRange { .. })
            ),
            "{}",
            schema
        );
    }

    let largest = Value::Float(9_223_372_036_854_774_784.0);
    let codec = validating("varint");
    let bytes = codec.encode(&largest).unwrap();
    assert_eq!(
        codec.decode(&bytes).unwrap(),
        Value::Integer(9_223_372_036_854_774_784)
    );
}

#[test]
fn test_non_string_is_always_rejected() {
    let value = Value::from_fields(vec![("name", 5i64.into())]);
    for codec in [validating("{ name: string }"), lax("{ name: string }")] {
        assert!(matches!(
            codec.encode(&value),
            Err(EncodeError::TypeMismatch { ref field, .. }) if field == "name"
        ));
    }
}

#[test]
fn test_error_paths() {
    let codec = validating(
        "{ people: [ { name: string, age: uint8 } ], stats: { hp: uint16 } }",
    );
    let person = |age: i64| Value::from_fields(vec![("name", "x".into()), ("age", age.into())]);

    let value = Value::from_fields(vec![
        ("people", Value::Seq(vec![person(20), person(700)])),
        ("stats", Value::from_fields(vec![("hp", 1i64.into())])),
    ]);
    assert!(matches!(
        codec.encode(&value),
        Err(EncodeError::OutOfRange { ref field, .. }) if field == "people[1].age"
    ));

    let value = Value::from_fields(vec![
        ("people", Value::Seq(vec![])),
        ("stats", Value::from_fields(vec![("hp", (-1i64).into())])),
    ]);
    assert!(matches!(
        codec.encode(&value),
        Err(EncodeError::OutOfRange { ref field, .. }) if field == "stats.hp"
    ));
}

#[test]
fn test_missing_field_always_reported() {
    let value = Value::from_fields(vec![("a", 1i64.into())]);
    for codec in [validating("{ a: uint8, b: uint8 }"), lax("{ a: uint8, b: uint8 }")] {
        assert!(matches!(
            codec.encode(&value),
            Err(EncodeError::MissingField { ref field }) if field == "b"
        ));
    }
}

#[test]
fn test_short_sequence() {
    let codec = lax("{ v: [uint8, uint8, uint8] }");
    let value = Value::from_fields(vec![("v", vec![1i64].into())]);
    match codec.encode(&value).unwrap_err() {
        EncodeError::ShortSequence { field, need, have } => {
            assert_eq!(field, "v");
            assert_eq!(need, 2);
            assert_eq!(have, 1);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_shape_mismatch() {
    let codec = lax("{ inner: { x: uint8 } }");
    let value = Value::from_fields(vec![("inner", 3i64.into())]);
    assert!(matches!(
        codec.encode(&value),
        Err(EncodeError::TypeMismatch { ref expected, .. }) if expected == "mapping"
    ));
}

#[test]
fn test_invalid_text_for_encoding() {
    let schema = SchemaDef::map([("s", SchemaDef::ty("string"))]);
    let codec = Codec::builder(&schema)
        .string_encoding(StringEncoding::Ascii)
        .build()
        .unwrap();
    let value = Value::from_fields(vec![("s", "naïve".into())]);
    match codec.encode(&value).unwrap_err() {
        EncodeError::InvalidText { field, encoding, .. } => {
            assert_eq!(field, "s");
            assert_eq!(encoding, "ascii");
        }
        other => panic!("unexpected: {:?}", other),
    }

    let hex = Codec::builder(&schema)
        .string_encoding(StringEncoding::Hex)
        .build()
        .unwrap();
    let value = Value::from_fields(vec![("s", "abc".into())]);
    assert!(matches!(
        hex.encode(&value),
        Err(EncodeError::InvalidText { .. })
    ));
}
