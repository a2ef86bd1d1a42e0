//! A single codec shared across threads.

use std::sync::Arc;
use std::thread;

use schemapack::{Codec, Value};

fn record(id: i64) -> Value {
    Value::from_fields(vec![
        ("id", id.into()),
        ("name", format!("worker-{}", id).into()),
        ("samples", (0..id).collect::<Vec<i64>>().into()),
    ])
}

#[test]
fn test_shared_codec() {
    let codec = Arc::new(Codec::parse("{ id: varuint, name: string, samples: [varint] }").unwrap());

    let handles: Vec<_> = (0..8)
        .map(|id| {
            let codec = Arc::clone(&codec);
            thread::spawn(move || {
                for round in 0..200 {
                    let value = record(id * 10 + round % 50);
                    let bytes = codec.encode(&value).unwrap();
                    assert_eq!(codec.encoded_len(&value).unwrap(), bytes.len());
                    assert_eq!(codec.decode(&bytes).unwrap(), value);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_codecs_built_concurrently_agree() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let codec = Codec::parse("{ b: uint8, a: [uint16] }").unwrap();
                let value = Value::from_fields(vec![
                    ("a", vec![1i64, 2].into()),
                    ("b", 3i64.into()),
                ]);
                codec.encode(&value).unwrap()
            })
        })
        .collect();

    let outputs: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for out in &outputs {
        assert_eq!(out, &vec![0x02, 0x00, 0x01, 0x00, 0x02, 0x03]);
    }
}
