//! Read pass.
//!
//! Walks the same traversal as the encoder and rebuilds the value on an
//! explicit stack of open containers. Nothing on the wire says what comes
//! next; the traversal alone decides.

use std::collections::HashMap;

use super::text;
use super::wire::Reader;
use crate::config::{CodecOptions, StringEncoding};
use crate::error::DecodeError;
use crate::schema::{Key, Op, Tail, Traversal};
use crate::types::PrimitiveType;
use crate::value::Value;

/// Decode a complete buffer.
///
/// A root sequence reads tail elements until the input is exhausted. Any
/// other schema must consume the input exactly.
pub fn decode(
    traversal: &Traversal,
    data: &[u8],
    options: &CodecOptions,
) -> Result<Value, DecodeError> {
    let mut reader = Reader::new(data);
    let value = read_traversal(traversal, &mut reader, options.string_encoding)?;
    if !reader.is_exhausted() {
        return Err(DecodeError::TrailingBytes {
            remaining: reader.remaining(),
        });
    }
    Ok(value)
}

/// A container under construction.
enum Frame {
    /// Receives the value keyed by [`Key::This`].
    Slot(Option<Value>),
    Map(HashMap<String, Value>),
    Seq(Vec<Value>),
}

impl Frame {
    fn attach(&mut self, key: &Key, value: Value) {
        match self {
            Frame::Slot(slot) => *slot = Some(value),
            Frame::Map(map) => {
                let name = match key {
                    Key::Field(name) => name.clone(),
                    other => other.to_string(),
                };
                map.insert(name, value);
            }
            Frame::Seq(items) => items.push(value),
        }
    }

    fn into_value(self) -> Option<Value> {
        match self {
            Frame::Slot(slot) => slot,
            Frame::Map(map) => Some(Value::Map(map)),
            Frame::Seq(items) => Some(Value::Seq(items)),
        }
    }
}

fn unbalanced() -> DecodeError {
    DecodeError::InvalidData("unbalanced traversal".into())
}

fn attach_top(stack: &mut [Frame], key: &Key, value: Value) -> Result<(), DecodeError> {
    stack.last_mut().ok_or_else(unbalanced)?.attach(key, value);
    Ok(())
}

fn read_leaf(
    r: &mut Reader<'_>,
    ty: PrimitiveType,
    encoding: StringEncoding,
) -> Result<Value, DecodeError> {
    Ok(match ty {
        PrimitiveType::Boolean => Value::Boolean(r.read_u8()? != 0),
        PrimitiveType::Int8 => Value::Integer(r.read_u8()? as i8 as i64),
        PrimitiveType::Uint8 => Value::Integer(r.read_u8()? as i64),
        PrimitiveType::Int16 => Value::Integer(r.read_u16_be()? as i16 as i64),
        PrimitiveType::Uint16 => Value::Integer(r.read_u16_be()? as i64),
        PrimitiveType::Int32 => Value::Integer(r.read_u32_be()? as i32 as i64),
        PrimitiveType::Uint32 => Value::Integer(r.read_u32_be()? as i64),
        PrimitiveType::Float32 => Value::Float(r.read_f32_be()? as f64),
        PrimitiveType::Float64 => Value::Float(r.read_f64_be()?),
        PrimitiveType::VarUint => Value::Integer(r.read_varuint()? as i64),
        PrimitiveType::VarInt => Value::Integer(r.read_varint()?),
        PrimitiveType::Str => Value::Str(text::read(r, encoding)?),
        PrimitiveType::Buffer => Value::Bytes(r.read_prefixed()?.to_vec()),
    })
}

fn read_tail_element(
    tail: &Tail,
    r: &mut Reader<'_>,
    encoding: StringEncoding,
) -> Result<Value, DecodeError> {
    match tail {
        Tail::Primitive(ty) => read_leaf(r, *ty, encoding),
        Tail::Nested(inner) => read_traversal(inner, r, encoding),
    }
}

fn read_traversal(
    traversal: &Traversal,
    r: &mut Reader<'_>,
    encoding: StringEncoding,
) -> Result<Value, DecodeError> {
    let mut stack: Vec<Frame> = vec![Frame::Slot(None)];

    for op in traversal.ops() {
        match op {
            Op::Primitive { key, ty } => {
                let value = read_leaf(r, *ty, encoding)?;
                attach_top(&mut stack, key, value)?;
            }
            Op::EnterMap { .. } => stack.push(Frame::Map(HashMap::new())),
            Op::EnterSeq { head, .. } => stack.push(Frame::Seq(Vec::with_capacity(*head))),
            Op::ExitMap { key } => {
                let value = stack
                    .pop()
                    .and_then(Frame::into_value)
                    .ok_or_else(unbalanced)?;
                attach_top(&mut stack, key, value)?;
            }
            Op::ExitSeq {
                key,
                tail,
                prefixed,
                ..
            } => {
                let Some(Frame::Seq(mut items)) = stack.pop() else {
                    return Err(unbalanced());
                };
                if *prefixed {
                    let declared = r.read_varuint()?;
                    let count = r.checked_len(declared)?;
                    // Every element occupies at least one byte.
                    if count > r.remaining() {
                        return Err(DecodeError::TruncatedInput {
                            need: r.position() + count,
                            have: r.position() + r.remaining(),
                        });
                    }
                    items.reserve(count);
                    for _ in 0..count {
                        items.push(read_tail_element(tail, r, encoding)?);
                    }
                } else {
                    while !r.is_exhausted() {
                        items.push(read_tail_element(tail, r, encoding)?);
                    }
                }
                attach_top(&mut stack, key, Value::Seq(items))?;
            }
        }
    }

    match stack.pop() {
        Some(Frame::Slot(Some(value))) if stack.is_empty() => Ok(value),
        _ => Err(unbalanced()),
    }
}
