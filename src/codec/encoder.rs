//! Size pass and write pass.
//!
//! Both walk the compiled traversal with an explicit stack of container
//! references. A structural tail element type runs its own nested traversal
//! once per element, so call depth is bounded by schema depth, not data size.

use super::guard::{self, Violation};
use super::text;
use super::wire::{varuint_len, zigzag, Writer};
use crate::config::CodecOptions;
use crate::error::EncodeError;
use crate::schema::{Key, Op, Tail, Traversal};
use crate::types::PrimitiveType;
use crate::value::Value;

/// Encode `value`: one size pass, one allocation, one write pass.
pub fn encode(
    traversal: &Traversal,
    value: &Value,
    options: &CodecOptions,
) -> Result<Vec<u8>, EncodeError> {
    let len = encoded_len(traversal, value, options)?;
    let mut writer = Writer::with_capacity(len);
    write_traversal(traversal, value, &mut writer, options, &mut Path::default())?;
    debug_assert_eq!(writer.len(), len, "size pass and write pass disagree");
    Ok(writer.into_inner())
}

/// The size pass: exact byte length `encode` will produce.
///
/// With validation enabled this is where the guard runs, so a rejected value
/// fails before any buffer is allocated.
pub fn encoded_len(
    traversal: &Traversal,
    value: &Value,
    options: &CodecOptions,
) -> Result<usize, EncodeError> {
    measure_traversal(traversal, value, options, &mut Path::default())
}

/// Field path of the value being visited, for error messages.
#[derive(Default)]
struct Path<'t> {
    segments: Vec<Segment<'t>>,
}

#[derive(Clone, Copy)]
enum Segment<'t> {
    Field(&'t str),
    Index(usize),
}

impl<'t> Path<'t> {
    fn enter(&mut self, key: &'t Key) {
        match key {
            Key::This => {}
            Key::Field(name) => self.segments.push(Segment::Field(name)),
            Key::Index(i) => self.segments.push(Segment::Index(*i)),
        }
    }

    fn leave(&mut self, key: &Key) {
        if !matches!(key, Key::This) {
            self.segments.pop();
        }
    }

    fn render(&self, leaf: Option<&Key>) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Field(name) => push_field(&mut out, name),
                Segment::Index(i) => push_index(&mut out, *i),
            }
        }
        match leaf {
            Some(Key::Field(name)) => push_field(&mut out, name),
            Some(Key::Index(i)) => push_index(&mut out, *i),
            _ => {}
        }
        if out.is_empty() {
            out.push_str("<root>");
        }
        out
    }
}

fn push_field(out: &mut String, name: &str) {
    if !out.is_empty() {
        out.push('.');
    }
    out.push_str(name);
}

fn push_index(out: &mut String, index: usize) {
    out.push('[');
    out.push_str(&index.to_string());
    out.push(']');
}

fn project<'v>(parent: &'v Value, key: &Key, path: &Path<'_>) -> Result<&'v Value, EncodeError> {
    match (key, parent) {
        (Key::This, _) => Ok(parent),
        (Key::Field(name), Value::Map(map)) => {
            map.get(name.as_str()).ok_or_else(|| EncodeError::MissingField {
                field: path.render(Some(key)),
            })
        }
        (Key::Index(i), Value::Seq(items)) => items.get(*i).ok_or_else(|| EncodeError::MissingField {
            field: path.render(Some(key)),
        }),
        (Key::Field(_), other) => Err(EncodeError::TypeMismatch {
            field: path.render(None),
            value: other.to_string(),
            expected: "mapping".into(),
            actual: other.type_name().into(),
        }),
        (Key::Index(_), other) => Err(EncodeError::TypeMismatch {
            field: path.render(None),
            value: other.to_string(),
            expected: "sequence".into(),
            actual: other.type_name().into(),
        }),
    }
}

fn expect_map<'v>(value: &'v Value, path: &Path<'_>) -> Result<&'v Value, EncodeError> {
    match value {
        Value::Map(_) => Ok(value),
        other => Err(EncodeError::TypeMismatch {
            field: path.render(None),
            value: other.to_string(),
            expected: "mapping".into(),
            actual: other.type_name().into(),
        }),
    }
}

fn expect_seq<'v>(value: &'v Value, head: usize, path: &Path<'_>) -> Result<&'v [Value], EncodeError> {
    match value {
        Value::Seq(items) if items.len() >= head => Ok(items),
        Value::Seq(items) => Err(EncodeError::ShortSequence {
            field: path.render(None),
            need: head,
            have: items.len(),
        }),
        other => Err(EncodeError::TypeMismatch {
            field: path.render(None),
            value: other.to_string(),
            expected: "sequence".into(),
            actual: other.type_name().into(),
        }),
    }
}

fn top<'v>(stack: &[&'v Value]) -> &'v Value {
    stack[stack.len() - 1]
}

fn leaf_len(ty: PrimitiveType, value: &Value, options: &CodecOptions) -> Result<usize, Violation> {
    if options.validate {
        guard::check(ty, value)?;
    }
    Ok(match ty {
        PrimitiveType::VarUint => varuint_len(guard::coerce_int(value)? as u64),
        PrimitiveType::VarInt => varuint_len(zigzag(guard::coerce_int(value)?)),
        PrimitiveType::Str => text::encoded_len(guard::coerce_str(value)?, options.string_encoding)
            .map_err(|reason| Violation::Text { reason })?,
        PrimitiveType::Buffer => {
            let n = guard::coerce_bytes(value)?.len();
            varuint_len(n as u64) + n
        }
        fixed => fixed.fixed_width().unwrap_or_default(),
    })
}

fn write_leaf(
    w: &mut Writer,
    ty: PrimitiveType,
    value: &Value,
    options: &CodecOptions,
) -> Result<(), Violation> {
    match ty {
        PrimitiveType::Boolean => w.write_u8(guard::coerce_bool(value)? as u8),
        PrimitiveType::Int8 | PrimitiveType::Uint8 => w.write_u8(guard::coerce_int(value)? as u8),
        PrimitiveType::Int16 | PrimitiveType::Uint16 => {
            w.write_u16_be(guard::coerce_int(value)? as u16)
        }
        PrimitiveType::Int32 | PrimitiveType::Uint32 => {
            w.write_u32_be(guard::coerce_int(value)? as u32)
        }
        PrimitiveType::Float32 => w.write_f32_be(guard::coerce_float(value)? as f32),
        PrimitiveType::Float64 => w.write_f64_be(guard::coerce_float(value)?),
        PrimitiveType::VarUint => w.write_varuint(guard::coerce_int(value)? as u64),
        PrimitiveType::VarInt => w.write_varint(guard::coerce_int(value)?),
        PrimitiveType::Str => text::write(w, guard::coerce_str(value)?, options.string_encoding)
            .map_err(|reason| Violation::Text { reason })?,
        PrimitiveType::Buffer => {
            let bytes = guard::coerce_bytes(value)?;
            w.write_varuint(bytes.len() as u64);
            w.write_bytes(bytes);
        }
    }
    Ok(())
}

fn measure_traversal<'t>(
    traversal: &'t Traversal,
    root: &Value,
    options: &CodecOptions,
    path: &mut Path<'t>,
) -> Result<usize, EncodeError> {
    if !options.validate {
        if let Some(len) = traversal.fixed_len() {
            return Ok(len);
        }
    }

    let mut stack: Vec<&Value> = vec![root];
    let mut total = 0usize;

    for op in traversal.ops() {
        match op {
            Op::Primitive { key, ty } => match ty.fixed_width() {
                Some(width) if !options.validate => total += width,
                _ => {
                    let value = project(top(&stack), key, path)?;
                    total += leaf_len(*ty, value, options).map_err(|v| {
                        v.into_error(path.render(Some(key)), *ty, value, options.string_encoding)
                    })?;
                }
            },
            Op::EnterMap { key } => {
                let value = project(top(&stack), key, path)?;
                path.enter(key);
                stack.push(expect_map(value, path)?);
            }
            Op::ExitMap { key } => {
                stack.pop();
                path.leave(key);
            }
            Op::EnterSeq { key, head } => {
                let value = project(top(&stack), key, path)?;
                path.enter(key);
                expect_seq(value, *head, path)?;
                stack.push(value);
            }
            Op::ExitSeq {
                key,
                head,
                tail,
                prefixed,
            } => {
                let items: &[Value] = match stack.pop() {
                    Some(Value::Seq(items)) => &items[*head..],
                    _ => &[],
                };
                if *prefixed {
                    total += varuint_len(items.len() as u64);
                }
                total += measure_tail(tail, items, *head, options, path)?;
                path.leave(key);
            }
        }
    }

    Ok(total)
}

fn measure_tail<'t>(
    tail: &'t Tail,
    items: &[Value],
    head: usize,
    options: &CodecOptions,
    path: &mut Path<'t>,
) -> Result<usize, EncodeError> {
    let fixed = match tail {
        Tail::Primitive(ty) => ty.fixed_width(),
        Tail::Nested(inner) => inner.fixed_len(),
    };
    if let (Some(width), false) = (fixed, options.validate) {
        return Ok(width * items.len());
    }

    let mut total = 0;
    for (i, item) in items.iter().enumerate() {
        let index = head + i;
        match tail {
            Tail::Primitive(ty) => {
                total += leaf_len(*ty, item, options).map_err(|v| {
                    v.into_error(
                        path.render(Some(&Key::Index(index))),
                        *ty,
                        item,
                        options.string_encoding,
                    )
                })?;
            }
            Tail::Nested(inner) => {
                path.segments.push(Segment::Index(index));
                total += measure_traversal(inner, item, options, path)?;
                path.segments.pop();
            }
        }
    }
    Ok(total)
}

fn write_traversal<'t>(
    traversal: &'t Traversal,
    root: &Value,
    w: &mut Writer,
    options: &CodecOptions,
    path: &mut Path<'t>,
) -> Result<(), EncodeError> {
    let mut stack: Vec<&Value> = vec![root];

    for op in traversal.ops() {
        match op {
            Op::Primitive { key, ty } => {
                let value = project(top(&stack), key, path)?;
                write_leaf(w, *ty, value, options).map_err(|v| {
                    v.into_error(path.render(Some(key)), *ty, value, options.string_encoding)
                })?;
            }
            Op::EnterMap { key } => {
                let value = project(top(&stack), key, path)?;
                path.enter(key);
                stack.push(expect_map(value, path)?);
            }
            Op::ExitMap { key } => {
                stack.pop();
                path.leave(key);
            }
            Op::EnterSeq { key, head } => {
                let value = project(top(&stack), key, path)?;
                path.enter(key);
                expect_seq(value, *head, path)?;
                stack.push(value);
            }
            Op::ExitSeq {
                key,
                head,
                tail,
                prefixed,
            } => {
                let items: &[Value] = match stack.pop() {
                    Some(Value::Seq(items)) => &items[*head..],
                    _ => &[],
                };
                if *prefixed {
                    w.write_varuint(items.len() as u64);
                }
                for (i, item) in items.iter().enumerate() {
                    match tail {
                        Tail::Primitive(ty) => write_leaf(w, *ty, item, options).map_err(|v| {
                            v.into_error(
                                path.render(Some(&Key::Index(head + i))),
                                *ty,
                                item,
                                options.string_encoding,
                            )
                        })?,
                        Tail::Nested(inner) => {
                            path.segments.push(Segment::Index(head + i));
                            write_traversal(inner, item, w, options, path)?;
                            path.segments.pop();
                        }
                    }
                }
                path.leave(key);
            }
        }
    }

    Ok(())
}
