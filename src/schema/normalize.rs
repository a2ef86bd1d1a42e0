//! Schema normalizer: resolves type names, fixes the canonical field order and
//! flattens the tree into a [`Traversal`].

use std::cmp::Ordering;

use super::traversal::{Key, Op, Tail, Traversal};
use super::SchemaDef;
use crate::error::SchemaError;
use crate::registry::resolve_type_name;
use crate::types::{is_reserved, normalize_type_name, PrimitiveType};

/// Canonical order of mapping keys: case-insensitive, ties broken byte-wise.
///
/// This order is part of the wire contract. Two codecs built from logically
/// identical schemas lay fields out identically because of it.
pub fn canonical_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compile a schema definition.
///
/// The root may be a mapping, a sequence or a bare type name. A root sequence
/// carries no count prefix; everything past its head is tail.
pub fn normalize(def: &SchemaDef) -> Result<Traversal, SchemaError> {
    let mut compiler = Compiler { path: Vec::new() };
    let mut ops = Vec::new();
    compiler.compile_node(def, Key::This, true, &mut ops)?;
    Ok(Traversal::new(ops))
}

struct Compiler {
    path: Vec<String>,
}

impl Compiler {
    fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "<root>".to_string();
        }
        let mut out = String::new();
        for seg in &self.path {
            if seg.starts_with('[') || out.is_empty() {
                out.push_str(seg);
            } else {
                out.push('.');
                out.push_str(seg);
            }
        }
        out
    }

    fn resolve(&self, name: &str) -> Result<PrimitiveType, SchemaError> {
        let normalized = normalize_type_name(name);
        if is_reserved(&normalized) {
            return Err(SchemaError::ReservedNameCollision(normalized));
        }
        resolve_type_name(&normalized).ok_or_else(|| SchemaError::InvalidSchemaType {
            type_name: name.to_string(),
            path: self.path_string(),
        })
    }

    fn compile_node(
        &mut self,
        def: &SchemaDef,
        key: Key,
        is_root: bool,
        ops: &mut Vec<Op>,
    ) -> Result<(), SchemaError> {
        match def {
            SchemaDef::Type(name) => {
                let ty = self.resolve(name)?;
                ops.push(Op::Primitive { key, ty });
            }
            SchemaDef::Map(fields) => {
                if fields.is_empty() {
                    return Err(SchemaError::EmptyContainer {
                        kind: "mapping",
                        path: self.path_string(),
                    });
                }
                let mut sorted: Vec<&(String, SchemaDef)> = fields.iter().collect();
                sorted.sort_by(|a, b| canonical_cmp(&a.0, &b.0));
                if let Some(pair) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
                    return Err(SchemaError::DuplicateField {
                        path: self.path_string(),
                        field: pair[0].0.clone(),
                    });
                }

                ops.push(Op::EnterMap { key: key.clone() });
                for (name, child) in sorted {
                    self.path.push(name.clone());
                    self.compile_node(child, Key::Field(name.clone()), false, ops)?;
                    self.path.pop();
                }
                ops.push(Op::ExitMap { key });
            }
            SchemaDef::Seq(items) => {
                let Some((tail_def, head_defs)) = items.split_last() else {
                    return Err(SchemaError::EmptyContainer {
                        kind: "sequence",
                        path: self.path_string(),
                    });
                };
                let head = head_defs.len();

                ops.push(Op::EnterSeq {
                    key: key.clone(),
                    head,
                });
                for (i, child) in head_defs.iter().enumerate() {
                    self.path.push(format!("[{}]", i));
                    self.compile_node(child, Key::Index(i), false, ops)?;
                    self.path.pop();
                }

                self.path.push(format!("[{}..]", head));
                let tail = self.compile_tail(tail_def)?;
                self.path.pop();

                ops.push(Op::ExitSeq {
                    key,
                    head,
                    tail,
                    prefixed: !is_root,
                });
            }
        }
        Ok(())
    }

    fn compile_tail(&mut self, def: &SchemaDef) -> Result<Tail, SchemaError> {
        match def {
            SchemaDef::Type(name) => Ok(Tail::Primitive(self.resolve(name)?)),
            _ => {
                let mut ops = Vec::new();
                self.compile_node(def, Key::This, false, &mut ops)?;
                Ok(Tail::Nested(Box::new(Traversal::new(ops))))
            }
        }
    }
}
