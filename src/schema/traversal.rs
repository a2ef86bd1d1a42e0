//! The compiled traversal: a static instruction list walked by the codec's
//! size, write and read passes.

use std::fmt;

use crate::types::{PrimitiveType, MARKER_MAP, MARKER_MAP_END, MARKER_SEQ, MARKER_SEQ_END};

/// Projects a child out of the current container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// The current container itself: the root value, or one repeated tail element.
    This,
    /// A named mapping field.
    Field(String),
    /// A fixed head position of a sequence.
    Index(usize),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::This => f.write_str("$"),
            Key::Field(name) => f.write_str(name),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Element type of a sequence's repeated tail.
#[derive(Debug, Clone, PartialEq)]
pub enum Tail {
    Primitive(PrimitiveType),
    /// A structural element type, compiled on its own. Its operations are
    /// keyed from [`Key::This`], the tail element.
    Nested(Box<Traversal>),
}

/// One traversal step.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Primitive { key: Key, ty: PrimitiveType },
    EnterMap { key: Key },
    ExitMap { key: Key },
    /// `head` fixed elements follow, keyed by [`Key::Index`].
    EnterSeq { key: Key, head: usize },
    /// Emits the repeated tail. `prefixed` is false only for a root sequence,
    /// whose tail runs to the end of the buffer.
    ExitSeq {
        key: Key,
        head: usize,
        tail: Tail,
        prefixed: bool,
    },
}

/// A compiled schema. Immutable once built and shared by every call.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    ops: Vec<Op>,
    fixed_len: Option<usize>,
}

impl Traversal {
    pub(crate) fn new(ops: Vec<Op>) -> Self {
        let fixed_len = fold_fixed_len(&ops);
        Traversal { ops, fixed_len }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Whether the schema root is a sequence.
    pub fn is_root_sequence(&self) -> bool {
        matches!(self.ops.first(), Some(Op::EnterSeq { key: Key::This, .. }))
    }

    /// Encoded length of any value, when it does not depend on the value:
    /// every leaf is fixed-width and there is no sequence.
    pub fn fixed_len(&self) -> Option<usize> {
        self.fixed_len
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let mut depth = depth;
        for op in &self.ops {
            match op {
                Op::Primitive { key, ty } => writeln!(f, "{:w$}{} {}", "", key, ty, w = depth * 2)?,
                Op::EnterMap { key } => {
                    writeln!(f, "{:w$}{} {}", "", key, MARKER_MAP, w = depth * 2)?;
                    depth += 1;
                }
                Op::ExitMap { key } => {
                    depth = depth.saturating_sub(1);
                    writeln!(f, "{:w$}{} {}", "", key, MARKER_MAP_END, w = depth * 2)?;
                }
                Op::EnterSeq { key, .. } => {
                    writeln!(f, "{:w$}{} {}", "", key, MARKER_SEQ, w = depth * 2)?;
                    depth += 1;
                }
                Op::ExitSeq {
                    key,
                    head,
                    tail,
                    prefixed,
                } => {
                    let count = if *prefixed { "counted" } else { "to end" };
                    match tail {
                        Tail::Primitive(ty) => {
                            writeln!(f, "{:w$}{}.. {} ({})", "", head, ty, count, w = depth * 2)?
                        }
                        Tail::Nested(inner) => {
                            writeln!(f, "{:w$}{}.. ({})", "", head, count, w = depth * 2)?;
                            inner.fmt_indented(f, depth + 1)?;
                        }
                    }
                    depth = depth.saturating_sub(1);
                    writeln!(f, "{:w$}{} {}", "", key, MARKER_SEQ_END, w = depth * 2)?;
                }
            }
        }
        Ok(())
    }
}

fn fold_fixed_len(ops: &[Op]) -> Option<usize> {
    let mut total = 0;
    for op in ops {
        match op {
            Op::Primitive { ty, .. } => total += ty.fixed_width()?,
            Op::EnterMap { .. } | Op::ExitMap { .. } => {}
            Op::EnterSeq { .. } | Op::ExitSeq { .. } => return None,
        }
    }
    Some(total)
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
