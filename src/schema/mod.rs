//! Schema definitions and their compiled form.
//!
//! A [`SchemaDef`] is what the author writes. [`normalize`] turns it into a
//! [`Traversal`]: a flat, canonically ordered list of operations that the size,
//! write and read passes all walk in the same order.

pub mod normalize;
pub mod traversal;

pub use normalize::normalize;
pub use traversal::{Key, Op, Tail, Traversal};

/// An author-supplied schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDef {
    /// A primitive leaf, named by a built-in type or a registered alias.
    Type(String),
    /// Named children. Declaration order does not matter; fields are laid
    /// out in canonical order.
    Map(Vec<(String, SchemaDef)>),
    /// Fixed head elements followed by one repeated tail element type, the
    /// last entry.
    Seq(Vec<SchemaDef>),
}

impl SchemaDef {
    pub fn ty(name: impl Into<String>) -> Self {
        SchemaDef::Type(name.into())
    }

    pub fn map<K: Into<String>>(fields: impl IntoIterator<Item = (K, SchemaDef)>) -> Self {
        SchemaDef::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn seq(items: impl IntoIterator<Item = SchemaDef>) -> Self {
        SchemaDef::Seq(items.into_iter().collect())
    }
}

impl From<&str> for SchemaDef {
    fn from(name: &str) -> Self {
        SchemaDef::Type(name.to_string())
    }
}

impl From<String> for SchemaDef {
    fn from(name: String) -> Self {
        SchemaDef::Type(name)
    }
}
