//! Static type descriptors.
//!
//! A [`Shape`] describes what the schema side needs to know about a type:
//! whether it is a record, a sequence, an optional wrapper or an opaque leaf.
//! Children are reached through `fn` pointers, so self-referential types can
//! be described without building an infinite value.

use {
    crate::{Field, Record},
    schemars::{JsonSchema, Schema, SchemaGenerator},
    std::any::{TypeId, type_name},
};

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// Value converted as a whole, described by `schemars`.
    Leaf(fn(&mut SchemaGenerator) -> Schema),
    /// One optional/nullable layer around another shape.
    Optional(fn() -> Shape),
    /// Ordered sequence; `len` is set for fixed-size arrays.
    Sequence { items: fn() -> Shape, len: Option<usize> },
    Record(RecordShape),
    /// Field that is never read nor written.
    Skipped,
}

#[derive(Debug, Clone, Copy)]
pub struct RecordShape {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub fields: &'static [Field],
    /// Field shapes, aligned with `fields`.
    pub shapes: fn() -> Vec<Shape>,
}

impl Shape {
    pub fn leaf<T: JsonSchema>() -> Self {
        Shape::Leaf(|generator: &mut SchemaGenerator| generator.subschema_for::<T>())
    }

    pub fn record<R: Record>() -> Self {
        Shape::Record(RecordShape {
            type_id: TypeId::of::<R>(),
            type_name: type_name::<R>(),
            fields: R::FIELDS,
            shapes: R::shapes,
        })
    }

    /// Removes one optional layer, if any.
    pub fn strip_optional(self) -> (Self, bool) {
        match self {
            Shape::Optional(inner) => (inner(), true),
            other => (other, false),
        }
    }
}

impl RecordShape {
    pub fn fields(&self) -> impl Iterator<Item = (&'static Field, Shape)> {
        self.fields.iter().zip((self.shapes)())
    }
}
