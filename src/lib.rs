//! Inline nested records into flat JSON documents.
//!
//! Fields tagged `inline` are written as if they were fields of the enclosing
//! record. On a key clash the field declared last wins. When reading, every
//! inline field gets the whole document and picks out its own keys, so one
//! key may fill several nested records. [`schema_for`] builds a JSON Schema
//! that accepts the flat documents.
//!
//! Records are declared with [`record!`].

pub mod error;
pub mod field;
pub mod inline;
pub mod record;
pub mod schema;
pub mod shape;

pub use {
    error::{Error, ErrorKind, Result},
    field::{Classification, Field, classify},
    inline::{
        Flatten,
        decode::unflatten_record,
        encode::flatten_record,
        from_slice,
        from_slice_into,
        from_str,
        from_str_into,
        to_string,
        to_string_pretty,
        to_value,
        to_vec,
    },
    record::{Plain, Record, Slot, SlotMut},
    schema::{SchemaOptions, Strategy, flatten_schema, schema_for, unflattened_schema_for},
    shape::{RecordShape, Shape},
};

/// Owned value that serializes and deserializes in its flat form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Inline<T>(pub T);

/// Borrowed value that serializes in its flat form.
#[derive(Debug)]
pub struct InlineRef<'a, T>(pub &'a T);

/// Borrowed destination, filled from a flat document through
/// [`DeserializeSeed`](::serde::de::DeserializeSeed).
#[derive(Debug)]
pub struct InlineMut<'a, T>(pub &'a mut T);

impl<T> Inline<T> {
    pub fn as_ref(&self) -> InlineRef<'_, T> {
        InlineRef(&self.0)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

mod serde;

#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value;
}
