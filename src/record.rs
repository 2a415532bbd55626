//! Record types and their field tables.
//!
//! A record exposes its declared fields as an ordered table together with
//! type-erased accessors, one per field. Declaration order is the collision
//! precedence of the encoder, so the table is an explicit list rather than
//! anything derived at runtime.

use {
    crate::{Field, Flatten, Shape},
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    serde_json::Value,
};

mod macros;

/// Accessor for one field of a record.
pub enum Slot<'a> {
    /// Ordinary field, written under its flat name.
    Plain(&'a dyn Plain),
    /// Field whose own fields are merged into the parent.
    Inline(&'a dyn Flatten),
    /// Ordinary field holding a record (or a sequence of records), written
    /// under its flat name with its own inline fields resolved.
    Nested(&'a dyn Flatten),
    /// Field with no accessor, always skipped.
    Skipped,
}

/// Mutable counterpart of [`Slot`].
pub enum SlotMut<'a> {
    Plain(&'a mut dyn Plain),
    Inline(&'a mut dyn Flatten),
    Nested(&'a mut dyn Flatten),
    Skipped,
}

/// A record type whose inline fields are flattened into its own level.
///
/// Usually implemented through [`record!`](crate::record!). `slots`,
/// `slots_mut` and `shapes` must return exactly one entry per element of
/// [`Record::FIELDS`], in the same order.
pub trait Record: Default + 'static {
    /// Declared fields, in declaration order.
    const FIELDS: &'static [Field];

    fn slots(&self) -> Vec<Slot<'_>>;

    fn slots_mut(&mut self) -> Vec<SlotMut<'_>>;

    fn shapes() -> Vec<Shape>;
}

/// Value of an ordinary field, converted by `serde_json` as a whole.
pub trait Plain {
    fn encode(&self) -> serde_json::Result<Value>;

    fn decode(&mut self, value: &Value) -> serde_json::Result<()>;

    /// Whether the declared type reads `null` as a value of its own, as
    /// `Option` does.
    fn nullable(&self) -> bool;
}

impl<T> Plain for T
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode(&mut self, value: &Value) -> serde_json::Result<()> {
        <T as Deserialize>::deserialize(value).map(|value| *self = value)
    }

    fn nullable(&self) -> bool {
        <T as Deserialize>::deserialize(&Value::Null).is_ok()
    }
}
