use {
    crate::{Error, Result, Shape},
    serde_json::Value,
    tap::Pipe,
    tracing::instrument,
};

/// A value that has a flat representation.
///
/// Records flatten into an object where their inline fields are merged in;
/// sequences flatten element by element; everything else passes through
/// `serde_json` unchanged.
pub trait Flatten {
    fn shape() -> Shape
    where
        Self: Sized;

    /// Flat representation of `self`. Absent optionals flatten to `null`.
    fn flatten(&self) -> Result<Value>;

    /// Replaces `self` with the value decoded from a flat `document`.
    fn unflatten(&mut self, document: &Value) -> Result<()>;
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[extension_traits::extension(pub(crate) trait ValueEmptyExt)]
impl Value {
    /// `null`, `false`, zero, `""`, `[]` and `{}` are empty.
    fn is_empty_value(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(values) => values.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }
}

#[instrument(skip_all, fields(value = std::any::type_name::<T>()))]
pub fn to_value<T: Flatten>(value: &T) -> Result<Value> {
    value.flatten()
}

pub fn to_string<T: Flatten>(value: &T) -> Result<String> {
    to_value(value).and_then(|value| serde_json::to_string(&value).map_err(Error::Encode))
}

pub fn to_string_pretty<T: Flatten>(value: &T) -> Result<String> {
    to_value(value).and_then(|value| serde_json::to_string_pretty(&value).map_err(Error::Encode))
}

pub fn to_vec<T: Flatten>(value: &T) -> Result<Vec<u8>> {
    to_value(value).and_then(|value| serde_json::to_vec(&value).map_err(Error::Encode))
}

/// Decodes `bytes` into an existing destination.
///
/// The document is parsed once and then shared by every field of every
/// record, including each inline sub-record.
#[instrument(skip_all, fields(target = std::any::type_name::<T>(), len = bytes.len()))]
pub fn from_slice_into<T: Flatten>(bytes: &[u8], target: &mut T) -> Result<()> {
    serde_json::from_slice::<Value>(bytes)
        .map_err(Error::Parse)
        .and_then(|document| decode::detached(|| target.unflatten(&document)))
}

pub fn from_str_into<T: Flatten>(s: &str, target: &mut T) -> Result<()> {
    from_slice_into(s.as_bytes(), target)
}

pub fn from_slice<T: Flatten + Default>(bytes: &[u8]) -> Result<T> {
    T::default().pipe(|mut target| from_slice_into(bytes, &mut target).map(|()| target))
}

pub fn from_str<T: Flatten + Default>(s: &str) -> Result<T> {
    from_slice(s.as_bytes())
}

pub mod container;
pub mod decode;
pub mod encode;
