//! [`Flatten`] for wrappers, sequences and pass-through values.

use {
    super::decode,
    crate::{Error, Flatten, Result, Shape},
    serde::Deserialize,
    serde_json::Value,
    std::any::type_name,
    tap::Pipe,
    tracing::debug,
};

/// Whether `T` is a record already being decoded from the current document.
fn repeats<T: Flatten>() -> bool {
    match T::shape().strip_optional() {
        (Shape::Record(record), _) => decode::on_path(record.type_id),
        _ => false,
    }
}

impl<T> Flatten for Option<T>
where
    T: Flatten + Default,
{
    fn shape() -> Shape {
        Shape::Optional(T::shape)
    }

    fn flatten(&self) -> Result<Value> {
        match self {
            Some(value) => value.flatten(),
            None => Ok(Value::Null),
        }
    }

    /// Always allocates, unless the document itself is `null` or `T` is a
    /// record already being decoded from it.
    fn unflatten(&mut self, document: &Value) -> Result<()> {
        match document {
            Value::Null => {
                *self = None;
                Ok(())
            }
            _ if repeats::<T>() => {
                debug!(record = type_name::<T>(), "record repeats itself, left absent");
                *self = None;
                Ok(())
            }
            document => T::default().pipe(|mut value| {
                value
                    .unflatten(document)
                    .map(|()| *self = Some(value))
            }),
        }
    }
}

impl<T: Flatten> Flatten for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn flatten(&self) -> Result<Value> {
        self.as_ref().flatten()
    }

    fn unflatten(&mut self, document: &Value) -> Result<()> {
        self.as_mut().unflatten(document)
    }
}

fn elements(document: &Value) -> Result<&Vec<Value>> {
    document
        .as_array()
        .ok_or_else(|| Error::unexpected("array", document))
}

fn fresh<T: Flatten + Default>(document: &Value) -> Result<T> {
    T::default().pipe(|mut value| value.unflatten(document).map(|()| value))
}

impl<T> Flatten for Vec<T>
where
    T: Flatten + Default,
{
    fn shape() -> Shape {
        Shape::Sequence {
            items: T::shape,
            len: None,
        }
    }

    fn flatten(&self) -> Result<Value> {
        self.iter()
            .map(Flatten::flatten)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn unflatten(&mut self, document: &Value) -> Result<()> {
        elements(document)?
            .iter()
            .map(fresh)
            .collect::<Result<Vec<_>>>()
            .map(|values| *self = values)
    }
}

impl<T, const N: usize> Flatten for [T; N]
where
    T: Flatten + Default,
{
    fn shape() -> Shape {
        Shape::Sequence {
            items: T::shape,
            len: Some(N),
        }
    }

    fn flatten(&self) -> Result<Value> {
        self.iter()
            .map(Flatten::flatten)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn unflatten(&mut self, document: &Value) -> Result<()> {
        let documents = elements(document)?;
        if documents.len() != N {
            return Err(Error::LengthMismatch {
                expected: N,
                found: documents.len(),
            });
        }
        documents
            .iter()
            .map(fresh)
            .collect::<Result<Vec<T>>>()?
            .into_iter()
            .zip(self.iter_mut())
            .for_each(|(value, slot)| *slot = value);
        Ok(())
    }
}

macro_rules! passthrough {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Flatten for $ty {
                fn shape() -> Shape {
                    Shape::leaf::<$ty>()
                }

                fn flatten(&self) -> Result<Value> {
                    serde_json::to_value(self).map_err(Error::Value)
                }

                fn unflatten(&mut self, document: &Value) -> Result<()> {
                    <$ty as Deserialize>::deserialize(document)
                        .map(|value| *self = value)
                        .map_err(Error::Value)
                }
            }
        )*
    };
}

passthrough!(
    Value, String, bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);
