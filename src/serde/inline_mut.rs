use {
    crate::{Flatten, InlineMut, inline::decode},
    serde::{
        Deserialize,
        de::{DeserializeSeed, Error as _},
    },
    serde_json::Value,
    std::any::type_name,
    tracing::instrument,
};

/// Fills the borrowed destination in place. Any serde data format works as
/// the source; its content is buffered as a [`Value`] first and then handed
/// to every inline field.
impl<'de, T> DeserializeSeed<'de> for InlineMut<'_, T>
where
    T: Flatten,
{
    type Value = ();

    #[instrument(skip_all, fields(target = type_name::<T>()))]
    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer)
            .and_then(|document| {
                decode::detached(|| self.0.unflatten(&document)).map_err(D::Error::custom)
            })
    }
}
