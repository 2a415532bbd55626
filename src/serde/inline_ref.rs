use {
    crate::{Flatten, InlineRef},
    serde::{Serialize, ser::Error as _},
    std::any::type_name,
    tracing::instrument,
};

impl<T> Serialize for InlineRef<'_, T>
where
    T: Flatten,
{
    #[instrument(skip_all, fields(value = type_name::<T>()))]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0
            .flatten()
            .map_err(S::Error::custom)
            .and_then(|document| document.serialize(serializer))
    }
}
