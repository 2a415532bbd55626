use {
    crate::{Flatten, Inline, InlineMut},
    serde::{Deserialize, Serialize, de::DeserializeSeed},
    tracing::instrument,
};

impl<T> Serialize for Inline<T>
where
    T: Flatten,
{
    #[instrument(skip_all)]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_ref().serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Inline<T>
where
    T: Flatten + Default,
{
    #[instrument(skip_all)]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut value = T::default();
        InlineMut(&mut value)
            .deserialize(deserializer)
            .map(|()| Self(value))
    }
}
