use std::marker::PhantomData;

use serde::de::{DeserializeSeed, SeqAccess};

use crate::error::Error;

use super::Deserializer;
use super::strict::Strictness;

/// Hands one raw value over as a sequence of at most one item.  The sequence is empty when the
/// value does not match the type it is decoded into.
pub(super) struct LenientValue<'de, S> {
    raw: Option<&'de [u8]>,
    _phantom: PhantomData<S>,
}

impl<'de, S> LenientValue<'de, S> {
    pub(super) fn new(raw: &'de [u8]) -> Self {
        Self {
            raw: Some(raw),
            _phantom: PhantomData,
        }
    }
}

impl<'de, S> SeqAccess<'de> for LenientValue<'de, S>
where
    S: Strictness,
{
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        let Some(raw) = self.raw.take() else {
            return Ok(None);
        };
        match seed.deserialize(&mut Deserializer::<S>::new(raw)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_type_mismatch() => {
                tracing::debug!(%error, "ignore unmarshal type error");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(usize::from(self.raw.is_some()))
    }
}
