use serde::de::{DeserializeSeed, SeqAccess};
use snafu::prelude::*;

use crate::error::{Error, TypeMismatchSnafu};

use super::Deserializer;
use super::strict::Strictness;
use super::zero::ZeroDeserializer;

pub(super) struct ListDeserializer<'a, 'de, S> {
    deserializer: &'a mut Deserializer<'de, S>,
    ended: bool,
}

impl<'a, 'de, S> ListDeserializer<'a, 'de, S> {
    pub(super) fn new(deserializer: &'a mut Deserializer<'de, S>) -> Self {
        Self {
            deserializer,
            ended: false,
        }
    }
}

impl<'a, 'de, S> ListDeserializer<'a, 'de, S>
where
    S: Strictness,
{
    pub(super) fn deserialize_item(&mut self) -> Result<Option<&mut Deserializer<'de, S>>, Error> {
        if self.ended {
            return Ok(None);
        }
        match self.deserializer.cursor.read_item_token()? {
            Some(_) => {
                self.deserializer.cursor.unread_byte();
                Ok(Some(&mut *self.deserializer))
            }
            None => {
                self.ended = true;
                Ok(None)
            }
        }
    }

    // When the visitor is not expected to consume the entire list (e.g., a tuple visitor), our
    // `Deserializer` should invoke this after `visit_seq` returns.
    pub(super) fn deserialize_end(&mut self, expect_len: usize) -> Result<(), Error> {
        let mut num_extra = 0;
        while self.deserialize_item()?.is_some() {
            self.deserializer.cursor.skip_value()?;
            num_extra += 1;
        }
        ensure!(
            num_extra == 0,
            TypeMismatchSnafu {
                value: format!("list with {num_extra} extra items"),
                target: format!("list of length {expect_len}"),
            },
        );
        Ok(())
    }
}

impl<'de, S> SeqAccess<'de> for &mut ListDeserializer<'_, 'de, S>
where
    S: Strictness,
{
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        self.deserialize_item()?
            .map(|deserializer| seed.deserialize(deserializer))
            .transpose()
    }
}

/// Fills a fixed-length target, substituting zero values for the items that the list lacks.
pub(super) struct PaddedList<'a, 'de, S> {
    list: ListDeserializer<'a, 'de, S>,
    len: usize,
    index: usize,
}

impl<'a, 'de, S> PaddedList<'a, 'de, S>
where
    S: Strictness,
{
    pub(super) fn new(list: ListDeserializer<'a, 'de, S>, len: usize) -> Self {
        Self {
            list,
            len,
            index: 0,
        }
    }

    pub(super) fn deserialize_end(&mut self) -> Result<(), Error> {
        self.list.deserialize_end(self.len)
    }
}

impl<'de, S> SeqAccess<'de> for &mut PaddedList<'_, 'de, S>
where
    S: Strictness,
{
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        if self.index >= self.len {
            return Ok(None);
        }
        self.index += 1;
        match self.list.deserialize_item()? {
            Some(deserializer) => seed.deserialize(deserializer).map(Some),
            None => seed.deserialize(ZeroDeserializer).map(Some),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.index)
    }
}
