use bytes::Bytes;
use serde::de::value::BorrowedBytesDeserializer;
use serde::de::{DeserializeSeed, MapAccess};
use snafu::prelude::*;

use crate::error::{Error, MissingValueSnafu, TypeMismatchSnafu};

use super::Deserializer;
use super::cursor::Token;
use super::strict::Strictness;

pub(super) struct DictionaryDeserializer<'a, 'de, S> {
    deserializer: &'a mut Deserializer<'de, S>,
    last_key: Option<&'de [u8]>,
}

impl<'a, 'de, S> DictionaryDeserializer<'a, 'de, S> {
    pub(super) fn new(deserializer: &'a mut Deserializer<'de, S>) -> Self {
        Self {
            deserializer,
            last_key: None,
        }
    }
}

impl<'a, 'de, S> DictionaryDeserializer<'a, 'de, S>
where
    S: Strictness,
{
    pub(super) fn deserialize_key(&mut self) -> Result<Option<&'de [u8]>, Error> {
        let Some(token) = self.deserializer.cursor.read_item_token()? else {
            return Ok(None);
        };
        let Token::ByteString(b0) = token else {
            return TypeMismatchSnafu {
                value: token.to_type_name(),
                target: "dictionary key",
            }
            .fail();
        };
        let key = self.deserializer.cursor.read_byte_string::<S>(b0)?;
        if let Some(last_key) = self.last_key {
            S::ensure_dictionary_key(last_key, key)?;
        }
        self.last_key = Some(key);
        Ok(Some(key))
    }

    pub(super) fn deserialize_value(&mut self) -> Result<&mut Deserializer<'de, S>, Error> {
        match self.deserializer.cursor.read_item_token()? {
            Some(_) => {
                self.deserializer.cursor.unread_byte();
                Ok(&mut *self.deserializer)
            }
            None => MissingValueSnafu {
                key: Bytes::copy_from_slice(self.last_key.unwrap_or_default()),
            }
            .fail(),
        }
    }

    // When the visitor is not expected to consume the entire dictionary (e.g., a enum visitor),
    // our `Deserializer` should invoke this after `visit_enum` returns.
    pub(super) fn deserialize_end(&mut self) -> Result<(), Error> {
        ensure!(
            self.deserializer.cursor.read_item_token()?.is_none(),
            TypeMismatchSnafu {
                value: "dictionary of multiple entries",
                target: "enum",
            },
        );
        Ok(())
    }
}

impl<'de, S> MapAccess<'de> for &mut DictionaryDeserializer<'_, 'de, S>
where
    S: Strictness,
{
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        self.deserialize_key()?
            .map(|key| seed.deserialize(BorrowedBytesDeserializer::new(key)))
            .transpose()
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        seed.deserialize(self.deserialize_value()?)
    }
}
