//! Custom marshal and unmarshal hooks.
//!
//! A type that implements [`Marshal`] writes its own bencode bytes, which the encoder copies
//! through unmodified.  A type that implements [`Unmarshal`] receives the raw bytes of the next
//! complete value, which the decoder skips without interpreting.
//!
//! Use `#[serde(with = "bencode::hook")]` on a field, or `bencode::hooks!(Type)` for a whole type.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{self, Serializer};
use serde_bytes::ByteBuf;

use crate::error::Error;

pub(crate) const MAGIC: &str = "$bencode::hook::MAGIC";

pub trait Marshal {
    /// Returns one complete bencode value.
    fn marshal_bencode(&self) -> Result<Vec<u8>, Error>;
}

pub trait Unmarshal {
    fn unmarshal_bencode(&mut self, data: &[u8]) -> Result<(), Error>;
}

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: ?Sized + Marshal,
    S: Serializer,
{
    let data = value
        .marshal_bencode()
        .map_err(<S::Error as ser::Error>::custom)?;
    serializer.serialize_newtype_struct(MAGIC, serde_bytes::Bytes::new(&data))
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Unmarshal + Default,
    D: Deserializer<'de>,
{
    let mut value = T::default();
    deserialize_in_place(deserializer, &mut value)?;
    Ok(value)
}

pub fn deserialize_in_place<'de, T, D>(deserializer: D, place: &mut T) -> Result<(), D::Error>
where
    T: ?Sized + Unmarshal,
    D: Deserializer<'de>,
{
    deserializer.deserialize_newtype_struct(MAGIC, HookVisitor(place))
}

struct HookVisitor<'a, T: ?Sized>(&'a mut T);

impl<'de, T> Visitor<'de> for HookVisitor<'_, T>
where
    T: ?Sized + Unmarshal,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("raw bencode data")
    }

    fn visit_bytes<E>(self, data: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        // Empty data stands for the zero value, which the target already holds.
        if data.is_empty() {
            return Ok(());
        }
        self.0.unmarshal_bencode(data).map_err(E::custom)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = ByteBuf::deserialize(deserializer)?;
        self.visit_bytes(&data)
    }
}

/// Implements `Serialize`, `Deserialize`, and `IsEmpty` for a type through its hooks.
///
/// The type must implement `Marshal`, `Unmarshal`, and `Default`.  It is never considered empty.
#[macro_export]
macro_rules! hooks {
    ($type:ty $(,)?) => {
        impl $crate::private::serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::private::serde::Serializer,
            {
                $crate::hook::serialize(self, serializer)
            }
        }

        impl<'de> $crate::private::serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::private::serde::Deserializer<'de>,
            {
                $crate::hook::deserialize(deserializer)
            }

            fn deserialize_in_place<D>(
                deserializer: D,
                place: &mut Self,
            ) -> ::std::result::Result<(), D::Error>
            where
                D: $crate::private::serde::Deserializer<'de>,
            {
                $crate::hook::deserialize_in_place(deserializer, place)
            }
        }

        impl $crate::IsEmpty for $type {
            fn is_empty(&self) -> bool {
                false
            }
        }
    };
}
