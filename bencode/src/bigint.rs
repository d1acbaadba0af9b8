use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use bytes::Bytes;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};
use snafu::prelude::*;

use crate::empty::IsEmpty;
use crate::error::{Error, MalformedIntegerSnafu};

pub(crate) const MAGIC: &str = "$bencode::bigint::MAGIC";

/// Arbitrary-precision integer.
///
/// In the wire format it is an ordinary integer of any length; in other formats it is its decimal
/// text.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BigInt(num_bigint::BigInt);

impl BigInt {
    pub fn new(value: num_bigint::BigInt) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> num_bigint::BigInt {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.sign() == num_bigint::Sign::NoSign
    }

    pub fn to_i64(&self) -> Option<i64> {
        i64::try_from(&self.0).ok()
    }

    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(&self.0).ok()
    }

    pub fn to_i128(&self) -> Option<i128> {
        i128::try_from(&self.0).ok()
    }

    pub fn to_u128(&self) -> Option<u128> {
        u128::try_from(&self.0).ok()
    }

    /// Parses integer text as it appears between `i` and `e`.
    pub(crate) fn parse_bytes(integer: &[u8]) -> Result<Self, Error> {
        let text = ensure_text(integer)?;
        num_bigint::BigInt::from_str(text)
            .ok()
            .map(Self)
            .context(MalformedIntegerSnafu {
                integer: Bytes::copy_from_slice(integer),
            })
    }
}

pub(crate) fn ensure_text(integer: &[u8]) -> Result<&str, Error> {
    ensure!(
        lazy_regex::regex_is_match!(r"(?-u)^[+-]?[0-9]+$"B, integer),
        MalformedIntegerSnafu {
            integer: Bytes::copy_from_slice(integer),
        },
    );
    str::from_utf8(integer).ok().context(MalformedIntegerSnafu {
        integer: Bytes::copy_from_slice(integer),
    })
}

impl Deref for BigInt {
    type Target = num_bigint::BigInt;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for BigInt {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<num_bigint::BigInt> for BigInt {
    fn from(value: num_bigint::BigInt) -> Self {
        Self(value)
    }
}

impl From<BigInt> for num_bigint::BigInt {
    fn from(value: BigInt) -> Self {
        value.0
    }
}

macro_rules! impl_from_int {
    ($($type:ty)*) => {
        $(
            impl From<$type> for BigInt {
                fn from(value: $type) -> Self {
                    Self(value.into())
                }
            }
        )*
    };
}

impl_from_int!(i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize);

impl FromStr for BigInt {
    type Err = Error;

    fn from_str(integer: &str) -> Result<Self, Self::Err> {
        Self::parse_bytes(integer.as_bytes())
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl IsEmpty for BigInt {
    fn is_empty(&self) -> bool {
        self.is_zero()
    }
}

impl Serialize for BigInt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(MAGIC, &self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(MAGIC, BigIntVisitor)
    }
}

struct BigIntVisitor;

impl<'de> Visitor<'de> for BigIntVisitor {
    type Value = BigInt;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.into())
    }

    fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.into())
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.into())
    }

    fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.into())
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}
