mod de_impl;
mod ser_impl;

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::ser::Serialize;

use crate::bigint::BigInt;
use crate::empty::IsEmpty;
use crate::error::Error;
use crate::fmt::EscapeAscii;

/// Dynamic bencode value.
#[derive(Clone, Eq, Hash, PartialEq)]
pub enum Value {
    ByteString(Bytes),
    Integer(BigInt),
    List(List),
    Dictionary(Dictionary),
}

pub type List = Vec<Value>;

// Use `BTreeMap` because dictionary keys are emitted in sorted order.
pub type Dictionary = BTreeMap<Bytes, Value>;

/// Transcodes a value into its dynamic form through the wire format.
pub fn to_value<T>(value: &T) -> Result<Value, Error>
where
    T: ?Sized + Serialize,
{
    let bytes = crate::ser::to_bytes(value)?;
    crate::de::from_slice(&mut bytes.as_ref())
}

pub fn from_value<T>(value: &Value) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let bytes = crate::ser::to_bytes(value)?;
    crate::de::from_slice(&mut bytes.as_ref())
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteString(bytes) => f
                .debug_tuple("ByteString")
                .field(&EscapeAscii(bytes))
                .finish(),
            Self::Integer(integer) => f
                .debug_tuple("Integer")
                .field(&format_args!("{integer}"))
                .finish(),
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Dictionary(dict) => f
                .debug_tuple("Dictionary")
                .field(&DebugDictionary(dict))
                .finish(),
        }
    }
}

struct DebugDictionary<'a>(&'a Dictionary);

impl fmt::Debug for DebugDictionary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(k, v)| (EscapeAscii(k), v)))
            .finish()
    }
}

impl IsEmpty for Value {
    fn is_empty(&self) -> bool {
        false
    }
}

impl Value {
    pub fn as_byte_string(&self) -> Option<&Bytes> {
        match self {
            Self::ByteString(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_byte_string()
            .and_then(|bytes| str::from_utf8(bytes).ok())
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Self::Integer(integer) => Some(integer),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Self::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Self::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Looks up a dictionary entry.
    pub fn get(&self, key: &[u8]) -> Option<&Self> {
        self.as_dictionary().and_then(|dict| dict.get(key))
    }
}

impl TryFrom<Value> for Bytes {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::ByteString(bytes) => Ok(bytes),
            _ => Err(value),
        }
    }
}

impl TryFrom<Value> for BigInt {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(integer) => Ok(integer),
            _ => Err(value),
        }
    }
}

impl TryFrom<Value> for List {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::List(list) => Ok(list),
            _ => Err(value),
        }
    }
}

impl TryFrom<Value> for Dictionary {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Dictionary(dict) => Ok(dict),
            _ => Err(value),
        }
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Self::ByteString(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::ByteString(Bytes::copy_from_slice(bytes))
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Self::from(string.as_bytes())
    }
}

impl From<BigInt> for Value {
    fn from(integer: BigInt) -> Self {
        Self::Integer(integer)
    }
}

impl From<i64> for Value {
    fn from(integer: i64) -> Self {
        Self::Integer(integer.into())
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Self::List(list)
    }
}

impl From<Dictionary> for Value {
    fn from(dict: Dictionary) -> Self {
        Self::Dictionary(dict)
    }
}
