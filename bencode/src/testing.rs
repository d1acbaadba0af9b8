use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::Record;
use crate::error::{CustomSnafu, Error};
use crate::hook::{Marshal, Unmarshal};
use crate::value::Value;

pub(crate) fn vb(bytes: &[u8]) -> Value {
    Value::ByteString(Bytes::copy_from_slice(bytes))
}

pub(crate) fn vi(integer: i64) -> Value {
    Value::Integer(integer.into())
}

pub(crate) fn vl<const N: usize>(items: [Value; N]) -> Value {
    Value::List(items.into())
}

pub(crate) fn vd<const N: usize>(items: [(&[u8], Value); N]) -> Value {
    Value::Dictionary(
        items
            .into_iter()
            .map(|(k, v)| (Bytes::copy_from_slice(k), v))
            .collect::<BTreeMap<_, _>>(),
    )
}

//
// Plain serde shapes.
//

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Unit;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Newtype(pub(crate) String);

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Tuple(pub(crate) u8, pub(crate) String);

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Struct {
    // Ensure that the field names are unordered.
    pub(crate) a: u8,
    pub(crate) c: u8,
    pub(crate) b: u8,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) enum Enum {
    Unit,
    Newtype(String),
    Tuple(u8, String),
    Struct {
        // Ensure that the field names are unordered.
        a: u8,
        c: u8,
        b: u8,
    },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "t")]
pub(crate) enum InternallyTagged {
    Bool { value: bool },
    Char { value: char },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum Untagged {
    Int { value: i64 },
    String { value: String },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StrictStruct {
    pub(crate) x: u8,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Ignored {
    pub(crate) x: u8,
    #[serde(skip)]
    pub(crate) ignored: u8,
}

//
// Records.
//

#[derive(Clone, Debug, Default, Eq, PartialEq, Record)]
pub(crate) struct Peer {
    #[bencode("peer id")]
    pub(crate) id: String,
    pub(crate) ip: String,
    #[bencode(",omitempty")]
    pub(crate) port: u16,
    #[bencode("-")]
    pub(crate) last_seen: u64,
    secret: u64,
}

impl Peer {
    pub(crate) fn new(id: &str, ip: &str, port: u16) -> Self {
        Self {
            id: id.to_string(),
            ip: ip.to_string(),
            port,
            last_seen: 0,
            secret: 0,
        }
    }

    pub(crate) fn secret(&self) -> u64 {
        self.secret
    }

    pub(crate) fn set_secret(&mut self, secret: u64) {
        self.secret = secret;
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Record)]
pub(crate) struct Lenient {
    #[bencode(",ignore_unmarshal_type_error")]
    pub(crate) n: u8,
    pub(crate) s: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Record)]
pub(crate) struct Shadowed {
    #[bencode("x")]
    pub(crate) first: u8,
    #[bencode("x")]
    pub(crate) second: u8,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Record)]
pub(crate) struct Optional {
    pub(crate) a: Option<u8>,
    #[bencode(",omitempty")]
    pub(crate) b: Option<String>,
    pub(crate) c: Option<Struct>,
}

//
// Hooks.
//

/// Marshals as its text reversed; only ASCII text can be reversed bytewise.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Reversed(pub(crate) String);

impl Marshal for Reversed {
    fn marshal_bencode(&self) -> Result<Vec<u8>, Error> {
        ensure!(
            self.0.is_ascii(),
            CustomSnafu {
                message: "expect ascii",
            },
        );
        let reversed = self.0.chars().rev().collect::<String>();
        crate::marshal(&reversed).map(Vec::from)
    }
}

impl Unmarshal for Reversed {
    fn unmarshal_bencode(&mut self, data: &[u8]) -> Result<(), Error> {
        let mut string = String::new();
        crate::unmarshal(data, &mut string).map_err(|_| Error::Custom {
            message: "expect byte string".to_string(),
        })?;
        self.0 = string.chars().rev().collect();
        Ok(())
    }
}

crate::hooks!(Reversed);
