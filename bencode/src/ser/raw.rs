use std::marker::PhantomData;

use serde::ser::{Serialize, Serializer};

use crate::bigint;
use crate::de::cursor::Cursor;
use crate::error::{self, Error};

use super::write::Write;

/// Kind of the pre-encoded data that passes through the encoder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Raw {
    /// One complete bencode value produced by a marshal hook.
    Data,
    /// Decimal text of an arbitrary-precision integer.
    Integer,
}

pub(super) struct RawSerializer<'a, W, E> {
    writer: &'a mut W,
    raw: Raw,
    _phantom: PhantomData<E>,
}

impl<'a, W, E> RawSerializer<'a, W, E> {
    pub(super) fn new(writer: &'a mut W, raw: Raw) -> Self {
        Self {
            writer,
            raw,
            _phantom: PhantomData,
        }
    }
}

impl<W, E> RawSerializer<'_, W, E>
where
    E: error::ser::Error,
{
    fn unsupported(&self) -> E {
        Error::Custom {
            message: match self.raw {
                Raw::Data => "expect raw bencode data",
                Raw::Integer => "expect integer text",
            }
            .to_string(),
        }
        .into()
    }
}

fn ensure_one_value(data: &[u8]) -> Result<(), Error> {
    let mut cursor = Cursor::new(data);
    let result = cursor
        .skip_value()
        .and_then(|()| match cursor.remaining() {
            [] => Ok(()),
            trailing => Err(Error::Custom {
                message: format!("{} trailing bytes", trailing.len()),
            }),
        });
    result.map_err(|error| Error::Custom {
        message: format!("invalid marshal hook output: {error}"),
    })
}

impl<W, E> Serializer for RawSerializer<'_, W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    impl_unsupported!();

    fn serialize_char(self, _value: char) -> Result<Self::Ok, Self::Error> {
        Err(self.unsupported())
    }

    fn serialize_str(self, value: &str) -> Result<Self::Ok, Self::Error> {
        if self.raw != Raw::Integer {
            return Err(self.unsupported());
        }
        let integer = bigint::ensure_text(value.as_bytes())?;
        self.writer.write_integer_text(integer)
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Self::Ok, Self::Error> {
        if self.raw != Raw::Data {
            return Err(self.unsupported());
        }
        ensure_one_value(value)?;
        self.writer.write_slice(value)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Err(self.unsupported())
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported())
    }
}

#[cfg(test)]
mod tests {
    use bytes::{Bytes, BytesMut};

    use super::*;

    fn serialize<T>(raw: Raw, value: &T) -> Result<Bytes, Error>
    where
        T: ?Sized + Serialize,
    {
        let mut buf = BytesMut::new();
        value.serialize(RawSerializer::new(&mut buf, raw))?;
        Ok(buf.freeze())
    }

    #[test]
    fn data() {
        assert_eq!(
            serialize(Raw::Data, serde_bytes::Bytes::new(b"d1:ai1ee")),
            Ok(Bytes::from_static(b"d1:ai1ee")),
        );
        assert_eq!(
            serialize(Raw::Data, serde_bytes::Bytes::new(b"")),
            Err(Error::Custom {
                message: "invalid marshal hook output: syntax error at offset 0: incomplete bencode data"
                    .to_string(),
            }),
        );
        assert_eq!(
            serialize(Raw::Data, serde_bytes::Bytes::new(b"i1ei2e")),
            Err(Error::Custom {
                message: "invalid marshal hook output: 3 trailing bytes".to_string(),
            }),
        );
        assert!(serialize(Raw::Data, serde_bytes::Bytes::new(b"l")).is_err());
        assert_eq!(
            serialize(Raw::Data, "i1e"),
            Err(Error::Custom {
                message: "expect raw bencode data".to_string(),
            }),
        );
    }

    #[test]
    fn integer() {
        assert_eq!(
            serialize(Raw::Integer, "-12"),
            Ok(Bytes::from_static(b"i-12e")),
        );
        assert_eq!(
            serialize(Raw::Integer, "1x"),
            Err(Error::MalformedInteger {
                integer: Bytes::from_static(b"1x"),
            }),
        );
        assert_eq!(
            serialize(Raw::Integer, &12u8),
            Err(Error::Custom {
                message: "expect integer text".to_string(),
            }),
        );
    }
}
