use bytes::Bytes;
use serde::ser::{Serialize, Serializer};

use crate::error::Error;

/// Serializes a dictionary key into its raw byte string.
pub(super) fn serialize_key<K>(key: &K) -> Result<Bytes, Error>
where
    K: ?Sized + Serialize,
{
    key.serialize(KeySerializer)
}

struct KeySerializer;

impl KeySerializer {
    fn unsupported(&self) -> Error {
        Error::UnsupportedShape {
            shape: "non-string dictionary key",
        }
    }
}

impl Serializer for KeySerializer {
    type Ok = Bytes;
    type Error = Error;

    impl_unsupported!();

    fn serialize_char(self, value: char) -> Result<Self::Ok, Self::Error> {
        Ok(Bytes::copy_from_slice(
            value.encode_utf8(&mut [0u8; 4]).as_bytes(),
        ))
    }

    fn serialize_str(self, value: &str) -> Result<Self::Ok, Self::Error> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(Bytes::copy_from_slice(value))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(Bytes::from_static(variant.as_bytes()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use crate::testing::{Enum, Newtype};

    use super::*;

    #[derive(Serialize)]
    enum Kind {
        Spam,
    }

    #[test]
    fn serialize_key() {
        assert_eq!(super::serialize_key("k"), Ok(Bytes::from_static(b"k")));
        assert_eq!(super::serialize_key(&'k'), Ok(Bytes::from_static(b"k")));
        assert_eq!(
            super::serialize_key(serde_bytes::Bytes::new(b"\xff")),
            Ok(Bytes::from_static(b"\xff")),
        );
        assert_eq!(
            super::serialize_key(&Newtype("n".to_string())),
            Ok(Bytes::from_static(b"n")),
        );
        assert_eq!(super::serialize_key(&Kind::Spam), Ok(Bytes::from_static(b"Spam")));

        let unsupported: Result<Bytes, Error> = Err(Error::UnsupportedShape {
            shape: "non-string dictionary key",
        });
        assert_eq!(super::serialize_key(&1u8), unsupported.clone());
        assert_eq!(super::serialize_key(&()), unsupported.clone());
        assert_eq!(super::serialize_key(&Some("k")), unsupported.clone());
        assert_eq!(super::serialize_key(&(1u8, 2u8)), unsupported.clone());
        assert_eq!(super::serialize_key(&Enum::Newtype("k".to_string())), unsupported);
    }
}
