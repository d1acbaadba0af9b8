pub(crate) mod cursor;
pub(crate) mod strict;

mod dict;
mod enum_;
mod lenient;
mod list;
mod zero;

use std::marker::PhantomData;

use serde::de::value::{BorrowedStrDeserializer, SeqDeserializer};
use serde::de::{self, Deserialize, Expected, Visitor};
use snafu::prelude::*;

use crate::bigint;
use crate::de_ext::VisitorExt;
use crate::error::{Error, TypeMismatchSnafu, UnsupportedShapeSnafu};
use crate::fmt::EscapeAscii;
use crate::hook;
use crate::int::Int;
use crate::record;

use self::cursor::{Cursor, Token};
use self::dict::DictionaryDeserializer;
use self::enum_::{EnumDeserializer, UnitVariantDeserializer};
use self::lenient::LenientValue;
use self::list::{ListDeserializer, PaddedList};
use self::strict::{NonStrict, Strict, Strictness};

/// Decodes one value from the front of `slice` and advances `slice` past it.
pub fn from_slice<'de, T>(slice: &mut &'de [u8]) -> Result<T, Error>
where
    T: Deserialize<'de>,
{
    deserialize::<NonStrict, T>(slice)
}

/// Like `from_slice`, but rejects non-canonical integers and unsorted dictionary keys.
pub fn from_slice_strict<'de, T>(slice: &mut &'de [u8]) -> Result<T, Error>
where
    T: Deserialize<'de>,
{
    deserialize::<Strict, T>(slice)
}

/// Decodes into an existing value.
///
/// Records are decoded entry by entry; on error, they are left partially populated.
pub fn unmarshal<'de, T>(data: &'de [u8], target: &mut T) -> Result<(), Error>
where
    T: Deserialize<'de>,
{
    T::deserialize_in_place(&mut Deserializer::<NonStrict>::new(data)?, target)
}

pub fn unmarshal_strict<'de, T>(data: &'de [u8], target: &mut T) -> Result<(), Error>
where
    T: Deserialize<'de>,
{
    T::deserialize_in_place(&mut Deserializer::<Strict>::new(data)?, target)
}

fn deserialize<'de, S, T>(slice: &mut &'de [u8]) -> Result<T, Error>
where
    S: Strictness,
    T: Deserialize<'de>,
{
    let mut deserializer = Deserializer::<S>::new(slice)?;
    let value = T::deserialize(&mut deserializer)?;
    *slice = deserializer.cursor.remaining();
    Ok(value)
}

pub(crate) struct Deserializer<'de, S> {
    cursor: Cursor<'de>,
    _phantom: PhantomData<S>,
}

impl<'de, S> Deserializer<'de, S> {
    fn new(data: &'de [u8]) -> Result<Self, Error> {
        ensure!(!data.is_empty(), crate::error::EofSnafu);
        Ok(Self {
            cursor: Cursor::new(data),
            _phantom: PhantomData,
        })
    }
}

fn invalid_type(token: Token, expected: &dyn Expected) -> Error {
    de::Error::invalid_type(token.to_unexpected(), expected)
}

impl<'de, S> Deserializer<'de, S>
where
    S: Strictness,
{
    fn deserialize_byte_string(&mut self, expected: &dyn Expected) -> Result<&'de [u8], Error> {
        match self.cursor.read_token()? {
            Token::ByteString(b0) => self.cursor.read_byte_string::<S>(b0),
            token => Err(invalid_type(token, expected)),
        }
    }

    fn deserialize_integer_text(&mut self, expected: &dyn Expected) -> Result<&'de [u8], Error> {
        match self.cursor.read_token()? {
            Token::Integer => self.cursor.read_integer::<S>(),
            token => Err(invalid_type(token, expected)),
        }
    }

    fn deserialize_integer<I>(&mut self, expected: &dyn Expected) -> Result<I, Error>
    where
        I: Int,
    {
        strict::parse_integer(self.deserialize_integer_text(expected)?)
    }

    fn deserialize_list_begin(
        &mut self,
        expected: &dyn Expected,
    ) -> Result<ListDeserializer<'_, 'de, S>, Error> {
        match self.cursor.read_token()? {
            Token::List => Ok(ListDeserializer::new(self)),
            token => Err(invalid_type(token, expected)),
        }
    }

    // Tries the native widths first, and then hands the text over as a big integer.
    fn visit_any_integer<V>(&mut self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        let integer = self.cursor.read_integer::<S>()?;
        if let Ok(value) = strict::parse_integer::<i64>(integer) {
            return visitor.visit_i64(value);
        }
        if let Ok(value) = strict::parse_integer::<i128>(integer) {
            return visitor.visit_i128(value);
        }
        if let Ok(value) = strict::parse_integer::<u128>(integer) {
            return visitor.visit_u128(value);
        }
        match bigint::ensure_text(integer) {
            Ok(text) => visitor.visit_newtype_struct(BorrowedStrDeserializer::<Error>::new(text)),
            Err(_) => TypeMismatchSnafu {
                value: format!("integer {}", EscapeAscii(integer)),
                target: (&visitor as &dyn Expected).to_string(),
            }
            .fail(),
        }
    }
}

impl<'de, S> de::Deserializer<'de> for &mut Deserializer<'de, S>
where
    S: Strictness,
{
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.cursor.read_token()? {
            Token::ByteString(b0) => {
                visitor.visit_borrowed_bytes(self.cursor.read_byte_string::<S>(b0)?)
            }
            Token::Integer => self.visit_any_integer(visitor),
            Token::List => visitor.visit_seq(&mut ListDeserializer::new(self)),
            Token::Dictionary => visitor.visit_map(&mut DictionaryDeserializer::new(self)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let integer = self.deserialize_integer_text(&visitor)?;
        visitor.visit_bool_integer(integer)
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_i8(value)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_i16(value)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_i32(value)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_i64(value)
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_i128(value)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_u8(value)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_u16(value)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_u32(value)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_u64(value)
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_integer(&visitor)?;
        visitor.visit_u128(value)
    }

    fn deserialize_f32<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        UnsupportedShapeSnafu { shape: "f32" }.fail()
    }

    fn deserialize_f64<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        UnsupportedShapeSnafu { shape: "f64" }.fail()
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_byte_string(&visitor)?;
        visitor.visit_char_bytes(value)
    }

    // Bencode has no null.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_list_begin(&visitor)?.deserialize_end(0)?;
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if name == hook::MAGIC {
            let start = self.cursor.offset();
            self.cursor.skip_value()?;
            visitor.visit_borrowed_bytes(self.cursor.slice_from(start))
        } else if name == bigint::MAGIC {
            let integer = self.deserialize_integer_text(&visitor)?;
            visitor.visit_borrowed_str(bigint::ensure_text(integer)?)
        } else if name == record::LENIENT_MAGIC {
            let start = self.cursor.offset();
            self.cursor.skip_value()?;
            visitor.visit_seq(LenientValue::<S>::new(self.cursor.slice_from(start)))
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.cursor.read_token()? {
            Token::List => {
                let mut list = PaddedList::new(ListDeserializer::new(self), len);
                let value = visitor.visit_seq(&mut list)?;
                list.deserialize_end()?;
                Ok(value)
            }
            // Fixed-size byte arrays.
            Token::ByteString(b0) => {
                let bytes = self.cursor.read_byte_string::<S>(b0)?;
                ensure!(
                    bytes.len() == len,
                    TypeMismatchSnafu {
                        value: format!("byte string of length {}", bytes.len()),
                        target: format!("array of length {len}"),
                    },
                );
                let mut seq = SeqDeserializer::<_, Error>::new(bytes.iter().copied());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            token => Err(invalid_type(token, &visitor)),
        }
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.cursor.read_token()? {
            Token::Dictionary => visitor.visit_map(&mut DictionaryDeserializer::new(self)),
            token => Err(invalid_type(token, &visitor)),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.cursor.read_token()? {
            Token::ByteString(_) => {
                self.cursor.unread_byte();
                visitor.visit_enum(UnitVariantDeserializer::new(self))
            }
            Token::Dictionary => {
                let mut dict = DictionaryDeserializer::new(self);
                let value = visitor.visit_enum(EnumDeserializer::new(&mut dict))?;
                dict.deserialize_end()?;
                Ok(value)
            }
            token => Err(invalid_type(token, &visitor)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.deserialize_byte_string(&visitor)?;
        visitor.visit_borrowed_bytes(value)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.cursor.skip_value()?;
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        str string
        bytes byte_buf
        seq
        map
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fmt;

    use bytes::Bytes;

    use crate::bigint::BigInt;
    use crate::error::Cause;
    use crate::testing::{Enum, Ignored, Newtype, StrictStruct, Struct, Tuple, Unit, Untagged};

    use super::*;

    fn test<'de, T>(testdata: &'de [u8], expect: Result<T, Error>)
    where
        T: Deserialize<'de>,
        T: fmt::Debug + PartialEq,
    {
        {
            let mut testdata = testdata;
            let is_ok = expect.is_ok();
            assert_eq!(from_slice_strict(&mut testdata), expect);
            if is_ok {
                assert!(testdata.is_empty());
            }
        }

        {
            let mut testdata = &testdata[..testdata.len() - 1];
            assert!(matches!(
                from_slice_strict::<T>(&mut testdata),
                Err(Error::Syntax {
                    cause: Cause::Incomplete,
                    ..
                }),
            ));
        }
    }

    fn test_non_strict<'de, T>(mut testdata: &'de [u8], expect: Result<T, Error>)
    where
        T: Deserialize<'de>,
        T: fmt::Debug + PartialEq,
    {
        assert_eq!(from_slice(&mut testdata), expect);
    }

    fn test_type_mismatch<'de, T>(mut testdata: &'de [u8])
    where
        T: Deserialize<'de>,
        T: fmt::Debug,
    {
        let result = from_slice_strict::<T>(&mut testdata);
        assert!(
            matches!(result, Err(Error::TypeMismatch { .. })),
            "result = {result:?}",
        );
    }

    fn mismatch(value: &str, target: &str) -> Error {
        Error::TypeMismatch {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn eof() {
        assert_eq!(from_slice::<()>(&mut b"".as_slice()), Err(Error::Eof));
        assert_eq!(unmarshal(b"", &mut 0u8), Err(Error::Eof));
    }

    #[test]
    fn syntax() {
        assert_eq!(
            from_slice::<Vec<u8>>(&mut b"li1e".as_slice()),
            Err(Error::Syntax {
                offset: 4,
                cause: Cause::Incomplete,
            }),
        );
        assert_eq!(
            from_slice::<u8>(&mut b"e".as_slice()),
            Err(Error::Syntax {
                offset: 0,
                cause: Cause::UnexpectedEnd,
            }),
        );
        assert_eq!(
            from_slice::<Vec<u8>>(&mut b"li1ex".as_slice()),
            Err(Error::UnknownValueType {
                offset: 4,
                byte: b'x',
            }),
        );
        assert_eq!(
            from_slice::<&[u8]>(&mut b"1x:a".as_slice()),
            Err(Error::Syntax {
                offset: 0,
                cause: Cause::ByteStringLength,
            }),
        );
    }

    #[test]
    fn trailing_data() {
        let mut testdata = b"i1ei2e".as_slice();
        assert_eq!(from_slice::<u8>(&mut testdata), Ok(1));
        assert_eq!(testdata, b"i2e");
        assert_eq!(from_slice::<u8>(&mut testdata), Ok(2));
        assert_eq!(testdata, b"");
    }

    #[test]
    fn deserialize_bool() {
        test(b"i1e", Ok(true));
        test(b"i0e", Ok(false));
        test(b"i2e", Ok(true));
        test(b"i-1e", Ok(true));
        test_type_mismatch::<bool>(b"0:");

        assert!(matches!(
            from_slice_strict::<bool>(&mut b"i-0e".as_slice()),
            Err(Error::StrictInteger { .. }),
        ));
        test_non_strict(b"i00e", Ok(true));
    }

    #[test]
    fn deserialize_int() {
        test(b"i-1e", Ok(-1i8));
        test(b"i-1e", Ok(-1i16));
        test(b"i-1e", Ok(-1i32));
        test(b"i-1e", Ok(-1i64));
        test(b"i-1e", Ok(-1i128));

        test(b"i42e", Ok(42u8));
        test(b"i42e", Ok(42u16));
        test(b"i42e", Ok(42u32));
        test(b"i42e", Ok(42u64));
        test(b"i42e", Ok(42u128));
        test(b"i0e", Ok(0u8));

        test_type_mismatch::<i8>(b"0:");
        test_type_mismatch::<u64>(b"le");

        test(b"i128e", Err::<i8, _>(mismatch("integer 128", "i8")));
        test(b"i-5e", Err::<u8, _>(mismatch("integer -5", "u8")));
        test(b"i-5e", Err::<u64, _>(mismatch("integer -5", "u64")));
        test(b"i256e", Err::<u8, _>(mismatch("integer 256", "u8")));
        let testdata = format!("i{}e", i128::from(i64::MIN) - 1);
        test_type_mismatch::<i64>(testdata.as_bytes());
        assert_eq!(
            from_slice::<u8>(&mut b"i1x2e".as_slice()),
            Err(mismatch("integer 1x2", "u8")),
        );

        assert!(matches!(
            from_slice_strict::<i8>(&mut b"i01e".as_slice()),
            Err(Error::StrictInteger { .. }),
        ));
        test_non_strict(b"i-0e", Ok(0i8));
        test_non_strict(b"i00e", Ok(0i8));
        test_non_strict(b"i01e", Ok(1i8));
    }

    #[test]
    fn deserialize_float() {
        assert_eq!(
            from_slice::<f64>(&mut b"i1e".as_slice()),
            Err(Error::UnsupportedShape { shape: "f64" }),
        );
    }

    #[test]
    fn deserialize_char() {
        test(b"1:A", Ok('A'));
        test(b"3:\xe2\x9d\xa4", Ok('\u{2764}'));
        test_type_mismatch::<char>(b"i0e");
        test_type_mismatch::<char>(b"0:");
        test_type_mismatch::<char>(b"1:\x80");
        test_type_mismatch::<char>(b"2:AB");
    }

    #[test]
    fn deserialize_str() {
        test(b"0:", Ok(""));
        test(b"11:hello world", Ok("hello world"));
        test(b"3:\xe2\x9d\xa4", Ok("\u{2764}"));
        test(b"18:this is an example", Ok("this is an example".to_string()));

        test_type_mismatch::<&str>(b"i0e");
        test_type_mismatch::<&str>(b"1:\x80");
        test_type_mismatch::<String>(b"1:\x80");
    }

    #[test]
    fn deserialize_bytes() {
        test(b"0:", Ok(b"".as_slice()));
        test(b"5:\x00\x01\x02\x03\xff", Ok(b"\x00\x01\x02\x03\xff".as_slice()));
        test(b"3:abc", Ok(Bytes::from_static(b"abc")));
        test(b"3:abc", Ok(serde_bytes::ByteBuf::from(b"abc".to_vec())));
        test_type_mismatch::<&[u8]>(b"i0e");
    }

    #[test]
    fn deserialize_option() {
        test(b"i1e", Ok(Some(1u8)));
        test(b"0:", Ok(Some(String::new())));
        test_type_mismatch::<Option<u8>>(b"0:");
    }

    #[test]
    fn deserialize_unit() {
        test(b"le", Ok(()));
        test(b"le", Ok(Unit));
        test_type_mismatch::<()>(b"i0e");
        test_type_mismatch::<()>(b"li0ee");
    }

    #[test]
    fn deserialize_newtype_struct() {
        test(b"3:\xe2\x9d\xa4", Ok(Newtype("\u{2764}".to_string())));
        test_type_mismatch::<Newtype>(b"i0e");
    }

    #[test]
    fn deserialize_big_integer() {
        let text = "-1234567890123456789012345678901234567890";
        let testdata = format!("i{text}e");
        test(testdata.as_bytes(), Ok(text.parse::<BigInt>().unwrap()));
        test(b"i0e", Ok(BigInt::default()));
        test_type_mismatch::<BigInt>(b"0:");

        assert!(matches!(
            from_slice::<BigInt>(&mut b"ie".as_slice()),
            Err(Error::MalformedInteger { .. }),
        ));
        assert!(matches!(
            from_slice::<BigInt>(&mut b"i12ae".as_slice()),
            Err(Error::MalformedInteger { .. }),
        ));
        assert!(matches!(
            from_slice_strict::<BigInt>(&mut b"i012e".as_slice()),
            Err(Error::StrictInteger { .. }),
        ));
    }

    #[test]
    fn deserialize_seq() {
        test(b"le", Ok(Vec::<u8>::new()));
        test(b"li1ei2ei3ee", Ok(vec![1u8, 2, 3]));
        test_type_mismatch::<Vec<u8>>(b"de");
        test_type_mismatch::<Vec<u8>>(b"li1e0:e");
    }

    #[test]
    fn deserialize_tuple() {
        test(b"li1e1:xe", Ok((1u8, "x")));
        test(b"li1ee", Ok((1u8, 0u8)));
        test(b"le", Ok((0u8, String::new(), false)));
        test(b"li1ei2ee", Ok([1u8, 2, 0, 0]));
        test(b"l1:xe", Ok([Some("x".to_string()), None]));
        test_type_mismatch::<(u8,)>(b"li1ei2ee");
        test_type_mismatch::<[u8; 1]>(b"li1ei2ee");

        test_type_mismatch::<(u8,)>(b"de");
        test_type_mismatch::<(u8, &str)>(b"l1:xi1ee");
    }

    #[test]
    fn deserialize_byte_array() {
        test(b"4:\x01\x02\x03\x04", Ok([1u8, 2, 3, 4]));
        test(
            b"3:abc",
            Err::<[u8; 4], _>(mismatch("byte string of length 3", "array of length 4")),
        );
    }

    #[test]
    fn deserialize_tuple_struct() {
        test(b"li1e1:xe", Ok(Tuple(1, "x".to_string())));
        test(b"li1ee", Ok(Tuple(1, String::new())));
        test_type_mismatch::<Tuple>(b"li1e1:xi2ee");
        test_type_mismatch::<Tuple>(b"de");
    }

    #[test]
    fn deserialize_map() {
        test(b"de", Ok(HashMap::<&str, u8>::from([])));
        test(
            b"d2:k1i1e2:k2i2ee",
            Ok(HashMap::from([("k1", 1u8), ("k2", 2u8)])),
        );

        test_type_mismatch::<HashMap<&str, u8>>(b"i0e");
        assert_eq!(
            from_slice::<HashMap<&str, u8>>(&mut b"di1ei2ee".as_slice()),
            Err(mismatch("integer", "dictionary key")),
        );
        assert_eq!(
            from_slice::<HashMap<&str, u8>>(&mut b"d1:ke".as_slice()),
            Err(Error::MissingValue {
                key: Bytes::from_static(b"k"),
            }),
        );

        assert!(matches!(
            from_slice_strict::<HashMap<&str, u8>>(&mut b"d2:bbi2e3:aaai1ee".as_slice()),
            Err(Error::StrictDictionaryKey { .. }),
        ));
        test_non_strict(
            b"d2:bbi2e3:aaai1e1:ci3ee",
            Ok(HashMap::from([("aaa", 1u8), ("bb", 2u8), ("c", 3u8)])),
        );
        test_non_strict(b"d1:ki1e1:ki3e1:ki2ee", Ok(HashMap::from([("k", 2u8)])));
    }

    #[test]
    fn deserialize_struct() {
        test(b"d1:ai1e1:bi2e1:ci3ee", Ok(Struct { a: 1, c: 3, b: 2 }));
        // Unknown entries are ignored unless the struct denies them.
        test(b"d1:ai1e1:bi2e1:ci3e1:xi4ee", Ok(Struct { a: 1, c: 3, b: 2 }));
        assert_eq!(
            from_slice::<StrictStruct>(&mut b"d1:xi1e1:yi2ee".as_slice()),
            Err(Error::UnknownKey {
                key: "y".to_string(),
            }),
        );
        assert!(matches!(
            from_slice::<Struct>(&mut b"de".as_slice()),
            Err(Error::Custom { .. }),
        ));
        test_type_mismatch::<Struct>(b"li1ei2ei3ee");
        test_type_mismatch::<Struct>(b"i0e");
    }

    #[test]
    fn deserialize_enum() {
        test(b"4:Unit", Ok(Enum::Unit));
        test(
            b"d7:Newtype8:spam egge",
            Ok(Enum::Newtype("spam egg".to_string())),
        );
        test(
            b"d5:Tupleli42e8:spam eggee",
            Ok(Enum::Tuple(42, "spam egg".to_string())),
        );
        test(
            b"d6:Structd1:ai1e1:bi3e1:ci2eee",
            Ok(Enum::Struct { a: 1, c: 2, b: 3 }),
        );

        test_type_mismatch::<Enum>(b"i0e");
        test_type_mismatch::<Enum>(b"d4:Unitlee");
        test_type_mismatch::<Enum>(b"7:Newtype");
        test_type_mismatch::<Enum>(b"d7:Newtype0:5:Tupleli0e0:ee");
        assert!(matches!(
            from_slice::<Enum>(&mut b"1:X".as_slice()),
            Err(Error::Custom { message }) if message.starts_with("unknown variant "),
        ));
    }

    #[test]
    fn untagged() {
        test(b"d5:valuei-7ee", Ok(Untagged::Int { value: -7 }));
        test(
            b"d5:value4:spame",
            Ok(Untagged::String {
                value: "spam".to_string(),
            }),
        );
    }

    #[test]
    fn deserialize_ignored_any() {
        test(
            b"d7:ignoredd1:xli1eee1:xi42ee",
            Ok(Ignored { x: 42, ignored: 0 }),
        );
    }

    #[test]
    fn unmarshal_in_place() {
        let mut value = vec![9u8, 9, 9];
        unmarshal(b"li1ee", &mut value).unwrap();
        assert_eq!(value, [1]);

        let mut value = Struct { a: 9, c: 9, b: 9 };
        assert!(matches!(
            unmarshal_strict(b"d1:ai01ee", &mut value),
            Err(Error::StrictInteger { .. }),
        ));
    }

    #[test]
    fn nested() {
        test(b"llli0eeee", Ok(vec![vec![vec![0u8]]]));
        test(
            b"d1:ald1:bld1:c1:deeeee",
            Ok(HashMap::from([(
                "a",
                vec![HashMap::from([("b", vec![HashMap::from([("c", "d")])])])],
            )])),
        );
    }
}
