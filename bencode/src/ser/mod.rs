// Implements the serializer methods that a restricted serializer rejects, leaving
// `serialize_char`, `serialize_str`, `serialize_bytes`, `serialize_unit_variant`, and
// `serialize_newtype_struct` to the implementer.  It calls `self.unsupported()` for the error.
macro_rules! impl_unsupported {
    () => {
        type SerializeSeq = serde::ser::Impossible<Self::Ok, Self::Error>;
        type SerializeTuple = serde::ser::Impossible<Self::Ok, Self::Error>;
        type SerializeTupleStruct = serde::ser::Impossible<Self::Ok, Self::Error>;
        type SerializeTupleVariant = serde::ser::Impossible<Self::Ok, Self::Error>;

        type SerializeMap = serde::ser::Impossible<Self::Ok, Self::Error>;
        type SerializeStruct = serde::ser::Impossible<Self::Ok, Self::Error>;
        type SerializeStructVariant = serde::ser::Impossible<Self::Ok, Self::Error>;

        fn serialize_bool(self, _value: bool) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_i8(self, _value: i8) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_i16(self, _value: i16) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_i32(self, _value: i32) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_i64(self, _value: i64) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_i128(self, _value: i128) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_u8(self, _value: u8) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_u16(self, _value: u16) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_u32(self, _value: u32) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_u64(self, _value: u64) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_u128(self, _value: u128) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_f32(self, _value: f32) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_f64(self, _value: f64) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_some<T>(self, _value: &T) -> Result<Self::Ok, Self::Error>
        where
            T: ?Sized + serde::ser::Serialize,
        {
            Err(self.unsupported())
        }

        fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_newtype_variant<T>(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _value: &T,
        ) -> Result<Self::Ok, Self::Error>
        where
            T: ?Sized + serde::ser::Serialize,
        {
            Err(self.unsupported())
        }

        fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_tuple_struct(
            self,
            _name: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleStruct, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_tuple_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleVariant, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_struct(
            self,
            _name: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeStruct, Self::Error> {
            Err(self.unsupported())
        }

        fn serialize_struct_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeStructVariant, Self::Error> {
            Err(self.unsupported())
        }
    };
}

pub(crate) mod write;

mod key;
mod raw;

use std::io;
use std::marker::PhantomData;

use bytes::{BufMut, Bytes, BytesMut};
use serde::ser::{
    self, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
};
use snafu::prelude::*;

use crate::bigint;
use crate::error::io::Error as IoError;
use crate::error::{self, CustomSnafu, Error, UnsupportedShapeSnafu};
use crate::hook;

use self::raw::{Raw, RawSerializer};
use self::write::Write;

/// Encodes a value into its canonical bencode bytes.
pub fn marshal<T>(value: &T) -> Result<Bytes, Error>
where
    T: ?Sized + Serialize,
{
    to_bytes(value)
}

pub fn to_buf<B, T>(buf: B, value: &T) -> Result<(), Error>
where
    B: BufMut,
    T: ?Sized + Serialize,
{
    value.serialize(&mut Serializer::new(buf))
}

pub fn to_bytes<T>(value: &T) -> Result<Bytes, Error>
where
    T: ?Sized + Serialize,
{
    let mut buf = BytesMut::new();
    to_buf(&mut buf, value)?;
    Ok(buf.freeze())
}

pub fn to_writer<W, T>(writer: W, value: &T) -> Result<(), IoError>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    value.serialize(&mut Serializer::new(writer))
}

struct Serializer<W, E>(W, PhantomData<E>);

/// Buffers the entries and writes them sorted by key on `end`.
struct DictionarySerializer<'a, W, E> {
    writer: &'a mut W,
    items: Vec<(Bytes, Bytes)>,
    pending_key: Option<Bytes>,
    _phantom: PhantomData<E>,
}

impl<W, E> Serializer<W, E> {
    fn new(writer: W) -> Self {
        Self(writer, PhantomData)
    }
}

impl<'a, W, E> DictionarySerializer<'a, W, E> {
    fn new(writer: &'a mut W, len: usize) -> Self {
        Self {
            writer,
            items: Vec::with_capacity(len),
            pending_key: None,
            _phantom: PhantomData,
        }
    }
}

impl<'a, W, E> ser::Serializer for &'a mut Serializer<W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;

    type SerializeMap = DictionarySerializer<'a, W, E>;
    type SerializeStruct = DictionarySerializer<'a, W, E>;
    type SerializeStructVariant = DictionarySerializer<'a, W, E>;

    fn serialize_bool(self, value: bool) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(u8::from(value))
    }

    fn serialize_i8(self, value: i8) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_i16(self, value: i16) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_i32(self, value: i32) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_i64(self, value: i64) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_i128(self, value: i128) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_u8(self, value: u8) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_u16(self, value: u16) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_u32(self, value: u32) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_u64(self, value: u64) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_u128(self, value: u128) -> Result<Self::Ok, Self::Error> {
        self.0.write_integer(value)
    }

    fn serialize_f32(self, _value: f32) -> Result<Self::Ok, Self::Error> {
        Err(UnsupportedShapeSnafu { shape: "f32" }.build().into())
    }

    fn serialize_f64(self, _value: f64) -> Result<Self::Ok, Self::Error> {
        Err(UnsupportedShapeSnafu { shape: "f64" }.build().into())
    }

    fn serialize_char(self, value: char) -> Result<Self::Ok, Self::Error> {
        self.0.write_string(value.encode_utf8(&mut [0u8; 4]))
    }

    fn serialize_str(self, value: &str) -> Result<Self::Ok, Self::Error> {
        self.0.write_string(value)
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Self::Ok, Self::Error> {
        self.0.write_byte_string(value)
    }

    // Bencode has no null.  Records substitute the zero value for an absent slot before it
    // reaches here.
    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Err(UnsupportedShapeSnafu { shape: "none" }.build().into())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        self.0.write_list_begin()?;
        self.0.write_list_end()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.0.write_list_begin()?;
        self.0.write_list_end()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.0.write_string(variant)
    }

    fn serialize_newtype_struct<T>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        if name == hook::MAGIC {
            value.serialize(RawSerializer::new(&mut self.0, Raw::Data))
        } else if name == bigint::MAGIC {
            value.serialize(RawSerializer::new(&mut self.0, Raw::Integer))
        } else {
            value.serialize(self)
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.0.write_dictionary_begin()?;
        self.0.write_string(variant)?;
        value.serialize(&mut *self)?;
        self.0.write_dictionary_end()
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        self.0.write_list_begin()?;
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.0.write_list_begin()?;
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.0.write_list_begin()?;
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        self.0.write_dictionary_begin()?;
        self.0.write_string(variant)?;
        self.0.write_list_begin()?;
        Ok(self)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        self.0.write_dictionary_begin()?;
        Ok(DictionarySerializer::new(&mut self.0, len.unwrap_or(0)))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        self.0.write_dictionary_begin()?;
        Ok(DictionarySerializer::new(&mut self.0, len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        self.0.write_dictionary_begin()?;
        self.0.write_string(variant)?;
        self.0.write_dictionary_begin()?;
        Ok(DictionarySerializer::new(&mut self.0, len))
    }
}

impl<W, E> SerializeSeq for &mut Serializer<W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.0.write_list_end()
    }
}

impl<W, E> SerializeTuple for &mut Serializer<W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.0.write_list_end()
    }
}

impl<W, E> SerializeTupleStruct for &mut Serializer<W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.0.write_list_end()
    }
}

impl<W, E> SerializeTupleVariant for &mut Serializer<W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.0.write_list_end()?;
        self.0.write_dictionary_end()
    }
}

impl<W, E> SerializeMap for DictionarySerializer<'_, W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key::serialize_key(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let key = self.pending_key.take().context(CustomSnafu {
            message: "serialize_value is called before serialize_key",
        })?;
        self.items.push((key, to_bytes(value)?));
        Ok(())
    }

    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), Self::Error>
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        self.serialize_item(key, value)
    }

    fn end(mut self) -> Result<Self::Ok, Self::Error> {
        self.sort_then_write_items()?;
        self.writer.write_dictionary_end()
    }
}

impl<W, E> SerializeStruct for DictionarySerializer<'_, W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.serialize_item(key, value)
    }

    fn end(mut self) -> Result<Self::Ok, Self::Error> {
        self.sort_then_write_items()?;
        self.writer.write_dictionary_end()
    }
}

impl<W, E> SerializeStructVariant for DictionarySerializer<'_, W, E>
where
    W: Write<E>,
    E: error::ser::Error,
{
    type Ok = ();
    type Error = E;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.serialize_item(key, value)
    }

    fn end(mut self) -> Result<Self::Ok, Self::Error> {
        self.sort_then_write_items()?;
        self.writer.write_dictionary_end()?;
        self.writer.write_dictionary_end()
    }
}

impl<W, E> DictionarySerializer<'_, W, E>
where
    W: Write<E>,
    E: From<Error>,
{
    fn serialize_item<K, V>(&mut self, key: &K, value: &V) -> Result<(), E>
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        let key = key::serialize_key(key)?;
        self.items.push((key, to_bytes(value)?));
        Ok(())
    }

    fn sort_then_write_items(&mut self) -> Result<(), E> {
        // Stable sort: entries sharing a key stay in insertion order.
        self.items.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
        for (key, value) in &self.items {
            self.writer.write_byte_string(key)?;
            self.writer.write_slice(value)?;
        }
        Ok(())
    }
}
