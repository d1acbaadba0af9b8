use serde::de::value::BorrowedBytesDeserializer;
use serde::de::{
    self, DeserializeSeed, Deserializer as _, EnumAccess, Unexpected, VariantAccess, Visitor,
};
use snafu::prelude::*;

use crate::error::{Error, TypeMismatchSnafu};

use super::Deserializer;
use super::dict::DictionaryDeserializer;
use super::strict::Strictness;

//
// `EnumDeserializer`
//

pub(super) struct EnumDeserializer<'b, 'a, 'de, S>(&'b mut DictionaryDeserializer<'a, 'de, S>);

impl<'b, 'a, 'de, S> EnumDeserializer<'b, 'a, 'de, S> {
    pub(super) fn new(dict: &'b mut DictionaryDeserializer<'a, 'de, S>) -> Self {
        Self(dict)
    }
}

impl<'de, S> EnumAccess<'de> for EnumDeserializer<'_, '_, 'de, S>
where
    S: Strictness,
{
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = self.0.deserialize_key()?.context(TypeMismatchSnafu {
            value: "empty dictionary",
            target: "enum",
        })?;
        let variant = seed.deserialize(BorrowedBytesDeserializer::new(variant))?;
        Ok((variant, self))
    }
}

impl<'de, S> VariantAccess<'de> for EnumDeserializer<'_, '_, 'de, S>
where
    S: Strictness,
{
    type Error = Error;

    fn unit_variant(self) -> Result<(), Self::Error> {
        let token = self.0.deserialize_value()?.cursor.read_token()?;
        Err(de::Error::invalid_type(
            token.to_unexpected(),
            &"unit variant",
        ))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self.0.deserialize_value()?)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.0.deserialize_value()?.deserialize_tuple(len, visitor)
    }

    fn struct_variant<V>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.0
            .deserialize_value()?
            .deserialize_struct("", fields, visitor)
    }
}

//
// `UnitVariantDeserializer`
//

pub(super) struct UnitVariantDeserializer<'a, 'de, S>(&'a mut Deserializer<'de, S>);

impl<'a, 'de, S> UnitVariantDeserializer<'a, 'de, S> {
    pub(super) fn new(deserializer: &'a mut Deserializer<'de, S>) -> Self {
        Self(deserializer)
    }
}

impl<'de, S> EnumAccess<'de> for UnitVariantDeserializer<'_, 'de, S>
where
    S: Strictness,
{
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(&mut *self.0)?;
        Ok((variant, self))
    }
}

impl<'de, S> VariantAccess<'de> for UnitVariantDeserializer<'_, 'de, S> {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, _seed: T) -> Result<T::Value, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        Err(de::Error::invalid_type(
            Unexpected::UnitVariant,
            &"newtype variant",
        ))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        Err(de::Error::invalid_type(Unexpected::UnitVariant, &visitor))
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        Err(de::Error::invalid_type(Unexpected::UnitVariant, &visitor))
    }
}
