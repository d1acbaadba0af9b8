//! Record shapes: structs whose fields are mapped to dictionary entries through field tags.
//!
//! A record is usually declared with `#[derive(Record)]`:
//!
//! ```
//! use bencode::Record;
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Peer {
//!     #[bencode("peer id")]
//!     pub id: String,
//!     #[bencode(",omitempty")]
//!     pub port: u16,
//!     #[bencode("-")]
//!     pub last_seen: u64,
//! }
//!
//! let peer = Peer { id: "x".to_string(), port: 0, last_seen: 1 };
//! assert_eq!(&*bencode::marshal(&peer).unwrap(), b"d7:peer id1:xe");
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, LazyLock};

use serde::de::{self, Deserialize, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_bytes::ByteBuf;

use crate::cache::{ShapeCache, ShapeKey};
use crate::tag::{IGNORE_UNMARSHAL_TYPE_ERROR, OMIT_EMPTY, Tag};

/// Declared field of a record, in declaration order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Slot {
    pub name: &'static str,
    pub tag: &'static str,
    /// Whether the field is externally visible (declared with any form of `pub`).
    pub visible: bool,
}

/// Implemented by `#[derive(Record)]`.
///
/// The slot accessors are only ever called with slot indexes that `fields_for_encoding` and
/// `field_for_decoding` produce.
pub trait Record {
    const NAME: &'static str;
    const SLOTS: &'static [Slot];

    fn serialize_slot<S>(
        &self,
        slot: usize,
        key: &'static str,
        state: &mut S,
    ) -> Result<(), S::Error>
    where
        S: SerializeStruct;

    fn is_slot_empty(&self, slot: usize) -> bool;

    fn deserialize_slot<'de, A>(
        &mut self,
        slot: usize,
        ignore_type_error: bool,
        map: &mut A,
    ) -> Result<(), A::Error>
    where
        A: MapAccess<'de>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub slot: usize,
    pub name: &'static str,
    pub key: &'static str,
    pub omit_empty: bool,
    pub ignore_type_error: bool,
}

/// Returns the encodable fields of a record, sorted by wire key.  Wire keys are unique.
pub fn fields_for_encoding<R>() -> Arc<[FieldDescriptor]>
where
    R: Record + ?Sized,
{
    static CACHE: LazyLock<ShapeCache<Arc<[FieldDescriptor]>>> = LazyLock::new(ShapeCache::new);
    CACHE.get_or_compute(ShapeKey::new(R::NAME, R::SLOTS), || {
        let mut fields = describe(R::NAME, R::SLOTS).collect::<Vec<_>>();
        // Stable sort: fields sharing a wire key stay in declaration order, and only the first
        // declared one is kept, matching `field_for_decoding`.
        fields.sort_by_key(|field| field.key);
        let num_declared = fields.len();
        fields.dedup_by_key(|field| field.key);
        if fields.len() < num_declared {
            tracing::warn!(
                record = R::NAME,
                num_dropped = num_declared - fields.len(),
                "drop fields that share a wire key with an earlier field",
            );
        }
        tracing::debug!(
            record = R::NAME,
            num_fields = fields.len(),
            "compute fields for encoding",
        );
        fields.into()
    })
}

/// Resolves a wire key to a decodable field.  When several fields share a wire key, the first
/// declared one wins.
pub fn field_for_decoding<R>(key: &[u8]) -> Option<FieldDescriptor>
where
    R: Record + ?Sized,
{
    type Index = Arc<HashMap<&'static [u8], FieldDescriptor>>;
    static CACHE: LazyLock<ShapeCache<Index>> = LazyLock::new(ShapeCache::new);
    let index = CACHE.get_or_compute(ShapeKey::new(R::NAME, R::SLOTS), || {
        let mut index = HashMap::new();
        for field in describe(R::NAME, R::SLOTS) {
            index.entry(field.key.as_bytes()).or_insert(field);
        }
        tracing::debug!(
            record = R::NAME,
            num_fields = index.len(),
            "compute fields for decoding",
        );
        Arc::new(index)
    });
    index.get(key).copied()
}

fn describe(
    record: &'static str,
    slots: &'static [Slot],
) -> impl Iterator<Item = FieldDescriptor> {
    slots.iter().enumerate().filter_map(move |(i, slot)| {
        if !slot.visible {
            return None;
        }
        let tag = Tag::parse(slot.tag);
        if tag.is_ignored() {
            return None;
        }
        for option in tag.options() {
            if option != OMIT_EMPTY && option != IGNORE_UNMARSHAL_TYPE_ERROR {
                tracing::trace!(record, field = slot.name, option, "ignore unknown tag option");
            }
        }
        Some(FieldDescriptor {
            slot: i,
            name: slot.name,
            key: tag.key().unwrap_or(slot.name),
            omit_empty: tag.has_option(OMIT_EMPTY),
            ignore_type_error: tag.has_option(IGNORE_UNMARSHAL_TYPE_ERROR),
        })
    })
}

//
// Helpers for the derived `Serialize` and `Deserialize` implementations.
//

pub fn serialize<R, S>(record: &R, serializer: S) -> Result<S::Ok, S::Error>
where
    R: Record + ?Sized,
    S: Serializer,
{
    let fields = fields_for_encoding::<R>();
    let mut state = serializer.serialize_struct(R::NAME, fields.len())?;
    for field in fields.iter() {
        if field.omit_empty && record.is_slot_empty(field.slot) {
            state.skip_field(field.key)?;
        } else {
            record.serialize_slot(field.slot, field.key, &mut state)?;
        }
    }
    state.end()
}

pub fn deserialize<'de, R, D>(deserializer: D) -> Result<R, D::Error>
where
    R: Record + Default,
    D: Deserializer<'de>,
{
    let mut record = R::default();
    deserialize_in_place(deserializer, &mut record)?;
    Ok(record)
}

/// Decodes entries into an existing record.  On error, the record is left partially populated.
pub fn deserialize_in_place<'de, R, D>(deserializer: D, place: &mut R) -> Result<(), D::Error>
where
    R: Record,
    D: Deserializer<'de>,
{
    deserializer.deserialize_struct(R::NAME, &[], RecordVisitor(place))
}

struct RecordVisitor<'a, R>(&'a mut R);

impl<'de, R> Visitor<'de> for RecordVisitor<'_, R>
where
    R: Record,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "record {}", R::NAME)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = map.next_key::<ByteBuf>()? {
            let field = field_for_decoding::<R>(&key)
                .ok_or_else(|| {
                    <A::Error as de::Error>::unknown_field(&String::from_utf8_lossy(&key), &[])
                })?;
            self.0
                .deserialize_slot(field.slot, field.ignore_type_error, &mut map)?;
        }
        Ok(())
    }
}

/// Newtype name under which the decoder hands over a slot value as a sequence of at most one
/// element.  The sequence is empty when the value does not match the slot type.
pub(crate) const LENIENT_MAGIC: &str = "$bencode::record::LENIENT";

/// Decodes the next map value into a slot.
///
/// When `ignore_type_error` is set, a type mismatch leaves the slot as it was.
pub fn deserialize_slot<'de, A, T>(
    map: &mut A,
    place: &mut T,
    ignore_type_error: bool,
) -> Result<(), A::Error>
where
    A: MapAccess<'de>,
    T: Deserialize<'de>,
{
    if ignore_type_error {
        map.next_value_seed(Lenient(place))
    } else {
        map.next_value_seed(InPlace(place))
    }
}

pub fn no_such_slot(record: &str, slot: usize) -> String {
    format!("record {record} has no encodable slot {slot}")
}

struct InPlace<'a, T>(&'a mut T);

impl<'de, T> DeserializeSeed<'de> for InPlace<'_, T>
where
    T: Deserialize<'de>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize_in_place(deserializer, self.0)
    }
}

struct Lenient<'a, T>(&'a mut T);

impl<'de, T> DeserializeSeed<'de> for Lenient<'_, T>
where
    T: Deserialize<'de>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(LENIENT_MAGIC, self)
    }
}

impl<'de, T> Visitor<'de> for Lenient<'_, T>
where
    T: Deserialize<'de>,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("record slot")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        seq.next_element_seed(InPlace(self.0))?;
        Ok(())
    }

    // Decoders other than ours do not know the magic name.
    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize_in_place(deserializer, self.0)
    }
}

//
// Zero-filling absent values on encoding.
//

/// Serializes a slot value, substituting the zero value for every absent `Option` that the
/// `ZeroFill` plan `P` reaches.
///
/// `#[derive(Record)]` picks the plan from the slot type.  It may also be used directly:
///
/// ```
/// use bencode::record::{AsIs, Items, OrZero, ZeroFilled};
///
/// let list = vec![Some(1u8), None];
/// assert_eq!(
///     &*bencode::marshal(&ZeroFilled::<_, Items<OrZero<AsIs>>>::new(&list)).unwrap(),
///     b"li1ei0ee",
/// );
/// ```
pub struct ZeroFilled<'a, T: ?Sized, P>(&'a T, PhantomData<P>);

impl<'a, T: ?Sized, P> ZeroFilled<'a, T, P> {
    pub fn new(value: &'a T) -> Self {
        Self(value, PhantomData)
    }
}

impl<T, P> Serialize for ZeroFilled<'_, T, P>
where
    T: ?Sized,
    P: ZeroFill<T>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        P::serialize(self.0, serializer)
    }
}

/// Plan for serializing a `T` whose absent values are replaced by zero values.
pub trait ZeroFill<T: ?Sized> {
    fn serialize<S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;
}

/// Serializes the value as is.
pub struct AsIs;

/// `Option<T>`: `None` is serialized as `T::default()`.
pub struct OrZero<P>(PhantomData<P>);

/// Sequences whose elements follow `P`.
pub struct Items<P>(PhantomData<P>);

/// Maps whose values follow `P`.
pub struct Values<P>(PhantomData<P>);

/// `Box<T>`.
pub struct Boxed<P>(PhantomData<P>);

impl<T> ZeroFill<T> for AsIs
where
    T: ?Sized + Serialize,
{
    fn serialize<S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }
}

impl<T, P> ZeroFill<Option<T>> for OrZero<P>
where
    T: Default,
    P: ZeroFill<T>,
{
    fn serialize<S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => P::serialize(value, serializer),
            None => P::serialize(&T::default(), serializer),
        }
    }
}

impl<T, P> ZeroFill<[T]> for Items<P>
where
    P: ZeroFill<T>,
{
    fn serialize<S>(value: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(value.iter().map(ZeroFilled::<T, P>::new))
    }
}

impl<T, P, const N: usize> ZeroFill<[T; N]> for Items<P>
where
    P: ZeroFill<T>,
{
    fn serialize<S>(value: &[T; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        <Self as ZeroFill<[T]>>::serialize(value, serializer)
    }
}

impl<T, P> ZeroFill<Vec<T>> for Items<P>
where
    P: ZeroFill<T>,
{
    fn serialize<S>(value: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        <Self as ZeroFill<[T]>>::serialize(value, serializer)
    }
}

impl<T, P> ZeroFill<VecDeque<T>> for Items<P>
where
    P: ZeroFill<T>,
{
    fn serialize<S>(value: &VecDeque<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(value.iter().map(ZeroFilled::<T, P>::new))
    }
}

impl<K, V, P> ZeroFill<BTreeMap<K, V>> for Values<P>
where
    K: Serialize,
    P: ZeroFill<V>,
{
    fn serialize<S>(value: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(value.iter().map(|(k, v)| (k, ZeroFilled::<V, P>::new(v))))
    }
}

impl<K, V, H, P> ZeroFill<HashMap<K, V, H>> for Values<P>
where
    K: Serialize,
    P: ZeroFill<V>,
{
    fn serialize<S>(value: &HashMap<K, V, H>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(value.iter().map(|(k, v)| (k, ZeroFilled::<V, P>::new(v))))
    }
}

impl<T, P> ZeroFill<Box<T>> for Boxed<P>
where
    T: ?Sized,
    P: ZeroFill<T>,
{
    fn serialize<S>(value: &Box<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        P::serialize(&**value, serializer)
    }
}
