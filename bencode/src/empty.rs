use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use bytes::{Bytes, BytesMut};
use serde_bytes::ByteBuf;

/// Emptiness test that drives the `omitempty` tag option.
///
/// Scalars are empty when they equal their zero value, and containers when they hold nothing.
/// An absent `Option` is empty, but no indirection to a value ever is, whatever the value.
pub trait IsEmpty {
    fn is_empty(&self) -> bool;
}

/// Usable with `#[serde(skip_serializing_if = "bencode::is_empty")]`.
pub fn is_empty<T>(value: &T) -> bool
where
    T: ?Sized + IsEmpty,
{
    value.is_empty()
}

macro_rules! impl_zero {
    ($($type:ty)*) => {
        $(
            impl IsEmpty for $type {
                fn is_empty(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_zero!(i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize);

macro_rules! impl_len {
    ($($type:ty $(: $($generic:ident),*)?;)*) => {
        $(
            impl$(<$($generic),*>)? IsEmpty for $type {
                fn is_empty(&self) -> bool {
                    self.is_empty()
                }
            }
        )*
    };
}

impl_len! {
    str;
    String;
    Bytes;
    BytesMut;
    [T]: T;
    Vec<T>: T;
    VecDeque<T>: T;
    BTreeSet<T>: T;
    HashSet<T, S>: T, S;
    BTreeMap<K, V>: K, V;
    HashMap<K, V, S>: K, V, S;
}

impl IsEmpty for ByteBuf {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl IsEmpty for serde_bytes::Bytes {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl IsEmpty for bool {
    fn is_empty(&self) -> bool {
        !*self
    }
}

impl IsEmpty for char {
    fn is_empty(&self) -> bool {
        *self == '\0'
    }
}

impl IsEmpty for () {
    fn is_empty(&self) -> bool {
        true
    }
}

impl<T> IsEmpty for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

impl<T> IsEmpty for Box<T>
where
    T: ?Sized,
{
    fn is_empty(&self) -> bool {
        false
    }
}

impl<T, const N: usize> IsEmpty for [T; N]
where
    T: IsEmpty,
{
    fn is_empty(&self) -> bool {
        self.iter().all(T::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar() {
        assert!(is_empty(&0u8));
        assert!(!is_empty(&1u8));
        assert!(is_empty(&0i128));
        assert!(!is_empty(&-1i64));
        assert!(is_empty(&false));
        assert!(!is_empty(&true));
        assert!(is_empty(&'\0'));
        assert!(!is_empty(&'a'));
        assert!(is_empty(&()));
    }

    #[test]
    fn container() {
        assert!(is_empty(""));
        assert!(!is_empty("x"));
        assert!(is_empty(&String::new()));
        assert!(is_empty(&Vec::<u8>::new()));
        assert!(!is_empty(&vec![0u8]));
        assert!(is_empty(&HashMap::<String, u8>::new()));
        assert!(!is_empty(&BTreeMap::from([(1, 2)])));
        assert!(is_empty(&Bytes::new()));
        assert!(is_empty(&ByteBuf::new()));
        assert!(!is_empty(&Bytes::from_static(b"x")));
    }

    #[test]
    fn indirection() {
        assert!(is_empty(&None::<u8>));
        assert!(!is_empty(&Some(0u8)));
        assert!(!is_empty(&Some(String::new())));
        assert!(!is_empty(&Box::new(0u8)));
    }

    #[test]
    fn array() {
        assert!(is_empty(&[0u8; 0]));
        assert!(is_empty(&[0u8; 4]));
        assert!(!is_empty(&[0u8, 0, 1, 0]));
        assert!(is_empty(&[String::new(), String::new()]));
    }
}
