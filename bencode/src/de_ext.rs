use serde::de::{self, Unexpected, Visitor};

pub(crate) trait VisitorExt<'de>: Visitor<'de> {
    /// Only `0` is false; any other integer text is true.
    fn visit_bool_integer<E>(self, integer: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.visit_bool(integer != b"0")
    }

    fn visit_char_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let c = str::from_utf8(value)
            .ok()
            .and_then(|string| {
                let mut chars = string.chars();
                let c = chars.next()?;
                match chars.next() {
                    None => Some(c),
                    Some(_) => None,
                }
            })
            .ok_or_else(|| E::invalid_value(Unexpected::Bytes(value), &self))?;
        self.visit_char(c)
    }
}

impl<'de, V> VisitorExt<'de> for V where V: Visitor<'de> {}
