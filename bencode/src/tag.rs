//! Field tag syntax: `"key,option,..."`.

pub(crate) const IGNORE: &str = "-";

pub(crate) const OMIT_EMPTY: &str = "omitempty";
pub(crate) const IGNORE_UNMARSHAL_TYPE_ERROR: &str = "ignore_unmarshal_type_error";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Tag<'a> {
    key: &'a str,
    options: &'a str,
}

impl<'a> Tag<'a> {
    pub(crate) fn parse(tag: &'a str) -> Self {
        let (key, options) = tag.split_once(',').unwrap_or((tag, ""));
        Self { key, options }
    }

    pub(crate) fn is_ignored(&self) -> bool {
        self.key == IGNORE
    }

    /// Returns the key override, which is absent when the first token is empty.
    pub(crate) fn key(&self) -> Option<&'a str> {
        (!self.key.is_empty()).then_some(self.key)
    }

    pub(crate) fn options(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.options.split(',').filter(|option| !option.is_empty())
    }

    pub(crate) fn has_option(&self, name: &str) -> bool {
        self.options().any(|option| option == name)
    }
}
