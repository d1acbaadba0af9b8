use syn::ext::IdentExt;
use syn::{
    AngleBracketedGenericArguments, Attribute, Data, DataStruct, DeriveInput, Error, Field, Fields,
    GenericArgument, Ident, LitStr, Path, PathArguments, Type, TypeArray, TypeGroup, TypeParen,
    TypePath, TypeSlice, Visibility,
};

#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct Codegen<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) fields: Vec<CodegenField<'a>>,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct CodegenField<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) tag: String,
    pub(crate) visible: bool,
    /// `None` when the field type holds no `Option` that needs zero-filling.
    pub(crate) zero_plan: Option<ZeroPlan>,
}

/// Mirrors the `ZeroFill` plans of `bencode::record`.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) enum ZeroPlan {
    AsIs,
    OrZero(Box<ZeroPlan>),
    Items(Box<ZeroPlan>),
    Values(Box<ZeroPlan>),
    Boxed(Box<ZeroPlan>),
}

impl CodegenField<'_> {
    pub(crate) fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// True if the field may be encoded or decoded, which is the case for visible fields that
    /// are not tagged `"-"`.
    pub(crate) fn is_accessible(&self) -> bool {
        self.visible && self.tag.split(',').next() != Some(IGNORE)
    }
}

const ATTR_NAME: &str = "bencode";

const IGNORE: &str = "-";

macro_rules! ensure_not_duplicated {
    ($value:ident, $span:expr $(,)?) => {
        if $value.is_some() {
            return Err(Error::new($span, "duplicated attribute"));
        }
    };
}

impl<'a> Codegen<'a> {
    pub(crate) fn parse(input: &'a DeriveInput) -> Result<Self, Error> {
        for attr in &input.attrs {
            if let Some(tag) = try_parse_tag(attr)? {
                return Err(Error::new(tag.span(), "cannot be applied at the struct level"));
            }
        }

        if !input.generics.params.is_empty() {
            return Err(Error::new_spanned(
                &input.generics,
                "generic records are not supported",
            ));
        }

        let fields = match &input.data {
            Data::Struct(DataStruct {
                struct_token,
                fields,
                ..
            }) => match fields {
                Fields::Named(fields) => Ok(fields),
                _ => Err(struct_token.span),
            },
            Data::Enum(enum_) => Err(enum_.enum_token.span),
            Data::Union(union) => Err(union.union_token.span),
        }
        .map_err(|span| Error::new(span, "only named-field structs are supported"))?
        .named
        .iter()
        .map(CodegenField::parse)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ident: &input.ident,
            fields,
        })
    }
}

impl<'a> CodegenField<'a> {
    fn parse(field: &'a Field) -> Result<Self, Error> {
        let mut tag = None;
        for attr in &field.attrs {
            let Some(lit) = try_parse_tag(attr)? else {
                continue;
            };
            ensure_not_duplicated!(tag, lit.span());
            tag = Some(lit.value());
        }

        let Some(ident) = field.ident.as_ref() else {
            return Err(Error::new_spanned(field, "expect a named field"));
        };

        Ok(Self {
            ident,
            tag: tag.unwrap_or_default(),
            visible: !matches!(field.vis, Visibility::Inherited),
            zero_plan: zero_plan(&field.ty),
        })
    }
}

fn try_parse_tag(attr: &Attribute) -> Result<Option<LitStr>, Error> {
    if attr.path().is_ident(ATTR_NAME) {
        attr.parse_args::<LitStr>().map(Some)
    } else {
        Ok(None)
    }
}

const OPTION_PATHS: &[&[&str]] = &[&["std", "option", "Option"], &["core", "option", "Option"]];

const ITEMS_PATHS: &[&[&str]] = &[
    &["std", "vec", "Vec"],
    &["alloc", "vec", "Vec"],
    &["std", "collections", "VecDeque"],
    &["std", "collections", "vec_deque", "VecDeque"],
];

const VALUES_PATHS: &[&[&str]] = &[
    &["std", "collections", "BTreeMap"],
    &["std", "collections", "btree_map", "BTreeMap"],
    &["std", "collections", "HashMap"],
    &["std", "collections", "hash_map", "HashMap"],
];

const BOXED_PATHS: &[&[&str]] = &[&["std", "boxed", "Box"], &["alloc", "boxed", "Box"]];

/// Finds the `Option`s that a field type holds, looking through the standard containers.
fn zero_plan(type_: &Type) -> Option<ZeroPlan> {
    match type_ {
        Type::Group(TypeGroup { elem, .. }) | Type::Paren(TypeParen { elem, .. }) => {
            zero_plan(elem)
        }
        Type::Array(TypeArray { elem, .. }) | Type::Slice(TypeSlice { elem, .. }) => {
            zero_plan(elem).map(|plan| ZeroPlan::Items(Box::new(plan)))
        }
        Type::Path(TypePath { qself: None, path }) => {
            let is = |paths: &[&[&str]]| paths.iter().any(|expect| match_path(path, expect));
            let args = type_args(path);
            if is(OPTION_PATHS) {
                let inner = args.first().and_then(|arg| zero_plan(arg));
                Some(ZeroPlan::OrZero(Box::new(inner.unwrap_or(ZeroPlan::AsIs))))
            } else if is(ITEMS_PATHS) {
                zero_plan(args.first()?).map(|plan| ZeroPlan::Items(Box::new(plan)))
            } else if is(VALUES_PATHS) {
                zero_plan(args.get(1)?).map(|plan| ZeroPlan::Values(Box::new(plan)))
            } else if is(BOXED_PATHS) {
                zero_plan(args.first()?).map(|plan| ZeroPlan::Boxed(Box::new(plan)))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn type_args(path: &Path) -> Vec<&Type> {
    let Some(segment) = path.segments.last() else {
        return Vec::new();
    };
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
        &segment.arguments
    else {
        return Vec::new();
    };
    args.iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(type_) => Some(type_),
            _ => None,
        })
        .collect()
}

fn match_path(path: &Path, expect: &[&str]) -> bool {
    // `path` should not contain angle brackets, except for the last segment.
    if !path
        .segments
        .iter()
        .rev()
        .skip(1)
        .all(|segment| segment.arguments.is_none())
    {
        return false;
    }

    fn segments(path: &Path) -> impl Iterator<Item = &Ident> {
        path.segments.iter().map(|segment| &segment.ident)
    }

    (path.leading_colon.is_none() && segments(path).eq(expect.last().into_iter().copied()))
        || segments(path).eq(expect.iter().copied())
}
