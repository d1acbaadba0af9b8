//! `Record` Derive Macro
//!
//! * A record is a named-field struct whose fields map to dictionary entries.  Each field may carry
//!   a tag, `#[bencode("key,option,...")]`, which follows the field tag syntax of `bencode::record`.
//!
//! * Only externally visible fields (declared with any form of `pub`) take part in encoding and
//!   decoding.  Fields tagged `"-"` are ignored, and invisible fields need not implement any
//!   trait.
//!
//! * We generate `Record`, `Serialize`, `Deserialize`, and `IsEmpty`.  `Deserialize` fills in a
//!   `Self::default()`, and so the struct must implement `Default`.  A record is empty when all of
//!   its visible fields are, including those tagged `"-"`, and so their types must implement
//!   `IsEmpty`.
//!
//! * An absent `Option` value is encoded as the zero value of the inner type.  This applies to
//!   `Option`s nested in `Option`, `Box`, `Vec`, `VecDeque`, arrays, and the values of `BTreeMap`
//!   and `HashMap`, but only when they are spelled out in the field type; type aliases hide them.
//!
//! * Generic structs are not supported, because the field layout is cached per type name.
//!

mod codegen;
mod record;

use proc_macro::TokenStream;
use syn::DeriveInput;

#[proc_macro_derive(Record, attributes(bencode))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(syn::parse_macro_input!(input as DeriveInput))
        .unwrap_or_else(|error| {
            let compile_errors = error.to_compile_error();
            quote::quote!(#compile_errors)
        })
        .into()
}
