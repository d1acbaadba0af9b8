use proc_macro2::TokenStream;
use syn::ext::IdentExt;
use syn::{DeriveInput, Error};

use crate::codegen::{Codegen, CodegenField, ZeroPlan};

pub(crate) fn derive(input: DeriveInput) -> Result<TokenStream, Error> {
    let codegen = Codegen::parse(&input)?;
    let impl_record = codegen.gen_impl_record();
    let impl_serde = codegen.gen_impl_serde();
    let impl_is_empty = codegen.gen_impl_is_empty();
    Ok(quote::quote! {
        #impl_record
        #impl_serde
        #impl_is_empty
    })
}

impl Codegen<'_> {
    fn gen_impl_record(&self) -> TokenStream {
        let type_name = self.ident;
        let type_name_str = type_name.unraw().to_string();

        let slots = self.fields.iter().map(|field| {
            let name = field.name();
            let tag = &field.tag;
            let visible = field.visible;
            quote::quote! {
                ::bencode::record::Slot { name: #name, tag: #tag, visible: #visible },
            }
        });

        let serialize_arms = self.accessible_fields().map(|(i, field)| {
            let ident = field.ident;
            if let Some(plan) = &field.zero_plan {
                let plan = gen_zero_plan(plan);
                quote::quote! {
                    #i => __state.serialize_field(
                        __key,
                        &::bencode::record::ZeroFilled::<_, #plan>::new(&self.#ident),
                    ),
                }
            } else {
                quote::quote! {
                    #i => __state.serialize_field(__key, &self.#ident),
                }
            }
        });

        let is_empty_arms = self.accessible_fields().map(|(i, field)| {
            let ident = field.ident;
            quote::quote! {
                #i => ::bencode::IsEmpty::is_empty(&self.#ident),
            }
        });

        let deserialize_arms = self.accessible_fields().map(|(i, field)| {
            let ident = field.ident;
            quote::quote! {
                #i => ::bencode::record::deserialize_slot(__map, &mut self.#ident, __ignore_type_error),
            }
        });

        quote::quote! {
            impl ::bencode::record::Record for #type_name {
                const NAME: &'static str =
                    ::std::concat!(::std::module_path!(), "::", #type_name_str);
                const SLOTS: &'static [::bencode::record::Slot] = &[#(#slots)*];

                fn serialize_slot<__S>(
                    &self,
                    __slot: usize,
                    __key: &'static str,
                    __state: &mut __S,
                ) -> ::std::result::Result<(), __S::Error>
                where
                    __S: ::bencode::private::serde::ser::SerializeStruct,
                {
                    match __slot {
                        #(#serialize_arms)*
                        _ => ::std::result::Result::Err(
                            <__S::Error as ::bencode::private::serde::ser::Error>::custom(
                                ::bencode::record::no_such_slot(Self::NAME, __slot),
                            ),
                        ),
                    }
                }

                fn is_slot_empty(&self, __slot: usize) -> bool {
                    match __slot {
                        #(#is_empty_arms)*
                        _ => false,
                    }
                }

                fn deserialize_slot<'de, __A>(
                    &mut self,
                    __slot: usize,
                    __ignore_type_error: bool,
                    __map: &mut __A,
                ) -> ::std::result::Result<(), __A::Error>
                where
                    __A: ::bencode::private::serde::de::MapAccess<'de>,
                {
                    match __slot {
                        #(#deserialize_arms)*
                        _ => ::std::result::Result::Err(
                            <__A::Error as ::bencode::private::serde::de::Error>::custom(
                                ::bencode::record::no_such_slot(Self::NAME, __slot),
                            ),
                        ),
                    }
                }
            }
        }
    }

    fn gen_impl_serde(&self) -> TokenStream {
        let type_name = self.ident;
        quote::quote! {
            impl ::bencode::private::serde::Serialize for #type_name {
                fn serialize<__S>(
                    &self,
                    __serializer: __S,
                ) -> ::std::result::Result<__S::Ok, __S::Error>
                where
                    __S: ::bencode::private::serde::Serializer,
                {
                    ::bencode::record::serialize(self, __serializer)
                }
            }

            impl<'de> ::bencode::private::serde::Deserialize<'de> for #type_name {
                fn deserialize<__D>(__deserializer: __D) -> ::std::result::Result<Self, __D::Error>
                where
                    __D: ::bencode::private::serde::Deserializer<'de>,
                {
                    ::bencode::record::deserialize(__deserializer)
                }

                fn deserialize_in_place<__D>(
                    __deserializer: __D,
                    __place: &mut Self,
                ) -> ::std::result::Result<(), __D::Error>
                where
                    __D: ::bencode::private::serde::Deserializer<'de>,
                {
                    ::bencode::record::deserialize_in_place(__deserializer, __place)
                }
            }
        }
    }

    // A record is empty when all of its visible fields are, including those tagged `"-"`.
    fn gen_impl_is_empty(&self) -> TokenStream {
        let type_name = self.ident;
        let idents = self
            .fields
            .iter()
            .filter(|field| field.visible)
            .map(|field| field.ident);
        quote::quote! {
            impl ::bencode::IsEmpty for #type_name {
                fn is_empty(&self) -> bool {
                    true #(&& ::bencode::IsEmpty::is_empty(&self.#idents))*
                }
            }
        }
    }

    /// Returns accessible fields, paired with their slot indexes.
    fn accessible_fields(&self) -> impl Iterator<Item = (usize, &CodegenField<'_>)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_accessible())
    }
}

fn gen_zero_plan(plan: &ZeroPlan) -> TokenStream {
    match plan {
        ZeroPlan::AsIs => quote::quote!(::bencode::record::AsIs),
        ZeroPlan::OrZero(inner) => {
            let inner = gen_zero_plan(inner);
            quote::quote!(::bencode::record::OrZero<#inner>)
        }
        ZeroPlan::Items(inner) => {
            let inner = gen_zero_plan(inner);
            quote::quote!(::bencode::record::Items<#inner>)
        }
        ZeroPlan::Values(inner) => {
            let inner = gen_zero_plan(inner);
            quote::quote!(::bencode::record::Values<#inner>)
        }
        ZeroPlan::Boxed(inner) => {
            let inner = gen_zero_plan(inner);
            quote::quote!(::bencode::record::Boxed<#inner>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ok(input: DeriveInput, expect: TokenStream) {
        assert_eq!(derive(input).unwrap().to_string(), expect.to_string());
    }

    #[test]
    fn test_derive() {
        test_ok(
            syn::parse_quote! {
                struct Foo {
                    #[bencode(",omitempty")]
                    pub x: u8,
                    pub r#loop: Option<String>,
                    #[bencode("-")]
                    pub ignored: u8,
                    hidden: u8,
                }
            },
            quote::quote! {
                impl ::bencode::record::Record for Foo {
                    const NAME: &'static str = ::std::concat!(::std::module_path!(), "::", "Foo");
                    const SLOTS: &'static [::bencode::record::Slot] = &[
                        ::bencode::record::Slot { name: "x", tag: ",omitempty", visible: true },
                        ::bencode::record::Slot { name: "loop", tag: "", visible: true },
                        ::bencode::record::Slot { name: "ignored", tag: "-", visible: true },
                        ::bencode::record::Slot { name: "hidden", tag: "", visible: false },
                    ];

                    fn serialize_slot<__S>(
                        &self,
                        __slot: usize,
                        __key: &'static str,
                        __state: &mut __S,
                    ) -> ::std::result::Result<(), __S::Error>
                    where
                        __S: ::bencode::private::serde::ser::SerializeStruct,
                    {
                        match __slot {
                            0usize => __state.serialize_field(__key, &self.x),
                            1usize => __state.serialize_field(
                                __key,
                                &::bencode::record::ZeroFilled::<_, ::bencode::record::OrZero<::bencode::record::AsIs> >::new(&self.r#loop),
                            ),
                            _ => ::std::result::Result::Err(
                                <__S::Error as ::bencode::private::serde::ser::Error>::custom(
                                    ::bencode::record::no_such_slot(Self::NAME, __slot),
                                ),
                            ),
                        }
                    }

                    fn is_slot_empty(&self, __slot: usize) -> bool {
                        match __slot {
                            0usize => ::bencode::IsEmpty::is_empty(&self.x),
                            1usize => ::bencode::IsEmpty::is_empty(&self.r#loop),
                            _ => false,
                        }
                    }

                    fn deserialize_slot<'de, __A>(
                        &mut self,
                        __slot: usize,
                        __ignore_type_error: bool,
                        __map: &mut __A,
                    ) -> ::std::result::Result<(), __A::Error>
                    where
                        __A: ::bencode::private::serde::de::MapAccess<'de>,
                    {
                        match __slot {
                            0usize => ::bencode::record::deserialize_slot(
                                __map,
                                &mut self.x,
                                __ignore_type_error
                            ),
                            1usize => ::bencode::record::deserialize_slot(
                                __map,
                                &mut self.r#loop,
                                __ignore_type_error
                            ),
                            _ => ::std::result::Result::Err(
                                <__A::Error as ::bencode::private::serde::de::Error>::custom(
                                    ::bencode::record::no_such_slot(Self::NAME, __slot),
                                ),
                            ),
                        }
                    }
                }

                impl ::bencode::private::serde::Serialize for Foo {
                    fn serialize<__S>(
                        &self,
                        __serializer: __S,
                    ) -> ::std::result::Result<__S::Ok, __S::Error>
                    where
                        __S: ::bencode::private::serde::Serializer,
                    {
                        ::bencode::record::serialize(self, __serializer)
                    }
                }

                impl<'de> ::bencode::private::serde::Deserialize<'de> for Foo {
                    fn deserialize<__D>(__deserializer: __D) -> ::std::result::Result<Self, __D::Error>
                    where
                        __D: ::bencode::private::serde::Deserializer<'de>,
                    {
                        ::bencode::record::deserialize(__deserializer)
                    }

                    fn deserialize_in_place<__D>(
                        __deserializer: __D,
                        __place: &mut Self,
                    ) -> ::std::result::Result<(), __D::Error>
                    where
                        __D: ::bencode::private::serde::Deserializer<'de>,
                    {
                        ::bencode::record::deserialize_in_place(__deserializer, __place)
                    }
                }

                impl ::bencode::IsEmpty for Foo {
                    fn is_empty(&self) -> bool {
                        true && ::bencode::IsEmpty::is_empty(&self.x)
                            && ::bencode::IsEmpty::is_empty(&self.r#loop)
                            && ::bencode::IsEmpty::is_empty(&self.ignored)
                    }
                }
            },
        );
    }

    #[test]
    fn derive_error() {
        assert_eq!(
            derive(syn::parse_quote! { struct Foo<'a> { x: &'a str } })
                .unwrap_err()
                .to_string(),
            "generic records are not supported",
        );
    }
}
