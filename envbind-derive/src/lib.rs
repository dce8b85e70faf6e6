//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::FieldAttrs;

/// `EnvBind` derive macro
///
/// Implements `envbind::Record`, `envbind::Target` and `envbind::Nested` so
/// the struct can be passed to `envbind::get` or held by another record as a
/// `#[bind(nested)]` field.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[bind(env = "NAME,optional,base64,json")]`: Annotation read by the
///   default parser. Any identifier works as the key, so one field can carry
///   annotations for several parsers.
/// - `#[bind(nested)]`: The field is a record (or `Option`/`Box` of one) to recurse into.
///   `json` fields are recursed into without it when their type is a record.
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(EnvBind, attributes(bind))]
pub fn derive_envbind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if let Some(attr) = input.attrs.iter().find(|attr| attr.path().is_ident("bind")) {
        return Err(syn::Error::new_spanned(
            attr,
            "bind attributes are only supported on fields",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => return expand_impls(input, &[], &[], &[], &[]),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "EnvBind only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "EnvBind only supports structs",
            ));
        }
    };

    let mut descriptors = Vec::new();
    let mut target_arms = Vec::new();
    let mut structured_arms = Vec::new();
    let mut nested_arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "EnvBind requires named fields"));
        };
        let attrs = FieldAttrs::from_field(field)?;

        let name = field_ident.unraw().to_string();
        let keys = attrs.annotations.iter().map(|(key, _)| key);
        let values = attrs.annotations.iter().map(|(_, value)| value);
        descriptors.push(quote! {
            ::envbind::FieldDescriptor::new(#name, &[#((#keys, #values)),*])
        });

        if attrs.needs_target() {
            target_arms.push(quote! {
                #index => ::core::option::Option::Some(&mut self.#field_ident as &mut dyn ::envbind::Target),
            });
        }
        if attrs.needs_structured() {
            structured_arms.push(quote! {
                #index => ::core::option::Option::Some(&mut self.#field_ident as &mut dyn ::envbind::Structured),
            });
        }
        if attrs.nested {
            nested_arms.push(quote! {
                #index => ::core::option::Option::Some(::envbind::Nested::record_mut(&mut self.#field_ident)),
            });
        } else if attrs.needs_structured() {
            // Walked only when the field type turns out to be a record
            nested_arms.push(quote! {
                #index => {
                    #[allow(unused_imports)]
                    use ::envbind::__private::{ViaNested as _, ViaPlain as _};
                    (&mut ::envbind::__private::MaybeNested::new(&mut self.#field_ident)).nested_record()
                }
            });
        }
    }

    expand_impls(
        input,
        &descriptors,
        &target_arms,
        &structured_arms,
        &nested_arms,
    )
}

fn expand_impls(
    input: &DeriveInput,
    descriptors: &[TokenStream2],
    target_arms: &[TokenStream2],
    structured_arms: &[TokenStream2],
    nested_arms: &[TokenStream2],
) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Accessors with no arms fall back to the trait's default
    let target_fn = (!target_arms.is_empty()).then(|| {
        quote! {
            fn target(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::envbind::Target> {
                match index {
                    #(#target_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    });
    let structured_fn = (!structured_arms.is_empty()).then(|| {
        quote! {
            fn structured(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::envbind::Structured> {
                match index {
                    #(#structured_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    });
    let nested_fn = (!nested_arms.is_empty()).then(|| {
        quote! {
            fn nested(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::envbind::Record> {
                match index {
                    #(#nested_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::envbind::Record for #struct_name #ty_generics #where_clause {
            fn fields(&self) -> &'static [::envbind::FieldDescriptor] {
                const FIELDS: &[::envbind::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }

            #target_fn
            #structured_fn
            #nested_fn
        }

        impl #impl_generics ::envbind::Target for #struct_name #ty_generics #where_clause {
            fn kind(&self) -> ::envbind::Kind {
                ::envbind::Kind::Struct
            }

            fn coerce(&mut self, _key: &str, _raw: &[u8]) -> ::core::result::Result<(), ::envbind::Error> {
                ::core::result::Result::Err(::envbind::Error::cannot_set_kind(::envbind::Kind::Struct))
            }

            fn as_record(&mut self) -> ::core::option::Option<&mut dyn ::envbind::Record> {
                ::core::option::Option::Some(self)
            }
        }

        impl #impl_generics ::envbind::Nested for #struct_name #ty_generics #where_clause {
            fn record_mut(&mut self) -> &mut dyn ::envbind::Record {
                self
            }
        }
    })
}
