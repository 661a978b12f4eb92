//! Procedural macros for capability definitions.
//!
//! `#[capability]` captures an annotated function's declared signature as a
//! `SignatureRecord` and pairs it with a JSON executor, while
//! `#[derive(Describe)]` lets user-defined types describe themselves as a
//! named leaf descriptor. Generated code resolves its paths through the
//! `capwire` facade crate, which must therefore be a dependency of any
//! crate using these macros.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{DeriveInput, FnArg, ItemFn, Pat, ReturnType, Type, parse_macro_input};

/// Marks a free function as a capability.
///
/// The function item is emitted unchanged, so calling it directly behaves
/// exactly as if it had not been annotated. Alongside it the macro emits:
///
/// - `<name>_signature()`, returning the captured `SignatureRecord` with
///   parameters in declaration order;
/// - `<name>_binding()`, pairing that signature with an executor that
///   decodes JSON arguments (object keyed by name, or positional array),
///   calls the function, and serializes its result;
/// - an inventory submission so
///   `CapabilityRegistry::install_discovered` can collect the capability
///   at startup.
///
/// Parameter types must implement `Describe` and `serde::Deserialize`; the
/// return type must implement `Describe` and `serde::Serialize`. Both sync
/// and async functions are supported.
///
/// ```ignore
/// #[capability]
/// fn add(a: i64, b: i64) -> i64 {
///     a + b
/// }
///
/// let registry = CapabilityRegistry::new();
/// registry.register_binding(add_binding());
/// ```
#[proc_macro_attribute]
pub fn capability(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let function = parse_macro_input!(item as ItemFn);
    match expand_capability(&function) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_capability(function: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let sig = &function.sig;

    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(syn::Error::new(
            sig.generics.span(),
            "#[capability] does not support generic functions",
        ));
    }
    if let Some(variadic) = &sig.variadic {
        return Err(syn::Error::new(
            variadic.span(),
            "#[capability] does not support variadic functions",
        ));
    }

    let ident = &sig.ident;
    let vis = &function.vis;
    let name = ident.to_string();

    let mut param_idents = Vec::new();
    let mut param_captures = Vec::new();
    let mut arg_decodes = Vec::new();
    for (index, input) in sig.inputs.iter().enumerate() {
        let pat_type = match input {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new(
                    receiver.span(),
                    "#[capability] supports free functions only, not methods",
                ));
            }
        };
        let Pat::Ident(pat_ident) = &*pat_type.pat else {
            return Err(syn::Error::new(
                pat_type.pat.span(),
                "#[capability] parameters must be plain identifiers",
            ));
        };
        if let Type::Reference(_) = &*pat_type.ty {
            return Err(syn::Error::new(
                pat_type.ty.span(),
                "#[capability] parameters must take owned types (`String`, not `&str`)",
            ));
        }

        let param_ident = &pat_ident.ident;
        let param_name = param_ident.to_string();
        let ty = &*pat_type.ty;

        param_captures.push(quote! {
            .param_with(#param_name, <#ty as ::capwire::primitives::Describe>::descriptor())
        });
        arg_decodes.push(quote! {
            let #param_ident: #ty = ::capwire::registry::decode_arg(
                #name,
                &__capwire_payload,
                #index,
                #param_name,
            )?;
        });
        param_idents.push(param_ident.clone());
    }

    let return_capture = match &sig.output {
        ReturnType::Default => quote! {
            .returns_with(<() as ::capwire::primitives::Describe>::descriptor())
        },
        ReturnType::Type(_, ty) => quote! {
            .returns_with(<#ty as ::capwire::primitives::Describe>::descriptor())
        },
    };

    let invoke = if sig.asyncness.is_some() {
        quote! { #ident(#(#param_idents),*).await }
    } else {
        quote! { #ident(#(#param_idents),*) }
    };

    let signature_fn = format_ident!("{}_signature", ident);
    let binding_fn = format_ident!("{}_binding", ident);
    let executor_fn = format_ident!("__capwire_execute_{}", ident);
    let signature_doc = format!("Returns the captured signature of [`{name}`].");
    let binding_doc = format!("Returns the registry binding for [`{name}`].");

    Ok(quote! {
        #function

        #[doc = #signature_doc]
        #[must_use]
        #vis fn #signature_fn() -> ::capwire::primitives::SignatureRecord {
            ::capwire::primitives::SignatureRecord::builder(#name)
                #(#param_captures)*
                #return_capture
                .build()
        }

        #[doc(hidden)]
        #[allow(unused_variables)]
        fn #executor_fn(
            __capwire_payload: ::capwire::__private::serde_json::Value,
        ) -> ::capwire::registry::CapabilityFuture {
            ::std::boxed::Box::pin(async move {
                #(#arg_decodes)*
                let __capwire_output = #invoke;
                ::capwire::registry::encode_output(#name, __capwire_output)
            })
        }

        #[doc = #binding_doc]
        #[must_use]
        #vis fn #binding_fn() -> ::capwire::registry::CapabilityBinding {
            ::capwire::registry::CapabilityBinding::new(#signature_fn(), #executor_fn)
        }

        ::capwire::__private::inventory::submit! {
            ::capwire::registry::DiscoveredCapability::new(#signature_fn, #executor_fn)
        }
    })
}

/// Derives `Describe` for a user-defined type.
///
/// The type describes itself as a named leaf descriptor carrying its
/// identifier, the same way a user-defined class name appears in an
/// annotation. Fields and variants are not inspected.
#[proc_macro_derive(Describe)]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    if !input.generics.params.is_empty() {
        return syn::Error::new(
            input.generics.span(),
            "#[derive(Describe)] does not support generic types",
        )
        .to_compile_error()
        .into();
    }

    let ident = &input.ident;
    let name = ident.to_string();
    let expanded = quote! {
        impl ::capwire::primitives::Describe for #ident {
            fn descriptor() -> ::capwire::primitives::TypeDescriptor {
                ::capwire::primitives::TypeDescriptor::named(#name)
            }
        }
    };
    expanded.into()
}
