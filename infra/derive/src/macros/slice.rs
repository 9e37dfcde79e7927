use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

pub fn expand_slice(input: ItemStruct) -> TokenStream {
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "skc_slice does not support generics")
            .to_compile_error();
    }

    let wrapper_ident = &input.ident;
    let vis = &input.vis;
    let fields = &input.fields;
    let attrs = &input.attrs;
    let semi = input.semi_token;

    let inner_ident = format_ident!("{wrapper_ident}Inner");
    let slice_name = slice_name(&wrapper_ident.to_string());

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #inner_ident #fields #semi

        #[derive(Debug, Clone)]
        #vis struct #wrapper_ident {
            inner: std::sync::Arc<#inner_ident>,
        }

        impl #wrapper_ident {
            /// Registry name of this slice.
            pub const NAME: &'static str = #slice_name;

            #[must_use]
            pub fn new(inner: #inner_ident) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }

            /// Wraps the handle for registration in the API state.
            #[must_use]
            pub fn into_initialized(self) -> ::skc_kernel::domain::registry::InitializedSlice {
                ::skc_kernel::domain::registry::InitializedSlice::new(self)
            }
        }

        impl std::ops::Deref for #wrapper_ident {
            type Target = #inner_ident;
            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::skc_kernel::domain::registry::FeatureSlice for #wrapper_ident {
            fn name(&self) -> &'static str {
                Self::NAME
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
}

fn slice_name(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.char_indices() {
        if ch.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}
