use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, GenericArgument, Ident, Lit,
    PathArguments, Type, Variant,
};

const PUBLIC_ATTR: &str = "public";
const DEFAULT_PUBLIC_MESSAGE: &str = "internal error";

struct VariantMeta {
    ident: Ident,
    source_ty: Option<Type>,
    source_field: Option<Ident>,
    has_context: bool,
    public: Option<Expr>,
    cfg_attrs: Vec<Attribute>,
}

pub fn expand_derive(mut input: DeriveInput) -> TokenStream {
    let name = input.ident.clone();
    let trait_name = format_ident!("{}Ext", name);

    let Data::Enum(data) = &mut input.data else {
        return syn::Error::new_spanned(&name, "skc_error can only be applied to enums")
            .to_compile_error();
    };

    // `#[public]` is consumed here; it must not reach `thiserror`.
    let variants: Vec<VariantMeta> =
        match data.variants.iter_mut().map(parse_variant).collect() {
            Ok(v) => v,
            Err(err) => return err,
        };
    if let Some(err) = variants_error(&variants) {
        return err;
    }

    let derived_traits = derived_trait_names(&input.attrs);
    let mut derive_tokens = Vec::new();
    if !derived_traits.contains("Debug") {
        derive_tokens.push(quote! { Debug });
    }
    if !derived_traits.contains("Error") {
        derive_tokens.push(quote! { ::thiserror::Error });
    }
    let extra_derives = if derive_tokens.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#derive_tokens),*)] }
    };

    let context_impl = generate_context_trait(&name, &trait_name, &variants);
    let from_impls = variants.iter().filter_map(|v| generate_from_impl(&name, &trait_name, v));
    let internal_impls = generate_internal_impls(&name, &variants);
    let labels = generate_labels(&name, &variants);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #extra_derives
        #input

        #context_impl
        #(#from_impls)*
        #internal_impls
        #labels

        #[allow(dead_code, clippy::ref_option)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn parse_variant(v: &mut Variant) -> Result<VariantMeta, TokenStream> {
    let public = take_public_attr(&mut v.attrs)?;

    let Fields::Named(fields) = &v.fields else {
        return Err(syn::Error::new_spanned(
            &v.ident,
            "skc_error requires named fields for source/context handling",
        )
        .to_compile_error());
    };

    let has_context = find_context_field(fields)?;
    let source = fields.named.iter().find(|field| {
        field.ident.as_ref().is_some_and(|ident| ident == "source")
            || field_has_attr(field, "source")
            || field_has_attr(field, "from")
    });

    Ok(VariantMeta {
        ident: v.ident.clone(),
        source_ty: source.map(|field| field.ty.clone()),
        source_field: source.and_then(|field| field.ident.clone()),
        has_context,
        public,
        cfg_attrs: v.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect(),
    })
}

fn take_public_attr(attrs: &mut Vec<Attribute>) -> Result<Option<Expr>, TokenStream> {
    let mut public = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident(PUBLIC_ATTR)) {
        if public.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[public] attribute")
                .to_compile_error());
        }
        let name_value = attr.meta.require_name_value().map_err(|e| e.to_compile_error())?;
        match &name_value.value {
            Expr::Lit(ExprLit { lit: Lit::Str(_), .. }) | Expr::Path(_) => {
                public = Some(name_value.value.clone());
            },
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "#[public] expects a string literal or a `&'static str` constant",
                )
                .to_compile_error());
            },
        }
    }

    attrs.retain(|attr| !attr.path().is_ident(PUBLIC_ATTR));
    Ok(public)
}

fn find_context_field(fields: &syn::FieldsNamed) -> Result<bool, TokenStream> {
    let Some(field) =
        fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|ident| ident == "context"))
    else {
        return Ok(false);
    };

    if is_context_type(&field.ty) {
        Ok(true)
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>")
            .to_compile_error())
    }
}

fn generate_context_trait(name: &Ident, trait_name: &Ident, variants: &[VariantMeta]) -> TokenStream {
    let context_arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = &v.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
    });

    quote! {
        pub trait #trait_name<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #trait_name<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        #( #context_arms )*
                        _ => {}
                    }
                    e
                })
            }
        }
    }
}

fn generate_from_impl(name: &Ident, trait_name: &Ident, v: &VariantMeta) -> Option<TokenStream> {
    if v.ident == "Internal" {
        return None;
    }
    let source_ty = v.source_ty.as_ref()?;
    let source_field = v.source_field.as_ref()?;
    let v_ident = &v.ident;
    let cfg_attrs = &v.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#source_ty> for #name {
            #[inline]
            fn from(#source_field: #source_ty) -> Self { Self::#v_ident { #source_field, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #trait_name<T> for std::result::Result<T, #source_ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#source_field| #name::#v_ident { #source_field, context: Some(context.into()) })
            }
        }
    })
}

fn generate_internal_impls(name: &Ident, variants: &[VariantMeta]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == "Internal") else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn generate_labels(name: &Ident, variants: &[VariantMeta]) -> TokenStream {
    let kind_arms = variants.iter().map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = &v.ident;
        let kind = snake_case(ident);
        quote! { #(#cfg_attrs)* Self::#ident { .. } => #kind, }
    });

    let public_arms = variants.iter().map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = &v.ident;
        let message = v
            .public
            .as_ref()
            .map_or_else(|| quote! { #DEFAULT_PUBLIC_MESSAGE }, |expr| quote! { #expr });
        quote! { #(#cfg_attrs)* Self::#ident { .. } => #message, }
    });

    quote! {
        #[automatically_derived]
        impl #name {
            /// Snake-case name of the variant, for structured log fields.
            #[must_use]
            pub const fn kind(&self) -> &'static str {
                match self { #(#kind_arms)* }
            }

            /// Message that may be shown to untrusted callers.
            #[must_use]
            pub const fn public_message(&self) -> &'static str {
                match self { #(#public_arms)* }
            }
        }
    }
}

fn snake_case(ident: &Ident) -> String {
    let raw = ident.to_string();
    let mut out = String::with_capacity(raw.len() + 4);
    for (i, ch) in raw.char_indices() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn field_has_attr(field: &syn::Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn derived_trait_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(seg) = meta.path.segments.last() {
                traits.insert(seg.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}

fn variants_error(variants: &[VariantMeta]) -> Option<TokenStream> {
    let mut seen_sources = FxHashSet::default();

    for v in variants {
        let Some(source_ty) = &v.source_ty else { continue };

        if !v.has_context {
            return Some(
                syn::Error::new_spanned(
                    &v.ident,
                    "skc_error requires `context: Option<Cow<'static, str>>` for variants with a source",
                )
                .to_compile_error(),
            );
        }

        let key = quote!(#source_ty).to_string();
        if v.ident != "Internal" && !seen_sources.insert(key) {
            return Some(
                syn::Error::new_spanned(
                    source_ty,
                    "source type is already wrapped by another variant; use a message field instead",
                )
                .to_compile_error(),
            );
        }
    }
    None
}

fn is_context_type(ty: &Type) -> bool {
    let Some(Type::Path(inner)) = single_generic(ty, "Option") else {
        return false;
    };
    let Some(cow) = inner.path.segments.last() else {
        return false;
    };
    if cow.ident != "Cow" {
        return false;
    }
    let PathArguments::AngleBracketed(args) = &cow.arguments else {
        return false;
    };

    let mut args = args.args.iter();
    matches!(args.next(), Some(GenericArgument::Lifetime(lt)) if lt.ident == "static")
        && matches!(args.next(), Some(GenericArgument::Type(Type::Path(p))) if p.path.is_ident("str"))
}

fn single_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
