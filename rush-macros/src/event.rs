use crate::derive_utils::add_missing_derives;
use crate::field_utils::{ensure_required_fields, has_field_named, take_helper_attrs};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Ident, Item, Meta, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[event] 宏实现
/// - 为具名字段结构体实现 `::rush_core::Event`
/// - 字段上的 `#[parent]` 声明父类型（可多个，按声明顺序）
/// - `stoppable`：缺失时追加 `stopped: StopFlag` 字段并实现 `StoppableEvent`；
///   `stoppable = field` 则委托给该字段（通常是父事件）
/// - `cancellable` / `cancellable = field` 同理，对应 `cancelled: CancelFlag`
/// - `debug` 默认 `true`（派生 Debug），为 `false` 时不派生
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[event] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "#[event] only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    // 收集父类型字段并剥离 #[parent]
    let mut parents: Vec<(Ident, Type)> = Vec::new();
    for field in fields_named.named.iter_mut() {
        let metas = take_helper_attrs(&mut field.attrs, "parent");
        if let (Some(meta), Some(ident)) = (metas.first(), field.ident.clone()) {
            if !matches!(meta, Meta::Path(_)) {
                return syn::Error::new(meta.span(), "expected bare #[parent]")
                    .to_compile_error()
                    .into();
            }
            parents.push((ident, field.ty.clone()));
        }
    }

    // 补齐标志字段，并校验委托字段存在
    let stop_ty: Type = syn::parse_quote! { ::rush_core::StopFlag };
    let cancel_ty: Type = syn::parse_quote! { ::rush_core::CancelFlag };
    let mut required: Vec<(&str, &Type)> = Vec::new();
    for (source, own_field, own_ty) in [
        (&cfg.stoppable, "stopped", &stop_ty),
        (&cfg.cancellable, "cancelled", &cancel_ty),
    ] {
        match source {
            Some(FlagSource::Own) => required.push((own_field, own_ty)),
            Some(FlagSource::Delegate(field)) => {
                if !has_field_named(&fields_named.named, &field.to_string()) {
                    return syn::Error::new(field.span(), "no such field to delegate the flag to")
                        .to_compile_error()
                        .into();
                }
            }
            None => {}
        }
    }
    ensure_required_fields(fields_named, &required);

    let mut derives: Vec<syn::Path> = Vec::new();
    if cfg.derive_debug.unwrap_or(true) {
        derives.push(syn::parse_quote!(Debug));
    }
    add_missing_derives(&mut st.attrs, derives);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let hierarchy_fn = if parents.is_empty() {
        quote! {}
    } else {
        let extends = parents.iter().map(|(field, ty)| {
            quote! { h.extends::<#ty>(|e| &mut e.#field); }
        });
        quote! {
            fn hierarchy(h: &mut ::rush_core::Hierarchy<'_, Self>) {
                #(#extends)*
            }
        }
    };

    let stop_cap = cfg.stoppable.as_ref().map(|_| {
        quote! {
            fn as_stoppable(&self) -> ::std::option::Option<&dyn ::rush_core::StoppableEvent> {
                ::std::option::Option::Some(self)
            }

            fn as_stoppable_mut(
                &mut self,
            ) -> ::std::option::Option<&mut dyn ::rush_core::StoppableEvent> {
                ::std::option::Option::Some(self)
            }
        }
    });
    let cancel_cap = cfg.cancellable.as_ref().map(|_| {
        quote! {
            fn as_cancellable(&self) -> ::std::option::Option<&dyn ::rush_core::CancellableEvent> {
                ::std::option::Option::Some(self)
            }

            fn as_cancellable_mut(
                &mut self,
            ) -> ::std::option::Option<&mut dyn ::rush_core::CancellableEvent> {
                ::std::option::Option::Some(self)
            }
        }
    });

    let stop_impl = cfg.stoppable.as_ref().map(|source| {
        let (query, set) = match source {
            FlagSource::Own => (
                quote! { self.stopped.is_set() },
                quote! { self.stopped.set() },
            ),
            FlagSource::Delegate(f) => (
                quote! { ::rush_core::StoppableEvent::is_stopped(&self.#f) },
                quote! { ::rush_core::StoppableEvent::stop(&mut self.#f) },
            ),
        };
        quote! {
            impl #impl_generics ::rush_core::StoppableEvent for #ident #ty_generics #where_clause {
                fn is_stopped(&self) -> bool { #query }

                fn stop(&mut self) { #set }
            }
        }
    });

    let cancel_impl = cfg.cancellable.as_ref().map(|source| {
        let (query, set) = match source {
            FlagSource::Own => (
                quote! { self.cancelled.is_set() },
                quote! { self.cancelled.set() },
            ),
            FlagSource::Delegate(f) => (
                quote! { ::rush_core::CancellableEvent::is_cancelled(&self.#f) },
                quote! { ::rush_core::CancellableEvent::cancel(&mut self.#f) },
            ),
        };
        quote! {
            impl #impl_generics ::rush_core::CancellableEvent for #ident #ty_generics #where_clause {
                fn is_cancelled(&self) -> bool { #query }

                fn cancel(&mut self) { #set }
            }
        }
    });

    let expanded = quote! {
        #st

        impl #impl_generics ::rush_core::Event for #ident #ty_generics #where_clause {
            #hierarchy_fn
            #stop_cap
            #cancel_cap
        }

        #stop_impl
        #cancel_impl
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

enum FlagSource {
    Own,
    Delegate(Ident),
}

struct EventAttrConfig {
    stoppable: Option<FlagSource>,
    cancellable: Option<FlagSource>,
    derive_debug: Option<bool>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = EventAttrConfig {
            stoppable: None,
            cancellable: None,
            derive_debug: None,
        };

        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<EventAttrElem, Token![,]> =
            Punctuated::<EventAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                EventAttrElem::Stoppable(key, source) => {
                    if cfg.stoppable.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'stoppable' in attribute",
                        ));
                    }
                    cfg.stoppable = Some(source);
                }
                EventAttrElem::Cancellable(key, source) => {
                    if cfg.cancellable.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'cancellable' in attribute",
                        ));
                    }
                    cfg.cancellable = Some(source);
                }
                EventAttrElem::Debug(key, b) => {
                    if cfg.derive_debug.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'debug' in attribute",
                        ));
                    }
                    cfg.derive_debug = Some(b);
                }
            }
        }

        Ok(cfg)
    }
}

enum EventAttrElem {
    Stoppable(Ident, FlagSource),
    Cancellable(Ident, FlagSource),
    Debug(Ident, bool),
}

impl Parse for EventAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        if key == "stoppable" || key == "cancellable" {
            let source = if input.peek(Token![=]) {
                let _eq: Token![=] = input.parse()?;
                FlagSource::Delegate(input.parse()?)
            } else {
                FlagSource::Own
            };
            if key == "stoppable" {
                Ok(EventAttrElem::Stoppable(key, source))
            } else {
                Ok(EventAttrElem::Cancellable(key, source))
            }
        } else if key == "debug" {
            let _eq: Token![=] = input.parse()?;
            let expr: syn::Expr = input.parse()?;
            match expr {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => Ok(EventAttrElem::Debug(key, b.value())),
                other => Err(syn::Error::new(
                    other.span(),
                    "expected boolean literal for 'debug'",
                )),
            }
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'stoppable', 'cancellable' or 'debug'",
            ))
        }
    }
}
