use crate::field_utils::{is_listener_type, take_helper_attrs};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, Member, Meta, parse_macro_input};

/// #[subscriber] 宏实现
/// - 为结构体实现 `::rush_core::Subscriber`，按声明顺序枚举监听器成员
/// - 类型为 `Listener` 的字段自动收集；`#[listener]` 收集其它容器
///   （`Option<Listener>`、`Vec<Listener>` 等 `ListenerSource`）；`#[listener(skip)]` 排除
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if let Some(first) = proc_macro2::TokenStream::from(attr).into_iter().next() {
        return syn::Error::new(first.span(), "#[subscriber] takes no arguments")
            .to_compile_error()
            .into();
    }
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[subscriber] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let mut members: Vec<(Member, String)> = Vec::new();
    for (index, field) in st.fields.iter_mut().enumerate() {
        let metas = take_helper_attrs(&mut field.attrs, "listener");
        let mut include = is_listener_type(&field.ty);
        for meta in metas.iter() {
            match parse_listener_attr(meta) {
                Ok(ListenerAttr::Include) => include = true,
                Ok(ListenerAttr::Skip) => {
                    include = false;
                    break;
                }
                Err(err) => return err.to_compile_error().into(),
            }
        }
        if !include {
            continue;
        }

        let member = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (Member::Unnamed(index.into()), index.to_string()),
        };
        members.push(member);
    }

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let collects = members.iter().map(|(member, name)| {
        quote! {
            ::rush_core::ListenerSource::collect_listeners(
                &self.#member,
                __subscriber,
                #name,
                &mut __out,
            )?;
        }
    });

    let expanded = quote! {
        #st

        impl #impl_generics ::rush_core::Subscriber for #ident #ty_generics #where_clause {
            fn listeners(&self) -> ::rush_core::BusResult<::std::vec::Vec<::rush_core::Listener>> {
                #[allow(unused_variables)]
                let __subscriber = ::std::any::type_name::<Self>();
                #[allow(unused_mut)]
                let mut __out = ::std::vec::Vec::new();
                #(#collects)*
                ::std::result::Result::Ok(__out)
            }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

enum ListenerAttr {
    Include,
    Skip,
}

fn parse_listener_attr(meta: &Meta) -> syn::Result<ListenerAttr> {
    match meta {
        Meta::Path(_) => Ok(ListenerAttr::Include),
        Meta::List(list) => {
            let key: syn::Ident = list.parse_args()?;
            if key == "skip" {
                Ok(ListenerAttr::Skip)
            } else {
                Err(syn::Error::new(
                    key.span(),
                    "unknown key in #[listener(...)]; expected 'skip'",
                ))
            }
        }
        other => Err(syn::Error::new(
            other.span(),
            "expected #[listener] or #[listener(skip)]",
        )),
    }
}
