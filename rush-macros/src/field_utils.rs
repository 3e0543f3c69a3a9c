use syn::{Attribute, Field, FieldsNamed, Meta, Token, Type, punctuated::Punctuated};

pub(crate) fn has_field_named(named: &Punctuated<Field, Token![,]>, name: &str) -> bool {
    named
        .iter()
        .any(|f| f.ident.as_ref().map(|i| i == name).unwrap_or(false))
}

/// 确保具名字段结构体包含所需字段
/// - required: (字段名, 字段类型) 列表，缺失的按给定顺序追加到末尾，已有字段保持原位
pub(crate) fn ensure_required_fields(fields_named: &mut FieldsNamed, required: &[(&str, &Type)]) {
    for (name, ty) in required.iter() {
        if !has_field_named(&fields_named.named, name) {
            let ident: syn::Ident = syn::parse_str(name).expect("valid field ident");
            let field: Field = syn::parse_quote! { #ident: #ty };
            fields_named.named.push(field);
        }
    }
}

/// 类型路径末段是否为 `Listener`（如 `Listener`、`rush_core::Listener`）
pub(crate) fn is_listener_type(ty: &Type) -> bool {
    match ty {
        Type::Path(tp) if tp.qself.is_none() => tp
            .path
            .segments
            .last()
            .map(|s| s.ident == "Listener" && s.arguments.is_none())
            .unwrap_or(false),
        _ => false,
    }
}

/// 取出并移除名为 `name` 的辅助属性（属性宏不会自动剥离字段上的辅助属性）
pub(crate) fn take_helper_attrs(attrs: &mut Vec<Attribute>, name: &str) -> Vec<Meta> {
    let mut taken = Vec::new();
    attrs.retain(|attr| {
        if attr.path().is_ident(name) {
            taken.push(attr.meta.clone());
            false
        } else {
            true
        }
    });
    taken
}
