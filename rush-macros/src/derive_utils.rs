use syn::punctuated::Punctuated;
use syn::{Attribute, Path, Token};

// 按末段比较，`Debug` 与 `std::fmt::Debug` 视为同一派生
fn last_ident(p: &Path) -> Option<String> {
    p.segments.last().map(|s| s.ident.to_string())
}

// 结构体上已有的全部派生
fn declared_derives(attrs: &[Attribute]) -> Vec<Path> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .collect()
}

// 补上缺失的派生；用户自己的 derive 属性保持原样
pub(crate) fn add_missing_derives(attrs: &mut Vec<Attribute>, wanted: Vec<Path>) {
    let declared: Vec<String> = declared_derives(attrs)
        .iter()
        .filter_map(last_ident)
        .collect();
    let missing: Vec<Path> = wanted
        .into_iter()
        .filter(|p| last_ident(p).is_none_or(|name| !declared.contains(&name)))
        .collect();
    if missing.is_empty() {
        return;
    }
    attrs.insert(0, syn::parse_quote!(#[derive(#(#missing),*)]));
}
