//! Reading classes out of Rust source with syn

use quote::ToTokens;

use super::model::{ClassKind, DiagramModel, Field, Method, Relation, Visibility};

/// Traits too common to be worth an arrow
const SKIPPED_TRAITS: &[&str] = &[
    "Debug",
    "Clone",
    "Copy",
    "Default",
    "Display",
    "From",
    "Into",
    "PartialEq",
    "Eq",
    "PartialOrd",
    "Ord",
    "Hash",
    "Send",
    "Sync",
    "Sized",
    "Drop",
    "Deref",
    "DerefMut",
    "AsRef",
    "Error",
    "Serialize",
    "Deserialize",
];

/// Render tokens the way they are usually written
pub fn tidy_tokens(tokens: &impl ToTokens) -> String {
    let raw = tokens.to_token_stream().to_string();
    let mut out = raw
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace("[ ", "[")
        .replace(" ]", "]")
        .replace(" ;", ";");
    // `& 'a T` becomes `&'a T`
    out = out.replace("' ", "'");
    out
}

/// Last path segment of a type, without generics
fn type_name(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        syn::Type::Reference(reference) => type_name(&reference.elem),
        _ => None,
    }
}

fn path_name(path: &syn::Path) -> Option<String> {
    path.segments.last().map(|s| s.ident.to_string())
}

fn signature(sig: &syn::Signature, visibility: Visibility, is_abstract: bool) -> Method {
    let mut is_static = true;
    let mut args = Vec::new();
    for input in &sig.inputs {
        match input {
            syn::FnArg::Receiver(_) => is_static = false,
            syn::FnArg::Typed(arg) => {
                args.push(format!("{}: {}", tidy_tokens(&arg.pat), tidy_tokens(&arg.ty)));
            }
        }
    }
    let ret = match &sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => Some(tidy_tokens(ty)),
    };
    Method {
        visibility,
        name: sig.ident.to_string(),
        args,
        ret,
        is_static,
        is_abstract,
    }
}

fn fields(fields: &syn::Fields) -> Vec<Field> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| Field {
            visibility: Visibility::from(&field.vis),
            name: field
                .ident
                .as_ref()
                .map_or_else(|| index.to_string(), ToString::to_string),
            ty: Some(tidy_tokens(&field.ty)),
        })
        .collect()
}

/// Parse one source file into `model`
///
/// # Errors
///
/// Returns the syn error if the source is not valid Rust
pub fn parse_source(source: &str, model: &mut DiagramModel) -> Result<(), syn::Error> {
    let file = syn::parse_file(source)?;
    collect_items(&file.items, model);
    Ok(())
}

/// `#[cfg(test)]`
fn is_test_only(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && matches!(&attr.meta, syn::Meta::List(list) if list.tokens.to_string() == "test")
    })
}

fn attributes(item: &syn::Item) -> &[syn::Attribute] {
    match item {
        syn::Item::Struct(item) => &item.attrs,
        syn::Item::Enum(item) => &item.attrs,
        syn::Item::Trait(item) => &item.attrs,
        syn::Item::Impl(item) => &item.attrs,
        syn::Item::Mod(item) => &item.attrs,
        _ => &[],
    }
}

fn collect_items(items: &[syn::Item], model: &mut DiagramModel) {
    for item in items {
        if is_test_only(attributes(item)) {
            continue;
        }
        match item {
            syn::Item::Struct(item) => {
                model
                    .declare(&item.ident.to_string(), ClassKind::Struct)
                    .add_fields(fields(&item.fields));
            }
            syn::Item::Enum(item) => {
                let variants = item
                    .variants
                    .iter()
                    .map(|variant| Field {
                        visibility: Visibility::Public,
                        name: variant.ident.to_string(),
                        ty: match &variant.fields {
                            syn::Fields::Unit => None,
                            other => Some(tidy_tokens(other)),
                        },
                    })
                    .collect();
                model
                    .declare(&item.ident.to_string(), ClassKind::Enum)
                    .add_fields(variants);
            }
            syn::Item::Trait(item) => collect_trait(item, model),
            syn::Item::Impl(item) => collect_impl(item, model),
            syn::Item::Mod(item) => {
                if let Some((_, content)) = &item.content {
                    collect_items(content, model);
                }
            }
            _ => {}
        }
    }
}

fn collect_trait(item: &syn::ItemTrait, model: &mut DiagramModel) {
    let name = item.ident.to_string();
    let methods = item
        .items
        .iter()
        .filter_map(|trait_item| match trait_item {
            syn::TraitItem::Fn(f) => Some(signature(
                &f.sig,
                Visibility::Public,
                f.default.is_none(),
            )),
            _ => None,
        })
        .collect();
    model.declare(&name, ClassKind::Trait).add_methods(methods);

    for bound in &item.supertraits {
        if let syn::TypeParamBound::Trait(bound) = bound
            && let Some(super_trait) = path_name(&bound.path)
            && !SKIPPED_TRAITS.contains(&super_trait.as_str())
        {
            model.relate(Relation::Extends {
                trait_name: name.clone(),
                super_trait,
            });
        }
    }
}

fn collect_impl(item: &syn::ItemImpl, model: &mut DiagramModel) {
    let Some(ty) = type_name(&item.self_ty) else {
        return;
    };
    let trait_name = item
        .trait_
        .as_ref()
        .and_then(|(_, path, _)| path_name(path));

    if let Some(trait_name) = &trait_name
        && SKIPPED_TRAITS.contains(&trait_name.as_str())
    {
        return;
    }

    let methods: Vec<Method> = item
        .items
        .iter()
        .filter(|impl_item| match impl_item {
            syn::ImplItem::Fn(f) => !is_test_only(&f.attrs),
            _ => true,
        })
        .filter_map(|impl_item| match impl_item {
            syn::ImplItem::Fn(f) => {
                let visibility = if trait_name.is_some() {
                    Visibility::Public
                } else {
                    Visibility::from(&f.vis)
                };
                Some(signature(&f.sig, visibility, false))
            }
            _ => None,
        })
        .collect();

    model.class_mut(&ty, ClassKind::Struct).add_methods(methods);

    if let Some(trait_name) = trait_name {
        model.relate(Relation::Implements { ty, trait_name });
    }
}
