use super::{qualified, short_name, ScanResult, TypeDecl};
use crate::directive::{split_doc, Directive};
use crate::error::TypeRegError;
use crate::registry::{Field, Func, Method, Variable};
use heck::ToKebabCase;
use quote::ToTokens;
use std::fs;
use std::path::Path;
use syn::{Expr, Fields, ImplItem, Item, Lit, Meta};

/// Parse one file and append its declarations to `result`.
pub(crate) fn scan_file(
    path: &Path,
    module: &[String],
    result: &mut ScanResult,
) -> Result<(), TypeRegError> {
    let content = fs::read_to_string(path)?;
    // Never re-scan a previous run's output: the generated setters would
    // come back as declared methods and registration statics as variables.
    if content
        .lines()
        .next()
        .is_some_and(|line| line.starts_with("//") && line.contains("DO NOT EDIT"))
    {
        tracing::debug!(file = %path.display(), "generated file skipped");
        return Ok(());
    }
    let ast = syn::parse_file(&content).map_err(|e| TypeRegError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    scan_items(&ast.items, module, result);
    Ok(())
}

fn scan_items(items: &[Item], module: &[String], result: &mut ScanResult) {
    for item in items {
        match item {
            Item::Struct(s) => scan_struct(s, module, result),
            Item::Impl(i) => scan_impl(i, result),
            Item::Fn(f) => scan_fn(f, module, result),
            Item::Static(s) => {
                let (doc, directives) = doc_and_directives(&s.attrs);
                result.vars.push(Variable {
                    name: qualified(&result.crate_name, module, &s.ident.to_string()),
                    doc,
                    directives,
                    local_type: type_string(&s.ty),
                    ..Default::default()
                });
            }
            Item::Const(c) => {
                let (doc, directives) = doc_and_directives(&c.attrs);
                result.consts.push(Variable {
                    name: qualified(&result.crate_name, module, &c.ident.to_string()),
                    doc,
                    directives,
                    local_type: type_string(&c.ty),
                    ..Default::default()
                });
            }
            Item::Mod(m) => {
                if let Some((_, nested)) = &m.content {
                    let mut inner = module.to_vec();
                    inner.push(m.ident.to_string());
                    scan_items(nested, &inner, result);
                }
            }
            _ => {}
        }
    }
}

fn scan_struct(s: &syn::ItemStruct, module: &[String], result: &mut ScanResult) {
    if !s.generics.params.is_empty() {
        // Generic declarations have no single runtime identity to register.
        tracing::debug!(ty = %s.ident, "generic struct skipped");
        return;
    }
    let ident = s.ident.to_string();
    let (doc, directives) = doc_and_directives(&s.attrs);
    let mut decl = TypeDecl {
        name: qualified(&result.crate_name, module, &ident),
        short_name: short_name(module, &ident),
        id_name: ident.to_kebab_case(),
        ident,
        doc,
        directives,
        ..Default::default()
    };
    if let Fields::Named(named) = &s.fields {
        for field in &named.named {
            let Some(name) = field.ident.as_ref().map(|i| i.to_string()) else {
                continue;
            };
            let (doc, directives) = doc_and_directives(&field.attrs);
            let record = Field {
                name: name.clone(),
                local_type: type_string(&field.ty),
                doc,
                directives,
                tag: typereg_tag(&field.attrs),
                ..Default::default()
            };
            if record.tag_value("embed").is_some() {
                decl.embeds.insert(name, record);
            } else {
                decl.fields.insert(name, record);
            }
        }
    }
    result.types.push(decl);
}

fn scan_impl(item: &syn::ItemImpl, result: &mut ScanResult) {
    // Inherent impls only; trait impls describe external contracts, not
    // declared methods.
    if item.trait_.is_some() {
        return;
    }
    let syn::Type::Path(self_ty) = &*item.self_ty else {
        return;
    };
    let Some(type_ident) = self_ty.path.segments.last().map(|s| s.ident.to_string()) else {
        return;
    };
    for impl_item in &item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        if method.sig.receiver().is_none() {
            // Associated functions are not methods on a value.
            continue;
        }
        if !method.sig.generics.params.is_empty() {
            tracing::debug!(ty = %type_ident, method = %method.sig.ident, "generic method skipped");
            continue;
        }
        let (doc, directives) = doc_and_directives(&method.attrs);
        result.queue_method(
            type_ident.clone(),
            Method {
                name: method.sig.ident.to_string(),
                doc,
                directives,
                args: signature_args(&method.sig),
                returns: signature_returns(&method.sig),
            },
        );
    }
}

fn scan_fn(f: &syn::ItemFn, module: &[String], result: &mut ScanResult) {
    if !f.sig.generics.params.is_empty() {
        tracing::debug!(func = %f.sig.ident, "generic function skipped");
        return;
    }
    let (doc, directives) = doc_and_directives(&f.attrs);
    result.funcs.push(Func {
        name: qualified(&result.crate_name, module, &f.sig.ident.to_string()),
        doc,
        directives,
        args: signature_args(&f.sig),
        returns: signature_returns(&f.sig),
        ..Default::default()
    });
}

fn signature_args(sig: &syn::Signature) -> Vec<Field> {
    let mut args = Vec::new();
    for (i, input) in sig.inputs.iter().enumerate() {
        let syn::FnArg::Typed(typed) = input else {
            continue;
        };
        let name = match &*typed.pat {
            syn::Pat::Ident(p) => p.ident.to_string(),
            _ => format!("arg{i}"),
        };
        args.push(Field {
            name,
            local_type: type_string(&typed.ty),
            ..Default::default()
        });
    }
    args
}

fn signature_returns(sig: &syn::Signature) -> Vec<Field> {
    match &sig.output {
        syn::ReturnType::Default => Vec::new(),
        syn::ReturnType::Type(_, ty) => {
            let local = type_string(ty);
            // Unnamed return values are named after their type.
            vec![Field {
                name: local.clone(),
                local_type: local,
                ..Default::default()
            }]
        }
    }
}

fn doc_and_directives(attrs: &[syn::Attribute]) -> (String, Vec<Directive>) {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        let Meta::NameValue(nv) = &attr.meta else {
            continue;
        };
        let Expr::Lit(expr) = &nv.value else {
            continue;
        };
        if let Lit::Str(s) = &expr.lit {
            let value = s.value();
            lines.push(value.strip_prefix(' ').unwrap_or(&value).to_string());
        }
    }
    split_doc(&lines.join("\n"))
}

// The `#[typereg(...)]` attribute tokens, captured verbatim as the field's
// opaque tag string.
fn typereg_tag(attrs: &[syn::Attribute]) -> String {
    for attr in attrs {
        if !attr.path().is_ident("typereg") {
            continue;
        }
        if let Meta::List(list) = &attr.meta {
            return list.tokens.to_string().replace(" ,", ",");
        }
    }
    String::new()
}

// Token streams put spaces around every punct; tighten them back into the
// source display form (`Vec < String >` → `Vec<String>`).
fn type_string(ty: &syn::Type) -> String {
    let mut s = ty.to_token_stream().to_string();
    for (from, to) in [
        (" :: ", "::"),
        (" < ", "<"),
        ("< ", "<"),
        (" <", "<"),
        (" >", ">"),
        (" ,", ","),
        ("& ", "&"),
        ("* ", "*"),
        ("! ", "!"),
    ] {
        s = s.replace(from, to);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_type(src: &str) -> syn::Type {
        syn::parse_str(src).expect("test type parses")
    }

    #[test]
    fn test_type_string_tightens_tokens() {
        assert_eq!(type_string(&parse_type("Vec<String>")), "Vec<String>");
        assert_eq!(
            type_string(&parse_type("HashMap<String, u32>")),
            "HashMap<String, u32>"
        );
        assert_eq!(
            type_string(&parse_type("Option<Box<Node>>")),
            "Option<Box<Node>>"
        );
        assert_eq!(type_string(&parse_type("&str")), "&str");
        assert_eq!(
            type_string(&parse_type("crate::style::Color")),
            "crate::style::Color"
        );
    }

    #[test]
    fn test_doc_and_directives_split() {
        let attrs: Vec<syn::Attribute> = syn::parse_quote! {
            /// A button widget.
            /// view:toolbar -hide
        };
        let (doc, directives) = doc_and_directives(&attrs);
        assert_eq!(doc, "A button widget.");
        assert_eq!(directives, vec![Directive::new("view", "toolbar", &["-hide"])]);
    }

    #[test]
    fn test_typereg_tag_captured() {
        let attrs: Vec<syn::Attribute> = syn::parse_quote! {
            #[typereg(set = "-", embed)]
        };
        let tag = typereg_tag(&attrs);
        let field = Field {
            tag,
            ..Default::default()
        };
        assert_eq!(field.tag_value("set").as_deref(), Some("-"));
        assert!(field.tag_value("embed").is_some());
    }
}
