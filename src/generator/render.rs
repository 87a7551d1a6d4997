use super::config::{Config, MethodSig};
use super::templates::TemplateEngine;
use crate::directive::Directive;
use crate::error::TypeRegError;
use crate::registry::{Field, Method};
use crate::scanner::{ScanResult, TypeDecl};
use heck::{ToShoutySnakeCase, ToSnakeCase};
use minijinja::context;
use serde::Serialize;
use std::collections::HashSet;

/// Render model for one type: everything the built-in templates and the
/// capability templates can reference.
#[derive(Debug, Clone, Serialize)]
pub struct TypeContext {
    /// Fully-qualified name.
    pub name: String,
    /// Module-qualified short name.
    pub short_name: String,
    /// Bare declaration identifier.
    pub ident: String,
    /// Kebab-case identifier.
    pub id_name: String,
    /// Name of the global handle static (e.g. `PERSON_TYPE`).
    pub var_name: String,
    pub doc: String,
    pub directives: Vec<Directive>,
    pub fields: Vec<Field>,
    pub embeds: Vec<Field>,
    pub methods: Vec<Method>,
    /// Whether to attach a `Default::default()` instance.
    pub instance: bool,
    /// Whether to emit the global handle static.
    pub type_var: bool,
    /// Eligible setters, declared fields first, then flattened embeds.
    pub setters: Vec<SetterContext>,
}

/// One synthesized setter.
#[derive(Debug, Clone, Serialize)]
pub struct SetterContext {
    /// Final method name (e.g. `set_name`).
    pub method: String,
    /// Assignment path relative to `self` (e.g. `name` or `style.color`).
    pub path: String,
    /// Parameter type as written in source.
    pub local_type: String,
    /// Pre-rendered doc comment lines, trailing newline included.
    pub doc_comment: String,
}

/// A compiled capability: parsed required signatures plus the names of its
/// registered extra templates.
pub(crate) struct Capability {
    pub name: String,
    pub sigs: Vec<MethodSig>,
    pub template_names: Vec<String>,
    pub config: Config,
}

impl Capability {
    pub(crate) fn matches(&self, decl: &TypeDecl) -> bool {
        self.sigs
            .iter()
            .all(|sig| decl.methods.values().any(|m| sig.matches(m)))
    }
}

/// Parse capability signatures and compile capability templates, before any
/// extraction begins.
pub(crate) fn compile_capabilities(
    config: &Config,
    engine: &mut TemplateEngine,
) -> Result<Vec<Capability>, TypeRegError> {
    let mut caps = Vec::new();
    for (name, cap) in &config.capabilities {
        let sigs = cap
            .methods
            .iter()
            .map(|m| MethodSig::parse(m))
            .collect::<Result<Vec<_>, _>>()?;
        let mut template_names = Vec::new();
        for (i, source) in cap.templates.iter().enumerate() {
            let template_name = format!("capability:{name}:{i}");
            engine.add_capability_template(template_name.clone(), source.clone(), name)?;
            template_names.push(template_name);
        }
        caps.push(Capability {
            name: name.clone(),
            sigs,
            template_names,
            config: cap.config.clone(),
        });
    }
    Ok(caps)
}

/// Render the complete output file into one in-memory buffer.
///
/// Traversal is strictly declaration order; nothing iterates an unordered
/// container, so identical input metadata always produces identical text.
pub(crate) fn render_file(
    engine: &TemplateEngine,
    config: &Config,
    caps: &[Capability],
    scan: &ScanResult,
    header: &str,
) -> Result<String, TypeRegError> {
    let mut statics: Vec<String> = Vec::new();
    let mut registrations: Vec<String> = Vec::new();
    let mut impls: Vec<String> = Vec::new();

    for decl in &scan.types {
        let matching: Vec<&Capability> = caps.iter().filter(|c| c.matches(decl)).collect();
        // The last matching capability's nested toggles replace the
        // top-level ones for this type.
        let effective = matching.last().map(|c| &c.config).unwrap_or(config);
        let ctx = type_context(decl, effective, scan);

        if effective.types {
            if effective.type_var {
                let block = engine.render("static.rs.txt", &decl.name, &ctx)?;
                statics.push(block.trim_end().to_string());
            }
            let block = engine.render("type.rs.txt", &decl.name, &ctx)?;
            registrations.push(block.trim_end().to_string());
        }
        if effective.setters && !ctx.setters.is_empty() {
            let block = engine.render("setters.rs.txt", &decl.name, &ctx)?;
            impls.push(block.trim_end().to_string());
        }
        for cap in &matching {
            for template_name in &cap.template_names {
                tracing::debug!(ty = %decl.name, capability = %cap.name, "rendering capability template");
                let block = engine.render(template_name, &decl.name, &ctx)?;
                impls.push(block.trim_end().to_string());
            }
        }
    }

    if config.funcs {
        for func in &scan.funcs {
            let block = engine.render("func.rs.txt", &func.name, func)?;
            registrations.push(block.trim_end().to_string());
        }
    }
    if config.vars {
        for var in &scan.vars {
            let block = engine.render("var.rs.txt", &var.name, context! { var, kind => "var" })?;
            registrations.push(block.trim_end().to_string());
        }
    }
    if config.consts {
        for cst in &scan.consts {
            let block =
                engine.render("var.rs.txt", &cst.name, context! { var => cst, kind => "const" })?;
            registrations.push(block.trim_end().to_string());
        }
    }

    engine.render(
        "file.rs.txt",
        "output",
        context! { header, statics, registrations, impls },
    )
}

fn type_context(decl: &TypeDecl, effective: &Config, scan: &ScanResult) -> TypeContext {
    TypeContext {
        name: decl.name.clone(),
        short_name: decl.short_name.clone(),
        ident: decl.ident.clone(),
        id_name: decl.id_name.clone(),
        var_name: format!("{}_TYPE", decl.ident.to_shouty_snake_case()),
        doc: decl.doc.clone(),
        directives: decl.directives.clone(),
        fields: decl.fields.values().cloned().collect(),
        embeds: decl.embeds.values().cloned().collect(),
        methods: decl.methods.values().cloned().collect(),
        instance: effective.instance,
        type_var: effective.type_var,
        setters: setter_contexts(decl, scan),
    }
}

/// All setter-eligible fields of a type: declared fields first, then the
/// flattened fields of embedded types (transitively), in declaration order.
/// A field is eligible unless its tag carries `set = "-"`.
fn setter_contexts(decl: &TypeDecl, scan: &ScanResult) -> Vec<SetterContext> {
    let mut setters = Vec::new();
    let mut seen = HashSet::new();
    for field in decl.fields.values() {
        push_setter(&decl.short_name, field, &field.name, &mut setters, &mut seen);
    }
    let mut visited = HashSet::new();
    visited.insert(decl.name.clone());
    flatten_embeds(decl, "", scan, &mut visited, &mut seen, &decl.short_name, &mut setters);
    setters
}

#[allow(clippy::too_many_arguments)]
fn flatten_embeds(
    decl: &TypeDecl,
    prefix: &str,
    scan: &ScanResult,
    visited: &mut HashSet<String>,
    seen: &mut HashSet<String>,
    owner_short: &str,
    setters: &mut Vec<SetterContext>,
) {
    for embed in decl.embeds.values() {
        let Some(target) = scan.embed_target(embed) else {
            tracing::debug!(embed = %embed.local_type, owner = %decl.name, "embed target not scanned, setters skipped");
            continue;
        };
        if !visited.insert(target.name.clone()) {
            continue;
        }
        let path_prefix = if prefix.is_empty() {
            embed.name.clone()
        } else {
            format!("{prefix}.{}", embed.name)
        };
        for field in target.fields.values() {
            let path = format!("{path_prefix}.{}", field.name);
            push_setter(owner_short, field, &path, setters, seen);
        }
        flatten_embeds(target, &path_prefix, scan, visited, seen, owner_short, setters);
    }
}

fn push_setter(
    owner_short: &str,
    field: &Field,
    path: &str,
    setters: &mut Vec<SetterContext>,
    seen: &mut HashSet<String>,
) {
    let Some(method) = setter_method_name(field) else {
        return;
    };
    // An embedded field shadowed by a declared field (or an earlier embed)
    // keeps the first setter only.
    if !seen.insert(method.clone()) {
        return;
    }
    setters.push(SetterContext {
        method,
        path: path.to_string(),
        local_type: field.local_type.clone(),
        doc_comment: setter_doc(owner_short, path, &field.doc),
    });
}

/// `set = "-"` suppresses the setter, `set = "name"` renames it, absence
/// means eligible under the field's own identifier in snake_case.
pub(crate) fn setter_method_name(field: &Field) -> Option<String> {
    match field.tag_value("set") {
        Some(v) if v == "-" => None,
        Some(v) if !v.is_empty() => Some(format!("set_{v}")),
        _ => Some(format!("set_{}", field.name.to_snake_case())),
    }
}

pub(crate) fn setter_doc(owner_short: &str, path: &str, doc: &str) -> String {
    let mut out = format!("    /// Sets `{owner_short}.{path}`");
    if doc.is_empty() {
        out.push_str(".\n");
        return out;
    }
    out.push_str(": ");
    let mut lines = doc.lines();
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push_str("\n    /// ");
        out.push_str(line);
    }
    out.push('\n');
    out
}
