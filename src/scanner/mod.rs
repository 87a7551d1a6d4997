//! # Scanner Module
//!
//! Walks a source directory, parses the declared top-level types, functions,
//! methods, and variables with [`syn`], and builds the in-memory metadata
//! records the generator renders from — without executing any scanned code.
//!
//! ## Directory convention
//!
//! A `source_dir` of `src` scans the top-level `.rs` files of that
//! directory; appending `/...` (e.g. `src/...`) recurses into
//! subdirectories. Files are visited in sorted-path order and declarations
//! keep their source order, so the extraction result — and therefore the
//! generated output — is deterministic for a given tree.
//!
//! ## What is extracted
//!
//! - `struct` declarations with named fields (fields carrying the
//!   `#[typereg(embed)]` marker are recorded as embedded struct fields)
//! - methods from inherent `impl` blocks (receiver methods only)
//! - free functions
//! - package-level `static` and `const` items
//!
//! Doc comments are captured with directive lines (`tool:name arg...`)
//! stripped out of the prose and collected as [`Directive`] values instead.
//! Generic declarations are skipped: they have no single runtime identity to
//! register.

use crate::directive::Directive;
use crate::error::TypeRegError;
use crate::registry::{Field, Func, Method, Variable};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

mod parse;

/// One scanned `struct` declaration and the metadata extracted from it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeDecl {
    /// Fully-qualified name (e.g. `my_crate::widgets::Button`).
    pub name: String,
    /// Short, module-qualified name (e.g. `widgets::Button`).
    pub short_name: String,
    /// Bare declaration identifier (e.g. `Button`).
    pub ident: String,
    /// Kebab-case identifier (e.g. `button`).
    pub id_name: String,
    pub doc: String,
    pub directives: Vec<Directive>,
    /// Declared fields, in declaration order.
    pub fields: IndexMap<String, Field>,
    /// Embedded struct fields, in declaration order.
    pub embeds: IndexMap<String, Field>,
    /// Inherent methods, in declaration order.
    pub methods: IndexMap<String, Method>,
}

/// The complete extraction result for one scan pass.
///
/// Extraction completes fully before generation begins: capability checks
/// need the whole universe of methods and types, including declarations that
/// appear later in scan order than the types they apply to.
#[derive(Debug, Default, Serialize)]
pub struct ScanResult {
    /// Crate name taken from the nearest `Cargo.toml` above the scan root.
    pub crate_name: String,
    /// Scanned types, in declaration order across sorted files.
    pub types: Vec<TypeDecl>,
    /// Scanned free functions, in declaration order.
    pub funcs: Vec<Func>,
    /// Scanned `static` items.
    pub vars: Vec<Variable>,
    /// Scanned `const` items.
    pub consts: Vec<Variable>,
    #[serde(skip)]
    pending_methods: Vec<(String, Method)>,
}

impl ScanResult {
    /// Find a scanned type by its bare identifier.
    pub fn type_by_ident(&self, ident: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.ident == ident)
    }

    /// Find a scanned type by its fully-qualified name.
    pub fn type_by_name(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Resolve an embedded field to the scanned type it names, if the embed
    /// target was declared in the scanned tree.
    pub fn embed_target(&self, embed: &Field) -> Option<&TypeDecl> {
        self.type_by_name(&embed.type_name)
            .or_else(|| self.type_by_ident(&embed.local_type))
    }

    pub(crate) fn queue_method(&mut self, type_ident: String, method: Method) {
        self.pending_methods.push((type_ident, method));
    }

    // Impl blocks may precede or follow the struct they target, and may live
    // in a different file; attach after the whole tree is scanned.
    fn attach_methods(&mut self) {
        let pending = std::mem::take(&mut self.pending_methods);
        for (ident, method) in pending {
            match self.types.iter_mut().find(|t| t.ident == ident) {
                Some(decl) => {
                    decl.methods.insert(method.name.clone(), method);
                }
                None => {
                    tracing::debug!(ty = %ident, method = %method.name, "impl target not scanned, method dropped");
                }
            }
        }
    }

    // Qualify bare type idents that name scanned types; everything else
    // (std, external crates) keeps its display form and is left for the
    // embedding resolver to skip at query time.
    fn resolve_names(&mut self) {
        let known: IndexMap<String, String> = self
            .types
            .iter()
            .map(|t| (t.ident.clone(), t.name.clone()))
            .collect();
        let qualify = |field: &mut Field| {
            field.type_name = match known.get(&field.local_type) {
                Some(fq) => fq.clone(),
                None => field.local_type.clone(),
            };
        };
        for decl in &mut self.types {
            decl.fields.values_mut().for_each(qualify);
            decl.embeds.values_mut().for_each(qualify);
            for method in decl.methods.values_mut() {
                method.args.iter_mut().for_each(qualify);
                method.returns.iter_mut().for_each(qualify);
            }
        }
        for func in &mut self.funcs {
            func.args.iter_mut().for_each(qualify);
            func.returns.iter_mut().for_each(qualify);
        }
        for var in self.vars.iter_mut().chain(self.consts.iter_mut()) {
            var.type_name = match known.get(&var.local_type) {
                Some(fq) => fq.clone(),
                None => var.local_type.clone(),
            };
        }
    }
}

/// Scan `source_dir` and build the extraction result.
///
/// # Errors
///
/// Returns [`TypeRegError::Config`] when the directory does not exist,
/// [`TypeRegError::Parse`] when a file fails to parse (the run aborts
/// immediately; there is no partial result), and [`TypeRegError::Io`] for
/// unreadable files.
pub fn scan(source_dir: &str) -> Result<ScanResult, TypeRegError> {
    let (root, recursive) = split_source_dir(source_dir);
    let root = Path::new(root);
    if !root.is_dir() {
        return Err(TypeRegError::Config(format!(
            "source directory `{}` does not exist",
            root.display()
        )));
    }

    let mut files = rust_files(root, recursive)?;
    files.sort();

    let mut result = ScanResult {
        crate_name: crate_name_for(root),
        ..Default::default()
    };
    for file in &files {
        tracing::debug!(file = %file.display(), "scanning");
        let module = module_path(root, file);
        parse::scan_file(file, &module, &mut result)?;
    }
    result.attach_methods();
    result.resolve_names();
    Ok(result)
}

/// Split the `/...` recursion suffix off a source directory value.
pub(crate) fn split_source_dir(source_dir: &str) -> (&str, bool) {
    match source_dir.strip_suffix("/...") {
        Some("") => (".", true),
        Some(root) => (root, true),
        None => (source_dir, false),
    }
}

fn rust_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, TypeRegError> {
    let mut files = Vec::new();
    if recursive {
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| TypeRegError::Parse {
                path: root.to_path_buf(),
                message: e.to_string(),
            })?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|e| e == "rs")
            {
                files.push(entry.into_path());
            }
        }
    } else {
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "rs") {
                files.push(path);
            }
        }
    }
    Ok(files)
}

// The crate name anchors every fully-qualified name. Taken from the nearest
// Cargo.toml above the scan root; falls back to the directory name when the
// tree is not a cargo package (e.g. bare fixture directories in tests).
fn crate_name_for(root: &Path) -> String {
    for dir in root.ancestors() {
        let manifest = dir.join("Cargo.toml");
        if !manifest.is_file() {
            continue;
        }
        let name = fs::read_to_string(&manifest)
            .ok()
            .and_then(|s| s.parse::<toml::Table>().ok())
            .and_then(|v| {
                v.get("package")
                    .and_then(|p| p.get("name"))
                    .and_then(|n| n.as_str())
                    .map(str::to_string)
            });
        if let Some(name) = name {
            return name.replace('-', "_");
        }
    }
    root.file_name()
        .map(|n| n.to_string_lossy().replace('-', "_"))
        .unwrap_or_else(|| "crate".to_string())
}

// src/lib.rs → [], src/widgets.rs → ["widgets"], src/widgets/mod.rs →
// ["widgets"], src/widgets/button.rs → ["widgets", "button"].
fn module_path(root: &Path, file: &Path) -> Vec<String> {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let mut segments: Vec<String> = rel
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    if let Some(stem) = rel.file_stem().map(|s| s.to_string_lossy().to_string()) {
        if stem != "lib" && stem != "main" && stem != "mod" {
            segments.push(stem);
        }
    }
    segments
}

pub(crate) fn qualified(crate_name: &str, module: &[String], ident: &str) -> String {
    let mut parts = Vec::with_capacity(module.len() + 2);
    parts.push(crate_name.to_string());
    parts.extend(module.iter().cloned());
    parts.push(ident.to_string());
    parts.join("::")
}

pub(crate) fn short_name(module: &[String], ident: &str) -> String {
    match module.last() {
        Some(last) => format!("{last}::{ident}"),
        None => ident.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_source_dir_wildcard() {
        assert_eq!(split_source_dir("src/..."), ("src", true));
        assert_eq!(split_source_dir("./..."), (".", true));
        assert_eq!(split_source_dir("src"), ("src", false));
    }

    #[test]
    fn test_module_path_conventions() {
        let root = Path::new("src");
        assert!(module_path(root, Path::new("src/lib.rs")).is_empty());
        assert_eq!(module_path(root, Path::new("src/widgets.rs")), vec!["widgets"]);
        assert_eq!(module_path(root, Path::new("src/widgets/mod.rs")), vec!["widgets"]);
        assert_eq!(
            module_path(root, Path::new("src/widgets/button.rs")),
            vec!["widgets", "button"]
        );
    }

    #[test]
    fn test_qualified_and_short_names() {
        let module = vec!["widgets".to_string()];
        assert_eq!(qualified("my_crate", &module, "Button"), "my_crate::widgets::Button");
        assert_eq!(short_name(&module, "Button"), "widgets::Button");
        assert_eq!(short_name(&[], "Button"), "Button");
    }
}
