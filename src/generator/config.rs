use crate::error::TypeRegError;
use crate::registry::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for one generation run.
///
/// Loadable from a TOML file (kebab-case keys) and overridable from CLI
/// flags; every field has a default so a bare `typereg-gen generate` works
/// on the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Source directory to scan. Append `/...` to recurse into
    /// subdirectories (e.g. `src/...`).
    pub source_dir: String,
    /// Output file location relative to the scanned directory.
    pub output: String,
    /// Register type declarations.
    pub types: bool,
    /// Register free functions.
    pub funcs: bool,
    /// Register package-level `static` items.
    pub vars: bool,
    /// Register package-level `const` items.
    pub consts: bool,
    /// Attach a `Default::default()` instance to each registered type.
    pub instance: bool,
    /// Emit a named global handle (`FOO_TYPE`) per registered type.
    pub type_var: bool,
    /// Synthesize chainable setter methods for eligible fields.
    pub setters: bool,
    /// Per-capability overrides: types whose declared method set satisfies
    /// a capability's required signatures get that capability's nested
    /// toggles and extra templates.
    pub capabilities: IndexMap<String, CapabilityConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: ".".to_string(),
            output: "typereg_gen.rs".to_string(),
            types: true,
            funcs: false,
            vars: false,
            consts: false,
            instance: false,
            type_var: false,
            setters: false,
            capabilities: IndexMap::new(),
        }
    }
}

/// Capability entry: required method signatures, extra templates, and a
/// nested configuration of the same shape applied to matching types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CapabilityConfig {
    /// Required method signatures, e.g. `"describe() -> String"`. A type
    /// matches only when every listed signature is satisfied by its
    /// declared method set.
    pub methods: Vec<String>,
    /// Extra template sources rendered for each matching type, appended
    /// after the standard setters.
    pub templates: Vec<String>,
    /// Toggles applied to matching types in place of the top-level ones.
    pub config: Config,
}

impl Config {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, TypeRegError> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            TypeRegError::Config(format!("invalid config file `{}`: {e}", path.display()))
        })
    }

    /// Check the configuration before any extraction begins.
    ///
    /// # Errors
    ///
    /// Returns [`TypeRegError::Config`] for an empty source directory or
    /// output path, a capability with no required methods, or a malformed
    /// required-method signature.
    pub fn validate(&self) -> Result<(), TypeRegError> {
        if self.source_dir.is_empty() {
            return Err(TypeRegError::Config("source-dir must not be empty".into()));
        }
        if self.output.is_empty() {
            return Err(TypeRegError::Config("output must not be empty".into()));
        }
        for (name, cap) in &self.capabilities {
            if cap.methods.is_empty() {
                return Err(TypeRegError::Config(format!(
                    "capability `{name}` declares no required methods"
                )));
            }
            for sig in &cap.methods {
                MethodSig::parse(sig)?;
            }
        }
        Ok(())
    }
}

/// A required method signature: `name(ArgType, ...) -> ReturnType`.
///
/// Types are compared textually against the scanned method's local type
/// names, whitespace-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MethodSig {
    pub name: String,
    pub args: Vec<String>,
    pub returns: Option<String>,
}

impl MethodSig {
    pub(crate) fn parse(sig: &str) -> Result<Self, TypeRegError> {
        let (head, ret) = match sig.split_once("->") {
            Some((head, ret)) => (head.trim(), Some(ret.trim())),
            None => (sig.trim(), None),
        };
        let malformed = || {
            TypeRegError::Config(format!(
                "malformed method signature `{sig}` (expected `name(Arg, ...) -> Ret`)"
            ))
        };
        let open = head.find('(').ok_or_else(malformed)?;
        if !head.ends_with(')') {
            return Err(malformed());
        }
        let name = head[..open].trim();
        if name.is_empty() {
            return Err(malformed());
        }
        let args = head[open + 1..head.len() - 1]
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(normalize_type)
            .collect();
        match ret {
            Some(r) if r.is_empty() => Err(malformed()),
            ret => Ok(Self {
                name: name.to_string(),
                args,
                returns: ret.map(normalize_type),
            }),
        }
    }

    pub(crate) fn matches(&self, method: &Method) -> bool {
        if method.name != self.name || method.args.len() != self.args.len() {
            return false;
        }
        let args_match = method
            .args
            .iter()
            .zip(&self.args)
            .all(|(got, want)| &normalize_type(&got.local_type) == want);
        if !args_match {
            return false;
        }
        match (&self.returns, method.returns.first()) {
            (None, None) => true,
            (Some(want), Some(got)) => &normalize_type(&got.local_type) == want,
            _ => false,
        }
    }
}

fn normalize_type(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
