use crate::directive::Directive;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Build an insertion-ordered map from `(key, value)` pairs.
///
/// Generated registration code and tests both construct the `fields`,
/// `embeds`, and `methods` maps through this helper so declaration order is
/// preserved alongside unique-key lookup.
pub fn ordered<K, V, I>(entries: I) -> IndexMap<String, V>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Metadata for one struct field, embedded field, function parameter, or
/// return value — a single uniform shape for all four uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field or parameter name. Unnamed return values use the type name.
    pub name: String,
    /// Fully-qualified type name (e.g. `my_crate::style::Color`). External
    /// types the scanner could not resolve keep their display form.
    pub type_name: String,
    /// Package-local display name of the type (e.g. `Color`).
    pub local_type: String,
    /// Doc comment prose with directive lines removed.
    pub doc: String,
    /// Parsed comment directives, in source order.
    pub directives: Vec<Directive>,
    /// Opaque `key = "value"` annotation string captured verbatim from the
    /// field's `#[typereg(...)]` attribute. Empty when absent.
    pub tag: String,
}

impl Field {
    /// Look up a key in the opaque tag string.
    ///
    /// Returns `Some("")` for a bare marker key (e.g. `embed`), the unquoted
    /// value for `key = "value"` pairs, and `None` when the key is absent.
    pub fn tag_value(&self, key: &str) -> Option<String> {
        for part in self.tag.split(',') {
            let part = part.trim();
            if let Some((k, v)) = part.split_once('=') {
                if k.trim() == key {
                    return Some(v.trim().trim_matches('"').to_string());
                }
            } else if part == key {
                return Some(String::new());
            }
        }
        None
    }
}

/// A method scoped to an owning type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub doc: String,
    pub directives: Vec<Directive>,
    /// Ordered parameters, receiver excluded.
    pub args: Vec<Field>,
    /// Ordered return values.
    pub returns: Vec<Field>,
}

/// A free function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Func {
    /// Fully-qualified function name.
    pub name: String,
    pub doc: String,
    pub directives: Vec<Directive>,
    pub args: Vec<Field>,
    pub returns: Vec<Field>,
    /// Unique id assigned by the registry; any preset value is overwritten.
    #[serde(skip)]
    pub id: u64,
}

/// A package-level `static` or `const`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Fully-qualified name.
    pub name: String,
    pub doc: String,
    pub directives: Vec<Directive>,
    pub type_name: String,
    pub local_type: String,
    /// Unique id assigned by the registry; any preset value is overwritten.
    #[serde(skip)]
    pub id: u64,
}

/// Runtime metadata record for one registered type.
///
/// Records are created by generated registration code (or hand-written
/// bootstrap code) and never mutated after registration, except for the lazy
/// `all_embeds` closure cache which [`crate::registry::Registry::has_embed`]
/// compiles on first use.
#[derive(Default)]
pub struct TypeInfo {
    /// Fully-qualified name (e.g. `my_crate::widgets::Button`). Globally
    /// unique within a registry; it is the registry key.
    pub name: String,
    /// Short, module-qualified name (e.g. `widgets::Button`).
    pub short_name: String,
    /// Short, unqualified, kebab-case name suitable for use in an ID
    /// (e.g. `button`).
    pub id_name: String,
    /// Doc comment prose with directive lines removed.
    pub doc: String,
    /// Parsed comment directives, in source order.
    pub directives: Vec<Directive>,
    /// Unique id assigned by the registry at registration; any preset value
    /// is overwritten and ids are never reused.
    pub id: u64,
    /// Methods declared in inherent impl blocks, in declaration order.
    pub methods: IndexMap<String, Method>,
    /// Embedded struct fields, in declaration order.
    pub embeds: IndexMap<String, Field>,
    /// Declared struct fields, in declaration order.
    pub fields: IndexMap<String, Field>,
    /// Optional live instance of the type, used for value-based lookup.
    pub instance: Option<Box<dyn Any + Send + Sync>>,
    /// All embedded types at any depth, keyed by type id. Not set by the
    /// scanner or by registration — `has_embed` compiles it on demand and
    /// the computed value is immutable for the type's lifetime.
    pub all_embeds: OnceCell<BTreeMap<u64, Arc<TypeInfo>>>,
}

impl TypeInfo {
    /// Short display label (the module-qualified name).
    pub fn label(&self) -> &str {
        &self.short_name
    }

    /// The [`TypeId`] of the registered instance, when one was attached.
    pub fn reflect_id(&self) -> Option<TypeId> {
        self.instance.as_ref().map(|v| (**v).type_id())
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("fields", &self.fields.len())
            .field("embeds", &self.embeds.len())
            .field("methods", &self.methods.len())
            .field("has_instance", &self.instance.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_value_lookup() {
        let f = Field {
            tag: r#"set = "-", embed"#.to_string(),
            ..Default::default()
        };
        assert_eq!(f.tag_value("set").as_deref(), Some("-"));
        assert_eq!(f.tag_value("embed").as_deref(), Some(""));
        assert_eq!(f.tag_value("json"), None);
    }

    #[test]
    fn test_tag_value_rename() {
        let f = Field {
            tag: r#"set = "color""#.to_string(),
            ..Default::default()
        };
        assert_eq!(f.tag_value("set").as_deref(), Some("color"));
    }

    #[test]
    fn test_ordered_preserves_insertion_order() {
        let map = ordered([("b", 1), ("a", 2), ("c", 3)]);
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_reflect_id_requires_instance() {
        let ty = TypeInfo {
            name: "t::A".into(),
            ..Default::default()
        };
        assert!(ty.reflect_id().is_none());

        let ty = TypeInfo {
            name: "t::B".into(),
            instance: Some(Box::new(7u32)),
            ..Default::default()
        };
        assert_eq!(ty.reflect_id(), Some(TypeId::of::<u32>()));
    }
}
