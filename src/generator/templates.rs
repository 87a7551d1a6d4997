use crate::error::TypeRegError;
use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};
use minijinja::Environment;
use serde::Serialize;

const MACROS_TMPL: &str = include_str!("../../templates/macros.rs.txt");
const FILE_TMPL: &str = include_str!("../../templates/file.rs.txt");
const STATIC_TMPL: &str = include_str!("../../templates/static.rs.txt");
const TYPE_TMPL: &str = include_str!("../../templates/type.rs.txt");
const FUNC_TMPL: &str = include_str!("../../templates/func.rs.txt");
const VAR_TMPL: &str = include_str!("../../templates/var.rs.txt");
const SETTERS_TMPL: &str = include_str!("../../templates/setters.rs.txt");

/// The minijinja environment holding the built-in templates plus any
/// capability templates compiled from the configuration.
///
/// Available filters for capability template authors: `quote_str` (Rust
/// string literal), `upper_camel`, `snake`, `kebab`.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Result<Self, TypeRegError> {
        let mut env = Environment::new();
        env.add_filter("quote_str", |v: String| format!("{v:?}"));
        env.add_filter("upper_camel", |v: String| v.to_upper_camel_case());
        env.add_filter("snake", |v: String| v.to_snake_case());
        env.add_filter("kebab", |v: String| v.to_kebab_case());
        for (name, source) in [
            ("macros.rs.txt", MACROS_TMPL),
            ("file.rs.txt", FILE_TMPL),
            ("static.rs.txt", STATIC_TMPL),
            ("type.rs.txt", TYPE_TMPL),
            ("func.rs.txt", FUNC_TMPL),
            ("var.rs.txt", VAR_TMPL),
            ("setters.rs.txt", SETTERS_TMPL),
        ] {
            env.add_template(name, source)
                .map_err(|e| TypeRegError::TemplateRender {
                    template: name.to_string(),
                    entity: "builtin".to_string(),
                    source: e,
                })?;
        }
        Ok(Self { env })
    }

    /// Compile a capability template. Malformed template syntax aborts the
    /// run before extraction begins.
    pub fn add_capability_template(
        &mut self,
        name: String,
        source: String,
        capability: &str,
    ) -> Result<(), TypeRegError> {
        self.env
            .add_template_owned(name.clone(), source)
            .map_err(|e| TypeRegError::TemplateRender {
                template: name,
                entity: format!("capability `{capability}`"),
                source: e,
            })
    }

    /// Render a template against `ctx`, reporting the offending entity on
    /// failure.
    pub fn render<S: Serialize>(
        &self,
        template: &str,
        entity: &str,
        ctx: S,
    ) -> Result<String, TypeRegError> {
        let tmpl = self
            .env
            .get_template(template)
            .map_err(|e| TypeRegError::TemplateRender {
                template: template.to_string(),
                entity: entity.to_string(),
                source: e,
            })?;
        tmpl.render(ctx).map_err(|e| TypeRegError::TemplateRender {
            template: template.to_string(),
            entity: entity.to_string(),
            source: e,
        })
    }
}
