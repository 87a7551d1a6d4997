use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the registry and the generation pipeline.
///
/// Unresolved embedded types are deliberately not represented here: the
/// embedding resolver absorbs them and simply excludes the unresolved type
/// from the closure, because partial embedding graphs (external, unregistered
/// embeds) are common in real codebases.
#[derive(Debug, Error)]
pub enum TypeRegError {
    /// A record with the same fully-qualified name is already registered.
    /// The first registration's identity is preserved.
    #[error("duplicate registration for `{0}`")]
    DuplicateRegistration(String),

    /// Invalid or missing configuration value, reported before extraction.
    #[error("configuration error: {0}")]
    Config(String),

    /// A template failed to compile or render; the generation run is aborted
    /// and no output is written.
    #[error("template `{template}` failed for `{entity}`: {source}")]
    TemplateRender {
        template: String,
        entity: String,
        #[source]
        source: minijinja::Error,
    },

    /// A source file could not be parsed; the run is aborted immediately.
    #[error("failed to parse `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
