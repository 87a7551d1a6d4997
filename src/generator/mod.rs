//! # Generator Module
//!
//! Deterministic rendering of extracted metadata into Rust source text.
//!
//! ## Pipeline
//!
//! ```text
//! Config → Scanner → Capability Selection → Template Rendering → One File
//! ```
//!
//! 1. **Configuration** — validated before any extraction; capability
//!    templates are compiled up front so malformed template syntax fails
//!    fast.
//! 2. **Extraction** — the scanner builds the complete declaration universe
//!    first; capability checks may reference types declared later in scan
//!    order.
//! 3. **Rendering** — one registration block per type and function, setter
//!    impls for eligible fields, then capability extra blocks for matching
//!    types, all rendered with minijinja templates in declaration order.
//! 4. **Assembly** — blocks concatenate into one buffer written with a
//!    single `fs::write`; a failed render aborts the run and no partial
//!    file is ever written.
//!
//! ## Determinism
//!
//! Output after the first line (the "generated, do not edit" marker) is
//! byte-identical across runs for the same input. All traversal follows the
//! insertion order of the scanned declaration maps; nothing iterates an
//! unordered container.
//!
//! ## Capability templates
//!
//! The configuration may map a capability name to required method
//! signatures plus extra minijinja templates. Types whose declared method
//! set satisfies every signature additionally render those templates,
//! appended after their standard setters — e.g. "for every type with
//! `describe() -> String`, also emit a display shim".

mod config;
mod generate;
mod render;
mod templates;

pub use config::{CapabilityConfig, Config};
pub use generate::generate;
pub use render::{SetterContext, TypeContext};
pub use templates::TemplateEngine;
