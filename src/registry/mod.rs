//! # Registry Module
//!
//! Process-wide metadata registry: passive records describing types, fields,
//! methods, functions, and variables, plus the append-only stores that map
//! fully-qualified names and live-value identities to those records.
//!
//! Registration is performed by generated code (see [`crate::generator`]) or
//! by hand-written bootstrap code, once, during program initialization; the
//! registry is read-only thereafter. The embedding resolver answers
//! transitive "does type A embed type B" queries over the registered graph,
//! compiling a per-type closure cache on first use.

mod embeds;
mod store;
mod types;

pub use store::Registry;
pub use types::{ordered, Field, Func, Method, TypeInfo, Variable};
