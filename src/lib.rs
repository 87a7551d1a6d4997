//! # typereg
//!
//! **typereg** is a type-metadata registry and code generator for Rust
//! source trees: it scans declared structs, functions, methods, and fields
//! (together with machine-readable comment directives), and generates the
//! source code that registers that metadata at program startup — plus
//! chainable setter methods for eligible fields.
//!
//! ## Overview
//!
//! The library has two halves that meet in the generated code:
//!
//! - the **registry** half runs inside the target program: generated
//!   registration statements populate a process-wide [`registry::Registry`]
//!   during initialization, after which lookups by name
//!   ([`registry::Registry::type_by_name`]), by live value
//!   ([`registry::Registry::type_by_value`]), and transitive embedding
//!   queries ([`registry::Registry::has_embed`]) are read-only;
//! - the **generator** half runs as a batch tool: the scanner parses a
//!   source tree with `syn`, and the generation engine renders the
//!   extracted metadata through minijinja templates into one deterministic
//!   output file.
//!
//! ## Architecture
//!
//! - **[`directive`]** - comment directive model (`tool:name arg...`)
//! - **[`registry`]** - metadata entities, append-only stores, embedding
//!   resolver with a lazily-compiled closure cache
//! - **[`scanner`]** - `syn`-based source tree extraction
//! - **[`generator`]** - configuration, capability selection, template
//!   rendering, deterministic file assembly
//! - **[`cli`]** - the `typereg-gen` command line
//!
//! ## Code Generation Flow
//!
//! ```text
//! Source Tree → Scanner → ScanResult → Capability Selection → Templates → File
//! ```
//!
//! Extraction completes fully before rendering begins, because capability
//! checks ("does this type declare `describe() -> String`?") may reference
//! declarations that appear later in scan order. Output after the first
//! line is byte-stable for identical input; the run either fully succeeds
//! or writes nothing.
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin typereg-gen -- generate --source-dir src --setters
//! ```
//!
//! Programmatic use:
//!
//! ```no_run
//! use typereg::generator::{generate, Config};
//!
//! let config = Config {
//!     source_dir: "src/...".to_string(),
//!     setters: true,
//!     ..Config::default()
//! };
//! let path = generate(&config).expect("generation failed");
//! println!("wrote {path:?}");
//! ```
//!
//! ## Directives
//!
//! Doc-comment lines of the form `tool:name arg arg...` are stripped out of
//! the registered prose and carried as structured [`Directive`] values:
//!
//! ```rust,ignore
//! /// Button is a pressable widget.
//! /// view:toolbar -hide
//! pub struct Button { /* ... */ }
//! ```
//!
//! ## Setters
//!
//! With `--setters`, every eligible field (declared and embedded,
//! flattened) gets a chainable accessor. A field opts out with
//! `#[typereg(set = "-")]` and renames its accessor with
//! `#[typereg(set = "other")]`; fields marked `#[typereg(embed)]` are
//! embedded struct fields whose own fields flatten into the outer type's
//! setter set.

pub mod cli;
pub mod directive;
mod error;
pub mod generator;
pub mod registry;
pub mod scanner;

pub use directive::Directive;
pub use error::TypeRegError;
pub use generator::{generate, CapabilityConfig, Config};
pub use registry::{Registry, TypeInfo};
