//! # CLI Module
//!
//! Command-line interface for the typereg code generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate registration code from a Rust source tree:
//!
//! ```bash
//! typereg-gen generate --source-dir src --setters --type-var
//! ```
//!
//! ### `inspect`
//!
//! Scan a source tree and print the discovered declarations without
//! writing anything:
//!
//! ```bash
//! typereg-gen inspect --source-dir src/... --json
//! ```
//!
//! ## Configuration files
//!
//! Capability entries (extra templates gated on required method
//! signatures) have no flag form; provide them via `--config typereg.toml`:
//!
//! ```toml
//! setters = true
//!
//! [capabilities.display]
//! methods = ["describe() -> String"]
//! templates = ["""
//! impl std::fmt::Display for {{ ident }} {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str(&self.describe())
//!     }
//! }
//! """]
//! [capabilities.display.config]
//! instance = true
//! type-var = true
//! setters = true
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
