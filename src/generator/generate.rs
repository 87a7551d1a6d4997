use super::config::Config;
use super::render::{compile_capabilities, render_file};
use super::templates::TemplateEngine;
use crate::error::TypeRegError;
use crate::scanner;
use std::fs;
use std::path::{Path, PathBuf};

/// Run the full pipeline: validate configuration, compile capability
/// templates, scan the source tree, render, and write the output file.
///
/// The run either fully succeeds (file written) or fails with a descriptive
/// error and writes nothing: every block is rendered into one in-memory
/// buffer before the single write. Everything after the first line of the
/// written file is byte-stable for identical input.
///
/// # Errors
///
/// Returns [`TypeRegError::Config`] for invalid configuration (before any
/// extraction), [`TypeRegError::Parse`] when a source file fails to parse,
/// and [`TypeRegError::TemplateRender`] when a template fails, identifying
/// the offending type and template.
pub fn generate(config: &Config) -> Result<PathBuf, TypeRegError> {
    config.validate()?;
    let mut engine = TemplateEngine::new()?;
    let capabilities = compile_capabilities(config, &mut engine)?;

    let scan = scanner::scan(&config.source_dir)?;
    println!(
        "📦 Scanned {} types and {} functions from {}",
        scan.types.len(),
        scan.funcs.len(),
        config.source_dir
    );

    // Only the first line may vary between invocations; golden-file tests
    // compare everything after it.
    let header = format!(
        "// Code generated by \"typereg-gen generate --source-dir {} --output {}\"; DO NOT EDIT.",
        config.source_dir, config.output
    );
    let rendered = render_file(&engine, config, &capabilities, &scan, &header)?;

    let (root, _) = scanner::split_source_dir(&config.source_dir);
    let out_path = Path::new(root).join(&config.output);
    fs::write(&out_path, rendered)?;
    println!("✅ Generated registration code → {out_path:?}");
    Ok(out_path)
}
