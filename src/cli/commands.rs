use crate::generator::{generate, Config};
use crate::scanner;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for the typereg code generator
///
/// Provides commands for generating registration code from a Rust source
/// tree and for inspecting what the scanner discovers.
#[derive(Parser)]
#[command(name = "typereg-gen")]
#[command(about = "typereg code generator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for typereg-gen
#[derive(Subcommand)]
pub enum Commands {
    /// Generate registration code and setters from a source tree
    Generate {
        /// Source directory to scan, "." unless set here or in the config
        /// file (append /... to recurse into subdirectories)
        #[arg(short, long)]
        source_dir: Option<String>,

        /// Output file location relative to the scanned directory
        #[arg(short, long)]
        output: Option<String>,

        /// Path to a TOML configuration file; CLI path flags still override
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Register type declarations
        #[arg(long, default_value_t = true)]
        types: bool,

        /// Register free functions
        #[arg(long, default_value_t = false)]
        funcs: bool,

        /// Register package-level statics
        #[arg(long, default_value_t = false)]
        vars: bool,

        /// Register package-level consts
        #[arg(long, default_value_t = false)]
        consts: bool,

        /// Attach a Default::default() instance to each registered type
        #[arg(long, default_value_t = false)]
        instance: bool,

        /// Emit a named global handle (FOO_TYPE) per registered type
        #[arg(long, default_value_t = false)]
        type_var: bool,

        /// Synthesize chainable setter methods for eligible fields
        #[arg(long, default_value_t = false)]
        setters: bool,
    },
    /// Scan a source tree and print the discovered declarations
    Inspect {
        /// Source directory to scan (append /... to recurse into subdirectories)
        #[arg(short, long, default_value = ".")]
        source_dir: String,

        /// Emit the scan result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the source tree cannot
/// be scanned, or generation fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate {
            source_dir,
            output,
            config,
            types,
            funcs,
            vars,
            consts,
            instance,
            type_var,
            setters,
        } => {
            // A config file provides the full shape (including capability
            // entries, which have no flag form); flags provide the rest.
            let mut cfg = match config {
                Some(path) => Config::from_file(path)?,
                None => Config {
                    types: *types,
                    funcs: *funcs,
                    vars: *vars,
                    consts: *consts,
                    instance: *instance,
                    type_var: *type_var,
                    setters: *setters,
                    ..Config::default()
                },
            };
            if let Some(source_dir) = source_dir {
                cfg.source_dir = source_dir.clone();
            }
            if let Some(output) = output {
                cfg.output = output.clone();
            }
            generate(&cfg)?;
            Ok(())
        }
        Commands::Inspect { source_dir, json } => {
            let scan = scanner::scan(source_dir)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&scan)?);
                return Ok(());
            }
            println!("📦 {} ({} types, {} functions)", scan.crate_name, scan.types.len(), scan.funcs.len());
            for decl in &scan.types {
                println!(
                    "  {} — {} fields, {} embeds, {} methods, {} directives",
                    decl.name,
                    decl.fields.len(),
                    decl.embeds.len(),
                    decl.methods.len(),
                    decl.directives.len()
                );
            }
            for func in &scan.funcs {
                println!(
                    "  fn {} — {} args, {} returns",
                    func.name,
                    func.args.len(),
                    func.returns.len()
                );
            }
            Ok(())
        }
    }
}
