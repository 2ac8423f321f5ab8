mod build;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use signscript_core::{compile_to_json, compile_with, format_script, CompileError};
use signscript_records::PipelineConfig;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Sign-language animation script toolchain.
#[derive(Parser)]
#[command(
    name = "signscript",
    version,
    about = "Sign-language animation script toolchain"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log pipeline progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to signscript.toml (default: ./signscript.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a script to animation JSON
    Compile {
        /// Path to the script file
        file: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Print the canonical layout of a raw script
    Format {
        /// Path to the raw script file
        file: PathBuf,
    },

    /// Build the database script and compiled JSON from exported sheet rows
    Build {
        /// JSON array of rows; the first row is the header
        rows: PathBuf,
        /// Output directory
        #[arg(long, default_value = "build")]
        out: PathBuf,
    },

    /// Validate compiled JSON against the document schema
    Validate {
        /// Path to the compiled JSON document
        document: PathBuf,
    },

    /// Compile a script and summarize it without writing JSON
    Check {
        /// Path to the script file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref(), cli.output, cli.quiet);

    match cli.command {
        Commands::Compile { file, out } => {
            cmd_compile(&file, out.as_deref(), &config, cli.output, cli.quiet);
        }
        Commands::Format { file } => {
            cmd_format(&file, &config, cli.output, cli.quiet);
        }
        Commands::Build { rows, out } => {
            build::cmd_build(&rows, &out, &config, cli.output, cli.quiet);
        }
        Commands::Validate { document } => {
            cmd_validate(&document, cli.output, cli.quiet);
        }
        Commands::Check { file } => {
            cmd_check(&file, &config, cli.output, cli.quiet);
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::WARN
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

const DEFAULT_CONFIG: &str = "signscript.toml";

fn load_config(path: Option<&Path>, output: OutputFormat, quiet: bool) -> PipelineConfig {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG);
            if !p.exists() {
                return PipelineConfig::default();
            }
            p
        }
    };
    match PipelineConfig::load(&path) {
        Ok(c) => {
            tracing::debug!(path = %path.display(), "loaded config");
            c
        }
        Err(e) => {
            let msg = format!("error loading config '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn read_source(path: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn report_compile_error(e: &CompileError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                for lex in e.lex_errors() {
                    eprintln!("warning: {}", lex);
                }
                eprintln!("{} error: {}", e.kind(), e);
            }
        }
    }
}

fn cmd_compile(
    file: &Path,
    out: Option<&Path>,
    config: &PipelineConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let src = read_source(file, output, quiet);
    let (json, lex_errors) = match compile_to_json(&src, &config.compile, &config.output) {
        Ok(r) => r,
        Err(e) => {
            report_compile_error(&e, output, quiet);
            process::exit(1);
        }
    };
    if !quiet {
        for e in &lex_errors {
            eprintln!("warning: {}", e);
        }
    }
    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, format!("{}\n", json)) {
                let msg = format!("error writing '{}': {}", path.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
            if !quiet && output == OutputFormat::Text {
                println!("wrote {}", path.display());
            }
        }
        None => println!("{}", json),
    }
}

fn cmd_format(file: &Path, config: &PipelineConfig, output: OutputFormat, quiet: bool) {
    let raw = read_source(file, output, quiet);
    let formatted = format_script(&raw, &config.format);
    match output {
        OutputFormat::Text => {
            if !quiet {
                for w in &formatted.warnings {
                    eprintln!("warning: {}", w);
                }
            }
            println!("{}", formatted.text);
        }
        OutputFormat::Json => {
            let warnings: Vec<String> = formatted.warnings.iter().map(|w| w.to_string()).collect();
            let value = serde_json::json!({
                "text": formatted.text,
                "warnings": warnings,
            });
            let pretty = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", pretty);
        }
    }
}

static COMPILED_SCHEMA_STR: &str = include_str!("../../../schema/compiled-schema.json");

fn cmd_validate(doc_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(COMPILED_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc_str = read_source(doc_path, output, quiet);
    let doc: serde_json::Value = match serde_json::from_str(&doc_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", doc_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let mut errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect();
    // The schema cannot tie a wrapper key to its `name` field.
    if errors.is_empty() {
        if let Err(e) = signscript_interchange::from_compiled(&doc) {
            errors.push(e.to_string());
        }
    }

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid"),
                OutputFormat::Json => println!("{{\"valid\": true}}"),
            }
        }
        return;
    }

    match output {
        OutputFormat::Text => {
            if !quiet {
                for e in &errors {
                    eprintln!("{}", e);
                }
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({ "valid": false, "errors": errors });
            let pretty = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|_| "{\"valid\": false}".to_string());
            eprintln!("{}", pretty);
        }
    }
    process::exit(1);
}

fn cmd_check(file: &Path, config: &PipelineConfig, output: OutputFormat, quiet: bool) {
    let src = read_source(file, output, quiet);
    let compiled = match compile_with(&src, &config.compile) {
        Ok(c) => c,
        Err(e) => {
            report_compile_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let doc = &compiled.document;
    let collisions = doc.by_name().collisions;

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let lexical: Vec<String> = compiled.lex_errors.iter().map(|e| e.to_string()).collect();
            let dup: Vec<serde_json::Value> = collisions
                .iter()
                .map(|c| serde_json::json!({ "name": c.name, "indices": c.indices }))
                .collect();
            let value = serde_json::json!({
                "animations": doc.len(),
                "poses": doc.pose_count(),
                "lexical_errors": lexical,
                "collisions": dup,
            });
            let pretty = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            println!("Script Summary");
            println!("==============");
            println!();
            println!("  Animations: {}", doc.len());
            println!("  Poses: {}", doc.pose_count());
            for anim in &doc.animations {
                println!("    {} ({} poses)", anim.name, anim.poses.len());
            }
            if compiled.lex_errors.is_empty() {
                println!("  Lexical errors: none");
            } else {
                println!("  Lexical errors: {}", compiled.lex_errors.len());
                for e in &compiled.lex_errors {
                    println!("    {}", e);
                }
            }
            for c in &collisions {
                println!(
                    "  WARNING: '{}' defined {} times, last definition wins",
                    c.name,
                    c.indices.len()
                );
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
