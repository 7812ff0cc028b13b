//! typeshape CLI
//!
//! Command-line interface for validating JSON payloads against schema
//! documents and exporting schemas to standard JSON Schema.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use typeshape::{
    export_checked, load_document, load_schema_auto, validate_with, ValidateOptions,
    DEFAULT_MAX_DEPTH,
};

#[derive(Parser)]
#[command(name = "typeshape")]
#[command(about = "Validate JSON values against typeshape schema documents")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload against a schema document
    Validate {
        /// Payload file to validate
        payload: PathBuf,

        /// Schema source: file path or URL (http:// or https://)
        #[arg(long)]
        schema: String,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Enforce pattern, minimum and maximum constraints
        #[arg(long)]
        enforce_refinements: bool,

        /// Maximum nesting depth before validation gives up
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Export a schema document as standard JSON Schema
    Export {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check that a schema document is well-formed
    Check {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            payload,
            schema,
            json,
            enforce_refinements,
            max_depth,
        } => {
            let options = ValidateOptions::new()
                .max_depth(max_depth)
                .enforce_refinements(enforce_refinements);
            run_validate(&payload, &schema, &options, json)
        }
        Commands::Export {
            schema,
            output,
            pretty,
        } => run_export(&schema, output, pretty),
        Commands::Check { schema } => run_check(&schema),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(
    payload_path: &Path,
    schema_source: &str,
    options: &ValidateOptions,
    json_output: bool,
) -> Result<(), u8> {
    let payload = load_document(payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let schema = load_schema_auto(schema_source).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    debug!(?options, "validating payload");
    match validate_with(&payload, &schema, options) {
        Ok(_) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(error) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "error": error
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                eprintln!("  {}", error);
            }
            Err(1)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        let output = serde_json::json!({ "valid": false, "message": msg });
        println!("{}", output);
    } else {
        eprintln!("Error: {}", msg);
    }
}

fn run_export(schema_source: &str, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let schema = load_schema_auto(schema_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let document = export_checked(&schema).map_err(|e| {
        eprintln!("Error: {}", e);
        2u8
    })?;

    let json_output = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
            info!(path = %path.display(), "wrote exported schema");
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_check(schema_source: &str) -> Result<(), u8> {
    match load_schema_auto(schema_source) {
        Ok(_) => {
            println!("Schema OK");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(e.exit_code() as u8)
        }
    }
}
