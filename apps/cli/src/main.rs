//! `sift` - validate an array-shaped field of a JSON record from the shell.
//!
//! # Commands
//!
//! - `sift check --input <model.json> --config <field.json> --field <name>`:
//!   run the field processor and print the updated record
//! - `sift validators`: list registered validator kinds
//!
//! Exit codes: 0 on success, 1 when validation fails, 2 on any other error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use sift_validator::prelude::*;

mod logging;

/// Declarative validation for array-shaped record fields
#[derive(Parser)]
#[command(name = "sift")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one field of a JSON record
    Check(CheckArgs),

    /// List registered validator kinds
    Validators,
}

#[derive(Args)]
struct CheckArgs {
    /// JSON file holding the host record (an object)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// JSON file holding the field configuration
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Name of the field to validate
    #[arg(short, long)]
    field: String,

    /// Treat the field as a list of records
    #[arg(long, overrides_with = "no_each")]
    each: bool,

    /// Treat the field as a single record, overriding the configuration file
    #[arg(long, overrides_with = "each")]
    no_each: bool,

    /// JSON envelope mode, overriding the configuration file
    #[arg(long, value_name = "MODE")]
    json: Option<JsonMode>,
}

/// Outcome of a command that ran to completion.
enum Status {
    Ok,
    Invalid,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {err}");
    }

    let result = match cli.command {
        Commands::Check(args) => check(&args),
        Commands::Validators => {
            list_validators();
            Ok(Status::Ok)
        }
    };

    match result {
        Ok(Status::Ok) => ExitCode::SUCCESS,
        Ok(Status::Invalid) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn check(args: &CheckArgs) -> anyhow::Result<Status> {
    let mut config = load_config(&args.config)?;
    if args.each {
        config.each = true;
    } else if args.no_each {
        config.each = false;
    }
    if let Some(mode) = args.json {
        config.json = mode;
    }

    let mut model = load_model(&args.input)?;
    let processor = FieldProcessor::new(config);

    let outcome = processor
        .process(&mut model, &args.field)
        .with_context(|| format!("cannot process field `{}`", args.field))?;

    match outcome {
        FieldOutcome::Written(_) => {
            tracing::info!(field = %args.field, "field valid");
            println!("{}", serde_json::to_string_pretty(&model.into_value())?);
            Ok(Status::Ok)
        }
        FieldOutcome::Rejected(_) => {
            for (field, messages) in model.errors() {
                for message in messages {
                    println!("{field}: {message}");
                }
            }
            Ok(Status::Invalid)
        }
    }
}

fn list_validators() {
    for name in ValidatorRegistry::new().validator_names() {
        println!("{name}");
    }
}

fn load_config(path: &Path) -> anyhow::Result<FieldConfig> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    FieldConfig::from_json_str(&source)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn load_model(path: &Path) -> anyhow::Result<Model> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot read input {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&source)
        .with_context(|| format!("input {} is not valid JSON", path.display()))?;
    match Model::from_value(value) {
        Some(model) => Ok(model),
        None => bail!("input {} must contain a JSON object", path.display()),
    }
}
