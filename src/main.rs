//! Blueprint CLI - validate and resolve blueprint documents.

use anyhow::{Context, Result};
use blueprint_validator::prelude::*;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "blueprint", version, about = "Validate and resolve blueprint documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a blueprint and resolve its references
    Check {
        /// Blueprint JSON file, or `-` for stdin
        file: String,

        /// Caller-supplied parameter, NAME=VALUE (repeatable)
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// TOML options file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Require `blueprintVersion` to be present
        #[arg(long)]
        strict_version: bool,

        /// Report discovered references
        #[arg(long)]
        debug: bool,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug = matches!(cli.command, Command::Check { debug: true, .. });
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::from(3)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let Command::Check {
        file,
        params,
        config,
        strict_version,
        debug,
        compact,
    } = cli.command;

    let mut options = match &config {
        Some(path) => ResolveOptions::from_toml_file(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => ResolveOptions::new(),
    };
    options = options.with_parameter_args(&params)?;
    if strict_version {
        options = options.with_strict_version(true);
    }
    if debug {
        options = options.with_debug(true);
    }

    let bytes = read_input(&file)?;
    let outcome = BlueprintEngine::new().validate_and_resolve(bytes, &options)?;

    let json = if compact {
        outcome.to_json_compact()?
    } else {
        outcome.to_json()?
    };
    println!("{}", json);

    Ok(if outcome.has_errors() {
        ExitCode::from(1)
    } else if outcome.unresolved_refs.is_some() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn read_input(file: &str) -> Result<Vec<u8>> {
    if file == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("reading blueprint from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read(file).with_context(|| format!("reading blueprint {}", file))
    }
}
