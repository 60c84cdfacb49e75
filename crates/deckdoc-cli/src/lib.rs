use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deckdoc_ops::{dispatch, run_request, OpError, MODULES};
use deckdoc_params::ParamBag;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "deckdoc", version, about = "Slide document operation runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single operation, e.g. `deckdoc run slides.add --params '{"path": "deck.json"}'`
    Run {
        /// Operation name in `module.operation` form
        #[arg(value_name = "OPERATION")]
        operation: String,

        /// Operation parameters as a JSON object
        #[arg(long, value_name = "JSON", default_value = "{}")]
        params: String,
    },
    /// Execute a JSON request `{"operation": ..., ...params}` from a file
    /// (use '-' for stdin)
    Request {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List the operation modules this build understands
    Modules,
}

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { operation, params } => {
            let bag = match ParamBag::from_json_str(&params) {
                Ok(bag) => bag,
                Err(err) => return fail(&OpError::from(err)),
            };
            match dispatch(&operation, &bag) {
                Ok(report) => {
                    println!("{}", report.render());
                    Ok(0)
                }
                Err(err) => fail(&err),
            }
        }
        Command::Request { file } => {
            let raw = read_request(&file)?;
            let request: Value = serde_json::from_str(&raw)
                .with_context(|| format!("request '{}' is not valid JSON", file.display()))?;
            match run_request(request) {
                Ok(report) => {
                    println!("{}", report.render());
                    Ok(0)
                }
                Err(err) => fail(&err),
            }
        }
        Command::Modules => {
            for module in MODULES {
                println!("{module}");
            }
            Ok(0)
        }
    }
}

fn read_request(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read request from stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(file)
            .with_context(|| format!("failed to read request file '{}'", file.display()))
    }
}

fn fail(err: &OpError) -> Result<i32> {
    eprintln!("deckdoc error: {err}");
    Ok(err.exit_code() as i32)
}
