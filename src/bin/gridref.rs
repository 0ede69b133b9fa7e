//! Convert grid references from the command line.
//!
//! References are taken from the arguments, or one per line from stdin.

use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use serde::Serialize;

use gridref::batch;
use gridref::{Reference, ReferenceKind};

#[derive(Parser)]
#[command(name = "gridref")]
#[command(about = "Convert between lat/lon, ECEF, UTM, MGRS and OS National Grid references")]
#[command(version)]
struct Cli {
    /// References to convert; read from stdin when none are given
    references: Vec<String>,

    /// Kind of the input references (geodetic, cartesian, utm, mgrs, osgrid)
    #[arg(short, long, value_parser = parse_kind)]
    from: ReferenceKind,

    /// Kind to convert to
    #[arg(short, long, value_parser = parse_kind)]
    to: ReferenceKind,

    /// Output precision: decimals for lat/lon, ECEF and UTM, total digits for MGRS and OS grid
    #[arg(short, long)]
    digits: Option<usize>,

    /// Emit one JSON object per line
    #[arg(long)]
    json: bool,

    /// Log level (off, error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LevelFilter>,
}

fn parse_kind(s: &str) -> Result<ReferenceKind, String> {
    ReferenceKind::from_name(s).ok_or_else(|| format!("Unknown reference kind: {s}"))
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("Unknown log level: {s}"))
}

#[derive(Serialize)]
struct Converted<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn init_logging(level: Option<LevelFilter>) {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.parse_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn read_stdin() -> io::Result<Vec<String>> {
    io::stdin()
        .lock()
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let inputs = if cli.references.is_empty() {
        match read_stdin() {
            Ok(lines) => lines,
            Err(e) => {
                log::error!("Failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        cli.references
    };

    log::info!("converting {} references from {} to {}", inputs.len(), cli.from, cli.to);
    let results = batch::convert(inputs.as_slice(), cli.from, cli.to);

    let mut failed = false;
    for (input, result) in inputs.iter().zip(&results) {
        let formatted = result
            .as_ref()
            .map_err(|e| e.clone())
            .and_then(|r| r.format(cli.digits));

        if let Err(e) = &formatted {
            log::error!("{e}");
            failed = true;
        }

        if cli.json {
            let (output, error) = match formatted {
                Ok(text) => (Some(text), None),
                Err(e) => (None, Some(e.to_string())),
            };
            let record = Converted {
                input,
                output,
                reference: result.as_ref().ok(),
                error,
            };
            match serde_json::to_string(&record) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    log::error!("Failed to serialize result for '{input}': {e}");
                    failed = true;
                }
            }
        } else if let Ok(text) = formatted {
            println!("{text}");
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
