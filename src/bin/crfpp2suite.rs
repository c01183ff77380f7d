//! Command-line converter from CRF++ data to CRFsuite data
//!
//! Usage:
//!   crfpp2suite INPUT_DATA TEMPLATE OUTPUT_DATA [--separator SEP] [--no-label] [--no-escape] [--keep-empty] [-v]
//!
//! Exits with status 2 on bad arguments and 1 when the conversion fails.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use crfs_template::Converter;
use tracing_subscriber::EnvFilter;

/// Expand a CRF++ template over CRF++ training data and write CRFsuite items
#[derive(Parser, Debug)]
#[command(name = "crfpp2suite", version, about)]
struct Cli {
    /// CRF++ data file: whitespace separated features, label last
    input_data: PathBuf,
    /// CRF++ feature template file
    template: PathBuf,
    /// Output file in the CRFsuite data format
    output_data: PathBuf,
    /// Column separator, `\t` is read as a tab
    #[arg(long, default_value = "\\t")]
    separator: String,
    /// Do not write the label column
    #[arg(long)]
    no_label: bool,
    /// Do not escape `\` and `:` in attribute names
    #[arg(long)]
    no_escape: bool,
    /// Keep rules that expand to an empty string
    #[arg(long)]
    keep_empty: bool,
    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let converter = Converter::new()
        .with_separator(&cli.separator.replace("\\t", "\t"))?
        .with_label(!cli.no_label)
        .with_escape(!cli.no_escape)
        .with_skip_empty(!cli.keep_empty);

    converter
        .convert(&cli.input_data, &cli.template, &cli.output_data)
        .with_context(|| {
            format!(
                "cannot convert {} with template {}",
                cli.input_data.display(),
                cli.template.display()
            )
        })?;
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
