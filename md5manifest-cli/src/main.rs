use clap::Parser;
use md5manifest::generator::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT};
use md5manifest::fallback::FALLBACK_FILE;
use md5manifest::{generate_with, GenerateOptions, ManifestError};
use std::path::PathBuf;
use std::process;
use tracing::Level;

/// Write a line-delimited JSON manifest of file names and MD5 checksums
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory whose top-level files are cataloged
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    input: PathBuf,

    /// Manifest file to write
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// File copied into the input directory when it does not exist
    #[arg(long, value_name = "FILE", default_value = FALLBACK_FILE)]
    fallback: PathBuf,

    /// Never use a fallback file
    #[arg(long, conflicts_with = "fallback")]
    no_fallback: bool,

    /// Log per-file digests and skipped entries
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> Result<usize, ManifestError> {
    let fallback = (!args.no_fallback).then_some(args.fallback);
    let options = GenerateOptions::new(args.input, args.output).with_fallback(fallback);
    tracing::debug!(?options, "Resolved options");

    generate_with(&options)
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .compact()
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
