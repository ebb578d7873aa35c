//! xlmfill - recovers CHAR-chain payloads from exported XLM macro sheets

use anyhow::{ensure, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xlm_fill::prelude::*;

#[derive(Parser)]
#[command(name = "xlmfill")]
#[command(
    author,
    version,
    about = "Fill in GET.CELL-obfuscated CHAR chains of Excel 4.0 macro sheets"
)]
struct Cli {
    /// Cell table CSV files (`@list` reads one path per line from `list`)
    #[arg(required = true)]
    files: Vec<String>,

    /// File of expected payload fragments, one per line
    #[arg(short, long)]
    expected: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not apply the built-in fragments
    #[arg(long)]
    no_builtin: bool,

    /// Maximum number of passes over the fragment list
    #[arg(long, default_value = "16")]
    max_passes: usize,

    /// Log and skip sources that fail instead of stopping
    #[arg(long)]
    ignore_processing_errors: bool,

    /// Field delimiter of the cell tables
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let errors = run(&cli)?;
    if errors > 0 {
        eprintln!("Number of errors: {}", errors);
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Process every source, returning the number of skipped sources
fn run(cli: &Cli) -> Result<usize> {
    ensure!(
        cli.delimiter.is_ascii(),
        "Delimiter must be an ASCII character, got '{}'",
        cli.delimiter
    );
    let table_options = CellTableOptions {
        delimiter: cli.delimiter as u8,
        ..Default::default()
    };

    let mut options = SolveOptions::default().with_max_passes(cli.max_passes);
    if cli.no_builtin {
        options = options.without_builtin_fragments();
    }
    if let Some(path) = &cli.expected {
        let fragments = read_lines(path)
            .with_context(|| format!("Failed to read expected fragments '{}'", path.display()))?;
        tracing::info!(count = fragments.len(), "loaded expected fragments");
        options = options.with_expected(fragments);
    }

    let sources = expand_sources(&cli.files)?;

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut errors = 0;
    for source in &sources {
        match process(source, &table_options, &options) {
            Ok(payloads) => {
                for payload in payloads {
                    writeln!(out, "{}", payload)?;
                }
            }
            Err(e) if cli.ignore_processing_errors => {
                errors += 1;
                tracing::error!(
                    source = %source.display(),
                    error = %format!("{:#}", e),
                    "skipping source"
                );
            }
            Err(e) => return Err(e),
        }
    }
    out.flush()?;

    Ok(errors)
}

fn process(
    path: &Path,
    table_options: &CellTableOptions,
    options: &SolveOptions,
) -> Result<Vec<String>> {
    let mut deobfuscator = Deobfuscator::from_file(path, table_options)
        .with_context(|| format!("Failed to process '{}'", path.display()))?;
    let report = deobfuscator.solve(options);
    tracing::info!(
        source = %path.display(),
        chains = report.chains,
        resolved = report.resolved_chains,
        "processed"
    );
    Ok(deobfuscator.payloads())
}

/// Expand `@list` arguments into the paths they list
fn expand_sources(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for arg in args {
        match arg.strip_prefix('@') {
            Some(list) => {
                let paths = read_lines(Path::new(list))
                    .with_context(|| format!("Failed to read file list '{}'", list))?;
                sources.extend(paths.into_iter().map(PathBuf::from));
            }
            None => sources.push(PathBuf::from(arg)),
        }
    }
    Ok(sources)
}

/// Non-empty lines of a text file, without line terminators
fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
