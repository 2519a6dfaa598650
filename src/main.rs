use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ini::{Entry, ReadOptions};
use tracing_subscriber::EnvFilter;

/// Read a config file and print its entries.
#[derive(Debug, Parser)]
#[command(name = "ini", version, about, long_about = None)]
struct Cli {
    /// File to read; standard input when omitted.
    path: Option<PathBuf>,

    /// Print the document again in canonical form instead of listing entries.
    #[arg(short, long)]
    normalize: bool,

    /// Reject section names containing '[', ']', '\', '=' or '#'.
    #[arg(long)]
    strict: bool,

    /// Reject lines longer than this many bytes.
    #[arg(long, value_name = "BYTES")]
    max_line_length: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ReadOptions::new()
        .strict_sections(cli.strict)
        .max_line_length(cli.max_line_length);

    let source: Box<dyn Read> = match &cli.path {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let mut entries = Vec::<Entry>::with_capacity(32);
    ini::read_with(source, options, |entry| {
        entries.push(entry);
        Ok::<_, std::convert::Infallible>(())
    })
    .context("failed to parse config")?;

    let stdout = BufWriter::new(io::stdout().lock());

    if cli.normalize {
        ini::write_all(stdout, &entries).context("failed to write config")?;
    } else {
        print_entries(stdout, &entries).context("failed to write entries")?;
    }

    Ok(())
}

fn print_entries<W: Write>(mut out: W, entries: &[Entry]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{:?} / {:?} = {:?}", entry.section, entry.key, entry.value)?;
    }

    out.flush()
}
