//! Test fixture generator
//!
//! Writes the sample PDFs the merge tool's tests run against.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pdf_mergician_tools::pdf::{count_pages, default_fixtures, generate_fixtures, WriterKind};

/// Generate PDF test fixtures for pdf-mergician
#[derive(Parser)]
#[command(name = "mergician-fixtures")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to write fixtures into
    #[arg(short, long, default_value = "tests/fixtures")]
    dir: PathBuf,

    /// Write blank pages instead of rendered text
    #[arg(long)]
    blank: bool,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let kind = if cli.blank {
        WriterKind::BlankPages
    } else {
        WriterKind::RichText
    };
    let writer = kind.writer();

    println!("Creating test PDF fixtures...");

    let paths = generate_fixtures(&cli.dir, &default_fixtures(), writer.as_ref())?;

    for path in &paths {
        let pages = count_pages(path)?;
        let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
        println!("  ✓ Created {} ({})", name, writer.describe(pages));
    }

    println!("\n✅ All test fixtures created successfully!");
    println!("   Location: {}", cli.dir.display());

    Ok(())
}
