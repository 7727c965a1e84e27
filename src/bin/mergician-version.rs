//! Version management CLI
//!
//! Issues `YYYY.MM.DD.build` versions and writes them into the project files.

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pdf_mergician_tools::config::VersionConfig;
use pdf_mergician_tools::date::SystemClock;
use pdf_mergician_tools::version::{JsonFileStore, PatchTarget, VersionManager};
use pdf_mergician_tools::Error;

type Manager = VersionManager<JsonFileStore, SystemClock>;

/// Date-based version management for pdf-mergician
#[derive(Parser)]
#[command(name = "mergician-version")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Issue the next version and update pyproject.toml and __init__.py
    mergician-version bump

    # Show the last issued version
    mergician-version --root ../pdf-mergician show")]
struct Cli {
    /// Project root holding the state file and the files to update
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (default: <root>/version.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Increment version and update files
    Bump,
    /// Display current version
    Show,
    /// Reset version state
    Reset,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => usage_exit(&e),
        },
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Report a bad invocation and print usage to stdout
fn usage_exit(err: &clap::Error) -> ! {
    let rendered = err.to_string();
    let reason = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");
    eprintln!("Error: {}", Error::Usage(reason.to_string()));
    println!("{}", Cli::command().render_help());
    process::exit(1);
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => VersionConfig::from_file(path)?,
        None => VersionConfig::discover(&cli.root)?,
    };

    let store = JsonFileStore::new(config.state_path(&cli.root));
    let mut manager = VersionManager::new(store, SystemClock);

    match cli.command {
        Commands::Bump => {
            // Compile targets first so a bad pattern can't leave a bumped but unpropagated version
            let targets = config.patch_targets(&cli.root)?;
            cmd_bump(&mut manager, &targets, &cli.root)
        }
        Commands::Show => cmd_show(&manager),
        Commands::Reset => cmd_reset(&mut manager),
    }
}

/// Issue the next version and write it into every target
fn cmd_bump(manager: &mut Manager, targets: &[PatchTarget], root: &Path) -> anyhow::Result<()> {
    let (version, results) = manager.bump(targets)?;

    println!("✓ Version bumped to {}", version);

    let mut failed = 0;
    for (target, result) in targets.iter().zip(results) {
        match result {
            Ok(true) => println!("  • Updated {}", relative_to(&target.path, root).display()),
            Ok(false) => {}
            Err(e) => {
                eprintln!("Warning: {}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{} of {} version declarations could not be updated",
            failed,
            targets.len()
        );
    }

    Ok(())
}

/// Display the current version
fn cmd_show(manager: &Manager) -> anyhow::Result<()> {
    let status = manager.status()?;

    println!("Current version: {}", status.version);

    if let Some(record) = status.record {
        if let Some(date) = record.date {
            println!("  Date: {}", date);
        }
        println!("  Build: {}", record.build);
    }

    Ok(())
}

/// Reset version state
fn cmd_reset(manager: &mut Manager) -> anyhow::Result<()> {
    manager.reset_state()?;
    println!("✓ Version state reset");
    Ok(())
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
