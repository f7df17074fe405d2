//! Councillor roster CLI
//!
//! Command-line tool for merging roster changes, validating rosters, and
//! publishing Popolo JSON per region.

use clap::{Parser, Subcommand};
use councillor_core::{load, scan_regions, validate, Config, CsvMerger, Error, ErrorKind, Processor};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "councillor")]
#[command(about = "Local councillor roster tools", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file (data directory, key column, file names)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a changes CSV into a master CSV, rewriting the master
    Merge {
        /// Master roster CSV
        #[arg(short, long)]
        master: PathBuf,

        /// Changes CSV with the same header as the master
        #[arg(short, long)]
        changes: PathBuf,
    },

    /// Check that a changes CSV has the same header as the master
    CheckChanges {
        #[arg(short, long)]
        master: PathBuf,

        #[arg(short, long)]
        changes: PathBuf,
    },

    /// Report duplicate ids, blank ids and bad dates in a roster
    Validate {
        /// Roster CSV
        #[arg(long)]
        csv: PathBuf,
    },

    /// List regions with a roster under the data directory
    Regions,

    /// Regenerate a region's Popolo JSON from its roster
    Popolo {
        /// Region code, e.g. NSW
        #[arg(short, long)]
        region: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code(&e)
        }
    }
}

/// Distinct exit status per failure kind
fn exit_code(error: &Error) -> ExitCode {
    match error.kind() {
        ErrorKind::NotFound => ExitCode::from(2),
        ErrorKind::HeaderMismatch => ExitCode::from(3),
        ErrorKind::MalformedData => ExitCode::from(4),
        ErrorKind::DuplicateKey => ExitCode::from(5),
        ErrorKind::Other => ExitCode::FAILURE,
    }
}

fn run() -> councillor_core::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    match cli.command {
        Commands::Merge { master, changes } => cmd_merge(&config, &master, &changes),
        Commands::CheckChanges { master, changes } => cmd_check_changes(&master, &changes),
        Commands::Validate { csv } => cmd_validate(&config, &csv),
        Commands::Regions => cmd_regions(&config),
        Commands::Popolo { region } => cmd_popolo(&config, &region),
    }
}

fn cmd_merge(config: &Config, master: &Path, changes: &Path) -> councillor_core::Result<ExitCode> {
    let outcome = CsvMerger::new(master, changes)
        .with_key_column(config.key_column.clone())
        .merge()?;

    println!("Merged {} into {}", changes.display(), master.display());
    println!("  {} rows updated", outcome.updated.len());
    println!("  {} rows appended", outcome.appended.len());
    println!("  {} rows total", outcome.dataset.row_count());

    Ok(ExitCode::SUCCESS)
}

fn cmd_check_changes(master: &Path, changes: &Path) -> councillor_core::Result<ExitCode> {
    let (master_header, changes_header) = CsvMerger::new(master, changes).headers()?;
    if master_header == changes_header {
        println!("Headers match");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Headers do not match");
    println!("  master:  {}", master_header.join(","));
    println!("  changes: {}", changes_header.join(","));
    Ok(exit_code(&Error::HeaderMismatch {
        expected: master_header,
        found: changes_header,
    }))
}

fn cmd_validate(config: &Config, csv: &Path) -> councillor_core::Result<ExitCode> {
    let roster = load(csv)?;
    let report = validate(&roster, &config.key_column)?;

    println!("File: {}", csv.display());
    println!("Rows: {}", roster.row_count());

    if report.is_valid() {
        println!("No problems found");
        return Ok(ExitCode::SUCCESS);
    }

    if !report.duplicate_ids.is_empty() {
        println!("\nDuplicate ids ({}):", report.duplicate_ids.len());
        for id in &report.duplicate_ids {
            println!("  {}", id);
        }
    }

    if !report.blank_ids.is_empty() {
        println!("\nRows with a blank id ({}):", report.blank_ids.len());
        for row in &report.blank_ids {
            println!("  row {}", row);
        }
    }

    if !report.invalid_dates.is_empty() {
        println!("\nInvalid dates ({}):", report.invalid_dates.len());
        for issue in &report.invalid_dates {
            println!(
                "  row {}, {} = '{}': {}",
                issue.row, issue.column, issue.value, issue.reason
            );
        }
    }

    if report.duplicate_ids.is_empty() {
        Ok(ExitCode::from(4))
    } else {
        Ok(ExitCode::from(5))
    }
}

fn cmd_regions(config: &Config) -> councillor_core::Result<ExitCode> {
    let regions = scan_regions(&config.data_dir, &config.master_file_name)?;

    println!("Regions in {} ({}):", config.data_dir.display(), regions.len());
    for region in &regions {
        println!("  {}", region);
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_popolo(config: &Config, region: &str) -> councillor_core::Result<ExitCode> {
    let processor = Processor::new(config, region);
    let popolo = processor.update_popolo()?;

    println!(
        "Wrote {} ({} persons, {} organizations, {} memberships)",
        processor.paths().popolo_json.display(),
        popolo.persons.len(),
        popolo.organizations.len(),
        popolo.memberships.len()
    );

    Ok(ExitCode::SUCCESS)
}
