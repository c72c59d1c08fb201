
mod db;
mod error;
mod export;
mod input;
mod parser;
mod settings;
mod table;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::settings::Settings;
use crate::export::truncate;
use crate::parser::DocumentOutcome;

#[derive(Parser)]
#[command(name = "tabu_parser", about = "Convert Tabu land-registry extracts into subplot tables")]
struct Cli {
    /// SQLite database path (env: TABU_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Line offset of the gush/plot banner on each page (env: TABU_BANNER_LINE)
    #[arg(long, global = true)]
    banner_line: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse extracts and print their subplot tables
    Convert {
        /// Extracted text (form-feed page breaks) or JSON pages
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse extracts and store their rows in the database
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Stored subplots overview table
    Overview {
        #[arg(short, long)]
        gush: Option<String>,
        #[arg(short, long)]
        plot: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show database statistics
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?.with_overrides(cli.db, cli.banner_line);

    let result = match cli.command {
        Commands::Convert {
            files,
            format,
            output,
        } => {
            let outcomes = parse_documents(&files, settings.banner_line)
                .into_iter()
                .collect::<Result<Vec<_>>>()?;
            let documents: Vec<(String, DocumentOutcome)> = files
                .iter()
                .map(|p| p.display().to_string())
                .zip(outcomes)
                .collect();

            let out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(io::stdout().lock()),
            };
            write_documents(out, format, &documents)
        }
        Commands::Import { files } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;

            let mut imported = 0usize;
            let mut rows = 0usize;
            let mut failed = 0usize;
            for (path, result) in files.iter().zip(parse_documents(&files, settings.banner_line)) {
                match result {
                    Ok(outcome) => {
                        let table = table::assemble_parsed(outcome.subplots());
                        db::save_document(&conn, &path.display().to_string(), outcome.status(), &table.rows)?;
                        imported += 1;
                        rows += table.rows.len();
                    }
                    Err(e) => {
                        error!("{:#}", e);
                        failed += 1;
                    }
                }
            }
            println!("Imported {} documents ({} subplots) into {}", imported, rows, settings.db_path.display());
            if failed > 0 {
                bail!("{} of {} documents could not be parsed", failed, files.len());
            }
            Ok(())
        }
        Commands::Overview { gush, plot, limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, gush.as_deref(), plot.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No subplots found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<8} | {:<6} | {:<14} | {:>8} | {:<12} | {:<8} | {:>6} | {:>9}",
                "#", "Gush", "Plot", "Subplot", "Area", "Floor", "Share", "Owners", "Mortgages"
            );
            println!("{}", "-".repeat(100));
            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:<8} | {:<6} | {:<14} | {:>8} | {:<12} | {:<8} | {:>6} | {:>9}",
                    i + 1,
                    r.gush,
                    r.plot,
                    truncate(&r.subplot, 14),
                    r.area,
                    truncate(&r.floor, 12),
                    r.share,
                    r.owners,
                    r.mortgages
                );
            }
            println!("\n{} subplots", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Documents: {}", s.documents);
            println!("Empty:     {}", s.empty_documents);
            println!("Subplots:  {}", s.subplots);
            println!("Parcels:   {}", s.parcels);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

/// Parse documents in parallel; results keep argument order.
fn parse_documents(files: &[PathBuf], banner_line: usize) -> Vec<Result<DocumentOutcome>> {
    let pb = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let results = files
        .par_iter()
        .map(|path| {
            let result = parse_document(path, banner_line);
            pb.inc(1);
            result
        })
        .collect();

    pb.finish_and_clear();
    results
}

fn parse_document(path: &Path, banner_line: usize) -> Result<DocumentOutcome> {
    let pages = input::read_document(path)?;
    let outcome = parser::process_document(pages, banner_line)
        .with_context(|| format!("{} does not match the Tabu extract layout", path.display()))?;

    match &outcome {
        DocumentOutcome::NoText => warn!(path = %path.display(), "no text found"),
        DocumentOutcome::NoData => warn!(path = %path.display(), "no subplot data found"),
        DocumentOutcome::Parsed(subplots) => {
            info!(path = %path.display(), subplots = subplots.len(), "parsed document")
        }
    }
    Ok(outcome)
}

fn write_documents(
    mut out: Box<dyn Write>,
    format: Format,
    documents: &[(String, DocumentOutcome)],
) -> Result<()> {
    match format {
        Format::Json => export::write_json(&mut out, documents)?,
        Format::Table => {
            for (source, outcome) in documents {
                let table = table::assemble_parsed(outcome.subplots());
                export::write_preview(&mut out, source, &table)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
