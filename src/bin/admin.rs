//! CLI administration tool for link-checker.
//!
//! Inspects the data directory offline: lists sets the recovery scan would
//! pick up, prints stored results, renders reports, probes single URLs and
//! cleans up temp files left by interrupted writes.
//!
//! # Usage
//!
//! ```bash
//! # Sets that are not done yet
//! cargo run --bin admin -- sets unfinished
//!
//! # One set with per-link results
//! cargo run --bin admin -- sets show 3
//!
//! # PDF report for sets 1 and 2
//! cargo run --bin admin -- report 1 2 --output report.pdf
//!
//! # Probe a URL once
//! cargo run --bin admin -- probe wikipedia.org
//!
//! # Remove leftover temp files
//! cargo run --bin admin -- store clean-tmp
//! ```
//!
//! # Environment Variables
//!
//! - `DATA_DIR` (optional): data directory, overridden by `--data-dir`
//! - `PROBE_*` (optional): probe timeouts and User-Agent, as for the server

use link_checker::application::services::ReportService;
use link_checker::config::Config;
use link_checker::domain::entities::{LinkSet, LinkState, SetStatus};
use link_checker::domain::probe::LinkProbe;
use link_checker::domain::repositories::LinkSetRepository;
use link_checker::infrastructure::persistence::FileSetRepository;
use link_checker::infrastructure::probe::HttpProbe;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing link-checker data.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory (defaults to `DATA_DIR` or `./data`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect stored link sets
    Sets {
        #[command(subcommand)]
        action: SetsAction,
    },

    /// Render stored sets into a PDF report
    Report {
        /// Set ids, rendered in this order
        #[arg(required = true)]
        ids: Vec<i64>,

        /// Output file
        #[arg(short, long, default_value = "report.pdf")]
        output: PathBuf,
    },

    /// Probe a single URL with the server's probe policy
    Probe {
        url: String,
    },

    /// Data directory maintenance
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// Link set subcommands.
#[derive(Subcommand)]
enum SetsAction {
    /// List sets that will be re-queued on the next start
    Unfinished,

    /// Show one set with per-link results
    Show { id: i64 },
}

/// Data directory subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Delete temp files left by interrupted writes
    CleanTmp {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    if let Commands::Probe { url } = &cli.command {
        return probe_url(&config, url).await;
    }

    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let repo = Arc::new(
        FileSetRepository::open(&data_dir)
            .await
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?,
    );

    match cli.command {
        Commands::Sets { action } => handle_sets_action(action, repo).await?,
        Commands::Report { ids, output } => write_report(repo, ids, output).await?,
        Commands::Store { action } => handle_store_action(action, repo).await?,
        Commands::Probe { .. } => {}
    }

    Ok(())
}

/// Dispatches link set commands.
async fn handle_sets_action(action: SetsAction, repo: Arc<FileSetRepository>) -> Result<()> {
    match action {
        SetsAction::Unfinished => list_unfinished(repo).await,
        SetsAction::Show { id } => show_set(repo, id).await,
    }
}

/// Lists sets whose status is not `done`.
///
/// # Output Format
///
/// ```text
/// 📋 Unfinished link sets
///
///   ID    Created              Links  Pending
///   ──────────────────────────────────────────
///   4     2025-11-14 10:30     3      2
/// ```
async fn list_unfinished(repo: Arc<FileSetRepository>) -> Result<()> {
    println!("{}", "📋 Unfinished link sets".bright_blue().bold());
    println!();

    let mut sets = repo
        .list_unfinished()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to scan link sets: {}", e))?;
    sets.sort_by_key(|s| s.id);

    if sets.is_empty() {
        println!("{}", "  Every stored set is done".green());
        return Ok(());
    }

    println!(
        "  {:<5} {:<20} {:<6} {:<7}",
        "ID".bright_white().bold(),
        "Created".bright_white().bold(),
        "Links".bright_white().bold(),
        "Pending".bright_white().bold()
    );
    println!("  {}", "─".repeat(42).bright_black());

    for set in &sets {
        println!(
            "  {:<5} {:<20} {:<6} {}",
            set.id.to_string().bright_black(),
            set.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            set.links.len(),
            set.unresolved_links().len().to_string().yellow()
        );
    }

    println!();
    println!("  Total: {}", sets.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Prints one set with the state of each distinct link.
async fn show_set(repo: Arc<FileSetRepository>, id: i64) -> Result<()> {
    let set = repo
        .get_set(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_set(&set);
    Ok(())
}

fn print_set(set: &LinkSet) {
    let status = match set.status {
        SetStatus::Done => "DONE".green(),
        SetStatus::Processing => "PROCESSING".yellow(),
    };

    println!("{} {}", "🔗 Link set".bright_blue().bold(), set.id.to_string().bold());
    println!();
    println!("  Status:  {}", status);
    println!(
        "  Created: {}",
        set.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!(
        "  Updated: {}",
        set.updated_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!();

    for url in set.distinct_links() {
        let (state, detail) = match set.results.get(&url) {
            Some(result) => (result.state, result.detail.as_str()),
            None => (LinkState::Unknown, ""),
        };

        let label = match state {
            LinkState::Available => state.label().green(),
            LinkState::NotAvailable => state.label().red(),
            LinkState::Processing | LinkState::Unknown => state.label().yellow(),
        };

        if detail.is_empty() {
            println!("  {}  {}", label, url.cyan());
        } else {
            println!("  {}  {} {}", label, url.cyan(), format!("({detail})").bright_black());
        }
    }
    println!();
}

/// Writes the PDF report for `ids` to `output`.
async fn write_report(repo: Arc<FileSetRepository>, ids: Vec<i64>, output: PathBuf) -> Result<()> {
    let service = ReportService::new(repo);
    let pdf = service
        .build_pdf(&ids)
        .await
        .map_err(|e| {
            let info = e.to_error_info();
            anyhow::anyhow!("Failed to build report: {} {}", info.message, info.details)
        })?;

    tokio::fs::write(&output, &pdf)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {} ({} bytes)",
        "✅ Report written to".green().bold(),
        output.display().to_string().cyan(),
        pdf.len()
    );

    Ok(())
}

/// Runs the network probe once and prints the outcome.
async fn probe_url(config: &Config, url: &str) -> Result<()> {
    let probe = HttpProbe::new(&config.probe_settings()).context("Failed to build HTTP client")?;

    println!("{} {}", "🔎 Probing".bright_blue().bold(), url.cyan());
    let outcome = probe.probe(url).await;

    if outcome.reachable {
        println!("  {} {}", "available".green().bold(), outcome.detail.bright_black());
    } else {
        println!("  {} {}", "not available".red().bold(), outcome.detail.bright_black());
    }

    Ok(())
}

/// Dispatches data directory commands.
async fn handle_store_action(action: StoreAction, repo: Arc<FileSetRepository>) -> Result<()> {
    match action {
        StoreAction::CleanTmp { yes } => clean_temp_files(repo, yes).await,
    }
}

/// Lists and removes `.tmp` files left by interrupted writes.
///
/// Canonical records are never touched; a temp file only ever holds a write
/// that did not reach its commit point.
async fn clean_temp_files(repo: Arc<FileSetRepository>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Leftover temp files".bright_blue().bold());
    println!();

    let leftovers = repo
        .leftover_temp_files()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to scan data directory: {}", e))?;

    if leftovers.is_empty() {
        println!("{}", "  Nothing to clean".green());
        return Ok(());
    }

    for path in &leftovers {
        println!("  {}", path.display().to_string().bright_black());
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} file(s)?", leftovers.len()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    for path in &leftovers {
        tokio::fs::remove_file(path)
            .await
            .with_context(|| format!("Failed to delete {}", path.display()))?;
    }

    println!("{}", "✅ Temp files removed".green().bold());
    Ok(())
}
