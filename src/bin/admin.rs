//! CLI administration tool for urlshort.
//!
//! Manages the entries of the sled store and checks YAML redirect documents
//! without going through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Insert the default entry
//! cargo run --bin admin -- store seed
//!
//! # Add or replace a redirect
//! cargo run --bin admin -- store put /docs https://docs.rs
//!
//! # List all redirects in the store
//! cargo run --bin admin -- store list
//!
//! # Remove a redirect
//! cargo run --bin admin -- store remove /docs
//!
//! # Validate a YAML document
//! cargo run --bin admin -- yaml check redirects.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_PATH` (optional): sled store directory (default: `url-shortener.db`)
//!
//! The store is locked while the server runs, so stop the server first.

use urlshort::domain::entities::PathRecord;
use urlshort::infrastructure::persistence::{DEFAULT_SEED, StoreWriter};
use urlshort::infrastructure::resolvers::{load_document, parse_records};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// CLI tool for managing urlshort.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Store directory (overrides STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage store entries
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Inspect YAML redirect documents
    Yaml {
        #[command(subcommand)]
        action: YamlAction,
    },
}

/// Store management subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Insert the default entries
    Seed,

    /// Add or replace a redirect
    Put {
        /// Request path, including the leading slash
        path: String,

        /// Destination URL
        url: String,
    },

    /// Show the destination of a path
    Get {
        /// Request path
        path: String,
    },

    /// List all redirects
    List,

    /// Remove a redirect
    Remove {
        /// Request path
        path: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// YAML document subcommands.
#[derive(Subcommand)]
enum YamlAction {
    /// Parse a document and print the resulting redirects
    Check {
        /// Path to the YAML document
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let store_path = cli
        .store
        .or_else(|| std::env::var("STORE_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("url-shortener.db"));

    match cli.command {
        Commands::Store { action } => handle_store_action(action, &store_path)?,
        Commands::Yaml { action } => handle_yaml_action(action)?,
    }

    Ok(())
}

/// Dispatches store commands against a read-write handle.
fn handle_store_action(action: StoreAction, store_path: &Path) -> Result<()> {
    let writer = StoreWriter::open(store_path).with_context(|| {
        format!(
            "Failed to open store at {} (is the server running?)",
            store_path.display()
        )
    })?;

    match action {
        StoreAction::Seed => seed_store(&writer)?,
        StoreAction::Put { path, url } => put_entry(&writer, &path, &url)?,
        StoreAction::Get { path } => get_entry(&writer, &path)?,
        StoreAction::List => list_entries(&writer)?,
        StoreAction::Remove { path, yes } => remove_entry(&writer, &path, yes)?,
    }

    writer.close().context("Failed to flush store")?;
    Ok(())
}

fn seed_store(writer: &StoreWriter) -> Result<()> {
    println!("{}", "🌱 Seeding store".bright_blue().bold());
    println!();

    for (path, url) in DEFAULT_SEED {
        writer.put(path, url)?;
        println!("  {} -> {}", path.cyan(), url.bright_white());
    }

    println!();
    println!("{}", "✅ Store seeded".green().bold());
    Ok(())
}

fn put_entry(writer: &StoreWriter, path: &str, url: &str) -> Result<()> {
    if !path.starts_with('/') {
        println!(
            "{}",
            "⚠️  Path has no leading slash; requests will never match it".yellow()
        );
    }

    match writer.put(path, url)? {
        Some(previous) => {
            println!("{}", "✏️  Redirect replaced".green().bold());
            println!("  {} -> {}", path.cyan(), url.bright_white());
            println!("  {}", format!("was: {}", previous).bright_black());
        }
        None => {
            println!("{}", "✅ Redirect added".green().bold());
            println!("  {} -> {}", path.cyan(), url.bright_white());
        }
    }

    Ok(())
}

fn get_entry(writer: &StoreWriter, path: &str) -> Result<()> {
    match writer.get(path)? {
        Some(url) => println!("  {} -> {}", path.cyan(), url.bright_white()),
        None => println!("{}", format!("  No redirect for {}", path).yellow()),
    }
    Ok(())
}

/// Lists all entries in key order.
///
/// # Output Format
///
/// ```text
/// 📋 Redirects
///
///   Path                           Destination
///   ─────────────────────────────────────────────────────────────
///   /urlshort-bolt                 https://github.com/gophercises/urlshort
/// ```
fn list_entries(writer: &StoreWriter) -> Result<()> {
    println!("{}", "📋 Redirects".bright_blue().bold());
    println!();

    let entries = writer.entries()?;

    if entries.is_empty() {
        println!("{}", "  No redirects found".yellow());
        println!();
        println!(
            "  Seed with: {} admin store seed",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    print_records(&entries);
    Ok(())
}

fn remove_entry(writer: &StoreWriter, path: &str, skip_confirm: bool) -> Result<()> {
    let Some(url) = writer.get(path)? else {
        println!("{}", format!("⚠️  No redirect for {}", path).yellow());
        return Ok(());
    };

    println!("  {} -> {}", path.cyan(), url.bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this redirect?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    writer.remove(path)?;
    println!("{}", "✅ Redirect removed".green().bold());
    Ok(())
}

/// Parses a YAML document and reports what the YAML source would serve.
fn handle_yaml_action(action: YamlAction) -> Result<()> {
    match action {
        YamlAction::Check { file } => {
            println!("{}", "🔍 Checking YAML redirects".bright_blue().bold());
            println!();

            let document = load_document(&file)?;
            let records = parse_records(&document)
                .with_context(|| format!("{} is not a valid redirect document", file.display()))?;

            print_records(&records);
            report_duplicates(&records);

            let blank = records
                .iter()
                .filter(|r| r.path.is_empty() || r.url.is_empty())
                .count();
            if blank > 0 {
                println!(
                    "{}",
                    format!("⚠️  {} record(s) with an empty path or url", blank).yellow()
                );
            }

            println!("{}", "✅ Document parsed".green().bold());
        }
    }

    Ok(())
}

/// Warns about paths listed more than once; the last occurrence is served.
fn report_duplicates(records: &[PathRecord]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.path.as_str()).or_default() += 1;
    }

    let mut duplicates: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();

    for (path, n) in duplicates {
        println!(
            "{}",
            format!("⚠️  {} listed {} times; the last entry wins", path, n).yellow()
        );
    }
}

fn print_records(records: &[PathRecord]) {
    println!(
        "  {:<30} {}",
        "Path".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in records {
        println!("  {:<30} {}", record.path.cyan(), record.url);
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();
}
