//! Task Vault - Main Entry Point
//!
//! Command-line front end for the task vault pipeline and its MCP server.
//! The actual implementation is in the `taskvault` library.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use taskvault::config::Config;
use taskvault::daily::daily_note_file;
use taskvault::formatting::{format_apply, format_daily, format_propose};
use taskvault::logging::init_logging;
use taskvault::pipeline::{apply_file, propose_file};
use taskvault::{NoteStorage, TaskVaultHandler, TaskWarrior, local_date_today};

/// Task Vault - turn informal checkboxes in markdown notes into TaskWarrior tasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (default: ./taskvault.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable git synchronization on load and save
    #[arg(long, global = true)]
    sync_git: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stage task proposals for a note in a TBD block
    Propose {
        /// Note path, relative to the vault root
        note: String,
        /// Reference date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Create the approved tasks of a note's TBD block
    Apply {
        /// Note path, relative to the vault root
        note: String,
        /// Reference date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Write the daily note
    Daily {
        /// Day of the note (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Serve the MCP tools over stdio
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!(); // Add a newline after help
        std::process::exit(2);
    }

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if args.sync_git {
        config.vault.sync_git = true;
    }
    init_logging(&config.log_level)?;

    let storage = NoteStorage::new(config.vault.sync_git);
    match args.command {
        Command::Propose { note, date } => {
            let path = config.vault.resolve_note(&note);
            let reference = date.unwrap_or_else(local_date_today);
            let outcome = propose_file(&path, reference, &config.layout, &storage)?;
            println!("{}", format_propose(&outcome, &note));
        }
        Command::Apply { note, date } => {
            let path = config.vault.resolve_note(&note);
            let reference = date.unwrap_or_else(local_date_today);
            let tracker = TaskWarrior::new(config.taskwarrior.clone());
            let outcome = apply_file(&path, reference, &config.layout, &storage, &tracker)?;
            println!("{}", format_apply(&outcome, &note));
        }
        Command::Daily { date } => {
            let date = date.unwrap_or_else(local_date_today);
            let tracker = TaskWarrior::new(config.taskwarrior.clone());
            let outcome =
                daily_note_file(date, &config.vault, &config.layout, &storage, &tracker)?;
            println!("{}", format_daily(&outcome));
        }
        Command::Serve => {
            let handler = TaskVaultHandler::new(config);
            serve_stdio(handler).await?;
        }
    }
    Ok(())
}
